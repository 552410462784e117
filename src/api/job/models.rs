use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::db::sql::{Predicate, SqlValue, UpdateDescriptor, JOB_FIELDS};

const TITLE_COLUMN: &str = JOB_FIELDS.translate("title");
const SALARY_COLUMN: &str = JOB_FIELDS.translate("salary");
const EQUITY_COLUMN: &str = JOB_FIELDS.translate("equity");
const COMPANY_HANDLE_COLUMN: &str = JOB_FIELDS.translate("companyHandle");

/// Condition applied to the equity column for `hasEquity=true`
const HAS_EQUITY: &str = "> 0";

/// Body of `POST /jobs`
#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(range(min = 0, message = "Salary must be non-negative"))]
    pub salary: Option<i32>,
    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Decimal>,
    #[validate(length(
        min = 1,
        max = 25,
        message = "Company handle must be between 1 and 25 characters"
    ))]
    pub company_handle: String,
}

/// Body of `PATCH /jobs/{id}`
///
/// A key that is absent leaves the column untouched. `salary` and `equity`
/// may be sent as `null` to clear them; `title` may not.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0, message = "Salary must be non-negative"))]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Option<Decimal>>,
}

impl JobUpdate {
    /// Supplied fields in `title, salary, equity` order
    pub fn descriptor(&self) -> UpdateDescriptor {
        let mut updates = UpdateDescriptor::new();
        if let Some(title) = &self.title {
            updates.set("title", SqlValue::Text(Some(title.clone())));
        }
        if let Some(salary) = self.salary {
            updates.set("salary", SqlValue::Integer(salary));
        }
        if let Some(equity) = self.equity {
            updates.set("equity", SqlValue::Decimal(equity));
        }
        updates
    }
}

/// Query string of `GET /jobs`; every key is optional
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_filter_ranges"))]
pub struct JobFilter {
    pub title: Option<String>,
    #[validate(range(min = 0, message = "minSalary must be non-negative"))]
    pub min_salary: Option<i32>,
    #[validate(range(min = 0, message = "maxSalary must be non-negative"))]
    pub max_salary: Option<i32>,
    #[validate(custom(function = "validate_equity"))]
    pub min_equity: Option<Decimal>,
    #[validate(custom(function = "validate_equity"))]
    pub max_equity: Option<Decimal>,
    pub has_equity: Option<bool>,
    pub company_handle: Option<String>,
}

impl JobFilter {
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(title) = &self.title {
            predicates.push(Predicate::Contains {
                column: TITLE_COLUMN,
                needle: title.clone(),
            });
        }
        if let Some(min_salary) = self.min_salary {
            predicates.push(Predicate::AtLeast {
                column: SALARY_COLUMN,
                value: SqlValue::Integer(Some(min_salary)),
            });
        }
        if let Some(max_salary) = self.max_salary {
            predicates.push(Predicate::AtMost {
                column: SALARY_COLUMN,
                value: SqlValue::Integer(Some(max_salary)),
            });
        }
        if let Some(min_equity) = self.min_equity {
            predicates.push(Predicate::AtLeast {
                column: EQUITY_COLUMN,
                value: SqlValue::Decimal(Some(min_equity)),
            });
        }
        if let Some(max_equity) = self.max_equity {
            predicates.push(Predicate::AtMost {
                column: EQUITY_COLUMN,
                value: SqlValue::Decimal(Some(max_equity)),
            });
        }
        if self.has_equity == Some(true) {
            predicates.push(Predicate::Flag {
                column: EQUITY_COLUMN,
                condition: HAS_EQUITY,
            });
        }
        if let Some(handle) = &self.company_handle {
            predicates.push(Predicate::Contains {
                column: COMPANY_HANDLE_COLUMN,
                needle: handle.clone(),
            });
        }

        predicates
    }
}

/// Deserialize a key that is present in the payload, including `null` when
/// `T` accepts it. Paired with `#[serde(default)]` so a missing key is `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn validate_equity(equity: &Decimal) -> Result<(), ValidationError> {
    if *equity < Decimal::ZERO || *equity > Decimal::ONE {
        let mut err = ValidationError::new("equity_range");
        err.message = Some("Equity must be between 0 and 1".into());
        return Err(err);
    }
    Ok(())
}

fn validate_filter_ranges(filter: &JobFilter) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (filter.min_salary, filter.max_salary) {
        if min > max {
            let mut err = ValidationError::new("salary_range");
            err.message = Some("minSalary cannot be greater than maxSalary".into());
            return Err(err);
        }
    }
    if let (Some(min), Some(max)) = (filter.min_equity, filter.max_equity) {
        if min > max {
            let mut err = ValidationError::new("equity_range");
            err.message = Some("minEquity cannot be greater than maxEquity".into());
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sql::{build_set_clause, build_where_clause};
    use rust_decimal::Decimal;

    #[test]
    fn update_distinguishes_absent_from_null() {
        let update: JobUpdate =
            serde_json::from_str(r#"{"title": "j1-new", "equity": null}"#).unwrap();

        assert_eq!(update.title.as_deref(), Some("j1-new"));
        assert_eq!(update.salary, None);
        assert_eq!(update.equity, Some(None));

        let (clause, params) = build_set_clause(&update.descriptor(), &JOB_FIELDS).unwrap();
        assert_eq!(clause, r#""title"=$1, "equity"=$2"#);
        assert_eq!(
            params,
            vec![SqlValue::Text(Some("j1-new".into())), SqlValue::Decimal(None)]
        );
    }

    #[test]
    fn update_rejects_null_title_and_unknown_fields() {
        assert!(serde_json::from_str::<JobUpdate>(r#"{"title": null}"#).is_err());
        assert!(serde_json::from_str::<JobUpdate>(r#"{"companyHandle": "c2"}"#).is_err());
    }

    #[test]
    fn empty_update_has_empty_descriptor() {
        let update: JobUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.descriptor().is_empty());
    }

    #[test]
    fn update_validation_checks_ranges() {
        let update = JobUpdate {
            salary: Some(Some(-1)),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = JobUpdate {
            equity: Some(Some(Decimal::new(15, 1))),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = JobUpdate {
            salary: Some(None),
            equity: Some(Some(Decimal::new(5, 1))),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn empty_filter_has_no_predicates() {
        let filter = JobFilter::default();
        assert!(filter.predicates().is_empty());
        assert_eq!(build_where_clause(filter.predicates()), (String::new(), Vec::new()));
    }

    #[test]
    fn has_equity_flag_targets_mapped_equity_column() {
        let filter = JobFilter {
            has_equity: Some(true),
            ..Default::default()
        };
        assert_eq!(
            filter.predicates(),
            vec![Predicate::Flag {
                column: JOB_FIELDS.translate("equity"),
                condition: "> 0",
            }]
        );
        assert_eq!(build_where_clause(filter.predicates()).0, r#""equity" > 0"#);
    }

    #[test]
    fn has_equity_false_adds_no_constraint() {
        let filter = JobFilter {
            has_equity: Some(false),
            ..Default::default()
        };
        assert!(filter.predicates().is_empty());
    }

    #[test]
    fn filter_fragments_match_present_keys() {
        let filter = JobFilter {
            title: Some("eng".into()),
            min_salary: Some(60000),
            has_equity: Some(true),
            company_handle: Some("c1".into()),
            ..Default::default()
        };

        let (clause, params) = build_where_clause(filter.predicates());

        assert_eq!(
            clause,
            r#""title" ILIKE $1 AND "salary" >= $2 AND "equity" > 0 AND "company_handle" ILIKE $3"#
        );
        assert_eq!(clause.split(" AND ").count(), 4);
        assert_eq!(
            params,
            vec![
                SqlValue::Text(Some("%eng%".into())),
                SqlValue::Integer(Some(60000)),
                SqlValue::Text(Some("%c1%".into())),
            ]
        );
    }

    #[test]
    fn filter_validation_rejects_inverted_ranges() {
        let filter = JobFilter {
            min_salary: Some(10),
            max_salary: Some(5),
            ..Default::default()
        };
        assert!(filter.validate().is_err());

        let filter = JobFilter {
            min_salary: Some(5),
            max_salary: Some(10),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
    }
}
