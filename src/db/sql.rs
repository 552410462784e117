//! Parameterized SQL fragment construction.
//!
//! Both builders emit positional `$n` placeholders numbered from 1 together with
//! the values that bind to them, in placeholder order. Callers that append
//! further placeholders continue from `params.len() + 1`.

use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;

use crate::db::error::RepositoryError;

/// Translation table from resource-facing field names to storage columns.
///
/// Fields without an entry translate to themselves. `translate` is a `const fn`
/// so column names for known fields can be resolved into constants at compile
/// time.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapper {
    mappings: &'static [(&'static str, &'static str)],
}

impl FieldMapper {
    pub const fn new(mappings: &'static [(&'static str, &'static str)]) -> Self {
        Self { mappings }
    }

    pub const fn translate<'a>(&self, field: &'a str) -> &'a str {
        let mut i = 0;
        while i < self.mappings.len() {
            let (name, column) = self.mappings[i];
            if str_eq(name, field) {
                return column;
            }
            i += 1;
        }
        field
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Field names of a job as exposed over the API
pub const JOB_FIELDS: FieldMapper = FieldMapper::new(&[("companyHandle", "company_handle")]);

/// A value bound to a placeholder. `None` binds a typed `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(Option<i32>),
    Decimal(Option<Decimal>),
    Text(Option<String>),
}

/// Ordered set of `field -> new value` pairs for a partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateDescriptor {
    entries: Vec<(&'static str, SqlValue)>,
}

impl UpdateDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &'static str, value: SqlValue) {
        self.entries.push((field, value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Build the assignment list of an `UPDATE ... SET` statement.
///
/// Returns `"col1"=$1, "col2"=$2, ...` and the values for those placeholders.
/// An empty descriptor is rejected before any placeholder is produced.
pub fn build_set_clause(
    updates: &UpdateDescriptor,
    mapper: &FieldMapper,
) -> Result<(String, Vec<SqlValue>), RepositoryError> {
    if updates.is_empty() {
        return Err(RepositoryError::MalformedRequest(
            "no data to update".to_string(),
        ));
    }

    let mut fragments = Vec::with_capacity(updates.len());
    let mut params = Vec::with_capacity(updates.len());

    for (field, value) in &updates.entries {
        fragments.push(format!("\"{}\"=${}", mapper.translate(field), params.len() + 1));
        params.push(value.clone());
    }

    Ok((fragments.join(", "), params))
}

/// A single search constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column >= value`
    AtLeast { column: &'static str, value: SqlValue },
    /// `column <= value`
    AtMost { column: &'static str, value: SqlValue },
    /// A fixed condition on a column without parameters, e.g. `"col" > 0`
    Flag { column: &'static str, condition: &'static str },
    /// Case-insensitive substring match
    Contains { column: &'static str, needle: String },
}

/// Build the boolean expression of a `WHERE` clause, without the keyword.
///
/// An empty predicate list yields an empty string; the caller must then omit
/// `WHERE` altogether.
pub fn build_where_clause(predicates: Vec<Predicate>) -> (String, Vec<SqlValue>) {
    let mut fragments = Vec::with_capacity(predicates.len());
    let mut params = Vec::new();

    for predicate in predicates {
        let fragment = match predicate {
            Predicate::AtLeast { column, value } => {
                params.push(value);
                format!("\"{column}\" >= ${}", params.len())
            }
            Predicate::AtMost { column, value } => {
                params.push(value);
                format!("\"{column}\" <= ${}", params.len())
            }
            Predicate::Flag { column, condition } => format!("\"{column}\" {condition}"),
            Predicate::Contains { column, needle } => {
                params.push(SqlValue::Text(Some(format!("%{needle}%"))));
                format!("\"{column}\" ILIKE ${}", params.len())
            }
        };
        fragments.push(fragment);
    }

    (fragments.join(" AND "), params)
}

/// Prefix a non-empty condition with `WHERE`.
pub fn where_keyword(condition: &str) -> String {
    if condition.is_empty() {
        String::new()
    } else {
        format!("WHERE {condition}")
    }
}

/// Bind a slice of `SqlValue` to a sqlx `QueryAs`, in placeholder order.
pub fn bind_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        q = match value {
            SqlValue::Integer(v) => q.bind(*v),
            SqlValue::Decimal(v) => q.bind(*v),
            SqlValue::Text(v) => q.bind(v.as_deref()),
        };
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PEOPLE: FieldMapper = FieldMapper::new(&[("firstName", "first_name"), ("age", "user_age")]);

    #[test]
    fn translate_uses_mapping_or_identity() {
        assert_eq!(PEOPLE.translate("firstName"), "first_name");
        assert_eq!(PEOPLE.translate("age"), "user_age");
        assert_eq!(PEOPLE.translate("lastName"), "lastName");
        assert_eq!(JOB_FIELDS.translate("companyHandle"), "company_handle");
        assert_eq!(JOB_FIELDS.translate("title"), "title");
        assert_eq!(PEOPLE.translate("firstNam"), "firstNam");
    }

    #[test]
    fn translate_resolves_in_const_context() {
        const HANDLE_COLUMN: &str = JOB_FIELDS.translate("companyHandle");
        const AGE_COLUMN: &str = PEOPLE.translate("age");
        const TITLE_COLUMN: &str = JOB_FIELDS.translate("title");

        assert_eq!(HANDLE_COLUMN, "company_handle");
        assert_eq!(AGE_COLUMN, "user_age");
        assert_eq!(TITLE_COLUMN, "title");
    }

    #[test]
    fn set_clause_with_mapping() {
        let mut updates = UpdateDescriptor::new();
        updates.set("firstName", SqlValue::Text(Some("Aliya".into())));
        updates.set("age", SqlValue::Integer(Some(32)));

        let (clause, params) = build_set_clause(&updates, &PEOPLE).unwrap();

        assert_eq!(clause, r#""first_name"=$1, "user_age"=$2"#);
        assert_eq!(
            params,
            vec![
                SqlValue::Text(Some("Aliya".into())),
                SqlValue::Integer(Some(32)),
            ]
        );
    }

    #[test]
    fn set_clause_params_follow_insertion_order() {
        let mut updates = UpdateDescriptor::new();
        updates.set("equity", SqlValue::Decimal(None));
        updates.set("title", SqlValue::Text(Some("j".into())));
        updates.set("salary", SqlValue::Integer(Some(1)));

        let (clause, params) = build_set_clause(&updates, &JOB_FIELDS).unwrap();

        assert_eq!(clause, r#""equity"=$1, "title"=$2, "salary"=$3"#);
        assert_eq!(params.len(), updates.len());
        assert_eq!(params[0], SqlValue::Decimal(None));
        assert_eq!(params[2], SqlValue::Integer(Some(1)));
        assert!(!clause.contains("$4"));
    }

    #[test]
    fn set_clause_rejects_empty_updates() {
        let empty = UpdateDescriptor::new();
        assert_matches!(
            build_set_clause(&empty, &PEOPLE),
            Err(RepositoryError::MalformedRequest(_))
        );
        assert_matches!(
            build_set_clause(&empty, &JOB_FIELDS),
            Err(RepositoryError::MalformedRequest(_))
        );
    }

    #[test]
    fn where_clause_empty_without_predicates() {
        let (clause, params) = build_where_clause(Vec::new());
        assert_eq!(clause, "");
        assert!(params.is_empty());
        assert_eq!(where_keyword(&clause), "");
    }

    #[test]
    fn where_clause_numbers_placeholders_around_flags() {
        let (clause, params) = build_where_clause(vec![
            Predicate::Contains { column: "title", needle: "eng".into() },
            Predicate::Flag { column: "equity", condition: "> 0" },
            Predicate::AtLeast { column: "salary", value: SqlValue::Integer(Some(100)) },
            Predicate::AtMost { column: "salary", value: SqlValue::Integer(Some(200)) },
        ]);

        assert_eq!(
            clause,
            r#""title" ILIKE $1 AND "equity" > 0 AND "salary" >= $2 AND "salary" <= $3"#
        );
        assert_eq!(
            params,
            vec![
                SqlValue::Text(Some("%eng%".into())),
                SqlValue::Integer(Some(100)),
                SqlValue::Integer(Some(200)),
            ]
        );
        assert_eq!(where_keyword(&clause), format!("WHERE {clause}"));
    }

    #[test]
    fn where_clause_single_predicate_has_no_conjunction() {
        let (clause, params) = build_where_clause(vec![Predicate::Flag {
            column: "equity",
            condition: "> 0",
        }]);
        assert_eq!(clause, "\"equity\" > 0");
        assert!(params.is_empty());
        assert!(!clause.contains("AND"));
    }
}
