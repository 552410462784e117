/// Application-wide settings shared with handlers and extractors
#[derive(Clone, Debug)]
pub struct AppState {
    app_name: String,
    admin_token: Option<String>,
}

impl AppState {
    pub fn new(name: &str, admin_token: Option<String>) -> Self {
        AppState {
            app_name: name.into(),
            admin_token,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }
}
