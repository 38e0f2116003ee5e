use crate::domain::app::App;

/// Values the transport layer resolves before calling into the orchestrator:
/// the app the request belongs to and the raw bearer token, if any.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub app: App,
    pub bearer_token: Option<String>,
}

impl AuthContext {
    pub fn anonymous(app: App) -> Self {
        Self {
            app,
            bearer_token: None,
        }
    }

    pub fn with_token(app: App, token: impl Into<String>) -> Self {
        Self {
            app,
            bearer_token: Some(token.into()),
        }
    }
}
