use crate::auth::{AuthError, TokenVerifier};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        Ok(Self {
            verifier: TokenVerifier::new(&config.auth)?,
        })
    }
}
