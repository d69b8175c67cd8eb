use crate::core::config::ServiceAccountConfig;
use crate::core::error::AppError;
use crate::models::user::User;
use crate::stores::credential_store::CredentialStore;
use crate::utils::auth::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, warn};

/// Who a request was authenticated as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    User(User),
    ServiceAccount(String),
}

impl Principal {
    pub fn name(&self) -> &str {
        match self {
            Principal::User(user) => &user.name,
            Principal::ServiceAccount(name) => name,
        }
    }
}

/// Checks credentials against the store, then against the service account
/// when one is configured
pub struct Authenticator {
    store: Arc<CredentialStore>,
    service_account: Option<ServiceAccountConfig>,
}

impl Authenticator {
    pub fn new(store: Arc<CredentialStore>, service_account: &ServiceAccountConfig) -> Self {
        let service_account = service_account.enabled.then(|| service_account.clone());

        if let Some(account) = &service_account {
            warn!(name = %account.name, "Service account authentication is enabled");
        }

        Self {
            store,
            service_account,
        }
    }

    pub async fn authenticate(&self, name: &str, password: &str) -> Result<Principal, AppError> {
        if let Some(user) = self.store.lookup(name, password).await? {
            debug!(user_id = user.id, "Authenticated against credential store");
            return Ok(Principal::User(user));
        }

        if self.is_service_account(name, password) {
            debug!(name = %name, "Authenticated as service account");
            return Ok(Principal::ServiceAccount(name.to_string()));
        }

        warn!(name = %name, "Authentication failed");
        Err(AppError::AuthenticationFailure)
    }

    fn is_service_account(&self, name: &str, password: &str) -> bool {
        match &self.service_account {
            Some(account) => {
                // Evaluate both so timing does not reveal which field differed
                let name_ok = constant_time_eq(name.as_bytes(), account.name.as_bytes());
                let password_ok =
                    constant_time_eq(password.as_bytes(), account.password.as_bytes());
                name_ok & password_ok
            }
            None => false,
        }
    }
}
