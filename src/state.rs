use std::sync::Arc;

use crate::{
    auth::{repo::UserStore, services::AccountService},
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = UserStore::new(config.users_file.clone());
        let accounts = Arc::new(AccountService::new(store, config.storage_policy));
        Self {
            config: Arc::new(config),
            accounts,
        }
    }
}
