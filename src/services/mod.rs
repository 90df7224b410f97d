//! Business logic services

pub mod catalog;
pub mod loans;
pub mod redis;
pub mod session;
pub mod users;

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    models::language::LanguageVocabulary,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub sessions: session::SessionService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        vocabulary: Arc<LanguageVocabulary>,
        session_store: Arc<dyn session::SessionStore>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), vocabulary),
            loans: loans::LoansService::new(repository.clone()),
            sessions: session::SessionService::new(session_store),
            users: users::UsersService::new(repository, auth_config),
        }
    }
}
