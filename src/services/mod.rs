//! Business logic services

pub mod catalog;
pub mod users;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, SiteConfig},
    repository::{HealthStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    pub health: Arc<dyn HealthStore>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, site_config: &SiteConfig) -> Self {
        Self {
            health: repository.health.clone(),
            catalog: catalog::CatalogService::new(repository.clone(), site_config.top_n),
            users: users::UsersService::new(repository, auth_config, &site_config.media_dir),
        }
    }
}
