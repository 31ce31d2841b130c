//! Module declaration and lifecycle implementation

use crate::config::Config;
use crate::contract::GradingApi;
use crate::domain::Service;
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Grading service module.
///
/// Owns the wiring between configuration, storage and the domain service.
/// The hosting binary calls [`GradingServiceModule::migrate`], then
/// [`GradingServiceModule::init`], then mounts [`GradingServiceModule::register_rest`].
pub struct GradingServiceModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for GradingServiceModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl GradingServiceModule {
    /// Validate configuration and build the domain service on top of `db`
    pub async fn init(&self, cfg: Config, db: DatabaseConnection) -> Result<()> {
        cfg.validate()?;
        *self.config.write() = cfg.clone();

        let conn = Arc::new(db);

        // Build repositories
        let users = Arc::new(crate::infra::storage::repositories::SeaOrmUserRepository::new(conn.clone()));
        let marks = Arc::new(crate::infra::storage::repositories::SeaOrmMarkRepository::new(conn));

        // Audit events go to the tracing pipeline
        let event_publisher = Arc::new(crate::domain::TracingEventPublisher);

        let exam_periods = cfg.exam_periods.len();
        let service = Arc::new(Service::new(users, marks, event_publisher, cfg));
        *self.service.write() = Some(service);

        tracing::info!(exam_periods, "Grading service initialized");
        Ok(())
    }

    /// Apply pending schema migrations
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Grading service migrations completed");
        Ok(())
    }

    /// Current module configuration
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Mount REST routes onto `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;

        tracing::info!("Registering grading service REST routes");
        crate::api::rest::routes::register_routes(router, service)
    }

    /// In-process client backed by the domain service
    pub fn client(&self) -> Result<Arc<dyn GradingApi>> {
        let service = self.service()?;
        Ok(Arc::new(crate::api::native::NativeClient::new(service)))
    }

    fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }
}
