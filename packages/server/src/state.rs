use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::orchestrator::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub orchestrator: Orchestrator,
    pub config: AppConfig,
}
