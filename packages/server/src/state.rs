use std::sync::Arc;

use common::ChatBackend;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::judge::JudgeClient;
use crate::scratch::ScratchStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub llm: Arc<dyn ChatBackend>,
    pub judge: Arc<JudgeClient>,
    pub scratch: Arc<ScratchStore>,
}
