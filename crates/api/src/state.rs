use emerald_clients::ChatClients;
use emerald_metrics::MetricsService;
use emerald_models::ServiceConfig;
use std::sync::Arc;

use crate::ChatService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub chat: Arc<ChatService>,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    pub fn new(config: ServiceConfig, clients: ChatClients, metrics: Arc<MetricsService>) -> Self {
        let chat = Arc::new(ChatService::new(clients, metrics.clone(), &config));
        Self {
            config: Arc::new(config),
            chat,
            metrics,
        }
    }
}
