use emerald_metrics::AgentMetrics;
use std::sync::Arc;

use crate::ModelBackend;

#[derive(Clone)]
pub struct AgentState {
    pub backend: Arc<dyn ModelBackend>,
    pub metrics: Arc<AgentMetrics>,
}

impl AgentState {
    pub fn new(backend: Arc<dyn ModelBackend>, metrics: Arc<AgentMetrics>) -> Self {
        Self { backend, metrics }
    }
}
