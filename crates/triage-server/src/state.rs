use std::sync::Arc;

use triage_config::{ConfigError, ServerConfig};
use triage_core::{ScoringProfile, TriageScorer};
use triage_monitor::{InMemoryCollector, MetricsCollector};
use tracing::info;

pub struct ServerState {
    pub scorer: TriageScorer,
    pub metrics: Arc<dyn MetricsCollector>,
}

impl ServerState {
    pub fn new(profile: ScoringProfile) -> Self {
        Self {
            scorer: TriageScorer::new(profile),
            metrics: Arc::new(InMemoryCollector::new()),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let profile = config.scoring_profile()?;
        match &config.profile_path {
            Some(path) => info!("Using scoring profile {}", path.display()),
            None => info!("Using built-in scoring profile"),
        }
        Ok(Self::new(profile))
    }
}
