use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::{
    config::Config,
    consts::rules_const::{READINESS_PROBE_FIRST_DELAY, READINESS_PROBE_MAX_DELAY},
    errors::Result,
    readiness::Readiness,
    store::{RecruitingStore, SurrealStore},
};

/// Everything a request handler may touch, passed explicitly through axum
/// `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RecruitingStore>,
    pub readiness: Readiness,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecruitingStore>, readiness: Readiness) -> Self {
        Self {
            config: Arc::new(config),
            store,
            readiness,
        }
    }

    pub async fn init(config: Config) -> Result<Self> {
        let store = SurrealStore::connect(&config).await?;
        let state = Self::new(config, Arc::new(store), Readiness::new());
        state.spawn_readiness_probe();
        Ok(state)
    }

    /// Pings the store until it answers, then flips readiness. Failed
    /// attempts back off exponentially up to a cap.
    pub fn spawn_readiness_probe(&self) {
        let store = self.store.clone();
        let readiness = self.readiness.clone();
        tokio::spawn(async move {
            let mut attempt = 0;
            loop {
                match store.ping().await {
                    Ok(()) => {
                        info!("Store `{}` is ready", store.backend_tag());
                        readiness.mark_ready();
                        return;
                    }
                    Err(e) => {
                        let delay = probe_backoff(attempt);
                        warn!("Store readiness probe failed (attempt {}): {e}; retrying in {delay:?}", attempt + 1);
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                }
            }
        });
    }
}

pub fn probe_backoff(attempt: u32) -> Duration {
    READINESS_PROBE_FIRST_DELAY
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(READINESS_PROBE_MAX_DELAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn test_config() -> Config {
        Config::from_lookup(|key| match key {
            "PROVIDER_URL" => Some("mem://".to_string()),
            "PROVIDER_ANON_KEY"
            | "PROVIDER_SERVICE_ROLE_KEY"
            | "ADMIN_TOKEN_SECRET"
            | "CRON_SECRET" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(probe_backoff(0), Duration::from_millis(250));
        assert_eq!(probe_backoff(1), Duration::from_millis(500));
        assert_eq!(probe_backoff(3), Duration::from_secs(2));
        assert_eq!(probe_backoff(10), READINESS_PROBE_MAX_DELAY);
        assert_eq!(probe_backoff(u32::MAX), READINESS_PROBE_MAX_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_retries_until_the_store_answers() {
        let store = Arc::new(MemoryStore::new());
        store.fail_next_pings(3);
        let state = AppState::new(test_config(), store, Readiness::new());

        state.spawn_readiness_probe();
        assert!(state.readiness.wait(Duration::from_secs(60)).await);
    }
}
