use crate::config::Config;
use crate::db::Store;

/// Request-independent shared state. There is deliberately no cross-request
/// mutable state here beyond the store itself; every request re-resolves
/// its session and reads its own pages.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self { config, store })
    }
}
