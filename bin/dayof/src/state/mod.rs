use std::{path::Path, sync::Arc};

use db::Store;
use email::Mailer;

use crate::config::Config;
use crate::error::Error;

pub struct ServerStateInner {
    pub db: Arc<dyn Store>,
    pub config: config::Config<Config>,
    pub mailer: Arc<dyn Mailer>,
}

#[derive(Clone)]
#[repr(transparent)]
pub struct ServerState(triomphe::Arc<ServerStateInner>);

impl std::ops::Deref for ServerState {
    type Target = ServerStateInner;

    #[inline(always)]
    fn deref(&self) -> &ServerStateInner {
        &self.0
    }
}

impl config::HasConfig<Config> for ServerState {
    #[inline(always)]
    fn raw(&self) -> &config::Config<Config> {
        &self.config
    }
}

impl ServerState {
    pub fn new(config: Config, db: Arc<dyn Store>, mailer: Arc<dyn Mailer>) -> Self {
        ServerState(triomphe::Arc::new(ServerStateInner {
            db,
            config: config::Config::new(config),
            mailer,
        }))
    }

    /// Reads the config file again and swaps it in, waking anything waiting on `config_change`.
    ///
    /// On error the running config is left as it was.
    pub async fn reload_config(&self, path: &Path) -> Result<(), Error> {
        let config: Config = ::config::load(path).await?;

        self.config.set(config);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use config::HasConfig;

    use crate::testing::Harness;

    #[tokio::test]
    async fn test_reload_config() {
        let h = Harness::new();
        let path = std::env::temp_dir().join(format!("dayof-reload-{}.json", std::process::id()));

        tokio::fs::write(&path, r#"{ "invites": { "expiry_days": 2 }, "rpc": { "bind": "127.0.0.1:7171" } }"#)
            .await
            .unwrap();

        let changed = h.state.config.config_change.notified();
        tokio::pin!(changed);
        changed.as_mut().enable();

        h.state.reload_config(&path).await.unwrap();
        changed.await;

        assert_eq!(h.state.config().invites.expiry_days, 2);
        assert_eq!(h.state.config().rpc.bind, SocketAddr::from(([127, 0, 0, 1], 7171)));

        // quotas are not part of the config, so the whole file is rejected
        tokio::fs::write(&path, r#"{ "invites": { "expiry_days": 4, "max_per_hour": 5 } }"#).await.unwrap();

        assert!(h.state.reload_config(&path).await.is_err());
        assert_eq!(h.state.config().invites.expiry_days, 2);

        tokio::fs::remove_file(&path).await.unwrap();

        assert!(h.state.reload_config(&path).await.is_err());
        assert_eq!(h.state.config().invites.expiry_days, 2);
    }
}
