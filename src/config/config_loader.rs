use anyhow::{Ok, Result};

use super::config_model::{DotEnvyConfig, Drip, Notification, Server, Store, StoreBackend};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let store = Store {
        backend: std::env::var("STORE_BACKEND")
            .map(|raw| StoreBackend::try_from(raw.as_str()).unwrap_or_default())
            .unwrap_or_default(),
        data_dir: std::env::var("STORE_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
    };

    let notification = Notification {
        relay_url: std::env::var("NOTIFY_RELAY_URL").ok(),
        timeout_secs: std::env::var("NOTIFY_TIMEOUT_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(10),
    };

    let drip = Drip {
        poll_interval_secs: std::env::var("DRIP_POLL_INTERVAL_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(300),
    };

    Ok(DotEnvyConfig {
        server,
        store,
        notification,
        drip,
    })
}
