use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub store: Store,
    pub notification: Notification,
    pub drip: Drip,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Store {
    pub backend: StoreBackend,
    pub data_dir: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Jsonl,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Jsonl => "jsonl",
            StoreBackend::Memory => "memory",
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for StoreBackend {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "jsonl" => Ok(StoreBackend::Jsonl),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!("unknown store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub relay_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Drip {
    pub poll_interval_secs: u64,
}
