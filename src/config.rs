use std::time::Duration;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:9977";
const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub monitor_interval: Duration,
}

impl ServerConfig {
    /// Reads `BIND_ADDRESS` and `MONITOR_INTERVAL_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        ServerConfig::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let monitor_secs = match lookup("MONITOR_INTERVAL_SECS") {
            None => DEFAULT_MONITOR_INTERVAL_SECS,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    log::warn!("Invalid MONITOR_INTERVAL_SECS {:?}, using {}", value, DEFAULT_MONITOR_INTERVAL_SECS);
                    DEFAULT_MONITOR_INTERVAL_SECS
                }
            }
        };
        ServerConfig { bind_address, monitor_interval: Duration::from_secs(monitor_secs) }
    }
}
