use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    9200
}

fn default_host() -> String {
    "0.0.0.0".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    /// Pause between the end of one pass and the start of the next.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_command() -> String {
    "docker".into()
}

fn default_args() -> Vec<String> {
    ["stats", "--no-stream", "--format", "{{json .}}"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            command: default_command(),
            args: default_args(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log app stats (passes, samples written, lines skipped) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Load from `CONFIG_FILE` (default `config.toml`), then apply the `PORT` override.
    /// A missing default file means all defaults; a missing explicit file is an error.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var("CONFIG_FILE").ok();
        let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);
        let s = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                String::new()
            }
            Err(e) => return Err(anyhow::anyhow!("config file {}: {}", path, e)),
        };
        let port = std::env::var("PORT").ok();
        Self::load_with_port_override(&s, port.as_deref())
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        Self::load_with_port_override(s, None)
    }

    /// Parse config, then let a `PORT`-style value (if present and non-empty) replace `server.port`.
    pub fn load_with_port_override(s: &str, port: Option<&str>) -> anyhow::Result<Self> {
        let mut config: AppConfig = toml::from_str(s)?;
        if let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) {
            config.server.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a port number, got {:?}: {}", port, e))?;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.sampler.interval_ms > 0,
            "sampler.interval_ms must be > 0, got {}",
            self.sampler.interval_ms
        );
        anyhow::ensure!(
            !self.sampler.command.is_empty(),
            "sampler.command must be non-empty"
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
