use config::{Config, ConfigError};
use serde::Deserialize;

pub mod domain;
pub mod infrastructure;

#[derive(Clone, Debug, Deserialize)]
pub struct StadiumConfig {
    pub logger: Logger,
    #[serde(default)]
    pub agenda: Agenda,
}

impl StadiumConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("logger.level", "INFO")?
            .add_source(config::File::with_name("stadium.toml").required(false))
            .add_source(
                config::Environment::with_prefix("STADIUM")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<StadiumConfig>()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

/// 予定一覧の出力設定
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Agenda {
    /// 予約JSONの読み込み元（未指定なら標準入力）
    pub input: Option<String>,
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}
