use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MNP 查询接口地址
    pub endpoint_url: String,
    /// 会话 cookie 名称
    pub cookie_name: String,
    /// 每次运行开始时的冷却时间（秒）
    pub initial_cooldown: f64,
    /// 冷却时间下限（秒）
    pub min_cooldown: f64,
    /// 冷却时间上限（秒）
    pub max_cooldown: f64,
    /// 冷却等待的刻度（毫秒），取消信号在一个刻度内生效
    pub cooldown_tick_ms: u64,
    /// 单次请求超时（秒），None 表示使用底层默认值
    pub request_timeout_secs: Option<u64>,
    /// 同一号码最多尝试次数，None 表示无限重试
    pub max_attempts: Option<u32>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: "https://guru.cyberyodha.org/request/singlemnp".to_string(),
            cookie_name: "ci_session".to_string(),
            initial_cooldown: 3.0,
            min_cooldown: 2.0,
            max_cooldown: 10.0,
            cooldown_tick_ms: 100,
            request_timeout_secs: None,
            max_attempts: None,
            verbose_logging: false,
            output_log_file: "mnp_output.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置的字段使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env(self) -> Self {
        let base = self;
        Self {
            endpoint_url: std::env::var("MNP_ENDPOINT_URL").unwrap_or(base.endpoint_url),
            cookie_name: std::env::var("MNP_COOKIE_NAME").unwrap_or(base.cookie_name),
            initial_cooldown: env_parse("MNP_INITIAL_COOLDOWN").unwrap_or(base.initial_cooldown),
            min_cooldown: env_parse("MNP_MIN_COOLDOWN").unwrap_or(base.min_cooldown),
            max_cooldown: env_parse("MNP_MAX_COOLDOWN").unwrap_or(base.max_cooldown),
            cooldown_tick_ms: env_parse("MNP_COOLDOWN_TICK_MS").unwrap_or(base.cooldown_tick_ms),
            request_timeout_secs: env_parse("MNP_REQUEST_TIMEOUT_SECS").or(base.request_timeout_secs),
            max_attempts: env_parse("MNP_MAX_ATTEMPTS").or(base.max_attempts),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(base.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(base.output_log_file),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;

        Ok(config)
    }

    /// 校验冷却参数与最大尝试次数
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_cooldown >= 0.0
            && self.max_cooldown.is_finite()
            && self.min_cooldown <= self.max_cooldown)
        {
            return Err(ConfigError::InvalidBounds {
                min: self.min_cooldown,
                max: self.max_cooldown,
            });
        }
        if !(self.initial_cooldown >= self.min_cooldown && self.initial_cooldown <= self.max_cooldown) {
            return Err(ConfigError::InvalidInitial {
                initial: self.initial_cooldown,
                min: self.min_cooldown,
                max: self.max_cooldown,
            });
        }
        if self.cooldown_tick_ms == 0 {
            return Err(ConfigError::InvalidTick);
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::InvalidMaxAttempts);
        }
        Ok(())
    }

    pub fn cooldown_tick(&self) -> Duration {
        Duration::from_millis(self.cooldown_tick_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
