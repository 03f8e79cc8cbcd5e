use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// 网络请求错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 后台查询任务异常退出
    #[error("后台任务执行失败: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// 输入校验错误，在发出任何网络请求之前返回
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// 未填写 ci_session cookie
    #[error("请输入 ci_session cookie")]
    MissingCredential,
    /// 号码列表为空
    #[error("请至少输入一个有效的手机号码")]
    NoNumbers,
    /// 已有查询在运行
    #[error("已有查询正在运行")]
    AlreadyRunning,
}

/// 网络请求错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 构建 HTTP 客户端失败
    #[error("构建HTTP客户端失败: {source}")]
    ClientBuildFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 网络请求失败（超时、连接错误等）
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 读取响应体失败
    #[error("读取响应失败 ({endpoint}): {source}")]
    ReadBodyFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 响应中嵌入的 JSON 载荷错误
#[derive(Debug, Error)]
pub enum PayloadError {
    /// 响应中没有 `JSON.parse('[...]')`
    #[error("响应中未找到 JSON 数据")]
    Missing,
    /// 找到了载荷但 JSON 解析失败
    #[error("JSON解析失败: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
    /// 序列化结果失败
    #[error("序列化结果失败 ({path}): {source}")]
    SerializeFailed {
        path: String,
        source: serde_json::Error,
    },
    /// CSV 写入失败
    #[error("CSV写入失败 ({path}): {source}")]
    CsvFailed { path: String, source: csv::Error },
    /// xlsx 写入失败
    #[error("xlsx写入失败 ({path}): {source}")]
    XlsxFailed {
        path: String,
        source: rust_xlsxwriter::XlsxError,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 冷却上下限不合法
    #[error("冷却时间范围不合法: min={min}, max={max}")]
    InvalidBounds { min: f64, max: f64 },
    /// 初始冷却时间不在上下限之间
    #[error("初始冷却时间不合法: initial={initial}, 范围 [{min}, {max}]")]
    InvalidInitial { initial: f64, min: f64, max: f64 },
    /// 最大尝试次数为 0
    #[error("最大尝试次数必须大于 0")]
    InvalidMaxAttempts,
    /// 冷却刻度为 0
    #[error("冷却刻度必须大于 0 毫秒")]
    InvalidTick,
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

impl ApiError {
    /// 创建网络请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
