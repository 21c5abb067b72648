use thiserror::Error;

/// 主要紀錄（寶可夢本體）抓取失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network failure fetching pokemon '{identifier}': {message}")]
    NetworkFailure { identifier: String, message: String },

    #[error("Malformed response for pokemon '{identifier}': {message}")]
    MalformedResponse { identifier: String, message: String },
}

impl FetchError {
    pub fn network(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    pub fn malformed(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// 嘗試抓取的識別碼（id 或名稱）
    pub fn identifier(&self) -> &str {
        match self {
            Self::NetworkFailure { identifier, .. } | Self::MalformedResponse { identifier, .. } => {
                identifier
            }
        }
    }
}

/// 單一持有道具的子請求失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemFetchError {
    #[error("Network failure fetching item {url}: {message}")]
    NetworkFailure { url: String, message: String },

    #[error("Malformed item response from {url}: {message}")]
    MalformedResponse { url: String, message: String },
}

impl ItemFetchError {
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn malformed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// 持有道具整批解析失敗：只要任何一個子請求失敗就整批作廢
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeldItemsError {
    #[error("Held item {} of {total} failed: {source}", .index + 1)]
    PartialFailure {
        index: usize,
        total: usize,
        #[source]
        source: ItemFetchError,
    },

    #[error("Held item resolution interrupted ({total} items): {message}")]
    Interrupted { total: usize, message: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl AppError {
    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Http(_) => "Could not set up the HTTP client".to_string(),
            Self::Io(e) => format!("File or terminal access failed: {}", e),
            Self::Serialization(_) => "Could not render the result as JSON".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::Fetch(FetchError::NetworkFailure { identifier, .. }) => {
                format!("Could not reach the catalog while loading '{}'", identifier)
            }
            Self::Fetch(FetchError::MalformedResponse { identifier, .. }) => {
                format!("The catalog returned incomplete data for '{}'", identifier)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Http(_) => "Check TLS support and proxy settings",
            Self::Io(_) => "Check the file path and its permissions",
            Self::Serialization(_) => "Retry without --json",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the setting on the command line or in the TOML file"
            }
            Self::Fetch(FetchError::NetworkFailure { .. }) => {
                "Check the network connection and --api-base, then try again"
            }
            Self::Fetch(FetchError::MalformedResponse { .. }) => {
                "Check that --api-base points at a PokeAPI-compatible catalog"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => 2,
            Self::Fetch(_) => 3,
            Self::Http(_) | Self::Io(_) | Self::Serialization(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
