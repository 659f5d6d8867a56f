use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Twilio 回傳的非 2xx 錯誤
    #[error("Twilio API error (status {status}, code {code}): {message}")]
    ApiError {
        status: u16,
        code: i64,
        message: String,
        more_info: Option<String>,
    },

    /// CRUD 操作失敗，訊息格式固定為 "Failed to <op> address configuration webhook: <err>"
    #[error("Failed to {operation} address configuration webhook: {source}")]
    OperationError {
        operation: &'static str,
        #[source]
        source: Box<ResourceError>,
    },

    #[error("The imported ID ({id}) does not match the format ({format})")]
    ImportIdError { id: String, format: String },

    #[error("{operation} timed out after {seconds}s")]
    TimeoutError { operation: &'static str, seconds: u64 },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("State error: {message}")]
    StateError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Configuration,
    State,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ResourceError {
    pub fn operation(operation: &'static str, source: ResourceError) -> Self {
        Self::OperationError {
            operation,
            source: Box::new(source),
        }
    }

    /// 判斷遠端資源是否已不存在 (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ApiError { status, .. } => *status == 404,
            Self::HttpError(e) => e.status().map(|s| s.as_u16() == 404).unwrap_or(false),
            Self::OperationError { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::TimeoutError { .. } => ErrorCategory::Network,
            Self::ApiError { .. } => ErrorCategory::Api,
            Self::OperationError { source, .. } => source.category(),
            Self::ImportIdError { .. }
            | Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::StateError { .. } | Self::SerializationError(_) => ErrorCategory::State,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Api | ErrorCategory::Configuration | ErrorCategory::State => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError { status: 401, .. } | Self::ApiError { status: 403, .. } => {
                "Check TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN (or the API key pair)"
            }
            Self::ApiError { status: 429, .. } => "Rate limited by Twilio, wait and retry",
            Self::OperationError { source, .. } => source.recovery_suggestion(),
            _ => match self.category() {
                ErrorCategory::Network => "Check network connectivity and retry",
                ErrorCategory::Api => "Inspect the Twilio error code and more_info link",
                ErrorCategory::Configuration => "Fix the resource file and run plan again",
                ErrorCategory::State => "Inspect or remove the state file, then run refresh",
                ErrorCategory::System => "Check file permissions and disk space",
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError {
                message, more_info, ..
            } => match more_info {
                Some(link) => format!("Twilio rejected the request: {} ({})", message, link),
                None => format!("Twilio rejected the request: {}", message),
            },
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResourceError>;
