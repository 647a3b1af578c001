use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected {shape} response shape: {message}")]
    ShapeMismatch { shape: &'static str, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Movie store error: {message}")]
    StoreError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Decode,
    Shape,
    Config,
    Io,
    Storage,
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Network(_) | AppError::HttpStatus { .. } => ErrorCategory::Network,
            AppError::Decode(_) => ErrorCategory::Decode,
            AppError::ShapeMismatch { .. } => ErrorCategory::Shape,
            AppError::Io(_) => ErrorCategory::Io,
            AppError::ConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Config,
            AppError::StoreError { .. } => ErrorCategory::Storage,
            AppError::InvalidRequest { .. } => ErrorCategory::Request,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 遠端服務暫時失敗，重跑即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Decode
            | ErrorCategory::Shape
            | ErrorCategory::Storage
            | ErrorCategory::Request => ErrorSeverity::High,
            ErrorCategory::Config | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// CLI 結束代碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::Network(e) if e.is_connect() => {
                "無法連線到 API 伺服器".to_string()
            }
            AppError::Network(_) => "API 請求失敗".to_string(),
            AppError::HttpStatus { status, .. } => format!("API 回應錯誤狀態碼 {}", status),
            AppError::Decode(_) => "API 回應不是合法的 JSON".to_string(),
            AppError::ShapeMismatch { shape, .. } => {
                format!("API 回應格式與預期的 {} 不符", shape)
            }
            AppError::Io(e) => format!("輸出失敗: {}", e),
            AppError::ConfigError { message } => format!("設定錯誤: {}", message),
            AppError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定值 {} 不正確: {}", field, reason)
            }
            AppError::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            AppError::StoreError { message } => format!("資料儲存失敗: {}", message),
            AppError::InvalidRequest { message } => format!("請求內容不正確: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the API key, then retry",
            ErrorCategory::Decode | ErrorCategory::Shape => {
                "The upstream API may have changed; rerun with --verbose to inspect the response"
            }
            ErrorCategory::Config => "Fix the configuration file or command line arguments",
            ErrorCategory::Io => "Check that stdout is writable",
            ErrorCategory::Storage => "Check the movie store backend",
            ErrorCategory::Request => "Send the movie document as a JSON object",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Ctrl-C 中斷時的結束代碼 (128 + SIGINT)
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_exit_code() {
        let status = AppError::HttpStatus {
            status: 500,
            url: "https://example.com/x".to_string(),
        };
        assert_eq!(status.category(), ErrorCategory::Network);
        assert_eq!(status.exit_code(), 2);

        let decode = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let decode = AppError::from(decode);
        assert_eq!(decode.category(), ErrorCategory::Decode);
        assert_eq!(decode.exit_code(), 1);

        let config = AppError::MissingConfigError {
            field: "box_office.credential".to_string(),
        };
        assert_eq!(config.category(), ErrorCategory::Config);
        assert_eq!(config.exit_code(), 3);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            AppError::HttpStatus { status: 503, url: String::new() }.exit_code(),
            AppError::InvalidRequest { message: "x".to_string() }.exit_code(),
            AppError::ConfigError { message: "x".to_string() }.exit_code(),
        ];
        assert_eq!(codes, [2, 1, 3]);
        assert!(!codes.contains(&INTERRUPTED_EXIT_CODE));
        assert_eq!(INTERRUPTED_EXIT_CODE, 128 + 2);
    }

    #[test]
    fn test_invalid_request_is_not_a_store_error() {
        let err = AppError::InvalidRequest {
            message: "Movie document must be a JSON object, got []".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Request);
        assert!(err.to_string().starts_with("Invalid request"));
        assert!(!err.to_string().contains("store"));
    }

    #[test]
    fn test_shape_mismatch_message_names_shape() {
        let err = AppError::ShapeMismatch {
            shape: "box office",
            message: "missing field `boxOfficeResult`".to_string(),
        };
        assert!(err.to_string().contains("box office"));
        assert!(err.user_friendly_message().contains("box office"));
    }
}
