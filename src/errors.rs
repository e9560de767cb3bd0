//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_evalhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum EvalHubError {
            $($variant(String),)*
        }

        impl EvalHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EvalHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EvalHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EvalHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EvalHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EvalHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_evalhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    BlobStorage("E014", "Blob Storage Error"),
    Upstream("E015", "Upstream Service Error"),
    Fetch("E016", "Fetch Error"),
    UnsupportedFormat("E017", "Unsupported Format"),
    ScoreOutOfRange("E018", "Score Out Of Range"),
    EvaluationInProgress("E019", "Evaluation In Progress"),
    InvalidStatusTransition("E020", "Invalid Status Transition"),
    Configuration("E021", "Configuration Error"),
}

impl EvalHubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EvalHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EvalHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EvalHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        EvalHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EvalHubError {
    fn from(err: std::io::Error) -> Self {
        EvalHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EvalHubError {
    fn from(err: serde_json::Error) -> Self {
        EvalHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EvalHubError {
    fn from(err: chrono::ParseError) -> Self {
        EvalHubError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for EvalHubError {
    fn from(err: reqwest::Error) -> Self {
        EvalHubError::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvalHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EvalHubError::cache_connection("test").code(), "E001");
        assert_eq!(EvalHubError::database_config("test").code(), "E003");
        assert_eq!(EvalHubError::validation("test").code(), "E007");
        assert_eq!(EvalHubError::score_out_of_range("test").code(), "E018");
        assert_eq!(EvalHubError::unsupported_format("test").code(), "E017");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EvalHubError::evaluation_in_progress("test").error_type(),
            "Evaluation In Progress"
        );
        assert_eq!(
            EvalHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EvalHubError::upstream("OpenAI API error: 502");
        assert_eq!(err.message(), "OpenAI API error: 502");
    }

    #[test]
    fn test_format_simple() {
        let err = EvalHubError::score_out_of_range("score 80 exceeds max 70");
        let formatted = err.format_simple();
        assert!(formatted.contains("Score Out Of Range"));
        assert!(formatted.contains("score 80 exceeds max 70"));
    }
}
