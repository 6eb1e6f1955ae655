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
macro_rules! define_formsystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum FormSystemError {
            $($variant(String),)*
        }

        impl FormSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(FormSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(FormSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(FormSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl FormSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        FormSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_formsystem_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    FieldValidation("E007", "Field Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Forbidden("E009", "Forbidden"),
    ImmutableSchema("E010", "Immutable Schema Error"),
    DuplicateSubmission("E011", "Duplicate Submission Error"),
    Serialization("E012", "Serialization Error"),
    DateParse("E013", "Date Parse Error"),
    Authentication("E014", "Authentication Error"),
    Authorization("E015", "Authorization Error"),
    TransientStore("E016", "Transient Store Error"),
}

impl FormSystemError {
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

impl fmt::Display for FormSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for FormSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for FormSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            // 连接层故障单独归类，调用方可以重试
            sea_orm::DbErr::Conn(e) => FormSystemError::TransientStore(e.to_string()),
            sea_orm::DbErr::ConnectionAcquire(e) => FormSystemError::TransientStore(e.to_string()),
            other => FormSystemError::DatabaseOperation(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for FormSystemError {
    fn from(err: serde_json::Error) -> Self {
        FormSystemError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for FormSystemError {
    fn from(err: chrono::ParseError) -> Self {
        FormSystemError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FormSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(FormSystemError::cache_connection("test").code(), "E001");
        assert_eq!(FormSystemError::database_config("test").code(), "E003");
        assert_eq!(FormSystemError::validation("test").code(), "E006");
        assert_eq!(FormSystemError::duplicate_submission("test").code(), "E011");
        assert_eq!(FormSystemError::authentication("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            FormSystemError::immutable_schema("test").error_type(),
            "Immutable Schema Error"
        );
        assert_eq!(
            FormSystemError::field_validation("test").error_type(),
            "Field Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = FormSystemError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = FormSystemError::duplicate_submission("S1 already answered");
        let formatted = err.format_simple();
        assert!(formatted.contains("Duplicate Submission Error"));
        assert!(formatted.contains("S1 already answered"));
    }
}
