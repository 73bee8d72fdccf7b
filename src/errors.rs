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
macro_rules! define_collegesys_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum CollegeSysError {
            $($variant(String),)*
        }

        impl CollegeSysError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(CollegeSysError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(CollegeSysError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(CollegeSysError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl CollegeSysError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        CollegeSysError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_collegesys_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    UniqueViolation("E004", "Unique Constraint Violation"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
}

impl CollegeSysError {
    /// 是否为唯一约束冲突（预检查之后仍可能在插入时发生）
    pub fn is_unique_violation(&self) -> bool {
        match self {
            CollegeSysError::UniqueViolation(_) => true,
            // 各数据库后端的重复键报错文案不同，统一在此识别
            CollegeSysError::DatabaseOperation(msg) => {
                msg.contains("UNIQUE constraint failed")
                    || msg.contains("duplicate key")
                    || msg.contains("Duplicate entry")
            }
            _ => false,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CollegeSysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CollegeSysError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CollegeSysError {
    fn from(err: sea_orm::DbErr) -> Self {
        CollegeSysError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for CollegeSysError {
    fn from(err: std::io::Error) -> Self {
        CollegeSysError::DatabaseConnection(err.to_string())
    }
}

impl From<serde_json::Error> for CollegeSysError {
    fn from(err: serde_json::Error) -> Self {
        CollegeSysError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for CollegeSysError {
    fn from(err: chrono::ParseError) -> Self {
        CollegeSysError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CollegeSysError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CollegeSysError::database_config("test").code(), "E001");
        assert_eq!(CollegeSysError::database_operation("test").code(), "E003");
        assert_eq!(CollegeSysError::validation("test").code(), "E005");
        assert_eq!(CollegeSysError::authorization("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            CollegeSysError::database_connection("test").error_type(),
            "Database Connection Error"
        );
        assert_eq!(
            CollegeSysError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_unique_violation_detection() {
        assert!(CollegeSysError::unique_violation("dup").is_unique_violation());
        assert!(
            CollegeSysError::database_operation(
                "insert failed: UNIQUE constraint failed: attendance.session_id"
            )
            .is_unique_violation()
        );
        assert!(
            CollegeSysError::database_operation("duplicate key value violates unique constraint")
                .is_unique_violation()
        );
        assert!(!CollegeSysError::database_operation("deadlock detected").is_unique_violation());
    }

    #[test]
    fn test_format_simple() {
        let err = CollegeSysError::validation("Invalid email");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid email"));
    }
}
