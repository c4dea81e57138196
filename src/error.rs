//! 统一错误处理模块
//!
//! 提供分段翻译流程的统一错误类型定义和处理机制

// 标准库导入
use std::fmt;
use std::time::Duration;

// 第三方crate导入
use anyhow::Error as AnyhowError;

// 本地模块导入
use crate::api_constants::error_messages;

/// 分段翻译统一错误类型
///
/// `Network`、`Remote`、`Protocol` 属于单次请求级别的错误，会在片段内部重试；
/// 重试耗尽后由编排器包装为 `SegmentTranslation` 返回给调用方。
#[derive(Debug)]
pub enum TranslationError {
    /// 网络传输错误（超时、连接失败等）
    Network {
        /// 错误消息
        message: String,
        /// HTTP状态码（如果适用）
        status_code: Option<u16>,
    },

    /// 远程服务返回了非成功状态
    Remote {
        /// 响应体中的状态码（缺失时为 None）
        status: Option<i64>,
        /// 服务商给出的详情
        message: String,
    },

    /// 响应体格式不符合协议
    Protocol {
        /// 具体错误信息
        details: String,
    },

    /// 某个片段在重试耗尽后仍然失败
    SegmentTranslation {
        /// 失败片段的位置（从1开始）
        position: usize,
        /// 最后一次尝试的错误
        cause: Box<TranslationError>,
    },

    /// 整体翻译超过了设定的总时限
    Timeout {
        /// 已等待的时长
        elapsed: Duration,
    },

    /// 配置相关错误
    Configuration {
        /// 配置项名称
        field: String,
        /// 错误原因
        reason: String,
    },

    /// 输入验证错误
    InputValidation {
        /// 输入值
        input: String,
        /// 验证失败原因
        reason: String,
    },

    /// 内部处理错误（包装anyhow::Error）
    Internal {
        /// 包装的错误
        source: AnyhowError,
    },
}

impl TranslationError {
    /// 服务商返回的原始错误信息
    ///
    /// 对于片段错误，返回其底层原因的信息
    pub fn detail(&self) -> String {
        match self {
            TranslationError::SegmentTranslation { cause, .. } => cause.detail(),
            TranslationError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// 面向最终用户的错误提示
    pub fn user_message(&self) -> String {
        let detail = self.detail();
        let detail = if detail.contains(error_messages::QUERY_LENGTH_LIMIT_MARKER) {
            error_messages::TEXT_TOO_LONG.to_string()
        } else {
            detail
        };
        format!("{}{}", error_messages::SERVICE_UNAVAILABLE, detail)
    }

    /// 失败片段的位置
    pub fn segment_position(&self) -> Option<usize> {
        match self {
            TranslationError::SegmentTranslation { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::Network { message, status_code } => {
                if let Some(code) = status_code {
                    write!(f, "网络请求失败 [{}]: {}", code, message)
                } else {
                    write!(f, "网络请求失败: {}", message)
                }
            },
            TranslationError::Remote { status, message } => match status {
                Some(code) => write!(f, "翻译服务返回错误 [{}]: {}", code, message),
                None => write!(f, "翻译服务返回错误: {}", message),
            },
            TranslationError::Protocol { details } => {
                write!(f, "响应格式错误: {}", details)
            },
            TranslationError::SegmentTranslation { position, cause } => {
                write!(f, "第 {} 段翻译失败: {}", position, cause)
            },
            TranslationError::Timeout { elapsed } => {
                write!(f, "翻译超时: 已等待 {:.1}秒", elapsed.as_secs_f64())
            },
            TranslationError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            },
            TranslationError::InputValidation { input, reason } => {
                write!(f, "输入验证失败 [{}]: {}", input, reason)
            },
            TranslationError::Internal { source } => {
                write!(f, "内部处理错误: {}", source)
            },
        }
    }
}

impl std::error::Error for TranslationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslationError::SegmentTranslation { cause, .. } => Some(cause.as_ref()),
            TranslationError::Internal { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// 分段翻译结果类型别名
pub type Result<T> = std::result::Result<T, TranslationError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! translation_error {
    (network, $msg:expr) => {
        $crate::error::TranslationError::Network {
            message: $msg.to_string(),
            status_code: None,
        }
    };
    (network, $msg:expr, $code:expr) => {
        $crate::error::TranslationError::Network {
            message: $msg.to_string(),
            status_code: Some($code),
        }
    };
    (remote, $msg:expr) => {
        $crate::error::TranslationError::Remote {
            status: None,
            message: $msg.to_string(),
        }
    };
    (remote, $msg:expr, $status:expr) => {
        $crate::error::TranslationError::Remote {
            status: Some($status),
            message: $msg.to_string(),
        }
    };
    (protocol, $details:expr) => {
        $crate::error::TranslationError::Protocol {
            details: $details.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::TranslationError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (input_validation, $input:expr, $reason:expr) => {
        $crate::error::TranslationError::InputValidation {
            input: $input.to_string(),
            reason: $reason.to_string(),
        }
    };
}

/// 从anyhow::Error转换为TranslationError
impl From<AnyhowError> for TranslationError {
    fn from(error: AnyhowError) -> Self {
        TranslationError::Internal { source: error }
    }
}

/// 从reqwest::Error转换为TranslationError
impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let message = if error.is_timeout() {
            format!("请求超时: {}", error)
        } else {
            error.to_string()
        };
        TranslationError::Network { message, status_code }
    }
}

/// 从serde_json::Error转换为TranslationError
impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::Protocol {
            details: error.to_string(),
        }
    }
}

/// 从tokio::task::JoinError转换为TranslationError
impl From<tokio::task::JoinError> for TranslationError {
    fn from(error: tokio::task::JoinError) -> Self {
        TranslationError::Internal {
            source: AnyhowError::new(error).context("翻译任务异常退出"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = TranslationError::Network {
            message: "Connection failed".to_string(),
            status_code: Some(500),
        };

        assert_eq!(format!("{}", err), "网络请求失败 [500]: Connection failed");
    }

    #[test]
    fn test_error_macro() {
        let err = translation_error!(remote, "Invalid language pair", 403);
        match err {
            TranslationError::Remote { status, message } => {
                assert_eq!(status, Some(403));
                assert_eq!(message, "Invalid language pair");
            },
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_segment_error_exposes_cause() {
        let err = TranslationError::SegmentTranslation {
            position: 2,
            cause: Box::new(translation_error!(protocol, "missing responseData")),
        };

        assert_eq!(err.segment_position(), Some(2));
        assert_eq!(
            err.to_string(),
            "第 2 段翻译失败: 响应格式错误: missing responseData"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_user_message_rewrites_length_limit() {
        let err = TranslationError::SegmentTranslation {
            position: 1,
            cause: Box::new(translation_error!(
                remote,
                "QUERY LENGTH LIMIT EXCEEDED. MAX ALLOWED QUERY : 500 CHARS",
                403
            )),
        };

        assert_eq!(
            err.user_message(),
            "翻译服务暂时不可用，请稍后重试。错误信息：文本过长，已自动分段翻译"
        );
    }

    #[test]
    fn test_user_message_keeps_provider_detail() {
        let err = translation_error!(remote, "INVALID LANGUAGE PAIR SPECIFIED");
        assert!(err.user_message().ends_with("INVALID LANGUAGE PAIR SPECIFIED"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let anyhow_err = anyhow::anyhow!("Test anyhow error");
        let translation_err: TranslationError = anyhow_err.into();

        match translation_err {
            TranslationError::Internal { .. } => {
                // Test passes
            },
            _ => panic!("Wrong error type"),
        }
    }
}
