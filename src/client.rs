//! 远程翻译客户端
//!
//! `SegmentTranslator` 描述"翻译一个片段"的能力，编排器只依赖这个trait，
//! 测试中可以替换为本地实现。`MyMemoryClient` 是基于MyMemory公共接口的实现。

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::api_constants::{api_config, error_messages};
use crate::config::ClientConfig;
use crate::error::{Result, TranslationError};
use crate::language::Language;
use crate::translation_error;

/// 单片段翻译接口
#[async_trait]
pub trait SegmentTranslator: Send + Sync {
    /// 翻译单个片段，只发起一次请求，不做重试
    async fn translate_one(&self, segment: &str, source: Language, target: Language) -> Result<String>;
}

/// 构造 `source|target` 形式的语言对
pub fn language_pair(source: Language, target: Language) -> String {
    format!("{}|{}", source.as_code(), target.as_code())
}

/// MyMemory 翻译客户端
#[derive(Debug, Clone)]
pub struct MyMemoryClient {
    client: Client,
    config: ClientConfig,
}

impl MyMemoryClient {
    /// 创建客户端
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| translation_error!(config, "http_client", format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self { client, config })
    }

    /// 当前使用的API地址
    pub fn api_url(&self) -> &str {
        self.config.api_url()
    }
}

#[async_trait]
impl SegmentTranslator for MyMemoryClient {
    async fn translate_one(&self, segment: &str, source: Language, target: Language) -> Result<String> {
        let langpair = language_pair(source, target);
        let mut params = vec![
            (api_config::QUERY_PARAM, segment),
            (api_config::LANGPAIR_PARAM, langpair.as_str()),
        ];
        if let Some(email) = self.config.email() {
            params.push((api_config::EMAIL_PARAM, email));
        }

        debug!("🌐 发送翻译请求: {} 字符, {}", segment.chars().count(), langpair);

        let response = self
            .client
            .get(self.config.api_url())
            .query(&params)
            .send()
            .await?;

        // 服务商在响应体中给出状态，HTTP状态码本身不作判断
        let body = response.text().await?;
        parse_response(&body)
    }
}

/// 解析翻译接口响应体
///
/// 成功要求 `responseStatus` 为数字200且包含 `responseData.translatedText`。
pub fn parse_response(body: &str) -> Result<String> {
    let json: Value = serde_json::from_str(body)?;

    let status = json.get("responseStatus");
    if status.and_then(Value::as_u64) != Some(api_config::SUCCESS_STATUS) {
        let message = json
            .get("responseDetails")
            .and_then(Value::as_str)
            .filter(|details| !details.is_empty())
            .unwrap_or(error_messages::UNKNOWN_REMOTE_ERROR);
        return Err(TranslationError::Remote {
            status: status.and_then(status_code),
            message: message.to_string(),
        });
    }

    json.get("responseData")
        .and_then(|data| data.get("translatedText"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| translation_error!(protocol, "响应缺少 responseData.translatedText 字段"))
}

/// 状态字段可能是数字，也可能是数字字符串
fn status_code(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_pair() {
        assert_eq!(language_pair(Language::English, Language::Chinese), "en|zh");
        assert_eq!(language_pair(Language::Korean, Language::Japanese), "ko|ja");
    }

    #[test]
    fn test_parse_success() {
        let body = r#"{"responseData":{"translatedText":"你好世界","match":1},"responseStatus":200,"responseDetails":""}"#;
        assert_eq!(parse_response(body).unwrap(), "你好世界");
    }

    #[test]
    fn test_parse_remote_error_carries_details() {
        let body = r#"{"responseData":{"translatedText":"QUERY LENGTH LIMIT EXCEEDED"},"responseStatus":403,"responseDetails":"QUERY LENGTH LIMIT EXCEEDED. MAX ALLOWED QUERY : 500 CHARS"}"#;
        match parse_response(body) {
            Err(TranslationError::Remote { status, message }) => {
                assert_eq!(status, Some(403));
                assert!(message.starts_with("QUERY LENGTH LIMIT EXCEEDED"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_string_status_is_not_success() {
        let body = r#"{"responseData":{"translatedText":"x"},"responseStatus":"200"}"#;
        match parse_response(body) {
            Err(TranslationError::Remote { status, message }) => {
                assert_eq!(status, Some(200));
                assert_eq!(message, "Unknown error");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_status_is_remote_error() {
        let body = r#"{"responseData":{"translatedText":"x"}}"#;
        assert!(matches!(
            parse_response(body),
            Err(TranslationError::Remote { status: None, .. })
        ));
    }

    #[test]
    fn test_parse_missing_translation_is_protocol_error() {
        let body = r#"{"responseStatus":200,"responseData":{}}"#;
        assert!(matches!(parse_response(body), Err(TranslationError::Protocol { .. })));
    }

    #[test]
    fn test_parse_non_json_is_protocol_error() {
        assert!(matches!(
            parse_response("<html>502 Bad Gateway</html>"),
            Err(TranslationError::Protocol { .. })
        ));
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = ClientConfig::new().with_api_url("ftp://example.com");
        assert!(MyMemoryClient::new(config).is_err());
    }
}
