//! 面向调用方的翻译服务
//!
//! 负责输入校验、语言代码归一化、调用编排器以及写入会话历史。
//! 编排器本身不感知会话。

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::api_constants::error_messages;
use crate::error::Result;
use crate::history::{HistoryEntry, HistoryStore};
use crate::language::{detect_language, normalize_language_code, normalize_source_language, Language};
use crate::translation_error;
use crate::translator::Translator;

/// 一次成功翻译的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationOutcome {
    pub translated_text: String,
    pub source_lang: Language,
    pub target_lang: Language,
}

/// 翻译服务
#[derive(Clone)]
pub struct TranslationService {
    translator: Translator,
    history: Arc<HistoryStore>,
}

impl TranslationService {
    pub fn new(translator: Translator, history: Arc<HistoryStore>) -> Self {
        Self { translator, history }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// 为指定会话翻译文本并记录历史
    ///
    /// `target_code` 无法识别时按英语处理；`source_code` 为空时自动检测。
    pub async fn translate_for_session(
        &self,
        session_id: &str,
        text: &str,
        target_code: &str,
        source_code: Option<&str>,
    ) -> Result<TranslationOutcome> {
        if text.trim().is_empty() {
            return Err(translation_error!(input_validation, text, error_messages::EMPTY_INPUT));
        }

        let target = normalize_language_code(target_code);
        let requested_source = normalize_source_language(source_code);
        let source = requested_source.unwrap_or_else(|| detect_language(text));

        let translated_text = match self.translator.translate(text, target, Some(source)).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("❌ 会话 {} 翻译失败: {}", session_id, e);
                return Err(e);
            }
        };

        self.history
            .record(session_id, HistoryEntry::new(text, &translated_text, source, target));
        info!("✅ 会话 {} 翻译完成: {} → {}", session_id, source, target);

        Ok(TranslationOutcome {
            translated_text,
            source_lang: source,
            target_lang: target,
        })
    }
}
