//! 分段并发翻译编排
//!
//! 流程：检测源语言 → 分段 → 每段提交到共享工作池并发翻译（段内重试）
//! → 等待全部任务结束 → 按原文位置合并，或返回位置最靠前的失败片段。

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::api_constants::service_config::SEGMENT_JOINER;
use crate::client::SegmentTranslator;
use crate::config::TranslatorConfig;
use crate::error::{Result, TranslationError};
use crate::language::{detect_language, Language};
use crate::pool::WorkerPool;
use crate::retry::RetryPolicy;
use crate::segmenter::{Segment, TextSegmenter};

/// 单个片段翻译任务的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    InFlight,
    Retrying,
    Succeeded,
    Failed,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Pending => "pending",
            TaskState::InFlight => "in-flight",
            TaskState::Retrying => "retrying",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// 分段翻译编排器
///
/// 工作池和翻译客户端都由外部注入，多个编排器可以共享同一个工作池。
#[derive(Clone)]
pub struct Translator {
    client: Arc<dyn SegmentTranslator>,
    pool: WorkerPool,
    segmenter: TextSegmenter,
    retry: RetryPolicy,
    overall_timeout: Option<Duration>,
}

impl Translator {
    /// 创建编排器
    pub fn new(client: Arc<dyn SegmentTranslator>, pool: WorkerPool, config: TranslatorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            client,
            pool,
            segmenter: TextSegmenter::new(config.max_segment_length())?,
            retry: config.retry_policy(),
            overall_timeout: config.overall_timeout(),
        })
    }

    /// 共享的工作池
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// 检测文本语言
    pub fn detect(&self, text: &str) -> Language {
        detect_language(text)
    }

    /// 预览分段结果
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        self.segmenter.split(text)
    }

    /// 翻译文本
    ///
    /// 空白文本以及源语言与目标语言相同时直接返回原文；
    /// 未指定源语言时对整段原文做一次检测。
    /// 任一片段重试耗尽后整体失败，不返回部分结果。
    pub async fn translate(&self, text: &str, target: Language, source: Option<Language>) -> Result<String> {
        if text.trim().is_empty() {
            debug!("文本为空白，跳过翻译");
            return Ok(text.to_string());
        }

        let source = match source {
            Some(lang) => lang,
            None => {
                let detected = detect_language(text);
                debug!("🔍 自动检测源语言: {}", detected);
                detected
            }
        };

        if source == target {
            debug!("源语言与目标语言相同 ({})，跳过翻译", target);
            return Ok(text.to_string());
        }

        let segments = self.segmenter.split(text);
        info!(
            "🚀 开始翻译: {} 字符分为 {} 段, {} → {}",
            text.chars().count(),
            segments.len(),
            source,
            target
        );

        match self.overall_timeout {
            None => self.translate_segments(segments, source, target).await,
            Some(limit) => tokio::time::timeout(limit, self.translate_segments(segments, source, target))
                .await
                .map_err(|_| {
                    warn!("⏰ 翻译超过整体时限 {:?}，已提交的片段仍会在后台完成", limit);
                    TranslationError::Timeout { elapsed: limit }
                })?,
        }
    }

    async fn translate_segments(&self, segments: Vec<Segment>, source: Language, target: Language) -> Result<String> {
        let handles: Vec<_> = segments
            .into_iter()
            .map(|segment| {
                debug!("片段 {} 状态: {}", segment.position, TaskState::Pending);
                let task = translate_segment(Arc::clone(&self.client), self.retry, segment, source, target);
                self.pool.spawn(task)
            })
            .collect();

        // 等待所有片段结束后再按位置检查，失败片段的兄弟任务照常执行完毕
        let outcomes = join_all(handles).await;

        let mut translated = Vec::with_capacity(outcomes.len());
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome.map_err(TranslationError::from).and_then(|result| result) {
                Ok(text) => translated.push(text),
                Err(cause) => {
                    return Err(TranslationError::SegmentTranslation {
                        position: index + 1,
                        cause: Box::new(cause),
                    });
                }
            }
        }

        info!("✅ 翻译完成: {} 段", translated.len());
        Ok(translated.join(SEGMENT_JOINER))
    }
}

/// 翻译单个片段（带重试）
async fn translate_segment(
    client: Arc<dyn SegmentTranslator>,
    retry: RetryPolicy,
    segment: Segment,
    source: Language,
    target: Language,
) -> Result<String> {
    let position = segment.position;

    let result = retry
        .run(|attempt| {
            if attempt > 1 {
                debug!("片段 {} 状态: {} (第 {} 次尝试)", position, TaskState::Retrying, attempt);
            }
            debug!("片段 {} 状态: {}", position, TaskState::InFlight);
            client.translate_one(&segment.text, source, target)
        })
        .await;

    match &result {
        Ok(_) => debug!("片段 {} 状态: {}", position, TaskState::Succeeded),
        Err(e) => warn!("❌ 片段 {} 状态: {}: {}", position, TaskState::Failed, e),
    }

    result
}
