//! 会话翻译历史
//!
//! 每个会话保留最近若干条翻译记录（超出容量时淘汰最早的一条）。
//! 所有会话共用一把互斥锁，追加与淘汰在同一次加锁内完成。

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api_constants::history_config::{MAX_HISTORY_ENTRIES, TIMESTAMP_FORMAT};
use crate::language::Language;

/// 单条翻译历史
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub original_text: String,
    pub translated_text: String,
    pub source_lang: Language,
    pub target_lang: Language,
    pub timestamp: String,
}

impl HistoryEntry {
    /// 以当前本地时间创建记录
    pub fn new(original_text: &str, translated_text: &str, source_lang: Language, target_lang: Language) -> Self {
        Self {
            original_text: original_text.to_string(),
            translated_text: translated_text.to_string(),
            source_lang,
            target_lang,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// 按会话存储的翻译历史
#[derive(Debug)]
pub struct HistoryStore {
    capacity: usize,
    sessions: Mutex<HashMap<String, VecDeque<HistoryEntry>>>,
}

impl HistoryStore {
    /// 创建指定容量的历史存储，容量至少为1
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// 生成新的会话ID
    pub fn new_session_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // 锁中毒时直接取回内部数据
    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<HistoryEntry>>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 追加一条记录，超出容量时淘汰最早的记录
    pub fn record(&self, session_id: &str, entry: HistoryEntry) {
        let mut sessions = self.lock();
        let history = sessions.entry(session_id.to_string()).or_default();
        while history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(entry);
        debug!("📝 会话 {} 历史记录: {} 条", session_id, history.len());
    }

    /// 获取会话历史（从旧到新）
    pub fn history(&self, session_id: &str) -> Vec<HistoryEntry> {
        self.lock()
            .get(session_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// 清空会话历史
    pub fn clear(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    /// 当前有历史记录的会话数
    pub fn session_count(&self) -> usize {
        self.lock().len()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(MAX_HISTORY_ENTRIES)
    }
}
