//! Segmented Translator - 长文本分段并发翻译库
//!
//! 这个库提供了语言检测、文本分段、带重试的远程翻译客户端、
//! 共享工作池上的并发翻译编排以及会话历史等核心功能。

pub mod api_constants;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod language;
pub mod pool;
pub mod retry;
pub mod segmenter;
pub mod service;
pub mod stats;
pub mod translator;
pub mod utils;

pub use client::{MyMemoryClient, SegmentTranslator};
pub use error::{Result, TranslationError};
pub use language::{detect_language, normalize_language_code, Language};
pub use pool::WorkerPool;
pub use segmenter::{split_text, Segment, TextSegmenter};
pub use translator::Translator;
