//! 配置管理模块
//!
//! 提供CLI参数解析、翻译客户端配置和编排器配置

// 标准库导入
use std::path::PathBuf;
use std::time::Duration;

// 第三方crate导入
use clap::Parser;

// 本地模块导入
use crate::api_constants::{api_config, is_valid_api_url, service_config};
use crate::error::Result;
use crate::retry::RetryPolicy;
use crate::translation_error;

/// 远程翻译客户端配置
///
/// # Examples
///
/// ```rust
/// use segmented_translator::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_api_url("http://localhost:8080/get")
///     .with_timeout(Duration::from_secs(5))
///     .with_email("me@example.com");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 翻译API地址
    api_url: String,
    /// 单次请求超时
    timeout: Duration,
    /// 联系邮箱（可选）
    email: Option<String>,
}

impl ClientConfig {
    /// 创建默认配置：MyMemory公共接口，10秒超时
    pub fn new() -> Self {
        Self {
            api_url: api_config::DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(api_config::REQUEST_TIMEOUT_SECONDS),
            email: None,
        }
    }

    /// 获取API地址
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// 获取请求超时
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 获取联系邮箱
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// 设置API地址
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    /// 设置请求超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 设置联系邮箱
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if !is_valid_api_url(&self.api_url) {
            return Err(translation_error!(config, "api_url", format!("无效的API地址: {}", self.api_url)));
        }
        if self.timeout.is_zero() {
            return Err(translation_error!(config, "timeout", "请求超时必须大于0"));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 分段翻译编排配置
///
/// # Examples
///
/// ```rust
/// use segmented_translator::config::TranslatorConfig;
/// use std::time::Duration;
///
/// let config = TranslatorConfig::new()
///     .with_max_segment_length(200)
///     .with_max_attempts(5)
///     .with_overall_timeout(Duration::from_secs(60));
/// assert_eq!(config.retry_policy().max_attempts(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// 单个片段的最大字符数
    max_segment_length: usize,
    /// 每个片段的最大尝试次数
    max_attempts: usize,
    /// 重试间隔
    retry_delay: Duration,
    /// 整体翻译时限，None 表示不限制
    overall_timeout: Option<Duration>,
}

impl TranslatorConfig {
    /// 创建默认配置
    ///
    /// - 片段上限: 450 字符
    /// - 最大尝试次数: 3
    /// - 重试间隔: 1 秒
    /// - 整体时限: 不限制
    pub fn new() -> Self {
        Self {
            max_segment_length: service_config::DEFAULT_MAX_SEGMENT_LENGTH,
            max_attempts: service_config::DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(service_config::DEFAULT_RETRY_DELAY_MS),
            overall_timeout: None,
        }
    }

    pub fn max_segment_length(&self) -> usize {
        self.max_segment_length
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn overall_timeout(&self) -> Option<Duration> {
        self.overall_timeout
    }

    /// 设置片段长度上限
    pub fn with_max_segment_length(mut self, length: usize) -> Self {
        self.max_segment_length = length;
        self
    }

    /// 设置最大尝试次数
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// 设置重试间隔
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// 设置整体翻译时限
    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = Some(timeout);
        self
    }

    /// 根据配置构造重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_delay)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.max_segment_length == 0 {
            return Err(translation_error!(config, "max_segment_length", "片段长度上限必须大于0"));
        }
        if self.max_attempts == 0 {
            return Err(translation_error!(config, "max_attempts", "尝试次数至少为1"));
        }
        if self.overall_timeout.is_some_and(|limit| limit.is_zero()) {
            return Err(translation_error!(config, "overall_timeout", "整体时限必须大于0"));
        }
        Ok(())
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// CLI参数结构
#[derive(Parser, Debug)]
#[command(author, version, about = "长文本分段并发翻译工具 - 自动检测语言、分段重试、按序合并", long_about = None)]
pub struct Cli {
    /// 要翻译的文本 (不提供时读取 --input 文件或标准输入)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// 从文件读取要翻译的文本
    #[arg(short, long, value_name = "FILE", conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// 目标语言代码 (en, zh, zh-CN, ja, ko)
    #[arg(short, long, default_value = service_config::DEFAULT_TARGET_LANG)]
    pub lang: String,

    /// 源语言代码 (不提供时自动检测)
    #[arg(short, long)]
    pub source: Option<String>,

    /// 翻译API地址
    #[arg(short, long, env = "MYMEMORY_API_URL", default_value = api_config::DEFAULT_API_URL)]
    pub api: String,

    /// 联系邮箱，提交给翻译服务以获得更高额度
    #[arg(long, env = "MYMEMORY_EMAIL")]
    pub email: Option<String>,

    /// 单个片段的最大字符数
    #[arg(long, default_value_t = service_config::DEFAULT_MAX_SEGMENT_LENGTH)]
    pub max_segment: usize,

    /// 每个片段的最大尝试次数
    #[arg(long, default_value_t = service_config::DEFAULT_MAX_ATTEMPTS)]
    pub max_retries: usize,

    /// 重试间隔（毫秒）
    #[arg(long, default_value_t = service_config::DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// 单次请求超时时间（秒）
    #[arg(long, default_value_t = api_config::REQUEST_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// 工作池大小（同时在途的请求数）
    #[arg(long, default_value_t = service_config::DEFAULT_WORKER_POOL_SIZE)]
    pub workers: usize,

    /// 整体翻译时限（秒），默认不限制
    #[arg(long)]
    pub deadline: Option<u64>,

    /// 只检测语言，不翻译
    #[arg(long)]
    pub detect: bool,

    /// 只输出分段结果，不翻译
    #[arg(long)]
    pub segments: bool,

    /// 交互模式：逐行翻译并记录会话历史
    #[arg(long, conflicts_with_all = ["text", "input"])]
    pub interactive: bool,

    /// 详细输出模式
    #[arg(short, long)]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long)]
    pub quiet: bool,

    /// 显示性能统计
    #[arg(long)]
    pub stats: bool,
}

impl Cli {
    /// 由命令行参数构造客户端配置
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new()
            .with_api_url(&self.api)
            .with_timeout(Duration::from_secs(self.timeout));
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => config.with_email(email),
            _ => config,
        }
    }

    /// 由命令行参数构造编排配置
    pub fn translator_config(&self) -> TranslatorConfig {
        let config = TranslatorConfig::new()
            .with_max_segment_length(self.max_segment)
            .with_max_attempts(self.max_retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms));
        match self.deadline {
            Some(secs) => config.with_overall_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}
