/// 翻译服务相关常量配置
///
/// 该文件定义了所有翻译流程相关的常量配置，方便统一管理和维护

/// 远程翻译API配置
pub mod api_config {
    /// 默认翻译API地址 (MyMemory)
    pub const DEFAULT_API_URL: &str = "https://api.mymemory.translated.net/get";

    /// 查询文本参数名
    pub const QUERY_PARAM: &str = "q";

    /// 语言对参数名，取值形如 `en|zh`
    pub const LANGPAIR_PARAM: &str = "langpair";

    /// 联系邮箱参数名（提供后可获得更高的免费额度）
    pub const EMAIL_PARAM: &str = "de";

    /// 响应体中表示成功的状态码
    pub const SUCCESS_STATUS: u64 = 200;

    /// 请求超时时间（秒）
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;
}

/// 分段与并发翻译配置
pub mod service_config {
    /// 默认目标语言
    pub const DEFAULT_TARGET_LANG: &str = "zh";

    /// 单个片段的最大字符数
    pub const DEFAULT_MAX_SEGMENT_LENGTH: usize = 450;

    /// 句子结束符
    pub const SENTENCE_TERMINATOR: char = '。';

    /// 段落分隔符
    pub const PARAGRAPH_SEPARATOR: char = '\n';

    /// 译文片段之间的连接符
    pub const SEGMENT_JOINER: &str = " ";

    /// 每个片段的最大尝试次数（含首次请求）
    pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

    /// 重试间隔（毫秒）
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

    /// 全局工作池容量（同时在途的请求数）
    pub const DEFAULT_WORKER_POOL_SIZE: usize = 10;
}

/// 翻译历史配置
pub mod history_config {
    /// 每个会话保留的历史记录条数
    pub const MAX_HISTORY_ENTRIES: usize = 10;

    /// 历史记录时间戳格式
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// 错误消息常量
pub mod error_messages {
    /// 服务商返回的文本过长提示
    pub const QUERY_LENGTH_LIMIT_MARKER: &str = "QUERY LENGTH LIMIT EXCEEDED";

    /// 文本过长时展示给用户的提示
    pub const TEXT_TOO_LONG: &str = "文本过长，已自动分段翻译";

    /// 翻译失败时的用户提示前缀
    pub const SERVICE_UNAVAILABLE: &str = "翻译服务暂时不可用，请稍后重试。错误信息：";

    /// 空输入提示
    pub const EMPTY_INPUT: &str = "请输入要翻译的文本";

    /// 服务商未给出详情时的默认错误
    pub const UNKNOWN_REMOTE_ERROR: &str = "Unknown error";
}

/// 验证API URL是否有效
pub fn is_valid_api_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}
