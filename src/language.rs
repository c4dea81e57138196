//! 语言识别模块
//!
//! 根据Unicode字符范围判断文本语言，并提供语言代码归一化工具。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TranslationError;
use crate::translation_error;

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    /// 全部支持的语言
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Chinese,
        Language::Japanese,
        Language::Korean,
    ];

    /// 两位语言代码
    pub fn as_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Korean => "ko",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for Language {
    type Err = TranslationError;

    /// 严格解析，只接受规范的两位代码
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_code() == code)
            .ok_or_else(|| translation_error!(input_validation, code, "不支持的语言代码"))
    }
}

fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}')
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}')
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7AF}')
}

/// 自动检测文本语言
///
/// 按以下顺序判断，命中即返回：
/// 1. 含平假名/片假名 → 日语
/// 2. 含中日韩统一表意文字 → 中文
/// 3. 含韩文音节 → 韩语
/// 4. 其他 → 英语
///
/// 日文中通常夹杂汉字，所以假名必须先于汉字判断。
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(is_kana) {
        Language::Japanese
    } else if text.chars().any(is_cjk_ideograph) {
        Language::Chinese
    } else if text.chars().any(is_hangul) {
        Language::Korean
    } else {
        Language::English
    }
}

/// 将外部传入的语言代码统一为内部语言
///
/// 兼容 `zh-CN` / `zh-cn` 等地区写法，无法识别的代码默认按英语处理。
pub fn normalize_language_code(code: &str) -> Language {
    match code.trim() {
        "en" => Language::English,
        "zh" | "zh-CN" | "zh-cn" => Language::Chinese,
        "ja" => Language::Japanese,
        "ko" => Language::Korean,
        _ => Language::English,
    }
}

/// 归一化源语言，未提供或为空时返回 None 表示需要自动检测
pub fn normalize_source_language(code: Option<&str>) -> Option<Language> {
    code.map(str::trim)
        .filter(|code| !code.is_empty())
        .map(normalize_language_code)
}
