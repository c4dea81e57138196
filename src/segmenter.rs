//! 文本分段模块
//!
//! 将长文本切分为不超过接口长度限制的片段：
//! - 优先在句号 `。` 处切分，并把相邻句子尽量合并到同一片段
//! - 单句超长时按段落 `\n` 切分
//! - 段落仍然超长时按固定字符数硬切分
//!
//! 长度一律按字符（Unicode标量值）计算，而不是字节。

use tracing::debug;

use crate::api_constants::service_config::{
    DEFAULT_MAX_SEGMENT_LENGTH, PARAGRAPH_SEPARATOR, SENTENCE_TERMINATOR,
};
use crate::error::Result;
use crate::translation_error;

/// 分段后的文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 片段在原文中的位置（从1开始）
    pub position: usize,
    /// 片段内容
    pub text: String,
}

/// 文本分段器
#[derive(Debug, Clone, Copy)]
pub struct TextSegmenter {
    max_length: usize,
}

impl TextSegmenter {
    /// 创建分段器，`max_length` 必须大于0
    pub fn new(max_length: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(translation_error!(config, "max_segment_length", "片段长度上限必须大于0"));
        }
        Ok(Self { max_length })
    }

    /// 片段长度上限
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// 切分文本并为每个片段编号
    pub fn split(&self, text: &str) -> Vec<Segment> {
        let segments: Vec<Segment> = split_text(text, self.max_length)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Segment {
                position: index + 1,
                text,
            })
            .collect();

        debug!(
            "✂️  文本分段完成: {} 字符 → {} 段 (上限 {})",
            char_len(text),
            segments.len(),
            self.max_length
        );

        segments
    }
}

impl Default for TextSegmenter {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_SEGMENT_LENGTH,
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// 将长文本分割成较短的片段
///
/// 文本不超过上限时原样返回单个片段（空文本返回一个空片段）。
/// `max_length` 为0时按1处理。
pub fn split_text(text: &str, max_length: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    if char_len(text) <= max_length {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut buffer = SegmentBuffer::default();

    // split_inclusive 保留每句末尾的句号，最后一句没有句号时也不会补上
    for sentence in text.split_inclusive(SENTENCE_TERMINATOR) {
        let sentence_len = char_len(sentence);

        if sentence_len > max_length {
            // 先输出已缓存的句子，保证片段顺序与原文一致
            buffer.flush_into(&mut segments);
            split_long_sentence(sentence, max_length, &mut segments);
            continue;
        }

        if buffer.len + sentence_len > max_length {
            buffer.flush_into(&mut segments);
        }
        buffer.push(sentence, sentence_len);
    }
    buffer.flush_into(&mut segments);

    // 只由换行组成的文本：段落全部为空，退回到整体硬切分
    if segments.is_empty() {
        hard_split(text, max_length, &mut segments);
    }

    segments
}

#[derive(Default)]
struct SegmentBuffer {
    text: String,
    len: usize,
}

impl SegmentBuffer {
    fn push(&mut self, sentence: &str, sentence_len: usize) {
        self.text.push_str(sentence);
        self.len += sentence_len;
    }

    fn flush_into(&mut self, segments: &mut Vec<String>) {
        if !self.text.is_empty() {
            segments.push(std::mem::take(&mut self.text));
        }
        self.len = 0;
    }
}

/// 超长句子按段落切分，段落仍超长时按固定长度切分
fn split_long_sentence(sentence: &str, max_length: usize, segments: &mut Vec<String>) {
    for paragraph in sentence.split(PARAGRAPH_SEPARATOR) {
        if paragraph.is_empty() {
            continue;
        }

        if char_len(paragraph) <= max_length {
            segments.push(paragraph.to_string());
        } else {
            hard_split(paragraph, max_length, segments);
        }
    }
}

/// 按固定字符数切分，最后一块可以更短
fn hard_split(text: &str, max_length: usize, segments: &mut Vec<String>) {
    let chars: Vec<char> = text.chars().collect();
    segments.extend(chars.chunks(max_length).map(|chunk| chunk.iter().collect::<String>()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without_whitespace(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_short_text_is_single_segment() {
        assert_eq!(split_text("你好。世界。", 450), vec!["你好。世界。"]);
        assert_eq!(split_text("abc", 3), vec!["abc"]);
    }

    #[test]
    fn test_empty_text_is_one_empty_segment() {
        assert_eq!(split_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_sentences_are_packed_greedily() {
        let text = "一二三。四五六。七八九。十。";
        let segments = split_text(text, 8);
        assert_eq!(segments, vec!["一二三。四五六。", "七八九。十。"]);
    }

    #[test]
    fn test_unterminated_tail_keeps_no_synthetic_terminator() {
        let segments = split_text("一二三四。五六七八。尾巴", 6);
        assert_eq!(segments, vec!["一二三四。", "五六七八。", "尾巴"]);
        assert_eq!(segments.concat(), "一二三四。五六七八。尾巴");
    }

    #[test]
    fn test_long_sentence_splits_on_paragraphs() {
        let text = "第一段内容\n第二段内容\n\n第三段。";
        let segments = split_text(text, 6);
        assert_eq!(segments, vec!["第一段内容", "第二段内容", "第三段。"]);
    }

    #[test]
    fn test_long_paragraph_is_hard_split() {
        let segments = split_text("Hello world. This is a test.", 10);
        assert_eq!(segments, vec!["Hello worl", "d. This is", " a test."]);
    }

    #[test]
    fn test_buffer_flushed_before_long_sentence() {
        let text = "短句。这一句非常非常非常长。";
        let segments = split_text(text, 5);
        assert_eq!(segments[0], "短句。");
        assert_eq!(segments.concat(), text);
    }

    #[test]
    fn test_every_segment_within_limit_and_content_preserved() {
        let text = "今天天气很好。我们去公园散步吧。\n公园里有很多人在跑步，也有人在放风筝。\
                    This sentence has no ideographic terminator and is rather long indeed.\n\
                    最后一句。";
        for max_length in [1, 3, 7, 10, 20, 45] {
            let segments = split_text(text, max_length);
            assert!(segments.iter().all(|s| s.chars().count() <= max_length));
            assert!(segments.iter().all(|s| !s.is_empty()));
            assert_eq!(without_whitespace(&segments.concat()), without_whitespace(text));
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 9个汉字共27字节，仍然只算9个字符
        let text = "一二三四五六七八九";
        assert_eq!(split_text(text, 9), vec![text]);
        assert_eq!(split_text(text, 4), vec!["一二三四", "五六七八", "九"]);
    }

    #[test]
    fn test_whitespace_only_long_text_has_no_empty_segment() {
        let segments = split_text("   \n   \n   ", 2);
        assert_eq!(segments, vec!["  ", " ", "  ", " ", "  ", " "]);

        let segments = split_text("\n\n\n\n", 2);
        assert_eq!(segments, vec!["\n\n", "\n\n"]);
        assert!(segments.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_segmenter_numbers_positions_from_one() {
        let segmenter = TextSegmenter::new(4).unwrap();
        let segments = segmenter.split("一二三。四五六。");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].position, 1);
        assert_eq!(segments[1].position, 2);
        assert_eq!(segments[1].text, "四五六。");
    }

    #[test]
    fn test_segmenter_rejects_zero_limit() {
        assert!(TextSegmenter::new(0).is_err());
        assert_eq!(TextSegmenter::default().max_length(), 450);
    }
}
