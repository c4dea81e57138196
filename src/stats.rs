use std::time::Duration;

use crate::language::Language;

/// 单次翻译运行的统计
#[derive(Debug)]
pub struct TranslationStats {
    pub read_time: Duration,
    pub translation_time: Duration,
    pub input_chars: usize,
    pub output_chars: usize,
    pub segments: usize,
    pub max_segment_length: usize,
    pub workers: usize,
    pub source_lang: Language,
    pub target_lang: Language,
}

/// 打印性能统计
pub fn print_performance_stats(stats: &TranslationStats, total_duration: Duration) {
    eprintln!("\n📊 性能统计报告:");
    eprintln!("═══════════════════════════════════════");

    // 时间分解
    eprintln!("⏱️  时间分解:");
    eprintln!("   输入读取: {}", format_duration(stats.read_time));
    eprintln!("   翻译执行: {}", format_duration(stats.translation_time));
    eprintln!("   总耗时: {}", format_duration(total_duration));

    // 文本统计
    eprintln!("\n📏 文本统计:");
    eprintln!("   输入长度: {} 字符", stats.input_chars);
    eprintln!("   输出长度: {} 字符", stats.output_chars);
    eprintln!("   语言方向: {} → {}", stats.source_lang, stats.target_lang);

    // 分段统计
    eprintln!("\n🔤 分段统计:");
    eprintln!("   片段数量: {} 段 (上限 {} 字符)", stats.segments, stats.max_segment_length);
    eprintln!("   工作池大小: {}", stats.workers);
    if stats.segments > 0 {
        eprintln!(
            "   平均片段耗时: {}",
            format_duration(stats.translation_time / stats.segments as u32)
        );
    }

    eprintln!("\n🚀 性能指标:");
    eprintln!(
        "   处理速度: {:.1} 字符/秒",
        stats.input_chars as f64 / total_duration.as_secs_f64().max(f64::EPSILON)
    );
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}
