use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

/// 初始化日志系统
///
/// 日志输出到标准错误，标准输出只保留译文
pub fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 读取待翻译文本：命令行参数优先，其次是文件，最后是标准输入
pub fn read_input_text(text: Option<&str>, input: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }

    let content = match input {
        Some(path) => {
            validate_input_file(path)?;
            std::fs::read_to_string(path)
                .with_context(|| format!("读取文件失败: {}", path.display()))?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("读取标准输入失败")?;
            buffer
        }
    };

    Ok(strip_trailing_newline(content))
}

/// 验证输入文件
pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("输入文件不存在: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("输入路径不是文件: {}", path.display());
    }

    if let Some(ext) = path.extension() {
        if ext != "txt" && ext != "md" {
            warn!("⚠️  文件扩展名不是文本格式: {}", ext.to_string_lossy());
        }
    }

    Ok(())
}

/// 去掉文件或标准输入末尾的换行
fn strip_trailing_newline(mut content: String) -> String {
    while content.ends_with('\n') || content.ends_with('\r') {
        content.pop();
    }
    content
}
