use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use segmented_translator::api_constants::error_messages;
use segmented_translator::config::Cli;
use segmented_translator::history::HistoryStore;
use segmented_translator::language::{normalize_language_code, normalize_source_language};
use segmented_translator::service::TranslationService;
use segmented_translator::stats::{format_duration, print_performance_stats, TranslationStats};
use segmented_translator::utils::{init_logging, read_input_text};
use segmented_translator::{MyMemoryClient, Translator, WorkerPool};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    // 工作池在整个进程内共享
    let pool = WorkerPool::new(cli.workers);
    let client = MyMemoryClient::new(cli.client_config()).context("创建翻译客户端失败")?;
    let translator = Translator::new(Arc::new(client), pool, cli.translator_config())
        .context("创建翻译器失败")?;

    if cli.interactive {
        return run_interactive(&cli, translator).await;
    }

    let read_start = Instant::now();
    let text = read_input_text(cli.text.as_deref(), cli.input.as_deref())?;
    let read_time = read_start.elapsed();

    if cli.detect {
        println!("{}", translator.detect(&text));
        return Ok(());
    }

    if cli.segments {
        for segment in translator.segments(&text) {
            println!("[{}] {}", segment.position, segment.text);
        }
        return Ok(());
    }

    if text.trim().is_empty() {
        anyhow::bail!(error_messages::EMPTY_INPUT);
    }

    let target = normalize_language_code(&cli.lang);
    let source = normalize_source_language(cli.source.as_deref()).unwrap_or_else(|| translator.detect(&text));

    if !cli.quiet {
        info!("🌐 语言方向: {} → {}", source, target);
        info!("📏 输入长度: {} 字符", text.chars().count());
    }

    let total_start = Instant::now();
    let translated = match translator.translate(&text, target, Some(source)).await {
        Ok(translated) => translated,
        Err(e) => {
            error!("❌ 翻译失败: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };
    let total_duration = total_start.elapsed();

    println!("{}", translated);

    if !cli.quiet {
        info!("✅ 翻译完成！总耗时: {}", format_duration(total_duration));
    }

    if cli.stats || cli.verbose {
        let segments = if source == target {
            0
        } else {
            translator.segments(&text).len()
        };
        let stats = TranslationStats {
            read_time,
            translation_time: total_duration,
            input_chars: text.chars().count(),
            output_chars: translated.chars().count(),
            segments,
            max_segment_length: cli.max_segment,
            workers: translator.pool().capacity(),
            source_lang: source,
            target_lang: target,
        };
        print_performance_stats(&stats, total_duration + read_time);
    }

    Ok(())
}

/// 交互模式：每行一段文本，翻译结果写入本次会话的历史
async fn run_interactive(cli: &Cli, translator: Translator) -> Result<()> {
    let service = TranslationService::new(translator, Arc::new(HistoryStore::default()));
    let session_id = HistoryStore::new_session_id();

    if !cli.quiet {
        info!("💬 交互模式 (会话 {})：:history 查看历史, :clear 清空历史, :quit 退出", session_id);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("读取标准输入失败")? {
        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":history" => {
                let history = service.history().history(&session_id);
                println!("{}", serde_json::to_string_pretty(&history)?);
            }
            ":clear" => service.history().clear(&session_id),
            text => match service
                .translate_for_session(&session_id, text, &cli.lang, cli.source.as_deref())
                .await
            {
                Ok(outcome) => println!("{}", outcome.translated_text),
                Err(e) => eprintln!("{}", e.user_message()),
            },
        }
    }

    Ok(())
}
