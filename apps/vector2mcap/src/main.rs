//! vector2mcap：将 Vector 输出的 JSONL 指标转换为 MCAP。

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use v2m_config::{AppConfig, CompressionSetting};
use v2m_ingest::expand_patterns;
use v2m_pipeline::{ConvertOptions, convert_files};
use v2m_storage::{ContainerCompression, McapOptions};
use v2m_telemetry::{TracingDiagnostics, init_tracing};

/// Convert Vector JSONL files to MCAP format.
#[derive(Debug, Parser)]
#[command(name = "vector2mcap", version)]
struct Cli {
    /// Input file paths or glob patterns like "*.out"
    #[arg(required = true)]
    input_patterns: Vec<String>,

    /// Output MCAP file path
    #[arg(short, long)]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log conversion progress
    #[arg(long)]
    progress: bool,

    /// Print the conversion summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    init_tracing(cli.verbose);

    // 展开通配符；没有匹配的模式只告警
    let resolved = expand_patterns(&cli.input_patterns);
    for pattern in &resolved.unmatched {
        warn!(target: "v2m.cli", pattern = %pattern, "no files match pattern");
    }
    if resolved.paths.is_empty() {
        return Err("no input files found".into());
    }

    if cli.verbose {
        info!(target: "v2m.cli", count = resolved.paths.len(), "found input files");
        for path in &resolved.paths {
            info!(target: "v2m.cli", path = %path.display(), "input");
        }
        info!(target: "v2m.cli", output = %cli.output.display(), "output file");
    }

    let options = convert_options(&config, cli.progress);
    let stats = convert_files(
        resolved.paths,
        &cli.output,
        &options,
        Arc::new(TracingDiagnostics),
    )?;

    info!(
        target: "v2m.cli",
        files = stats.resources,
        files_failed = stats.resources_failed,
        processed = stats.observed,
        written = stats.written,
        errors = stats.errored,
        output = %cli.output.display(),
        "conversion summary"
    );
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

fn convert_options(config: &AppConfig, progress_flag: bool) -> ConvertOptions {
    let compression = match config.compression {
        CompressionSetting::None => ContainerCompression::None,
        CompressionSetting::Zstd => ContainerCompression::Zstd,
        CompressionSetting::Lz4 => ContainerCompression::Lz4,
    };
    ConvertOptions {
        container: McapOptions {
            compression,
            chunk_size: config.chunk_size,
        },
        progress_interval: (progress_flag || config.progress).then_some(config.progress_interval),
    }
}
