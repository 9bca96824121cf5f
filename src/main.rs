//! # QRMatrix — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与结果输出。
//! 业务逻辑分布在库的各子模块中，详见 `lib.rs` 架构文档。

mod cli;

use std::io::Read as _;
use std::process::ExitCode;

use clap::Parser as _;
use qr_matrix::error::AppError;
use qr_matrix::flow::FlowState;
use qr_matrix::generator::{
    GenerationRequest, GeneratorConfig, GeneratorService, ImageSource, copy_bitmap_to_clipboard,
};
use qr_matrix::{settings, storage};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 生成失败 [{}]: {}", err.code(), err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => settings::load_config(path)?,
        None => GeneratorConfig::default(),
    };
    let service = GeneratorService::with_config(config)?;
    if let Some(profile) = &cli.profile {
        service.set_profile(profile)?;
    }

    let request = build_request(cli.command)?;
    let mut flow = FlowState::default();
    flow.select(request.kind())?;

    let Some(outcome) = service.submit("cli", request).await? else {
        log::info!("📭 输入为空，未生成二维码");
        eprintln!("nothing to generate: input is empty");
        return Ok(());
    };

    if outcome.is_degraded() {
        eprintln!("warning: image could not be resized, pixel art was sampled from the unscaled source");
    }
    if let Some(art) = &outcome.pixel_art {
        print!("{}", art.payload);
    }

    let dir = storage::output_dir(cli.output_dir)?;
    let path = storage::save_bitmap(&dir, &outcome.bitmap)?;
    eprintln!("saved {}", path.display());

    if cli.copy {
        let config = service.handler().config_snapshot()?;
        copy_bitmap_to_clipboard(&outcome.bitmap, &config).await?;
        eprintln!("copied to clipboard");
    }

    flow.complete(outcome)?;
    Ok(())
}

fn build_request(command: Commands) -> Result<GenerationRequest, AppError> {
    match command {
        Commands::Text { text: Some(text), .. } => Ok(GenerationRequest::Text(text)),
        Commands::Text { text: None, .. } => {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            while matches!(bytes.last(), Some(b'\n' | b'\r')) {
                bytes.pop();
            }
            Ok(GenerationRequest::text_from_bytes(bytes)?)
        }
        Commands::Image { path: Some(path), .. } => {
            Ok(GenerationRequest::PixelArt(ImageSource::FilePath(path)))
        }
        Commands::Image { path: None, base64 } => Ok(GenerationRequest::PixelArt(ImageSource::Base64(
            base64.unwrap_or_default(),
        ))),
    }
}
