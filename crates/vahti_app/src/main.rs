//! vahti: watch one listings page and notify on changes.
//!
//! Designed to be driven by cron or a systemd timer: one invocation is one
//! check. Exit code 0 means the check ran to completion (changed or not),
//! 1 means it could not run.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use vahti_core::error_notice;
use vahti_engine::{
    Channel, Dispatcher, FetchSettings, ReqwestFetcher, SmtpChannel, StateStore, TelegramChannel,
    WatchSettings, Watcher,
};
use vahti_logging::{vahti_error, vahti_info, vahti_warn};

mod config;
mod logging;

use config::WatchConfig;

#[derive(Debug, Parser)]
#[command(name = "vahti", version, about = "Watch a listings page for changes")]
struct Cli {
    /// Enable debug-level logging.
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    // Load .env before reading configuration so both see the same values.
    let _ = dotenvy::dotenv();
    logging::initialize(cli.debug);

    let config = WatchConfig::from_env();
    let Some(page_url) = config.page_url.clone() else {
        vahti_error!("URL is not set, nothing to watch");
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            vahti_error!("could not start async runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(config, page_url))
}

async fn run(config: WatchConfig, page_url: String) -> ExitCode {
    let watcher = Watcher::new(
        WatchSettings {
            page_url: page_url.clone(),
            listing_prefix: config::DEFAULT_LISTING_PREFIX.to_string(),
            notify_on_first_run: config.notify_on_first_run,
        },
        Box::new(ReqwestFetcher::new(FetchSettings::default())),
        StateStore::new(config.state_dir.clone()),
        Dispatcher::new(build_channels(&config, ChannelSelection::All)),
        Arc::new(utc_now),
    );

    match watcher.run_once().await {
        Ok(outcome) => {
            vahti_info!("run finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            vahti_error!("run failed: {}", err);
            let error_channels = build_channels(&config, ChannelSelection::ErrorReporting);
            if !error_channels.is_empty() {
                let detail = format!("URL: {}\nTime: {}\n\n{}", page_url, utc_now(), err);
                Dispatcher::new(error_channels)
                    .dispatch(&error_notice(&detail))
                    .await;
            }
            ExitCode::FAILURE
        }
    }
}

/// Which configured channels to instantiate. Failure notices honor the
/// per-channel error opt-in flags; change notices use every channel.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ChannelSelection {
    All,
    ErrorReporting,
}

fn build_channels(config: &WatchConfig, selection: ChannelSelection) -> Vec<Box<dyn Channel>> {
    let errors_only = selection == ChannelSelection::ErrorReporting;
    let mut channels: Vec<Box<dyn Channel>> = Vec::new();

    if !errors_only || config.telegram_on_error {
        if let Some(telegram) = config.telegram.clone() {
            match TelegramChannel::new(telegram) {
                Ok(channel) => channels.push(Box::new(channel)),
                Err(err) => vahti_warn!("telegram channel unavailable: {}", err),
            }
        }
    }

    if !errors_only || config.email_on_error {
        if let Some(smtp) = config.smtp.as_ref() {
            match SmtpChannel::new(smtp) {
                Ok(channel) => channels.push(Box::new(channel)),
                Err(err) => vahti_warn!("email channel unavailable: {}", err),
            }
        }
    }

    channels
}

fn utc_now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S %Z").to_string()
}
