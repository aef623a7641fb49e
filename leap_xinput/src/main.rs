//! leap_xinput command-line entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gesture_input::TranslatorConfig;
use leap_xinput::app::{run, AppConfig, SourceKind};

#[derive(Debug, Parser)]
#[command(name = "leap_xinput", version, about = "Hand-tracking frames → desktop input")]
struct Cli {
    /// YAML translator configuration; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame source.
    #[arg(short, long, value_enum, default_value = "sim")]
    source: SourceKind,

    /// Keep receiving frames while another window has focus.
    #[arg(long)]
    bg: bool,

    /// Log events instead of performing them.
    #[arg(long)]
    dry_run: bool,

    /// Fit the screen mapping to the main display.
    #[arg(long)]
    auto_screen: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("leap_xinput=info,gesture_input=info")),
        )
        .init();

    let cli = Cli::parse();

    let translator = match &cli.config {
        Some(path) => TranslatorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TranslatorConfig::default(),
    };

    run(AppConfig {
        translator,
        source:      cli.source,
        background:  cli.bg,
        dry_run:     cli.dry_run,
        auto_screen: cli.auto_screen,
    })
}
