//! leap_zoompan — drive a zoomable view with an open hand.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leap_zoompan::app::run;
use leap_zoompan::args::Args;
use leap_zoompan::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("leap_zoompan=info,zoompan_engine=info")),
        )
        .init();

    let mut cfg = if args.quick {
        info!("quick start, using default configuration");
        AppConfig::default()
    } else {
        AppConfig::load_or_default(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?
    };
    if let Some(ms) = args.frame_ms {
        cfg.tracking.frame_interval_ms = ms;
    }

    if args.dump_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    #[cfg(feature = "leap")]
    info!("mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    info!("mode: simulated hand (build with --features leap for hardware)");

    let view = run(&cfg)?;
    println!("{}", view.status());
    Ok(())
}
