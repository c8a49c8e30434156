//! HBDS Viewer - Native entry point

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::Result;
    use clap::Parser;
    use hbds_core::config::{load_config, save_default_config};
    use std::path::PathBuf;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "hbds-viewer")]
    #[command(about = "Interactive 2D/3D viewer for HBDS class diagrams")]
    #[command(version)]
    struct Args {
        /// Path to configuration file
        #[arg(short, long, default_value = "hbds.toml")]
        config: PathBuf,

        /// Model to load at startup (overrides the configured default)
        #[arg(short, long)]
        model: Option<String>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,

        /// Write a default configuration file to --config and exit
        #[arg(long)]
        write_default_config: bool,
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        info!("HBDS Viewer v{}", env!("CARGO_PKG_VERSION"));

        if args.write_default_config {
            save_default_config(&args.config)?;
            info!(path = %args.config.display(), "Wrote default configuration");
            return Ok(());
        }

        let config = load_config(&args.config)?;
        info!(
            models = %config.models.base,
            default = %config.models.default,
            "Configuration loaded"
        );

        hbds_viewer::app::run(config, args.model);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The browser build starts through the library's wasm_bindgen entry point
#[cfg(target_arch = "wasm32")]
fn main() {}
