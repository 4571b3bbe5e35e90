use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::args::Cli;
use cli::commands::{dispatch, exit_codes};

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `BLINDPAIR_LOG` wins over the config file's `log_level`.
fn resolve_log_level(cli: &Cli) -> String {
    if let Ok(level) = std::env::var("BLINDPAIR_LOG") {
        return level;
    }
    cli.config_path()
        .and_then(|p| blindpair_core::config::load_config(p, false).ok())
        .and_then(|cfg| cfg.log_level)
        .unwrap_or_else(|| "warn".to_string())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&resolve_log_level(&cli));
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            exit_codes::CONFIG_ERROR
        }
    };
    std::process::exit(code);
}
