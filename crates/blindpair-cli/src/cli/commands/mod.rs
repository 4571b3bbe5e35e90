use super::args::*;
use anyhow::Context;
use blindpair_core::config::{load_config, EvalConfig};
use blindpair_core::storage::Store;
use std::path::Path;

pub mod import;
pub mod init;
pub mod record;
pub mod reset;
pub mod sample;
pub mod stats;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    /// Nothing to evaluate or report on.
    pub const NO_DATA: i32 = 3;
    pub const INVALID_INPUT: i32 = 4;
}

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    tracing::info!(
        event = "command_dispatched",
        command = cli.cmd.name(),
        version = env!("CARGO_PKG_VERSION")
    );
    match cli.cmd {
        Command::Init(args) => init::cmd_init(args),
        Command::Import(args) => import::cmd_import(args),
        Command::Sample(args) => sample::cmd_sample(args),
        Command::Record(args) => record::cmd_record(args),
        Command::Stats(args) => stats::cmd_stats(args),
        Command::Reset(args) => reset::cmd_reset(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

/// Resolved config plus an open store with the schema in place.
pub struct Session {
    pub cfg: EvalConfig,
    pub store: Store,
}

pub fn open_session(args: &StoreArgs) -> anyhow::Result<Session> {
    let mut cfg = load_config(&args.config, args.strict).map_err(|e| anyhow::anyhow!(e))?;
    cfg.apply_env();
    if let Some(db) = &args.db {
        cfg.db = db.clone();
    }
    let store = Store::open(&cfg.db)
        .with_context(|| format!("failed to open store at {}", cfg.db.display()))?;
    store.init_schema()?;
    Ok(Session { cfg, store })
}

pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
