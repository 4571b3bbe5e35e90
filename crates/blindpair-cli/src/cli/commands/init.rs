use super::{exit_codes, open_session};
use crate::cli::args::{InitArgs, StoreArgs};
use std::path::Path;

const GITIGNORE: &str = "/.blindpair/\n*.db\n*.db-shm\n*.db-wal\n";

pub fn cmd_init(args: InitArgs) -> anyhow::Result<i32> {
    if !args.config.exists() {
        super::ensure_parent_dir(&args.config)?;
        blindpair_core::config::write_sample_config(&args.config)
            .map_err(|e| anyhow::anyhow!(e))?;
        eprintln!("created {}", args.config.display());
    } else {
        eprintln!("note: {} already exists", args.config.display());
    }

    if args.gitignore {
        let path = Path::new(".gitignore");
        if !path.exists() {
            std::fs::write(path, GITIGNORE)?;
            eprintln!("created .gitignore");
        } else {
            eprintln!("note: .gitignore already exists (skipped)");
        }
    }

    let session = open_session(&StoreArgs {
        config: args.config,
        db: None,
        strict: false,
    })?;
    eprintln!("database ready at {}", session.cfg.db.display());
    Ok(exit_codes::OK)
}
