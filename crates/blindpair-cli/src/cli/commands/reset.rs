use super::{exit_codes, open_session};
use crate::cli::args::ResetArgs;
use blindpair_core::EvalStore;
use std::io::{BufRead, Write};

pub fn cmd_reset(args: ResetArgs) -> anyhow::Result<i32> {
    let session = open_session(&args.store)?;
    let counts = session.store.counts()?;
    if counts.is_empty() {
        println!("already empty");
        return Ok(exit_codes::OK);
    }

    println!(
        "{} interpretations and {} evaluations in {}",
        counts.instances,
        counts.judgments,
        session.cfg.db.display()
    );

    if !args.force {
        print!("type 'yes' to delete them all: ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        if !confirmed(&answer) {
            println!("aborted, nothing deleted");
            return Ok(exit_codes::OK);
        }
    }

    let removed = session.store.reset()?;
    println!(
        "deleted {} interpretations and {} evaluations",
        removed.instances, removed.judgments
    );
    Ok(exit_codes::OK)
}

fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}
