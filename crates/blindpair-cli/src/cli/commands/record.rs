use super::{exit_codes, open_session};
use crate::cli::args::RecordArgs;
use blindpair_core::model::JudgmentInput;
use blindpair_core::JudgmentRecorder;
use std::sync::Arc;

pub fn cmd_record(args: RecordArgs) -> anyhow::Result<i32> {
    let session = open_session(&args.store)?;
    let recorder = JudgmentRecorder::new(Arc::new(session.store));

    let input = JudgmentInput {
        winner_id: args.winner,
        loser_id: args.loser,
        evaluator_id: args.evaluator,
        rating: args.rating,
        feedback: args.feedback,
    };

    match recorder.record(input) {
        Ok(judgment) => {
            println!("{}", serde_json::to_string(&judgment)?);
            Ok(exit_codes::OK)
        }
        Err(e) if e.is_rejection() => {
            eprintln!("rejected: {e}");
            Ok(exit_codes::INVALID_INPUT)
        }
        Err(e) => Err(e.into()),
    }
}
