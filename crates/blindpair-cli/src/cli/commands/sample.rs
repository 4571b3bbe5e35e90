use super::{exit_codes, open_session};
use crate::cli::args::SampleArgs;
use blindpair_core::{EvalError, PairSampler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Prints one blinded pair per line as JSON. Variant ids never leave here.
pub fn cmd_sample(args: SampleArgs) -> anyhow::Result<i32> {
    let session = open_session(&args.store)?;
    let sampler = PairSampler::new(Arc::new(session.store.clone()));

    let mut rng = match args.seed.or(session.cfg.sampling.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for _ in 0..args.count {
        match sampler.sample_pair_with(&mut rng) {
            Ok(pair) => println!("{}", serde_json::to_string(&pair.blind())?),
            Err(EvalError::NoComparablePair) => {
                eprintln!("nothing to evaluate: no context has two or more interpretations");
                return Ok(exit_codes::NO_DATA);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(exit_codes::OK)
}
