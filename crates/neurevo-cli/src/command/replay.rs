use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use neurevo_evaluator::Environment as _;
use neurevo_network::NetworkArtifact;

use crate::environment::{self, XorEnvironment};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to a persisted network artifact (e.g. models/best.json)
    #[arg(long)]
    model: PathBuf,
    /// Episodes to play
    #[arg(long, default_value_t = 4)]
    episodes: usize,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let file = File::open(&arg.model)
        .with_context(|| format!("failed to open model file: {}", arg.model.display()))?;
    let artifact: NetworkArtifact = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse model file: {}", arg.model.display()))?;
    let network = artifact.into_network()?;
    environment::check_shape(network.shape())?;

    let mut env = XorEnvironment::new();
    let mut total = 0.0;
    for episode in 1..=arg.episodes {
        let score = env.score_one(&network)?;
        total += score;
        eprintln!("Episode {episode}: {score:.3}");
    }
    #[expect(clippy::cast_precision_loss)]
    let mean = total / arg.episodes.max(1) as f32;
    eprintln!(
        "Mean score over {} episodes: {mean:.3} (max {})",
        arg.episodes,
        environment::MAX_SCORE
    );
    Ok(())
}
