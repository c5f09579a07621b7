use std::path::PathBuf;

use anyhow::Context as _;
use neurevo_evaluator::{Evaluator, ParallelEvaluator, SequentialEvaluator};
use neurevo_network::{JsonDirectoryStore, NetworkStore as _};
use neurevo_training::{
    CrossoverMethod, EvolutionConfig, EvolutionEngine, GenerationRecord, MutationMethod,
};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use crate::environment::{self, XorEnvironment, XorEnvironmentFactory};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Individuals per generation
    #[arg(long, default_value_t = 100)]
    population_size: usize,
    /// Generations to run
    #[arg(long, default_value_t = 30)]
    generations: usize,
    /// Fraction of the population turned into offspring
    #[arg(long, default_value_t = 0.3)]
    crossover_rate: f32,
    /// Fraction of the population turned into mutants
    #[arg(long, default_value_t = 0.7)]
    mutation_rate: f32,
    /// Structural crossover granularity: weight, neuron or layer
    #[arg(long, default_value = "neuron")]
    crossover_method: CrossoverMethod,
    /// Mutation granularity: weight or neuron
    #[arg(long, default_value = "weight")]
    mutation_method: MutationMethod,
    /// Chance an operator falls back to the bias-level edit
    #[arg(long, default_value_t = 0.5)]
    bias_fallback_probability: f32,
    /// Comma-separated layer widths, input first
    #[arg(long, value_delimiter = ',', default_value = "2,8,1")]
    shape: Vec<usize>,
    /// Evaluation workers; 1 runs everything on this thread
    #[arg(long, default_value_t = 1)]
    workers: usize,
    /// RNG seed; omit for a fresh one
    #[arg(long)]
    seed: Option<u64>,
    /// Directory for per-generation checkpoints and the final best network
    #[arg(long, default_value = "models")]
    output_dir: PathBuf,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    environment::check_shape(&arg.shape)?;

    let config = EvolutionConfig {
        population_size: arg.population_size,
        generation_count: arg.generations,
        crossover_rate: arg.crossover_rate,
        mutation_rate: arg.mutation_rate,
        crossover_method: arg.crossover_method,
        mutation_method: arg.mutation_method,
        network_shape: arg.shape.clone(),
        n_workers: arg.workers,
        bias_fallback_probability: arg.bias_fallback_probability,
    };

    let mut rng = match arg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    };

    let store = JsonDirectoryStore::open(&arg.output_dir)
        .with_context(|| format!("failed to open {}", arg.output_dir.display()))?;

    if arg.workers == 1 {
        train_with(config, SequentialEvaluator::new(XorEnvironment::new()), store, &mut rng)
    } else {
        train_with(
            config,
            ParallelEvaluator::new(XorEnvironmentFactory, arg.workers),
            store,
            &mut rng,
        )
    }
}

fn train_with<V>(
    config: EvolutionConfig,
    evaluator: V,
    store: JsonDirectoryStore,
    rng: &mut Pcg64Mcg,
) -> anyhow::Result<()>
where
    V: Evaluator,
{
    let mut engine = EvolutionEngine::new(config, XorEnvironment::new(), evaluator, store)?;
    let run = engine.run(rng, print_record)?;

    let best = &run.population[0];
    let mut store = engine.into_store();
    store.persist(best, "best")?;

    eprintln!();
    eprintln!("Training completed.");
    eprintln!("  Generations: {}", run.records.len());
    eprintln!(
        "  Best fitness: {:.3} (max {})",
        best.fitness(),
        crate::environment::MAX_SCORE
    );
    eprintln!("  Checkpoints: {}", store.dir().display());
    Ok(())
}

fn print_record(record: &GenerationRecord) {
    eprintln!("Generation #{}:", record.generation);
    eprintln!("  Duration:      {:.2?}", record.duration);
    eprintln!("  Best fitness:  {:.3}", record.best_fitness);
    eprintln!("  Mean fitness:  {:.3}", record.mean_fitness);
    eprintln!("  Top-6 mean:    {:.3}", record.top_mean);
    eprintln!("  Bottom-6 mean: {:.3}", record.bottom_mean);
}
