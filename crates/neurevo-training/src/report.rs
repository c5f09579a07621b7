//! Per-generation summaries.

use std::time::Duration;

use neurevo_network::Network;

/// Individuals averaged into the top/bottom fitness summaries.
pub const SUMMARY_WINDOW: usize = 6;

/// Summary of one completed generation. The engine appends one record per
/// generation; the log is never rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    /// 1-based generation index.
    pub generation: usize,
    /// Fitness of the ranked best survivor.
    pub best_fitness: f32,
    /// Mean fitness over all survivors.
    pub mean_fitness: f32,
    /// Mean fitness of the top [`SUMMARY_WINDOW`] survivors.
    pub top_mean: f32,
    /// Mean fitness of the bottom [`SUMMARY_WINDOW`] survivors.
    pub bottom_mean: f32,
    /// Wall-clock time the generation took.
    pub duration: Duration,
}

impl GenerationRecord {
    /// Summarizes a fitness-ranked (descending) population.
    ///
    /// The top/bottom windows clamp to the population size.
    ///
    /// # Panics
    ///
    /// Panics if `ranked` is empty; the engine never produces an empty
    /// population.
    #[must_use]
    pub fn from_ranked(generation: usize, ranked: &[Network], duration: Duration) -> Self {
        assert!(!ranked.is_empty());
        let window = SUMMARY_WINDOW.min(ranked.len());
        Self {
            generation,
            best_fitness: ranked[0].fitness(),
            mean_fitness: mean(ranked.iter()),
            top_mean: mean(ranked[..window].iter()),
            bottom_mean: mean(ranked[ranked.len() - window..].iter()),
            duration,
        }
    }
}

fn mean<'a>(networks: impl ExactSizeIterator<Item = &'a Network>) -> f32 {
    #[expect(clippy::cast_precision_loss)]
    let len = networks.len() as f32;
    networks.map(Network::fitness).sum::<f32>() / len
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn ranked(fitnesses: &[f32]) -> Vec<Network> {
        let mut rng = Pcg64Mcg::seed_from_u64(31);
        fitnesses
            .iter()
            .map(|&fitness| {
                let mut net = Network::new(vec![2, 2], &mut rng).unwrap();
                net.set_fitness(fitness);
                net
            })
            .collect()
    }

    #[test]
    fn record_summarizes_ranked_population() {
        let population = ranked(&[10.0, 8.0, 6.0, 4.0, 2.0, 1.0, 0.5, 0.25]);
        let record = GenerationRecord::from_ranked(3, &population, Duration::from_secs(2));
        assert_eq!(record.generation, 3);
        assert_eq!(record.best_fitness, 10.0);
        assert!((record.mean_fitness - 31.75 / 8.0).abs() < 1e-6);
        assert!((record.top_mean - 31.0 / 6.0).abs() < 1e-6);
        assert!((record.bottom_mean - 13.75 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn windows_clamp_to_small_populations() {
        let population = ranked(&[3.0, 1.0]);
        let record = GenerationRecord::from_ranked(1, &population, Duration::ZERO);
        assert_eq!(record.top_mean, 2.0);
        assert_eq!(record.bottom_mean, 2.0);
        assert_eq!(record.mean_fitness, 2.0);
    }
}
