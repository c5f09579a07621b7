//! Engine configuration and fail-fast validation.

/// Which structural granularity crossover swaps between two clones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::FromStr)]
pub enum CrossoverMethod {
    /// Swap one scalar weight.
    Weight,
    /// Swap one neuron's full incoming-weight row.
    #[default]
    Neuron,
    /// Swap one layer's entire weight matrix.
    Layer,
}

/// Which granularity mutation redraws on a clone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::FromStr)]
pub enum MutationMethod {
    /// Redraw one scalar weight.
    #[default]
    Weight,
    /// Redraw one neuron's full incoming-weight row.
    Neuron,
}

/// Construction-time configuration errors. Raised before any generation
/// runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    PopulationSize,

    #[error("generation_count must be at least 1")]
    GenerationCount,

    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f32 },

    #[error("n_workers must be at least 1")]
    Workers,

    #[error("network_shape {shape:?} needs at least 2 layers, all widths >= 1")]
    Shape { shape: Vec<usize> },
}

/// Evolution engine configuration.
///
/// `Default` mirrors the hyperparameters the original training setup shipped
/// with; callers usually override at least `network_shape`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    /// Individuals at the start and end of every generation.
    pub population_size: usize,
    /// Generations to run before stopping.
    pub generation_count: usize,
    /// Fraction of the population turned into offspring each generation.
    pub crossover_rate: f32,
    /// Fraction of the population turned into mutants each generation.
    pub mutation_rate: f32,
    pub crossover_method: CrossoverMethod,
    pub mutation_method: MutationMethod,
    /// Layer widths for freshly created networks, input first.
    pub network_shape: Vec<usize>,
    /// Evaluation workers; 1 selects the sequential path.
    pub n_workers: usize,
    /// Chance that an operator application swaps/redraws a bias instead of
    /// applying the configured method. Inherited dispatch policy; 0.5
    /// reproduces the original unbiased coin.
    pub bias_fallback_probability: f32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            generation_count: 100,
            crossover_rate: 0.3,
            mutation_rate: 0.7,
            crossover_method: CrossoverMethod::default(),
            mutation_method: MutationMethod::default(),
            network_shape: vec![21, 16, 3],
            n_workers: 1,
            bias_fallback_probability: 0.5,
        }
    }
}

impl EvolutionConfig {
    /// Checks every field, failing fast before the engine starts.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationSize);
        }
        if self.generation_count == 0 {
            return Err(ConfigError::GenerationCount);
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            (
                "bias_fallback_probability",
                self.bias_fallback_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }
        if self.n_workers == 0 {
            return Err(ConfigError::Workers);
        }
        if self.network_shape.len() < 2 || self.network_shape.contains(&0) {
            return Err(ConfigError::Shape {
                shape: self.network_shape.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 10,
            generation_count: 3,
            network_shape: vec![4, 3, 2],
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        EvolutionConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let mut config = valid();
        config.population_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::PopulationSize));

        let mut config = valid();
        config.generation_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::GenerationCount));

        let mut config = valid();
        config.n_workers = 0;
        assert_eq!(config.validate(), Err(ConfigError::Workers));
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        let mut config = valid();
        config.crossover_rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RateOutOfRange {
                name: "crossover_rate",
                ..
            })
        ));

        let mut config = valid();
        config.mutation_rate = -0.1;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.bias_fallback_probability = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        for shape in [vec![], vec![4], vec![4, 0, 2]] {
            let mut config = valid();
            config.network_shape.clone_from(&shape);
            assert_eq!(config.validate(), Err(ConfigError::Shape { shape }));
        }
    }

    #[test]
    fn method_names_parse() {
        assert_eq!("weight".parse::<CrossoverMethod>().unwrap(), CrossoverMethod::Weight);
        assert_eq!("neuron".parse::<CrossoverMethod>().unwrap(), CrossoverMethod::Neuron);
        assert_eq!("layer".parse::<CrossoverMethod>().unwrap(), CrossoverMethod::Layer);
        assert_eq!("neuron".parse::<MutationMethod>().unwrap(), MutationMethod::Neuron);
        assert!("layer".parse::<MutationMethod>().is_err());
    }
}
