use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NeatError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    #[default]
    Sigmoid,
    Tanh,
    Relu,
    Identity,
}

impl ActivationFunction {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Relu => x.max(0.0),
            ActivationFunction::Identity => x,
        }
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Structural mutation probabilities. At most one of these fires per
/// mutation, chosen by consuming the intervals in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructMutation {
    pub connection_add_prob: f64,
    pub connection_del_prob: f64,
    pub node_add_prob: f64,
    pub node_del_prob: f64,
}

impl Default for StructMutation {
    fn default() -> Self {
        StructMutation {
            connection_add_prob: 0.7,
            connection_del_prob: 0.1,
            node_add_prob: 0.2,
            node_del_prob: 0.01,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightMutation {
    /// Chance for each gene to have its weight touched at all.
    pub prob: f64,
    /// Once touched, chance the weight is nudged rather than replaced.
    pub change_value_prob: f64,
    /// Perturbation range as a fraction of the weight init range.
    pub scale: f64,
}

impl Default for WeightMutation {
    fn default() -> Self {
        WeightMutation {
            prob: 0.8,
            change_value_prob: 0.9,
            scale: 0.1,
        }
    }
}

/// Coefficients of the genetic distance. The distance is normalized by
/// the sum of all three impacts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesCompatibility {
    pub excess_impact: f64,
    pub disjoint_impact: f64,
    pub weight_mean_diff_coef: f64,
    /// Genomes closer than this end up in the same species. 1.0 means a
    /// single species.
    pub threshold: f64,
}

impl Default for SpeciesCompatibility {
    fn default() -> Self {
        SpeciesCompatibility {
            excess_impact: 1.0,
            disjoint_impact: 1.0,
            weight_mean_diff_coef: 3.0,
            threshold: 0.2,
        }
    }
}

impl SpeciesCompatibility {
    pub fn total_impact_sum(&self) -> f64 {
        self.excess_impact + self.disjoint_impact + self.weight_mean_diff_coef
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub genome_count: usize,
    pub input_count: usize,
    pub output_count: usize,

    /// Weights start in `[-weight_init_range, weight_init_range]`.
    pub weight_init_range: f64,

    /// Generations a species may go without improving its best fitness.
    pub max_stagnation: usize,
    /// Species averaging at least this much survive stagnation.
    pub good_fitness: f64,
    /// Fraction of each species kept around to seed the next speciation.
    pub genomes_to_remember: f64,
    pub min_genomes_to_keep: usize,
    /// 0.0 picks parents uniformly, 1.0 proportionally to fitness.
    pub weighted_random_gradient: f64,
    /// Fraction of a species' offspring produced by lightly mutated clones.
    pub part_of_genomes_to_copy: f64,

    pub struct_mutation: StructMutation,
    pub weight_mutation: WeightMutation,
    pub species_compatibility: SpeciesCompatibility,
    pub activation: ActivationFunction,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            genome_count: 50,
            input_count: 1,
            output_count: 1,
            weight_init_range: 1.0,
            max_stagnation: 20,
            good_fitness: 9_999_999.0,
            genomes_to_remember: 0.25,
            min_genomes_to_keep: 2,
            weighted_random_gradient: 1.0,
            part_of_genomes_to_copy: 0.2,
            struct_mutation: StructMutation::default(),
            weight_mutation: WeightMutation::default(),
            species_compatibility: SpeciesCompatibility::default(),
            activation: ActivationFunction::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Config> {
        let json = std::fs::read_to_string(path)?;
        Config::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_count < 1 || self.output_count < 1 {
            return Err(NeatError::InvalidTopology {
                inputs: self.input_count,
                outputs: self.output_count,
            });
        }
        if self.genome_count == 0 {
            return Err(invalid("genome_count must be at least 1"));
        }
        if !(self.weight_init_range >= 0.0 && self.weight_init_range.is_finite()) {
            return Err(invalid("weight_init_range must be finite and non-negative"));
        }
        if self.min_genomes_to_keep == 0 {
            return Err(invalid("a species has to remember at least one genome"));
        }
        if !(self.species_compatibility.total_impact_sum() > 0.0) {
            return Err(invalid("species compatibility impacts must sum to a positive value"));
        }
        if self.weight_mutation.scale < 0.0 {
            return Err(invalid("weight_mutation.scale must be non-negative"));
        }

        let fractions = [
            ("genomes_to_remember", self.genomes_to_remember),
            ("weighted_random_gradient", self.weighted_random_gradient),
            ("part_of_genomes_to_copy", self.part_of_genomes_to_copy),
            ("struct_mutation.connection_add_prob", self.struct_mutation.connection_add_prob),
            ("struct_mutation.connection_del_prob", self.struct_mutation.connection_del_prob),
            ("struct_mutation.node_add_prob", self.struct_mutation.node_add_prob),
            ("struct_mutation.node_del_prob", self.struct_mutation.node_del_prob),
            ("weight_mutation.prob", self.weight_mutation.prob),
            ("weight_mutation.change_value_prob", self.weight_mutation.change_value_prob),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(&format!("{} must be within [0, 1], got {}", name, value)));
            }
        }

        Ok(())
    }

    /// Chance that a mutated gene receives a brand new weight.
    pub fn new_value_prob(&self) -> f64 {
        1.0 - self.weight_mutation.change_value_prob
    }

    pub fn new_random_weight<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(-self.weight_init_range..=self.weight_init_range)
    }

    pub fn weight_mutation_value(&self) -> f64 {
        self.weight_mutation.scale * self.weight_init_range
    }

    pub fn weight_perturbation<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let range = self.weight_mutation_value();
        rng.gen_range(-range..=range)
    }

    pub fn activate(&self, x: f64) -> f64 {
        self.activation.apply(x)
    }
}

fn invalid(reason: &str) -> NeatError {
    NeatError::InvalidConfig(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_inputs() {
        let config = Config {
            input_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(NeatError::InvalidTopology { inputs: 0, outputs: 1 })
        ));
    }

    #[test]
    fn rejects_zero_genomes_to_keep() {
        let config = Config {
            min_genomes_to_keep: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NeatError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let config = Config {
            struct_mutation: StructMutation {
                node_add_prob: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NeatError::InvalidConfig(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = Config::from_json_str(
            r#"{ "genome_count": 10, "input_count": 3, "species_compatibility": { "threshold": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.genome_count, 10);
        assert_eq!(config.input_count, 3);
        assert_eq!(config.output_count, 1);
        assert_eq!(config.species_compatibility.threshold, 0.5);
        assert_eq!(config.species_compatibility.excess_impact, 1.0);
        assert_eq!(config.activation, ActivationFunction::Sigmoid);
    }

    #[test]
    fn sigmoid_of_half() {
        assert!((sigmoid(0.5) - 0.622_459_3).abs() < 1e-6);
    }

    #[test]
    fn zero_range_weights_are_zero() {
        let config = Config {
            weight_init_range: 0.0,
            ..Default::default()
        };
        let mut rng = rand::thread_rng();
        assert_eq!(config.new_random_weight(&mut rng), 0.0);
        assert_eq!(config.weight_perturbation(&mut rng), 0.0);
    }
}
