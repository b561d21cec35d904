use std::hash::{Hash, Hasher};

use rand::Rng;

use crate::innovation::InnovationTracker;
use crate::neuron::Neuron;
use crate::params::Config;

/// A weighted connection between two neurons, identified by the innovation
/// numbers of its endpoints. Two genes are equal when their innovation
/// numbers are.
#[derive(Clone, Debug)]
pub struct Gene {
    pub innovation_number: usize,
    pub neuron_from: usize,
    pub neuron_to: usize,
    pub weight: f64,
    pub enabled: bool,
}

impl Gene {
    pub fn new(
        tracker: &mut InnovationTracker,
        neuron_from: usize,
        neuron_to: usize,
        weight: f64,
        enabled: bool,
    ) -> Gene {
        Gene {
            innovation_number: tracker.gene_innovation(neuron_from, neuron_to),
            neuron_from,
            neuron_to,
            weight,
            enabled,
        }
    }

    /// Either draw a brand new weight or nudge the current one.
    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &Config, rng: &mut R) {
        if rng.gen::<f64>() < config.new_value_prob() {
            self.weight = config.new_random_weight(rng);
        } else {
            self.weight += config.weight_perturbation(rng);
        }
    }

    /// Remove this gene from the adjacency lists of its endpoints.
    pub fn disconnect(&self, neurons: &mut [Neuron]) {
        for neuron in neurons.iter_mut() {
            if neuron.innovation_number == self.neuron_from {
                neuron.out_genes.retain(|g| *g != self.innovation_number);
            }
            if neuron.innovation_number == self.neuron_to {
                neuron.in_genes.retain(|g| *g != self.innovation_number);
            }
        }
    }

    /// Point this gene at `neuron_from -> neuron_to` and register it with both
    /// neurons. Registering twice is a no-op.
    pub fn connect_to_neurons(&mut self, neuron_from: usize, neuron_to: usize, neurons: &mut [Neuron]) {
        self.neuron_from = neuron_from;
        self.neuron_to = neuron_to;
        for neuron in neurons.iter_mut() {
            if neuron.innovation_number == neuron_from && !neuron.out_genes.contains(&self.innovation_number) {
                neuron.out_genes.push(self.innovation_number);
            }
            if neuron.innovation_number == neuron_to && !neuron.in_genes.contains(&self.innovation_number) {
                neuron.in_genes.push(self.innovation_number);
            }
        }
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Self) -> bool {
        self.innovation_number == other.innovation_number
    }
}

impl Eq for Gene {}

impl Hash for Gene {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.innovation_number.hash(state);
    }
}
