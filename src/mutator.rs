//! Structural and weight mutations. Every operator quietly does nothing when
//! the genome offers nothing to work on.

use log::trace;
use rand::Rng;

use crate::gene::Gene;
use crate::genome::Genome;
use crate::innovation::InnovationTracker;
use crate::neuron::{Neuron, NeuronType};
use crate::params::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructuralMutation {
    AddConnection,
    RemoveConnection,
    AddNode,
    RemoveNode,
}

/// Try one structural mutation, then give every gene a chance to have its
/// weight mutated. All probabilities are multiplied by `gradient`.
///
/// Returns the structural mutation the draw landed on, if any.
pub fn mutate<R: Rng + ?Sized>(
    config: &Config,
    genome: &mut Genome,
    gradient: f64,
    tracker: &mut InnovationTracker,
    rng: &mut R,
) -> Option<StructuralMutation> {
    let params = &config.struct_mutation;
    let intervals = [
        (StructuralMutation::AddConnection, params.connection_add_prob),
        (StructuralMutation::RemoveConnection, params.connection_del_prob),
        (StructuralMutation::AddNode, params.node_add_prob),
        (StructuralMutation::RemoveNode, params.node_del_prob),
    ];

    let mut draw = rng.gen::<f64>();
    let mut chosen = None;
    for (kind, prob) in intervals {
        let width = prob * gradient;
        if draw < width {
            chosen = Some(kind);
            break;
        }
        draw -= width;
    }

    match chosen {
        Some(StructuralMutation::AddConnection) => {
            add_connection_mutation(config, genome, tracker, rng);
        }
        Some(StructuralMutation::RemoveConnection) => {
            remove_connection_mutation(genome, rng);
        }
        Some(StructuralMutation::AddNode) => {
            add_node_mutation(genome, tracker, rng);
        }
        Some(StructuralMutation::RemoveNode) => {
            remove_node_mutation(genome, rng);
        }
        None => {}
    }

    let weight_prob = config.weight_mutation.prob * gradient;
    for gene in genome.genes.iter_mut() {
        if rng.gen::<f64>() < weight_prob {
            gene.mutate(config, rng);
        }
    }

    chosen
}

/// Connect a random neuron to a random neuron it does not feed yet. Inputs
/// and the bias are never targets. Returns the new gene's innovation number.
pub fn add_connection_mutation<R: Rng + ?Sized>(
    config: &Config,
    genome: &mut Genome,
    tracker: &mut InnovationTracker,
    rng: &mut R,
) -> Option<usize> {
    let mut candidates: Vec<usize> = genome.neurons.iter().map(|n| n.innovation_number).collect();

    while !candidates.is_empty() {
        let pick = rng.gen_range(0..candidates.len());
        let start = candidates[pick];

        let already_connected: Vec<usize> = genome
            .genes
            .iter()
            .filter(|g| g.neuron_from == start)
            .map(|g| g.neuron_to)
            .collect();
        let possible_ends: Vec<usize> = genome
            .neurons
            .iter()
            .filter(|n| !n.kind.is_source() && !already_connected.contains(&n.innovation_number))
            .map(|n| n.innovation_number)
            .collect();

        if possible_ends.is_empty() {
            candidates.remove(pick);
            continue;
        }

        let end = possible_ends[rng.gen_range(0..possible_ends.len())];
        let weight = config.new_random_weight(rng);
        let gene = Gene::new(tracker, start, end, weight, true);
        let innovation_number = gene.innovation_number;
        trace!("add connection {} -> {} (innovation {})", start, end, innovation_number);
        genome.add_gene(gene);
        return Some(innovation_number);
    }

    None
}

pub fn remove_connection_mutation<R: Rng + ?Sized>(genome: &mut Genome, rng: &mut R) -> Option<Gene> {
    if genome.genes.is_empty() {
        return None;
    }

    let idx = rng.gen_range(0..genome.genes.len());
    let innovation_number = genome.genes[idx].innovation_number;
    trace!("remove connection {}", innovation_number);
    genome.remove_gene(innovation_number)
}

/// Split a random enabled gene in two. The split gene is disabled but kept;
/// the incoming half gets weight 1.0 and the outgoing half the old weight, so
/// the new neuron barely changes what the network does. Returns the new
/// neuron's innovation number.
pub fn add_node_mutation<R: Rng + ?Sized>(
    genome: &mut Genome,
    tracker: &mut InnovationTracker,
    rng: &mut R,
) -> Option<usize> {
    let available: Vec<usize> = (0..genome.genes.len())
        .filter(|i| genome.genes[*i].enabled)
        .collect();
    if available.is_empty() {
        return None;
    }

    let gene_to_split = &mut genome.genes[available[rng.gen_range(0..available.len())]];
    gene_to_split.enabled = false;
    let neuron_from = gene_to_split.neuron_from;
    let neuron_to = gene_to_split.neuron_to;
    let weight = gene_to_split.weight;
    let split_innovation = gene_to_split.innovation_number;

    let mut new_neuron = tracker.split_neuron(split_innovation);
    if genome.has_neuron(new_neuron) {
        // this genome split the same gene before
        new_neuron = tracker.fresh_neuron();
    }
    genome.add_neuron(Neuron::new(new_neuron, NeuronType::Hidden));

    let connection_to = Gene::new(tracker, neuron_from, new_neuron, 1.0, true);
    let connection_from = Gene::new(tracker, new_neuron, neuron_to, weight, true);
    trace!(
        "split gene {} ({} -> {}) with neuron {}",
        split_innovation,
        neuron_from,
        neuron_to,
        new_neuron
    );
    genome.add_gene(connection_to);
    genome.add_gene(connection_from);

    Some(new_neuron)
}

pub fn remove_node_mutation<R: Rng + ?Sized>(genome: &mut Genome, rng: &mut R) -> Option<Neuron> {
    let hidden: Vec<usize> = genome.hidden_neurons().map(|n| n.innovation_number).collect();
    if hidden.is_empty() {
        return None;
    }

    let target = hidden[rng.gen_range(0..hidden.len())];
    trace!("remove neuron {}", target);
    genome.remove_neuron(target)
}
