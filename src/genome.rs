use std::collections::HashMap;
use std::fmt::Write as _;

use rand::Rng;

use crate::error::{NeatError, Result};
use crate::gene::Gene;
use crate::innovation::InnovationTracker;
use crate::mutator;
use crate::neuron::{Neuron, NeuronType};
use crate::params::Config;
use crate::population::full_sorted_outer_join;

#[derive(Debug, Clone)]
pub struct Genome {
    pub(crate) genes: Vec<Gene>,
    // the first neurons are always the inputs, then the outputs, then the bias
    pub(crate) neurons: Vec<Neuron>,
    input_count: usize,
    output_count: usize,
    pub fitness: f64,
    pub species_id: Option<usize>,
}

/// Which of the two compared genomes a gene came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parent {
    First,
    Second,
}

/// Genes of two genomes lined up by innovation number.
#[derive(Debug)]
pub struct GeneComparison<'a> {
    pub matching: Vec<(&'a Gene, &'a Gene)>,
    /// Only in one genome, within the other's innovation range.
    pub disjoint: Vec<(Parent, &'a Gene)>,
    /// Only in one genome, past the other's highest innovation number.
    pub excess: Vec<(Parent, &'a Gene)>,
}

impl<'a> GeneComparison<'a> {
    pub fn new(first: &'a Genome, second: &'a Genome) -> GeneComparison<'a> {
        let max_first = first.max_innovation_number();
        let max_second = second.max_innovation_number();
        let beyond = |gene: &Gene, max: Option<usize>| max.map_or(true, |m| gene.innovation_number > m);

        let mut comparison = GeneComparison {
            matching: Vec::new(),
            disjoint: Vec::new(),
            excess: Vec::new(),
        };

        for (l, r) in full_sorted_outer_join(
            first.sorted_genes().into_iter(),
            second.sorted_genes().into_iter(),
            |a, b| a.innovation_number.cmp(&b.innovation_number),
        ) {
            match (l, r) {
                (Some(l), Some(r)) => comparison.matching.push((l, r)),
                (Some(l), None) => {
                    if beyond(l, max_second) {
                        comparison.excess.push((Parent::First, l));
                    } else {
                        comparison.disjoint.push((Parent::First, l));
                    }
                }
                (None, Some(r)) => {
                    if beyond(r, max_first) {
                        comparison.excess.push((Parent::Second, r));
                    } else {
                        comparison.disjoint.push((Parent::Second, r));
                    }
                }
                (None, None) => unreachable!(),
            }
        }

        comparison
    }
}

#[derive(Clone, Copy)]
struct Frame {
    neuron: usize,
    next_gene: usize,
    sum: f64,
}

pub(crate) fn layout_kind(input_count: usize, output_count: usize, neuron: usize) -> NeuronType {
    if neuron < input_count {
        NeuronType::Input
    } else if neuron < input_count + output_count {
        NeuronType::Output
    } else if neuron == input_count + output_count {
        NeuronType::Bias
    } else {
        NeuronType::Hidden
    }
}

fn check_topology(input_count: usize, output_count: usize) -> Result<()> {
    if input_count < 1 || output_count < 1 {
        return Err(NeatError::InvalidTopology {
            inputs: input_count,
            outputs: output_count,
        });
    }
    Ok(())
}

impl Genome {
    fn empty(input_count: usize, output_count: usize) -> Genome {
        let neurons = (0..input_count + output_count + 1)
            .map(|i| Neuron::new(i, layout_kind(input_count, output_count, i)))
            .collect();

        Genome {
            genes: Vec::new(),
            neurons,
            input_count,
            output_count,
            fitness: 0.0,
            species_id: None,
        }
    }

    /// Inputs, outputs and a bias, with every input connected to every
    /// output. The bias starts unconnected.
    pub fn new<R: Rng + ?Sized>(
        input_count: usize,
        output_count: usize,
        weight_range: f64,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<Genome> {
        check_topology(input_count, output_count)?;
        if !(weight_range >= 0.0 && weight_range.is_finite()) {
            return Err(NeatError::InvalidConfig(format!(
                "weight range must be finite and non-negative, got {}",
                weight_range
            )));
        }

        let mut genome = Genome::empty(input_count, output_count);
        for i in 0..input_count {
            for j in 0..output_count {
                let weight = rng.gen_range(-weight_range..=weight_range);
                let gene = Gene::new(tracker, i, input_count + j, weight, true);
                genome.add_gene(gene);
            }
        }

        debug_assert_eq!(genome.neurons.len(), input_count + output_count + 1);
        debug_assert_eq!(genome.genes.len(), input_count * output_count);
        Ok(genome)
    }

    pub fn from_config<R: Rng + ?Sized>(
        config: &Config,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<Genome> {
        Genome::new(
            config.input_count,
            config.output_count,
            config.weight_init_range,
            tracker,
            rng,
        )
    }

    /// Rebuild a network from an arbitrary set of genes. Neurons referenced by
    /// the genes but missing from the starting layout are created as hidden
    /// neurons. Innovation numbers are kept as they are.
    pub fn from_genes(
        input_count: usize,
        output_count: usize,
        genes: impl IntoIterator<Item = Gene>,
    ) -> Result<Genome> {
        check_topology(input_count, output_count)?;
        Ok(Genome::rebuild(input_count, output_count, genes))
    }

    pub(crate) fn rebuild(
        input_count: usize,
        output_count: usize,
        genes: impl IntoIterator<Item = Gene>,
    ) -> Genome {
        let mut genome = Genome::empty(input_count, output_count);
        for gene in genes {
            genome.add_gene(gene);
        }
        genome
    }

    /// Insert a gene, creating any neuron it needs. A gene whose innovation
    /// number is already present only overrides weight and expression.
    pub(crate) fn add_gene(&mut self, mut gene: Gene) {
        if let Some(existing_gene) = self
            .genes
            .iter_mut()
            .find(|g| g.innovation_number == gene.innovation_number)
        {
            existing_gene.enabled = gene.enabled;
            existing_gene.weight = gene.weight;
            return;
        }

        self.force_neuron(gene.neuron_from);
        self.force_neuron(gene.neuron_to);
        gene.connect_to_neurons(gene.neuron_from, gene.neuron_to, &mut self.neurons);
        self.genes.push(gene);
    }

    fn force_neuron(&mut self, innovation_number: usize) {
        if !self.has_neuron(innovation_number) {
            let kind = layout_kind(self.input_count, self.output_count, innovation_number);
            self.neurons.push(Neuron::new(innovation_number, kind));
        }
    }

    pub(crate) fn add_neuron(&mut self, neuron: Neuron) {
        debug_assert!(!self.has_neuron(neuron.innovation_number));
        self.neurons.push(neuron);
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn gene(&self, innovation_number: usize) -> Option<&Gene> {
        self.genes
            .iter()
            .find(|g| g.innovation_number == innovation_number)
    }

    pub fn neuron(&self, innovation_number: usize) -> Option<&Neuron> {
        self.neurons
            .iter()
            .find(|n| n.innovation_number == innovation_number)
    }

    pub fn has_neuron(&self, innovation_number: usize) -> bool {
        self.neuron(innovation_number).is_some()
    }

    pub fn input_neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter().filter(|n| n.kind == NeuronType::Input)
    }

    pub fn output_neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter().filter(|n| n.kind == NeuronType::Output)
    }

    pub fn hidden_neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter().filter(|n| n.kind == NeuronType::Hidden)
    }

    pub fn active_gene_count(&self) -> usize {
        self.genes.iter().filter(|g| g.enabled).count()
    }

    pub fn species_id(&self) -> Option<usize> {
        self.species_id
    }

    fn max_innovation_number(&self) -> Option<usize> {
        self.genes.iter().map(|g| g.innovation_number).max()
    }

    fn sorted_genes(&self) -> Vec<&Gene> {
        let mut genes: Vec<&Gene> = self.genes.iter().collect();
        genes.sort_by_key(|g| g.innovation_number);
        genes
    }

    /// How different two genomes are, normalized by the configured impacts.
    pub fn genetic_distance(config: &Config, genome1: &Genome, genome2: &Genome) -> f64 {
        let compat = &config.species_compatibility;
        let comparison = GeneComparison::new(genome1, genome2);
        let genes_in_biggest = genome1.genes.len().max(genome2.genes.len());

        let mut distance = 0.0;
        if genes_in_biggest > 0 {
            let mismatch = comparison.disjoint.len() as f64 * compat.disjoint_impact
                + comparison.excess.len() as f64 * compat.excess_impact;
            distance += mismatch / genes_in_biggest as f64;
        }

        // no matching genes means no weight difference to speak of
        if !comparison.matching.is_empty() {
            let weight_diff_sum: f64 = comparison
                .matching
                .iter()
                .map(|(l, r)| (l.weight - r.weight).abs())
                .sum();
            distance +=
                weight_diff_sum / comparison.matching.len() as f64 * compat.weight_mean_diff_coef;
        }

        distance / compat.total_impact_sum()
    }

    /// Matching genes come from either parent at random, disjoint and excess
    /// genes only from the fitter one. The child is not mutated.
    pub fn crossover<R: Rng + ?Sized>(parent1: &Genome, parent2: &Genome, rng: &mut R) -> Genome {
        let first_is_fittest = parent1.fitness > parent2.fitness;
        let fittest = if first_is_fittest { parent1 } else { parent2 };
        let comparison = GeneComparison::new(parent1, parent2);

        let mut genes = Vec::with_capacity(fittest.genes.len());
        for (l, r) in comparison.matching {
            if rng.gen::<bool>() {
                genes.push(l.clone());
            } else {
                genes.push(r.clone());
            }
        }

        let fittest_side = if first_is_fittest {
            Parent::First
        } else {
            Parent::Second
        };
        genes.extend(
            comparison
                .disjoint
                .into_iter()
                .chain(comparison.excess)
                .filter(|(parent, _)| *parent == fittest_side)
                .map(|(_, gene)| gene.clone()),
        );

        Genome::rebuild(fittest.input_count, fittest.output_count, genes)
    }

    /// Evaluate the network. Every output is resolved by walking its incoming
    /// enabled genes; a neuron counts as resolved as soon as it is entered, so
    /// recurrent edges read the value left over from the previous pass.
    pub fn feed_forward(&mut self, config: &Config, inputs: &[f64]) -> Result<Vec<f64>> {
        if inputs.len() != self.input_count {
            return Err(NeatError::InvalidInput {
                expected: self.input_count,
                given: inputs.len(),
            });
        }

        let mut inputs_iter = inputs.iter();
        for neuron in self.neurons.iter_mut().filter(|n| n.kind == NeuronType::Input) {
            if let Some(value) = inputs_iter.next() {
                neuron.set_value(*value);
            }
        }

        let neuron_index: HashMap<usize, usize> = self
            .neurons
            .iter()
            .enumerate()
            .map(|(i, n)| (n.innovation_number, i))
            .collect();
        let gene_index: HashMap<usize, usize> = self
            .genes
            .iter()
            .enumerate()
            .map(|(i, g)| (g.innovation_number, i))
            .collect();

        let mut solved = vec![false; self.neurons.len()];
        let outputs: Vec<usize> = (0..self.neurons.len())
            .filter(|i| self.neurons[*i].kind == NeuronType::Output)
            .collect();

        for &output in &outputs {
            if !solved[output] {
                self.resolve(config, output, &mut solved, &neuron_index, &gene_index);
            }
        }

        Ok(outputs.iter().map(|i| self.neurons[*i].value()).collect())
    }

    fn resolve(
        &mut self,
        config: &Config,
        target: usize,
        solved: &mut [bool],
        neuron_index: &HashMap<usize, usize>,
        gene_index: &HashMap<usize, usize>,
    ) {
        solved[target] = true;
        if self.neurons[target].kind.is_source() {
            return;
        }

        let mut stack = vec![Frame {
            neuron: target,
            next_gene: 0,
            sum: 0.0,
        }];

        while let Some(mut frame) = stack.pop() {
            let next = self.neurons[frame.neuron].in_genes.get(frame.next_gene).copied();
            let Some(innovation) = next else {
                let value = config.activate(frame.sum);
                self.neurons[frame.neuron].set_value(value);
                continue;
            };

            let gene = &self.genes[gene_index[&innovation]];
            if !gene.enabled {
                frame.next_gene += 1;
                stack.push(frame);
                continue;
            }

            let from = neuron_index[&gene.neuron_from];
            if !solved[from] {
                solved[from] = true;
                if !self.neurons[from].kind.is_source() {
                    // come back to this gene once the source is resolved
                    stack.push(frame);
                    stack.push(Frame {
                        neuron: from,
                        next_gene: 0,
                        sum: 0.0,
                    });
                    continue;
                }
            }

            frame.sum += gene.weight * self.neurons[from].value();
            frame.next_gene += 1;
            stack.push(frame);
        }
    }

    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        config: &Config,
        gradient: f64,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) {
        mutator::mutate(config, self, gradient, tracker, rng);
    }

    /// Remove a gene and unhook it from its neurons.
    pub fn remove_gene(&mut self, innovation_number: usize) -> Option<Gene> {
        let idx = self
            .genes
            .iter()
            .position(|g| g.innovation_number == innovation_number)?;
        self.genes[idx].disconnect(&mut self.neurons);
        Some(self.genes.remove(idx))
    }

    /// Remove a hidden neuron together with every gene touching it. Inputs,
    /// outputs and the bias are never removed.
    pub fn remove_neuron(&mut self, innovation_number: usize) -> Option<Neuron> {
        let idx = self
            .neurons
            .iter()
            .position(|n| n.innovation_number == innovation_number)?;
        if self.neurons[idx].kind != NeuronType::Hidden {
            return None;
        }

        let incident: Vec<usize> = self
            .genes
            .iter()
            .filter(|g| g.neuron_from == innovation_number || g.neuron_to == innovation_number)
            .map(|g| g.innovation_number)
            .collect();
        for gene in incident {
            self.remove_gene(gene);
        }

        Some(self.neurons.remove(idx))
    }

    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph genome {\n");
        for neuron in &self.neurons {
            let _ = writeln!(dot, "  n{} [label=\"{:?} {}\"]", neuron.innovation_number, neuron.kind, neuron.innovation_number);
        }
        for gene in self.genes.iter().filter(|g| g.enabled) {
            let _ = writeln!(
                dot,
                "  n{} -> n{} [label=\"{:.2}\"]",
                gene.neuron_from, gene.neuron_to, gene.weight
            );
        }
        dot.push('}');
        dot
    }

    pub fn print_dot(&self) {
        println!("{}", self.to_dot());
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::params::sigmoid;

    fn gene(innovation_number: usize, neuron_from: usize, neuron_to: usize, weight: f64) -> Gene {
        Gene {
            innovation_number,
            neuron_from,
            neuron_to,
            weight,
            enabled: true,
        }
    }

    #[test]
    fn fresh_genome_is_fully_connected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for (inputs, outputs) in [(1, 1), (2, 1), (3, 2), (5, 4)] {
            let mut tracker = InnovationTracker::new(inputs, outputs);
            let genome = Genome::new(inputs, outputs, 1.0, &mut tracker, &mut rng).unwrap();
            assert_eq!(genome.neurons().len(), inputs + outputs + 1);
            assert_eq!(genome.genes().len(), inputs * outputs);
            assert!(genome.genes().iter().all(|g| g.enabled && g.weight.abs() <= 1.0));
            assert_eq!(genome.input_neurons().count(), inputs);
            assert_eq!(genome.output_neurons().count(), outputs);
            assert_eq!(genome.hidden_neurons().count(), 0);
        }
    }

    #[test]
    fn zero_range_gives_zero_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut tracker = InnovationTracker::new(2, 1);
        let genome = Genome::new(2, 1, 0.0, &mut tracker, &mut rng).unwrap();
        assert_eq!(genome.neurons().len(), 4);
        assert_eq!(genome.genes().len(), 2);
        assert!(genome.genes().iter().all(|g| g.weight == 0.0 && g.enabled));
    }

    #[test]
    fn rejects_empty_layers() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut tracker = InnovationTracker::new(0, 1);
        assert!(matches!(
            Genome::new(0, 1, 1.0, &mut tracker, &mut rng),
            Err(NeatError::InvalidTopology { .. })
        ));
        assert!(Genome::from_genes(2, 0, Vec::new()).is_err());
    }

    #[test]
    fn feed_forward_two_inputs() {
        let config = Config::default();
        let mut genome = Genome::from_genes(2, 1, vec![gene(0, 0, 2, 0.5), gene(1, 1, 2, -0.5)]).unwrap();
        let out = genome.feed_forward(&config, &[1.0, 0.0]).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0] - 0.622_459_3).abs() < 1e-6);
    }

    #[test]
    fn feed_forward_rejects_wrong_length() {
        let config = Config::default();
        let mut genome = Genome::from_genes(2, 1, vec![gene(0, 0, 2, 0.5), gene(1, 1, 2, -0.5)]).unwrap();
        let before = genome.feed_forward(&config, &[1.0, 0.0]).unwrap();
        assert!(matches!(
            genome.feed_forward(&config, &[1.0]),
            Err(NeatError::InvalidInput { expected: 2, given: 1 })
        ));
        assert_eq!(genome.feed_forward(&config, &[1.0, 0.0]).unwrap(), before);
    }

    #[test]
    fn feed_forward_uses_bias_and_hidden() {
        let config = Config::default();
        // 0 input, 1 output, 2 bias, 3 hidden
        let mut genome = Genome::from_genes(
            1,
            1,
            vec![gene(0, 0, 3, 2.0), gene(1, 3, 1, -1.0), gene(2, 2, 1, 0.5)],
        )
        .unwrap();
        let out = genome.feed_forward(&config, &[0.25]).unwrap();
        let hidden = sigmoid(0.5);
        assert!((out[0] - sigmoid(-hidden + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn disabled_genes_are_ignored() {
        let config = Config::default();
        let mut disabled = gene(1, 1, 2, 100.0);
        disabled.enabled = false;
        let mut genome = Genome::from_genes(2, 1, vec![gene(0, 0, 2, 0.5), disabled]).unwrap();
        let out = genome.feed_forward(&config, &[1.0, 1.0]).unwrap();
        assert!((out[0] - sigmoid(0.5)).abs() < 1e-12);
    }

    #[test]
    fn recurrent_edge_reads_previous_pass() {
        let config = Config::default();
        let mut genome = Genome::from_genes(1, 1, vec![gene(0, 0, 1, 1.0), gene(1, 1, 1, 1.0)]).unwrap();
        let first = genome.feed_forward(&config, &[0.5]).unwrap()[0];
        assert!((first - sigmoid(0.5)).abs() < 1e-12);
        let second = genome.feed_forward(&config, &[0.5]).unwrap()[0];
        assert!((second - sigmoid(0.5 + first)).abs() < 1e-12);
    }

    #[test]
    fn hidden_cycle_terminates() {
        let config = Config::default();
        // 3 and 4 feed each other
        let mut genome = Genome::from_genes(
            1,
            1,
            vec![
                gene(0, 0, 3, 1.0),
                gene(1, 3, 4, 1.0),
                gene(2, 4, 3, 1.0),
                gene(3, 4, 1, 1.0),
            ],
        )
        .unwrap();
        let out = genome.feed_forward(&config, &[1.0]).unwrap();
        // 4 is entered from 1, then 3 is resolved while 4 still holds 0.0
        let n3 = sigmoid(1.0);
        let n4 = sigmoid(n3);
        assert!((out[0] - sigmoid(n4)).abs() < 1e-12);
    }

    #[test]
    fn rebuild_reproduces_graph() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let config = Config {
            input_count: 3,
            output_count: 2,
            ..Default::default()
        };
        let mut tracker = InnovationTracker::new(3, 2);
        let mut genome = Genome::from_config(&config, &mut tracker, &mut rng).unwrap();
        for _ in 0..20 {
            mutator::add_node_mutation(&mut genome, &mut tracker, &mut rng);
            mutator::add_connection_mutation(&config, &mut genome, &mut tracker, &mut rng);
        }

        let copy = Genome::from_genes(3, 2, genome.genes().to_vec()).unwrap();
        let mut ids: Vec<_> = genome.neurons().iter().map(|n| (n.innovation_number, n.kind)).collect();
        let mut copy_ids: Vec<_> = copy.neurons().iter().map(|n| (n.innovation_number, n.kind)).collect();
        ids.sort_by_key(|x| x.0);
        copy_ids.sort_by_key(|x| x.0);
        assert_eq!(ids, copy_ids);
        for g in genome.genes() {
            let c = copy.gene(g.innovation_number).unwrap();
            assert_eq!((c.neuron_from, c.neuron_to, c.weight, c.enabled), (g.neuron_from, g.neuron_to, g.weight, g.enabled));
        }
        for n in genome.neurons() {
            let c = copy.neuron(n.innovation_number).unwrap();
            let mut a = n.in_genes().to_vec();
            let mut b = c.in_genes().to_vec();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let config = Config::default();
        let mut tracker = InnovationTracker::new(4, 2);
        let genome = Genome::new(4, 2, 1.0, &mut tracker, &mut rng).unwrap();
        assert!(Genome::genetic_distance(&config, &genome, &genome).abs() < 1e-12);

        let empty = Genome::from_genes(4, 2, Vec::new()).unwrap();
        assert_eq!(Genome::genetic_distance(&config, &empty, &empty), 0.0);
    }

    #[test]
    fn distance_counts_disjoint_and_excess() {
        let config = Config::default();
        let g1 = Genome::from_genes(2, 1, vec![gene(0, 0, 2, 0.5), gene(1, 1, 2, 1.0), gene(4, 3, 2, 1.0)]).unwrap();
        let g2 = Genome::from_genes(2, 1, vec![gene(0, 0, 2, 0.5), gene(1, 1, 2, 0.0), gene(2, 1, 4, 1.0)]).unwrap();

        let comparison = GeneComparison::new(&g1, &g2);
        assert_eq!(comparison.matching.len(), 2);
        assert_eq!(comparison.excess.len(), 1);
        assert_eq!(comparison.excess[0].0, Parent::First);
        assert_eq!(comparison.disjoint.len(), 1);
        assert_eq!(comparison.disjoint[0].0, Parent::Second);

        let expected = ((1.0 + 1.0) / 3.0 + 0.5 * 3.0) / 5.0;
        let distance = Genome::genetic_distance(&config, &g1, &g2);
        assert!((distance - expected).abs() < 1e-12);
        assert!((Genome::genetic_distance(&config, &g2, &g1) - expected).abs() < 1e-12);
    }

    #[test]
    fn crossover_takes_structure_from_fittest() {
        let mut g1 = Genome::from_genes(2, 1, vec![gene(0, 0, 2, 0.5), gene(1, 1, 2, 1.0), gene(4, 3, 2, 1.0)]).unwrap();
        let mut g2 = Genome::from_genes(2, 1, vec![gene(0, 0, 2, -0.5), gene(1, 1, 2, 0.0), gene(2, 1, 4, 1.0)]).unwrap();
        g1.fitness = 1.0;
        g2.fitness = 2.0;

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let child = Genome::crossover(&g1, &g2, &mut rng);
            let mut innovations: Vec<_> = child.genes().iter().map(|g| g.innovation_number).collect();
            innovations.sort();
            assert_eq!(innovations, vec![0, 1, 2]);
            // hidden neuron 4 came along with its gene
            assert!(child.has_neuron(4));
            assert!(!child.has_neuron(5));
            let w = child.gene(0).unwrap().weight;
            assert!(w == 0.5 || w == -0.5);
        }

        g1.fitness = 3.0;
        let child = Genome::crossover(&g1, &g2, &mut rng);
        let mut innovations: Vec<_> = child.genes().iter().map(|g| g.innovation_number).collect();
        innovations.sort();
        assert_eq!(innovations, vec![0, 1, 4]);
    }

    #[test]
    fn remove_neuron_cascades() {
        let mut genome = Genome::from_genes(
            1,
            1,
            vec![gene(0, 0, 3, 1.0), gene(1, 3, 1, 1.0), gene(2, 0, 1, 1.0)],
        )
        .unwrap();
        assert!(genome.remove_neuron(0).is_none());
        assert!(genome.remove_neuron(2).is_none());

        let removed = genome.remove_neuron(3).unwrap();
        assert_eq!(removed.kind, NeuronType::Hidden);
        assert_eq!(genome.genes().len(), 1);
        assert_eq!(genome.neuron(0).unwrap().out_genes(), &[2]);
        assert_eq!(genome.neuron(1).unwrap().in_genes(), &[2]);
    }

    #[test]
    fn remove_gene_disconnects() {
        let mut genome = Genome::from_genes(1, 1, vec![gene(0, 0, 1, 1.0)]).unwrap();
        assert!(genome.remove_gene(7).is_none());
        let removed = genome.remove_gene(0).unwrap();
        assert_eq!(removed.innovation_number, 0);
        assert!(genome.genes().is_empty());
        assert!(genome.neurons().iter().all(|n| n.in_genes().is_empty() && n.out_genes().is_empty()));
    }

    #[test]
    fn dot_lists_enabled_genes() {
        let mut disabled = gene(1, 1, 2, 3.0);
        disabled.enabled = false;
        let genome = Genome::from_genes(2, 1, vec![gene(0, 0, 2, 0.5), disabled]).unwrap();
        let dot = genome.to_dot();
        assert!(dot.contains("n0 -> n2 [label=\"0.50\"]"));
        assert!(!dot.contains("n1 -> n2"));
    }
}
