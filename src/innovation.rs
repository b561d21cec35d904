use std::collections::HashMap;

/// Historical markings shared by every genome of an evolutionary run.
///
/// A structural edge `(start, end)` gets a number the first time it shows up
/// anywhere and keeps it for the rest of the run. Splitting a gene likewise
/// always yields the same hidden neuron id, so two genomes that split the
/// same connection end up with matching genes.
#[derive(Debug, Clone)]
pub struct InnovationTracker {
    next_gene: usize,
    genes: HashMap<(usize, usize), usize>,
    next_neuron: usize,
    // gene innovation number -> hidden neuron id
    splits: HashMap<usize, usize>,
}

impl InnovationTracker {
    pub fn new(input_count: usize, output_count: usize) -> InnovationTracker {
        InnovationTracker {
            next_gene: 0,
            genes: HashMap::new(),
            // inputs, outputs and the bias take the first ids
            next_neuron: input_count + output_count + 1,
            splits: HashMap::new(),
        }
    }

    pub fn gene_innovation(&mut self, start: usize, end: usize) -> usize {
        if let Some(cached) = self.genes.get(&(start, end)) {
            return *cached;
        }

        let ret = self.next_gene;
        self.next_gene += 1;
        self.genes.insert((start, end), ret);
        ret
    }

    pub fn split_neuron(&mut self, gene_innovation: usize) -> usize {
        if let Some(cached) = self.splits.get(&gene_innovation) {
            return *cached;
        }

        let ret = self.fresh_neuron();
        self.splits.insert(gene_innovation, ret);
        ret
    }

    pub fn fresh_neuron(&mut self) -> usize {
        let ret = self.next_neuron;
        self.next_neuron += 1;
        ret
    }

    /// Make sure ids handed out later never collide with `neuron`.
    pub fn observe_neuron(&mut self, neuron: usize) {
        if neuron >= self.next_neuron {
            self.next_neuron = neuron + 1;
        }
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn neuron_count(&self) -> usize {
        self.next_neuron
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_edge_same_number() {
        let mut tracker = InnovationTracker::new(2, 1);
        let a = tracker.gene_innovation(0, 2);
        let b = tracker.gene_innovation(1, 2);
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(tracker.gene_innovation(0, 2), a);
        assert_eq!(tracker.gene_count(), 2);
    }

    #[test]
    fn direction_matters() {
        let mut tracker = InnovationTracker::new(2, 1);
        assert_ne!(tracker.gene_innovation(3, 4), tracker.gene_innovation(4, 3));
    }

    #[test]
    fn hidden_ids_start_after_bias() {
        let mut tracker = InnovationTracker::new(2, 1);
        assert_eq!(tracker.split_neuron(7), 4);
        assert_eq!(tracker.split_neuron(7), 4);
        assert_eq!(tracker.split_neuron(8), 5);
        assert_eq!(tracker.fresh_neuron(), 6);
    }

    #[test]
    fn observed_neurons_are_skipped() {
        let mut tracker = InnovationTracker::new(1, 1);
        tracker.observe_neuron(10);
        assert_eq!(tracker.fresh_neuron(), 11);
        tracker.observe_neuron(5);
        assert_eq!(tracker.neuron_count(), 12);
    }
}
