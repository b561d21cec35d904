use rand::Rng;

use crate::error::{NeatError, Result};
use crate::genome::Genome;
use crate::innovation::InnovationTracker;
use crate::params::Config;

/// Mutation intensity for offspring that are copies of a single parent.
pub const SOFT_COPY_GRADIENT: f64 = 0.8;

#[derive(Debug)]
pub struct Species {
    pub id: usize,
    pub(crate) genomes: Vec<Genome>,
    // genomes assigned during the running speciation
    pub(crate) staging: Vec<Genome>,
    pub max_fitness_seen: f64,
    pub generations_since_improvement: usize,
    pub generation: usize,
}

impl Species {
    pub fn new(id: usize) -> Species {
        Species {
            id,
            genomes: Vec::new(),
            staging: Vec::new(),
            max_fitness_seen: f64::NEG_INFINITY,
            generations_since_improvement: 0,
            generation: 0,
        }
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn staging(&self) -> &[Genome] {
        &self.staging
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// A random current genome, or a random staged one while the species
    /// has just been founded.
    pub fn representative<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Genome> {
        let pool = if self.genomes.is_empty() {
            &self.staging
        } else {
            &self.genomes
        };
        if pool.is_empty() {
            return None;
        }
        Some(&pool[rng.gen_range(0..pool.len())])
    }

    pub fn average_fitness(&self) -> f64 {
        if self.genomes.is_empty() {
            return 0.0;
        }
        self.genomes.iter().map(|g| g.fitness).sum::<f64>() / self.genomes.len() as f64
    }

    pub fn current_max_fitness(&self) -> f64 {
        self.genomes
            .iter()
            .map(|g| g.fitness)
            .max_by(f64::total_cmp)
            .unwrap_or(0.0)
    }

    pub fn update_max_fitness(&mut self) {
        let current = self.current_max_fitness();
        if current > self.max_fitness_seen {
            self.max_fitness_seen = current;
            self.generations_since_improvement = 0;
        } else {
            self.generations_since_improvement += 1;
        }
    }

    pub fn is_stagnant(&self, config: &Config) -> bool {
        self.generations_since_improvement >= config.max_stagnation
    }

    fn sort_by_fitness(&mut self) {
        self.genomes.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    /// Produce exactly `n` genomes for the next generation: an untouched
    /// copy of the fittest genome, then lightly mutated copies, then
    /// crossovers of two distinct parents. Copies pick their parent strictly
    /// by fitness; crossover parents use `weighted_random_gradient`.
    pub fn offspring<R: Rng + ?Sized>(
        &mut self,
        config: &Config,
        n: usize,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<Vec<Genome>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        if self.genomes.is_empty() {
            return Err(NeatError::EmptySpecies);
        }

        self.sort_by_fitness();
        let ranked: Vec<(usize, f64)> = self
            .genomes
            .iter()
            .enumerate()
            .map(|(i, g)| (i, g.fitness))
            .collect();
        let gradient = config.weighted_random_gradient;
        let soft_copies = config.part_of_genomes_to_copy * n as f64;

        let mut result = Vec::with_capacity(n);
        result.push(self.genomes[0].clone());

        for i in 1..n {
            let mut child = if i as f64 <= soft_copies || self.genomes.len() == 1 {
                let parent = fitness_weighted_random_choice(&ranked, 1.0, rng)
                    .ok_or(NeatError::EmptySpecies)?;
                let mut child = self.genomes[parent].clone();
                child.mutate(config, SOFT_COPY_GRADIENT, tracker, rng);
                child
            } else {
                let parent1 = fitness_weighted_random_choice(&ranked, gradient, rng)
                    .ok_or(NeatError::EmptySpecies)?;
                let others: Vec<(usize, f64)> =
                    ranked.iter().filter(|(member, _)| *member != parent1).copied().collect();
                let parent2 = fitness_weighted_random_choice(&others, gradient, rng)
                    .ok_or(NeatError::EmptySpecies)?;
                let mut child = Genome::crossover(&self.genomes[parent1], &self.genomes[parent2], rng);
                child.mutate(config, 1.0, tracker, rng);
                child
            };
            child.fitness = 0.0;
            child.species_id = Some(self.id);
            result.push(child);
        }

        debug_assert_eq!(result.len(), n);
        Ok(result)
    }

    /// Keep only the best `n` genomes as representatives for the next
    /// speciation.
    pub fn remember_best(&mut self, n: usize) {
        self.sort_by_fitness();
        self.genomes.truncate(n);
    }
}

/// Roulette wheel over `(member, fitness)` pairs. Each slot is the fitness
/// interpolated from the average towards the member's own fitness by
/// `gradient`: 0.0 picks uniformly, 1.0 proportionally to fitness.
/// Fitness must not be negative.
pub fn fitness_weighted_random_choice<R: Rng + ?Sized>(
    candidates: &[(usize, f64)],
    gradient: f64,
    rng: &mut R,
) -> Option<usize> {
    let (last, _) = *candidates.last()?;
    let total_fitness: f64 = candidates.iter().map(|c| c.1).sum();
    let average_fitness = total_fitness / candidates.len() as f64;
    let mut target = rng.gen::<f64>() * total_fitness.max(0.0);

    for &(member, fitness) in candidates {
        let slot = average_fitness + (fitness - average_fitness) * gradient;
        if target <= slot {
            return Some(member);
        }
        target -= slot;
    }

    // rounding drift ran past the end of the wheel
    Some(last)
}
