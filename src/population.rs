use std::cmp::Ordering;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{NeatError, Result};
use crate::genome::*;
use crate::innovation::InnovationTracker;
use crate::params::*;
use crate::speciation::SpeciesControl;
use crate::species::Species;

pub struct Population {
    config: Config,
    pub genomes: Vec<Genome>,
    generation: usize,
    species_control: SpeciesControl,
    tracker: InnovationTracker,
    rng: ChaCha8Rng,
}

impl Population {
    pub fn new(config: &Config) -> Result<Population> {
        Population::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// A population whose whole run is reproducible from `seed`.
    pub fn with_seed(config: &Config, seed: u64) -> Result<Population> {
        Population::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(config: &Config, rng: ChaCha8Rng) -> Result<Population> {
        config.validate()?;

        let mut pop = Population {
            config: config.clone(),
            genomes: Vec::with_capacity(config.genome_count),
            generation: 0,
            species_control: SpeciesControl::new(),
            tracker: InnovationTracker::new(config.input_count, config.output_count),
            rng,
        };

        pop.populate()?;
        Ok(pop)
    }

    fn populate(&mut self) -> Result<()> {
        self.genomes.clear();
        for _ in 0..self.config.genome_count {
            let genome = Genome::from_config(&self.config, &mut self.tracker, &mut self.rng)?;
            self.genomes.push(genome);
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn species(&self) -> &[Species] {
        self.species_control.species()
    }

    pub fn tracker(&self) -> &InnovationTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut InnovationTracker {
        &mut self.tracker
    }

    /// Evaluate one genome against the population's config.
    pub fn feed_forward(&mut self, genome_idx: usize, inputs: &[f64]) -> Result<Vec<f64>> {
        let len = self.genomes.len();
        let genome = self
            .genomes
            .get_mut(genome_idx)
            .ok_or(NeatError::NoSuchGenome { index: genome_idx, len })?;
        genome.feed_forward(&self.config, inputs)
    }

    /// Hand every genome to `f` together with the config, typically to feed
    /// it and set its fitness.
    pub fn evaluate<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Genome, &Config),
    {
        for genome in self.genomes.iter_mut() {
            f(genome, &self.config);
        }
    }

    pub fn get_winner(&self) -> Option<&Genome> {
        self.genomes
            .iter()
            .max_by(|lhs, rhs| lhs.fitness.total_cmp(&rhs.fitness))
    }

    /// Advance one generation: speciate, cull, then refill the population
    /// from the surviving species. If nothing survives the population starts
    /// over from scratch without counting a generation.
    ///
    /// When reproduction fails the surviving genomes are handed back to
    /// `genomes` (with fitness already shifted to be non-negative) and the
    /// species are cleared, so the population can still be evaluated.
    pub fn evolve(&mut self) -> Result<()> {
        for (index, genome) in self.genomes.iter().enumerate() {
            if !genome.fitness.is_finite() {
                return Err(NeatError::InvalidFitness {
                    index,
                    fitness: genome.fitness,
                });
            }
        }

        let best_fitness = self.get_winner().map_or(0.0, |g| g.fitness);
        self.make_fitness_non_negative();

        let genomes = std::mem::take(&mut self.genomes);
        self.species_control.speciate(&self.config, genomes, &mut self.rng);
        self.do_selection();

        if self.species_control.genome_count() == 0 {
            warn!("no viable genome left in generation {}, repopulating", self.generation);
            self.species_control.clear();
            return self.populate();
        }

        self.reproduce()?;
        self.generation += 1;

        info!(
            "generation = {}, nr_species = {}, pop_size = {}, best_fitness = {}",
            self.generation,
            self.species_control.len(),
            self.genomes.len(),
            best_fitness
        );
        Ok(())
    }

    /// Shift every fitness up by the most negative one.
    fn make_fitness_non_negative(&mut self) {
        let min_fitness = self
            .genomes
            .iter()
            .map(|g| g.fitness)
            .min_by(f64::total_cmp)
            .unwrap_or(0.0);
        if min_fitness >= 0.0 {
            return;
        }

        let shift = min_fitness.abs();
        for genome in self.genomes.iter_mut() {
            genome.fitness += shift;
        }
    }

    /// Drop genomes without a single enabled gene, then species that are
    /// empty, or stagnant without reaching `good_fitness`. When that would
    /// wipe out every species the best one is spared.
    fn do_selection(&mut self) {
        let config = &self.config;
        let species = self.species_control.species_mut();

        for specie in species.iter_mut() {
            specie.genomes.retain(|g| g.active_gene_count() > 0);
            specie.update_max_fitness();
        }

        let mut doomed: Vec<bool> = species
            .iter()
            .map(|s| (s.is_stagnant(config) && s.average_fitness() < config.good_fitness) || s.is_empty())
            .collect();

        if !doomed.is_empty() && doomed.iter().all(|d| *d) {
            if let Some(best) = self.species_control.best_species() {
                doomed[best] = false;
            }
        }

        let species = self.species_control.species_mut();
        let mut doomed_iter = doomed.into_iter();
        species.retain(|s| {
            let kill = doomed_iter.next().unwrap_or(false);
            if kill {
                debug!(
                    "eliminating species {} (stagnant for {} generations, average fitness {})",
                    s.id,
                    s.generations_since_improvement,
                    s.average_fitness()
                );
            }
            !kill
        });
    }

    /// Number of offspring per species. Every species but the best gets
    /// `floor(average / total * population) - 1`; a species ending up with
    /// less than one is dropped. The best species takes whatever is left, so
    /// the shares always add up to the population size.
    fn offspring_shares(&self) -> Result<Vec<usize>> {
        let population_size = self.config.genome_count;
        let species = self.species_control.species();
        let best = self.species_control.best_species().ok_or(NeatError::EmptySpecies)?;
        let total_fitness = self.species_control.total_average_fitness();

        let mut shares = vec![0usize; species.len()];
        if total_fitness > 0.0 {
            for (idx, specie) in species.iter().enumerate() {
                if idx == best {
                    continue;
                }
                let share = (specie.average_fitness() / total_fitness * population_size as f64).floor() - 1.0;
                if share >= 1.0 && share <= population_size as f64 {
                    shares[idx] = share as usize;
                }
            }
        }

        let allocated: usize = shares.iter().sum();
        shares[best] = population_size
            .checked_sub(allocated)
            .ok_or(NeatError::PopulationSizeMismatch {
                expected: population_size,
                produced: allocated,
            })?;
        Ok(shares)
    }

    fn reproduce(&mut self) -> Result<()> {
        match self.create_next_generation() {
            Ok(genomes) => {
                self.genomes = genomes;
                Ok(())
            }
            Err(err) => {
                warn!("reproduction failed in generation {}: {}", self.generation, err);
                self.genomes = self.species_control.take_genomes();
                Err(err)
            }
        }
    }

    fn create_next_generation(&mut self) -> Result<Vec<Genome>> {
        let population_size = self.config.genome_count;
        let shares = self.offspring_shares()?;
        let best = self.species_control.best_species().ok_or(NeatError::EmptySpecies)?;
        debug!("offspring shares: {:?}", shares);

        let mut order: Vec<usize> = (0..shares.len()).filter(|idx| *idx != best).collect();
        order.push(best);

        let mut new_generation = Vec::with_capacity(population_size);
        let species = self.species_control.species_mut();
        for idx in order {
            let children = species[idx].offspring(&self.config, shares[idx], &mut self.tracker, &mut self.rng)?;
            new_generation.extend(children);
        }

        if new_generation.len() != population_size {
            return Err(NeatError::PopulationSizeMismatch {
                expected: population_size,
                produced: new_generation.len(),
            });
        }

        // species without offspring are gone, the rest keep their best
        // genomes to seed the next speciation
        let mut shares_iter = shares.into_iter();
        species.retain(|_| shares_iter.next().unwrap_or(0) > 0);
        for specie in species.iter_mut() {
            let remembered = (specie.len() as f64 * self.config.genomes_to_remember).round() as usize;
            specie.remember_best(remembered.max(self.config.min_genomes_to_keep));
        }

        Ok(new_generation)
    }
}

pub fn full_sorted_outer_join<I, J, F>(
    iter1: I,
    iter2: J,
    mut cmp: F,
) -> Vec<(Option<I::Item>, Option<J::Item>)>
where
    I: Iterator,
    J: Iterator,
    F: FnMut(&I::Item, &J::Item) -> Ordering,
{
    let mut result = Vec::new();

    let mut iter1 = iter1.peekable();
    let mut iter2 = iter2.peekable();

    loop {
        let order = match (iter1.peek(), iter2.peek()) {
            (Some(a), Some(b)) => cmp(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };

        match order {
            Ordering::Less => result.push((iter1.next(), None)),
            Ordering::Greater => result.push((None, iter2.next())),
            Ordering::Equal => result.push((iter1.next(), iter2.next())),
        }
    }

    result
}
