use rand::Rng;

use crate::genome::Genome;
use crate::params::Config;
use crate::species::Species;

/// Owns every species of a run and regroups genomes into them each
/// generation.
#[derive(Debug, Default)]
pub struct SpeciesControl {
    species: Vec<Species>,
    next_species_id: usize,
}

impl SpeciesControl {
    pub fn new() -> SpeciesControl {
        SpeciesControl::default()
    }

    fn next_species_id(&mut self) -> usize {
        let ret = self.next_species_id;
        self.next_species_id += 1;
        ret
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub(crate) fn species_mut(&mut self) -> &mut Vec<Species> {
        &mut self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn clear(&mut self) {
        self.species.clear();
    }

    /// Empty every species into one list and forget the species.
    pub(crate) fn take_genomes(&mut self) -> Vec<Genome> {
        self.species
            .drain(..)
            .flat_map(|s| s.genomes.into_iter().chain(s.staging))
            .collect()
    }

    pub fn genome_count(&self) -> usize {
        self.species.iter().map(|s| s.len()).sum()
    }

    pub fn total_average_fitness(&self) -> f64 {
        self.species.iter().map(|s| s.average_fitness()).sum()
    }

    /// Index of the species with the highest average fitness. Ties go to the
    /// older species.
    pub fn best_species(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, species) in self.species.iter().enumerate() {
            let average = species.average_fitness();
            if best.map_or(true, |(_, b)| average > b) {
                best = Some((idx, average));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Put every genome into the first species whose representative is close
    /// enough, founding a new species when none is. Afterwards each species
    /// holds exactly the genomes assigned in this pass and species left
    /// without any are dropped.
    pub fn speciate<R: Rng + ?Sized>(&mut self, config: &Config, genomes: Vec<Genome>, rng: &mut R) {
        for genome in genomes {
            match self.compatible_species(config, &genome, rng) {
                Some(idx) => self.species[idx].staging.push(genome),
                None => {
                    let mut species = Species::new(self.next_species_id());
                    species.staging.push(genome);
                    self.species.push(species);
                }
            }
        }

        for species in self.species.iter_mut() {
            species.genomes = std::mem::take(&mut species.staging);
            species.generation += 1;
        }

        self.species.retain(|s| !s.is_empty());

        for species in self.species.iter_mut() {
            for genome in species.genomes.iter_mut() {
                genome.species_id = Some(species.id);
            }
        }
    }

    fn compatible_species<R: Rng + ?Sized>(
        &self,
        config: &Config,
        genome: &Genome,
        rng: &mut R,
    ) -> Option<usize> {
        let threshold = config.species_compatibility.threshold;
        for (idx, species) in self.species.iter().enumerate() {
            let Some(representative) = species.representative(rng) else {
                continue;
            };
            if Genome::genetic_distance(config, genome, representative) <= threshold {
                return Some(idx);
            }
        }
        None
    }
}
