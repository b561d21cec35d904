//! Serializable form of a genome and helpers to keep it on disk.
//!
//! Only genes are stored; every neuron a gene touches is stored inline with
//! its type, and unpacking recreates whatever neurons the genes need.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{NeatError, Result};
use crate::gene::Gene;
use crate::genome::{layout_kind, Genome};
use crate::innovation::InnovationTracker;
use crate::neuron::NeuronType;
use crate::params::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedNeuron {
    pub innovation_number: usize,
    pub kind: NeuronType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackedGene {
    pub enabled: bool,
    pub weight: f64,
    pub start_neuron: PackedNeuron,
    pub end_neuron: PackedNeuron,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PackedGenome {
    pub genes: Vec<PackedGene>,
}

impl Genome {
    pub fn pack(&self) -> PackedGenome {
        let pack_neuron = |innovation_number: usize| PackedNeuron {
            innovation_number,
            kind: self
                .neuron(innovation_number)
                .map_or_else(|| layout_kind(self.input_count(), self.output_count(), innovation_number), |n| n.kind),
        };

        PackedGenome {
            genes: self
                .genes
                .iter()
                .map(|gene| PackedGene {
                    enabled: gene.enabled,
                    weight: gene.weight,
                    start_neuron: pack_neuron(gene.neuron_from),
                    end_neuron: pack_neuron(gene.neuron_to),
                })
                .collect(),
        }
    }

    /// Rebuild a packed genome for the config's input/output layout. Gene
    /// innovation numbers are looked up in `tracker`, registering unseen
    /// edges.
    pub fn from_packed(config: &Config, packed: &PackedGenome, tracker: &mut InnovationTracker) -> Result<Genome> {
        let (inputs, outputs) = (config.input_count, config.output_count);
        if inputs < 1 || outputs < 1 {
            return Err(NeatError::InvalidTopology { inputs, outputs });
        }

        let mut genes = Vec::with_capacity(packed.genes.len());
        for packed_gene in &packed.genes {
            for neuron in [packed_gene.start_neuron, packed_gene.end_neuron] {
                let expected = layout_kind(inputs, outputs, neuron.innovation_number);
                if neuron.kind != expected {
                    return Err(NeatError::CorruptGenome(format!(
                        "neuron {} is stored as {:?} but a {}x{} layout makes it {:?}",
                        neuron.innovation_number, neuron.kind, inputs, outputs, expected
                    )));
                }
                tracker.observe_neuron(neuron.innovation_number);
            }
            genes.push(Gene::new(
                tracker,
                packed_gene.start_neuron.innovation_number,
                packed_gene.end_neuron.innovation_number,
                packed_gene.weight,
                packed_gene.enabled,
            ));
        }

        Ok(Genome::rebuild(inputs, outputs, genes))
    }
}

/// `<generation>.-Generation-Fitness-<fitness>.genome` inside `dir`.
pub fn save_file_path(dir: impl AsRef<Path>, fitness: f64, generation: usize) -> PathBuf {
    dir.as_ref()
        .join(format!("{}.-Generation-Fitness-{}.genome", generation, fitness))
}

pub fn save_genome(genome: &Genome, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &genome.pack())?;
    debug!("saved genome with {} genes to {}", genome.genes().len(), path.display());
    Ok(())
}

pub fn load_genome(config: &Config, path: impl AsRef<Path>, tracker: &mut InnovationTracker) -> Result<Genome> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let packed: PackedGenome = serde_json::from_reader(reader)?;
    debug!("loaded genome with {} genes from {}", packed.genes.len(), path.display());
    Genome::from_packed(config, &packed, tracker)
}
