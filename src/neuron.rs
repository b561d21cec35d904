use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeuronType {
    Bias,
    Input,
    Output,
    Hidden,
}

impl NeuronType {
    /// Inputs and the bias never need to be computed.
    pub fn is_source(&self) -> bool {
        matches!(self, NeuronType::Input | NeuronType::Bias)
    }
}

#[derive(Clone, Debug)]
pub struct Neuron {
    pub innovation_number: usize,
    pub kind: NeuronType,
    value: f64,
    // innovation numbers of the genes entering / leaving this neuron
    pub(crate) in_genes: Vec<usize>,
    pub(crate) out_genes: Vec<usize>,
}

impl Neuron {
    pub fn new(innovation_number: usize, kind: NeuronType) -> Neuron {
        Neuron {
            innovation_number,
            kind,
            value: 0.0,
            in_genes: Vec::new(),
            out_genes: Vec::new(),
        }
    }

    /// The bias always reports 1.0.
    pub fn value(&self) -> f64 {
        if self.kind == NeuronType::Bias {
            1.0
        } else {
            self.value
        }
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn in_genes(&self) -> &[usize] {
        &self.in_genes
    }

    pub fn out_genes(&self) -> &[usize] {
        &self.out_genes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_is_always_one() {
        let mut bias = Neuron::new(3, NeuronType::Bias);
        assert_eq!(bias.value(), 1.0);
        bias.set_value(-4.0);
        assert_eq!(bias.value(), 1.0);
    }

    #[test]
    fn starts_at_zero() {
        let mut hidden = Neuron::new(5, NeuronType::Hidden);
        assert_eq!(hidden.value(), 0.0);
        hidden.set_value(0.25);
        assert_eq!(hidden.value(), 0.25);
        assert!(hidden.in_genes().is_empty() && hidden.out_genes().is_empty());
    }
}
