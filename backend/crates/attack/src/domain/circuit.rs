//! Circuit Description
//!
//! Abstract gate list handed to a simulation backend, and the policy that
//! builds one per attack attempt.

use crate::domain::value_objects::Key;

/// Gate over qubit lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Hadamard
    H(usize),
    /// Pauli-X (bit flip)
    X(usize),
    /// Controlled NOT
    Cx { control: usize, target: usize },
    /// Ordering marker with no effect on the measured state
    Barrier,
    /// Measure every lane into the classical bit of the same index
    MeasureAll,
}

impl Gate {
    /// Highest lane index the gate touches
    pub fn max_lane(&self) -> Option<usize> {
        match *self {
            Gate::H(q) | Gate::X(q) => Some(q),
            Gate::Cx { control, target } => Some(control.max(target)),
            Gate::Barrier | Gate::MeasureAll => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitDescription {
    num_qubits: usize,
    gates: Vec<Gate>,
}

impl CircuitDescription {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    pub fn push(&mut self, gate: Gate) -> &mut Self {
        self.gates.push(gate);
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

/// Build the circuit for one attempt against `key`
///
/// Every lane starts in equal superposition. Then, lane by lane: a bit flip
/// when the key bit is `0`, a Hadamard, a CNOT onto the next lane (wrapping
/// around), and a second Hadamard. A barrier closes the pass and every lane
/// is measured.
///
/// A single-lane key has no neighbour; the CNOT would target its own control
/// and is left out.
pub fn build_attempt_circuit(key: &Key) -> CircuitDescription {
    let n = key.len();
    let mut circuit = CircuitDescription::new(n);

    for lane in 0..n {
        circuit.push(Gate::H(lane));
    }

    for lane in 0..n {
        if !key.bit(lane) {
            circuit.push(Gate::X(lane));
        }
        circuit.push(Gate::H(lane));
        let target = (lane + 1) % n;
        if target != lane {
            circuit.push(Gate::Cx {
                control: lane,
                target,
            });
        }
        circuit.push(Gate::H(lane));
    }

    circuit.push(Gate::Barrier).push(Gate::MeasureAll);
    circuit
}
