//! Stabilizer Simulation Backend
//!
//! Attack circuits only use H, X and CNOT, which are Clifford gates, so a
//! stabilizer tableau (Aaronson–Gottesman, "Improved simulation of
//! stabilizer circuits", 2004) is exact and stays polynomial in the number
//! of qubits. A statevector simulator would need 2^29 amplitudes for the
//! largest key.
//!
//! Tableau layout: rows `0..n` are destabilizers, rows `n..2n` stabilizers,
//! row `2n` is scratch space for deterministic measurements. Each row keeps
//! its X and Z bits packed in `u64` words plus one sign bit.

use crate::domain::backend::{BackendError, SimulationBackend};
use crate::domain::circuit::{CircuitDescription, Gate};
use crate::domain::entities::Histogram;
use crate::domain::value_objects::MAX_QUBITS;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tableau-based sampler
#[derive(Debug, Clone)]
pub struct StabilizerBackend {
    max_qubits: usize,
    seed: Option<u64>,
}

impl Default for StabilizerBackend {
    fn default() -> Self {
        Self::new(MAX_QUBITS, None)
    }
}

impl StabilizerBackend {
    /// `seed` makes every run of the same circuit produce the same histogram
    pub fn new(max_qubits: usize, seed: Option<u64>) -> Self {
        Self { max_qubits, seed }
    }

    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }
}

impl SimulationBackend for StabilizerBackend {
    async fn run(
        &self,
        circuit: &CircuitDescription,
        shots: u32,
    ) -> Result<Histogram, BackendError> {
        if shots == 0 {
            return Err(BackendError::InvalidShots);
        }
        if circuit.num_qubits() > self.max_qubits {
            return Err(BackendError::CapacityExceeded {
                requested: circuit.num_qubits(),
                capacity: self.max_qubits,
            });
        }

        let circuit = circuit.clone();
        let seed = self.seed;
        tokio::task::spawn_blocking(move || sample(&circuit, shots, seed))
            .await
            .map_err(|e| BackendError::Worker(e.to_string()))?
    }
}

/// Apply the gates once, then measure a copy of the tableau per shot
fn sample(
    circuit: &CircuitDescription,
    shots: u32,
    seed: Option<u64>,
) -> Result<Histogram, BackendError> {
    let n = circuit.num_qubits();
    let mut tableau = Tableau::new(n);
    let mut measured = false;

    for gate in circuit.gates() {
        if measured {
            return Err(BackendError::Unsupported(format!(
                "{gate:?} after measurement"
            )));
        }
        if let Some(lane) = gate.max_lane() {
            if lane >= n {
                return Err(BackendError::Unsupported(format!(
                    "{gate:?} outside a {n}-qubit register"
                )));
            }
        }
        match *gate {
            Gate::H(q) => tableau.hadamard(q),
            Gate::X(q) => tableau.pauli_x(q),
            Gate::Cx { control, target } if control == target => {
                return Err(BackendError::Unsupported(format!(
                    "CNOT with control and target {control}"
                )));
            }
            Gate::Cx { control, target } => tableau.cnot(control, target),
            Gate::Barrier => {}
            Gate::MeasureAll => measured = true,
        }
    }

    if !measured {
        return Err(BackendError::Unsupported(
            "circuit has no measurement".to_string(),
        ));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut histogram = Histogram::new();
    let mut outcome = vec![false; n];
    for _ in 0..shots {
        let mut shot = tableau.clone();
        for (lane, bit) in outcome.iter_mut().enumerate() {
            *bit = shot.measure(lane, &mut rng);
        }
        // Highest lane leftmost
        let key: String = outcome
            .iter()
            .rev()
            .map(|&bit| if bit { '1' } else { '0' })
            .collect();
        *histogram.entry(key).or_insert(0) += 1;
    }

    Ok(histogram)
}

#[derive(Debug, Clone)]
struct Tableau {
    n: usize,
    words: usize,
    x: Vec<u64>,
    z: Vec<u64>,
    r: Vec<bool>,
}

impl Tableau {
    /// |0...0>: destabilizer i is X_i, stabilizer i is Z_i
    fn new(n: usize) -> Self {
        let words = n.div_ceil(64).max(1);
        let rows = 2 * n + 1;
        let mut tableau = Self {
            n,
            words,
            x: vec![0; rows * words],
            z: vec![0; rows * words],
            r: vec![false; rows],
        };
        for i in 0..n {
            tableau.set_x(i, i, true);
            tableau.set_z(n + i, i, true);
        }
        tableau
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> (usize, u64) {
        (row * self.words + col / 64, 1u64 << (col % 64))
    }

    #[inline]
    fn x_bit(&self, row: usize, col: usize) -> bool {
        let (i, mask) = self.index(row, col);
        self.x[i] & mask != 0
    }

    #[inline]
    fn z_bit(&self, row: usize, col: usize) -> bool {
        let (i, mask) = self.index(row, col);
        self.z[i] & mask != 0
    }

    #[inline]
    fn set_x(&mut self, row: usize, col: usize, value: bool) {
        let (i, mask) = self.index(row, col);
        if value {
            self.x[i] |= mask;
        } else {
            self.x[i] &= !mask;
        }
    }

    #[inline]
    fn set_z(&mut self, row: usize, col: usize, value: bool) {
        let (i, mask) = self.index(row, col);
        if value {
            self.z[i] |= mask;
        } else {
            self.z[i] &= !mask;
        }
    }

    fn hadamard(&mut self, a: usize) {
        for row in 0..2 * self.n {
            let (xa, za) = (self.x_bit(row, a), self.z_bit(row, a));
            self.r[row] ^= xa && za;
            self.set_x(row, a, za);
            self.set_z(row, a, xa);
        }
    }

    /// X anticommutes with every generator carrying a Z component on `a`
    fn pauli_x(&mut self, a: usize) {
        for row in 0..2 * self.n {
            self.r[row] ^= self.z_bit(row, a);
        }
    }

    fn cnot(&mut self, a: usize, b: usize) {
        for row in 0..2 * self.n {
            let (xa, za) = (self.x_bit(row, a), self.z_bit(row, a));
            let (xb, zb) = (self.x_bit(row, b), self.z_bit(row, b));
            self.r[row] ^= xa && zb && (xb == za);
            self.set_x(row, b, xb ^ xa);
            self.set_z(row, a, za ^ zb);
        }
    }

    /// Left-multiply row `h` by row `i`, tracking the phase
    fn rowsum(&mut self, h: usize, i: usize) {
        let mut phase: i32 = 2 * i32::from(self.r[h]) + 2 * i32::from(self.r[i]);
        for col in 0..self.n {
            phase += phase_exponent(
                self.x_bit(i, col),
                self.z_bit(i, col),
                self.x_bit(h, col),
                self.z_bit(h, col),
            );
        }
        self.r[h] = phase.rem_euclid(4) == 2;

        for w in 0..self.words {
            self.x[h * self.words + w] ^= self.x[i * self.words + w];
            self.z[h * self.words + w] ^= self.z[i * self.words + w];
        }
    }

    fn copy_row(&mut self, from: usize, to: usize) {
        for w in 0..self.words {
            self.x[to * self.words + w] = self.x[from * self.words + w];
            self.z[to * self.words + w] = self.z[from * self.words + w];
        }
        self.r[to] = self.r[from];
    }

    fn clear_row(&mut self, row: usize) {
        for w in 0..self.words {
            self.x[row * self.words + w] = 0;
            self.z[row * self.words + w] = 0;
        }
        self.r[row] = false;
    }

    /// Measure lane `a` in the computational basis, collapsing the state
    fn measure<R: Rng>(&mut self, a: usize, rng: &mut R) -> bool {
        let n = self.n;

        // Random outcome: some stabilizer anticommutes with Z_a
        if let Some(p) = (n..2 * n).find(|&row| self.x_bit(row, a)) {
            for row in 0..2 * n {
                if row != p && self.x_bit(row, a) {
                    self.rowsum(row, p);
                }
            }
            self.copy_row(p, p - n);
            self.clear_row(p);
            self.set_z(p, a, true);
            let outcome = rng.random::<bool>();
            self.r[p] = outcome;
            return outcome;
        }

        // Deterministic outcome: accumulate in the scratch row
        let scratch = 2 * n;
        self.clear_row(scratch);
        for row in 0..n {
            if self.x_bit(row, a) {
                self.rowsum(scratch, row + n);
            }
        }
        self.r[scratch]
    }
}

/// Exponent of `i` picked up when multiplying Pauli (x1,z1) by (x2,z2)
fn phase_exponent(x1: bool, z1: bool, x2: bool, z2: bool) -> i32 {
    let (x2, z2) = (i32::from(x2), i32::from(z2));
    match (x1, z1) {
        (false, false) => 0,
        (true, true) => z2 - x2,
        (true, false) => z2 * (2 * x2 - 1),
        (false, true) => x2 * (1 - 2 * z2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::circuit::build_attempt_circuit;
    use crate::domain::services::histogram_total;
    use crate::domain::value_objects::Key;

    fn circuit(n: usize, gates: &[Gate]) -> CircuitDescription {
        let mut circuit = CircuitDescription::new(n);
        for &gate in gates {
            circuit.push(gate);
        }
        circuit
    }

    #[tokio::test]
    async fn test_ground_state_is_deterministic() {
        let backend = StabilizerBackend::new(MAX_QUBITS, Some(1));
        let histogram = backend
            .run(&circuit(3, &[Gate::MeasureAll]), 100)
            .await
            .unwrap();
        assert_eq!(histogram, Histogram::from([("000".to_string(), 100)]));
    }

    #[tokio::test]
    async fn test_bit_flip_on_lane_zero_is_rightmost() {
        let backend = StabilizerBackend::new(MAX_QUBITS, Some(1));
        let histogram = backend
            .run(&circuit(3, &[Gate::X(0), Gate::MeasureAll]), 10)
            .await
            .unwrap();
        assert_eq!(histogram, Histogram::from([("001".to_string(), 10)]));
    }

    #[tokio::test]
    async fn test_hadamard_twice_is_identity() {
        let backend = StabilizerBackend::new(MAX_QUBITS, Some(1));
        let histogram = backend
            .run(
                &circuit(1, &[Gate::H(0), Gate::H(0), Gate::MeasureAll]),
                50,
            )
            .await
            .unwrap();
        assert_eq!(histogram, Histogram::from([("0".to_string(), 50)]));
    }

    #[tokio::test]
    async fn test_bell_pair_is_correlated() {
        let backend = StabilizerBackend::new(MAX_QUBITS, Some(7));
        let bell = circuit(
            2,
            &[
                Gate::H(0),
                Gate::Cx {
                    control: 0,
                    target: 1,
                },
                Gate::MeasureAll,
            ],
        );
        let histogram = backend.run(&bell, 1024).await.unwrap();

        assert_eq!(histogram_total(&histogram), 1024);
        assert!(histogram.keys().all(|k| k == "00" || k == "11"));
        // Both outcomes show up with a fair coin over 1024 shots
        assert_eq!(histogram.len(), 2);
    }

    #[tokio::test]
    async fn test_ghz_state_on_many_qubits() {
        let backend = StabilizerBackend::new(MAX_QUBITS, Some(3));
        let mut gates = vec![Gate::H(0)];
        for q in 0..28 {
            gates.push(Gate::Cx {
                control: q,
                target: q + 1,
            });
        }
        gates.push(Gate::MeasureAll);

        let histogram = backend.run(&circuit(29, &gates), 64).await.unwrap();
        assert_eq!(histogram_total(&histogram), 64);
        assert!(
            histogram
                .keys()
                .all(|k| k == &"0".repeat(29) || k == &"1".repeat(29))
        );
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let backend = StabilizerBackend::new(MAX_QUBITS, Some(42));
        let key = Key::parse("1010").unwrap();
        let attack = build_attempt_circuit(&key);

        let first = backend.run(&attack, 1024).await.unwrap();
        let second = backend.run(&attack, 1024).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(histogram_total(&first), 1024);
        assert!(first.keys().all(|k| k.len() == 4));
    }

    #[tokio::test]
    async fn test_rejects_invalid_requests() {
        let backend = StabilizerBackend::new(4, None);

        assert_eq!(
            backend.run(&circuit(2, &[Gate::MeasureAll]), 0).await,
            Err(BackendError::InvalidShots)
        );
        assert_eq!(
            backend.run(&circuit(5, &[Gate::MeasureAll]), 1).await,
            Err(BackendError::CapacityExceeded {
                requested: 5,
                capacity: 4
            })
        );
        assert!(matches!(
            backend.run(&circuit(2, &[Gate::H(0)]), 1).await,
            Err(BackendError::Unsupported(_))
        ));
        assert!(matches!(
            backend
                .run(&circuit(2, &[Gate::H(2), Gate::MeasureAll]), 1)
                .await,
            Err(BackendError::Unsupported(_))
        ));
        assert!(matches!(
            backend
                .run(&circuit(2, &[Gate::MeasureAll, Gate::H(0)]), 1)
                .await,
            Err(BackendError::Unsupported(_))
        ));
    }
}
