use crate::error::{MdError, Result};
use crate::particles::ParticleSystem;
use crate::pbc::{distances_from, SimulationBox};
use crate::run_md::Energies;
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Energies recorded at a retained step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySample {
    pub step: usize,
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl EnergySample {
    pub fn new(step: usize, energies: Energies) -> Self {
        Self {
            step,
            kinetic: energies.kinetic,
            potential: energies.potential,
            total: energies.total,
        }
    }
}

/// Mean-squared displacement from the starting configuration.
///
/// Positions are re-wrapped every step, so the tracker keeps its own
/// unwrapped displacement per particle, built from the minimum-image
/// displacement between consecutive updates. Updates must come often enough
/// that no particle moves half a box length in between.
#[derive(Debug, Clone)]
pub struct MeanSquaredDisplacement {
    last_positions: Vec<Vector3<f64>>,
    displacements: Vec<Vector3<f64>>,
}

impl MeanSquaredDisplacement {
    pub fn new(system: &ParticleSystem) -> Self {
        Self {
            last_positions: system.positions().to_vec(),
            displacements: vec![Vector3::zeros(); system.len()],
        }
    }

    pub fn update(&mut self, system: &ParticleSystem, sim_box: &SimulationBox) {
        for ((last, disp), r) in self
            .last_positions
            .iter_mut()
            .zip(self.displacements.iter_mut())
            .zip(system.positions())
        {
            *disp += sim_box.minimum_image(r - *last);
            *last = *r;
        }
    }

    /// Sum of |dr_i|^2 over particles, divided by N.
    pub fn value(&self) -> f64 {
        let n = self.displacements.len();
        if n == 0 {
            return 0.0;
        }
        self.displacements
            .iter()
            .map(|d| d.norm_squared())
            .sum::<f64>()
            / n as f64
    }
}

/// Histogram of pair distances accumulated over many configurations,
/// normalised to the radial distribution function g(r).
#[derive(Debug, Clone)]
pub struct RadialDistribution {
    bin_width: f64,
    counts: Vec<u64>,
    n_samples: usize,
    n_particles: usize,
    density: f64,
}

impl RadialDistribution {
    /// Bins span [0, L_min / 2), the largest radius the minimum image resolves in every direction.
    pub fn new(bins: usize, n_particles: usize, sim_box: &SimulationBox) -> Result<Self> {
        if bins == 0 {
            return Err(MdError::InvalidParameter("rdf needs at least one bin".into()));
        }
        Ok(Self {
            bin_width: 0.5 * sim_box.min_length() / bins as f64,
            counts: vec![0; bins],
            n_samples: 0,
            n_particles,
            density: n_particles as f64 / sim_box.volume(),
        })
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Add the distances from every reference particle to every other particle.
    pub fn sample(&mut self, system: &ParticleSystem, sim_box: &SimulationBox) {
        for k in 0..system.len() {
            for (i, r) in distances_from(system, sim_box, k).into_iter().enumerate() {
                if i == k {
                    continue;
                }
                let bin = (r / self.bin_width) as usize;
                if let Some(count) = self.counts.get_mut(bin) {
                    *count += 1;
                }
            }
        }
        self.n_samples += 1;
    }

    /// (bin centre, g(r), raw count) for every bin.
    pub fn normalized(&self) -> Vec<(f64, f64, u64)> {
        let norm = self.density * self.n_particles as f64 * self.n_samples as f64;
        self.counts
            .iter()
            .enumerate()
            .map(|(b, &count)| {
                let r_lo = b as f64 * self.bin_width;
                let r_hi = r_lo + self.bin_width;
                let shell = 4.0 / 3.0 * PI * (r_hi.powi(3) - r_lo.powi(3));
                let g = if norm > 0.0 {
                    count as f64 / (norm * shell)
                } else {
                    0.0
                };
                (r_lo + 0.5 * self.bin_width, g, count)
            })
            .collect()
    }
}
