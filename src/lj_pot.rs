use crate::error::{MdError, Result};
use crate::particles::ParticleSystem;
use crate::pbc::SimulationBox;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Source of per-particle forces and potential energies for a configuration.
pub trait ForceProvider {
    fn compute_forces(&self, positions: &[Vector3<f64>]) -> Vec<Vector3<f64>>;

    /// Potential energy attributed to each particle, summed over all its neighbours.
    fn compute_potentials(&self, positions: &[Vector3<f64>]) -> Vec<f64>;

    /// Every pair shows up once in each partner's entry, hence the halving.
    fn total_potential_energy(&self, positions: &[Vector3<f64>]) -> f64 {
        0.5 * self.compute_potentials(positions).iter().sum::<f64>()
    }
}

/// Truncated Lennard-Jones interaction in reduced units (epsilon = sigma = 1)
/// under periodic boundaries.
///
/// Pairs at or beyond `cutoff` contribute nothing; no shift is applied, so
/// the potential jumps at the cutoff.
#[derive(Debug, Clone)]
pub struct LennardJones {
    pub cutoff: f64,
    pub sim_box: SimulationBox,
}

impl LennardJones {
    pub fn new(cutoff: f64, sim_box: SimulationBox) -> Result<Self> {
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(MdError::InvalidParameter(format!(
                "cutoff radius must be finite and > 0, got {cutoff}"
            )));
        }
        Ok(LennardJones { cutoff, sim_box })
    }

    /// 4 (r^-12 - r^-6) inside the cutoff, zero outside.
    #[inline]
    pub fn pair_potential(&self, r: f64) -> f64 {
        if r >= self.cutoff {
            return 0.0;
        }
        let inv_r2 = 1.0 / (r * r);
        let inv_r6 = inv_r2 * inv_r2 * inv_r2;
        4.0 * (inv_r6 * inv_r6 - inv_r6)
    }

    /// Force on i from j given the minimum-image vector `rij = r_i - r_j` and its length.
    #[inline]
    pub fn pair_force(&self, rij: &Vector3<f64>, r: f64) -> Vector3<f64> {
        if r >= self.cutoff {
            return Vector3::zeros();
        }
        let inv_r2 = 1.0 / (r * r);
        let inv_r6 = inv_r2 * inv_r2 * inv_r2;
        // 48 (r^-14 - 0.5 r^-8)
        let f_mag = 48.0 * inv_r6 * (inv_r6 - 0.5) * inv_r2;
        rij * f_mag
    }

    fn force_on(&self, i: usize, positions: &[Vector3<f64>]) -> Vector3<f64> {
        let r_i = positions[i];
        let mut force = Vector3::zeros();
        for (j, r_j) in positions.iter().enumerate() {
            if j == i {
                continue;
            }
            let (rij, r) = self.sim_box.separation(&r_i, r_j);
            force += self.pair_force(&rij, r);
        }
        force
    }

    fn potential_of(&self, i: usize, positions: &[Vector3<f64>]) -> f64 {
        let r_i = positions[i];
        positions
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, r_j)| self.pair_potential(self.sim_box.separation(&r_i, r_j).1))
            .sum()
    }
}

impl ForceProvider for LennardJones {
    fn compute_forces(&self, positions: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        (0..positions.len())
            .into_par_iter()
            .map(|i| self.force_on(i, positions))
            .collect()
    }

    fn compute_potentials(&self, positions: &[Vector3<f64>]) -> Vec<f64> {
        (0..positions.len())
            .into_par_iter()
            .map(|i| self.potential_of(i, positions))
            .collect()
    }
}

/// Lennard-Jones force on every particle of `system`.
pub fn lj_force(
    system: &ParticleSystem,
    sim_box: &SimulationBox,
    cutoff: f64,
) -> Result<Vec<Vector3<f64>>> {
    let lj = LennardJones::new(cutoff, *sim_box)?;
    Ok(lj.compute_forces(system.positions()))
}

/// Lennard-Jones potential energy of every particle of `system`.
pub fn lj_potential(system: &ParticleSystem, sim_box: &SimulationBox, cutoff: f64) -> Result<Vec<f64>> {
    let lj = LennardJones::new(cutoff, *sim_box)?;
    Ok(lj.compute_potentials(system.positions()))
}

/// Total Lennard-Jones potential energy, each pair counted once.
pub fn total_potential_energy(
    system: &ParticleSystem,
    sim_box: &SimulationBox,
    cutoff: f64,
) -> Result<f64> {
    let lj = LennardJones::new(cutoff, *sim_box)?;
    Ok(lj.total_potential_energy(system.positions()))
}
