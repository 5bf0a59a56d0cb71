use crate::error::{MdError, Result};
use crate::particles::ParticleSystem;
use nalgebra::Vector3;

/// Orthorhombic periodic simulation cell with edge lengths fixed for the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBox {
    lengths: Vector3<f64>,
}

impl SimulationBox {
    /// Errors with `MdError::InvalidParameter` unless every edge is finite and > 0.
    pub fn new(lengths: Vector3<f64>) -> Result<Self> {
        if lengths.iter().any(|&l| !l.is_finite() || l <= 0.0) {
            return Err(MdError::InvalidParameter(format!(
                "box edges must be finite and > 0, got [{}, {}, {}]",
                lengths.x, lengths.y, lengths.z
            )));
        }
        Ok(Self { lengths })
    }

    pub fn cubic(length: f64) -> Result<Self> {
        Self::new(Vector3::new(length, length, length))
    }

    pub fn lengths(&self) -> Vector3<f64> {
        self.lengths
    }

    pub fn volume(&self) -> f64 {
        self.lengths.x * self.lengths.y * self.lengths.z
    }

    /// Shortest edge of the cell.
    pub fn min_length(&self) -> f64 {
        self.lengths.min()
    }

    /// Apply the minimum-image convention to a raw displacement.
    ///
    /// Each component ends up in [-L/2, L/2]. `f64::round` rounds half away from
    /// zero, so an exact +L/2 component comes out as -L/2 and vice versa.
    #[inline]
    pub fn minimum_image(&self, mut d: Vector3<f64>) -> Vector3<f64> {
        for k in 0..3 {
            let l = self.lengths[k];
            d[k] -= l * (d[k] / l).round();
        }
        d
    }

    /// Minimum-image separation vector `r_i - r_j` and its length.
    #[inline]
    pub fn separation(&self, r_i: &Vector3<f64>, r_j: &Vector3<f64>) -> (Vector3<f64>, f64) {
        let d = self.minimum_image(r_i - r_j);
        let r = d.norm();
        (d, r)
    }

    /// Fold a position into [0, L) along every axis, however far outside the cell it is.
    #[inline]
    pub fn wrap(&self, mut r: Vector3<f64>) -> Vector3<f64> {
        for k in 0..3 {
            let l = self.lengths[k];
            let w = r[k].rem_euclid(l);
            // rem_euclid can round up to exactly l for tiny negative inputs
            r[k] = if w >= l { 0.0 } else { w };
        }
        r
    }
}

/// Fold every particle position back into the primary cell.
pub fn rewrap(system: &mut ParticleSystem, sim_box: &SimulationBox) {
    for r in system.positions_mut() {
        *r = sim_box.wrap(*r);
    }
}

/// Minimum-image distances from particle `k` to every particle (entry `k` is zero).
pub fn distances_from(system: &ParticleSystem, sim_box: &SimulationBox, k: usize) -> Vec<f64> {
    let positions = system.positions();
    let reference = positions[k];
    positions
        .iter()
        .map(|r| sim_box.separation(&reference, r).1)
        .collect()
}
