//! Initial conditions: fcc lattice placement and temperature-scaled random
//! velocities with the centre-of-mass drift removed.

use crate::error::{MdError, Result};
use crate::particles::ParticleSystem;
use crate::pbc::SimulationBox;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Distribution the raw velocity components are drawn from before rescaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityDistribution {
    /// Uniform in [-0.5, 0.5)
    #[default]
    Uniform,
    /// Standard normal, i.e. Maxwell-Boltzmann once rescaled
    MaxwellBoltzmann,
}

/// Four-site basis of the face-centred cubic cell, in units of the cell edge.
const FCC_BASIS: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.5, 0.0, 0.5],
    [0.0, 0.5, 0.5],
];

/// Place `n_atoms` on an fcc lattice filling a cubic box of number density `density`.
///
/// The box edge is (N/rho)^(1/3). If N is not 4n^3 the last cells are left
/// partially occupied.
pub fn fcc_lattice(n_atoms: usize, density: f64) -> Result<(Vec<Vector3<f64>>, SimulationBox)> {
    if n_atoms == 0 {
        return Err(MdError::InvalidParameter("number of atoms must be > 0".into()));
    }
    if !density.is_finite() || density <= 0.0 {
        return Err(MdError::InvalidParameter(format!(
            "density must be finite and > 0, got {density}"
        )));
    }

    let box_length = (n_atoms as f64 / density).powf(1.0 / 3.0);
    let n_cells = cells_per_side(n_atoms);
    if 4 * n_cells.pow(3) != n_atoms {
        warn!(
            "{} atoms will not fill a {}x{}x{} fcc lattice completely",
            n_atoms, n_cells, n_cells, n_cells
        );
    }
    let spacing = box_length / n_cells as f64;

    let mut positions = Vec::with_capacity(n_atoms);
    'fill: for ix in 0..n_cells {
        for iy in 0..n_cells {
            for iz in 0..n_cells {
                let origin = Vector3::new(ix as f64, iy as f64, iz as f64);
                for b in &FCC_BASIS {
                    if positions.len() == n_atoms {
                        break 'fill;
                    }
                    positions.push((origin + Vector3::new(b[0], b[1], b[2])) * spacing);
                }
            }
        }
    }

    info!(
        "{} atoms placed on a face-centred cubic lattice, box edge {:.6}",
        n_atoms, box_length
    );
    Ok((positions, SimulationBox::cubic(box_length)?))
}

/// Smallest n with 4n^3 >= n_atoms.
fn cells_per_side(n_atoms: usize) -> usize {
    let mut n = ((n_atoms - 1) as f64 / 4.0).cbrt() as usize + 1;
    // guard against cbrt landing just under an integer
    while n > 1 && 4 * (n - 1).pow(3) >= n_atoms {
        n -= 1;
    }
    while 4 * n.pow(3) < n_atoms {
        n += 1;
    }
    n
}

/// Random velocities with zero total momentum and m sum |v|^2 = 3 N T.
pub fn initial_velocities<R: Rng>(
    n_atoms: usize,
    temperature: f64,
    mass: f64,
    distribution: VelocityDistribution,
    rng: &mut R,
) -> Result<Vec<Vector3<f64>>> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(MdError::InvalidParameter(format!(
            "temperature must be finite and >= 0, got {temperature}"
        )));
    }
    if !mass.is_finite() || mass <= 0.0 {
        return Err(MdError::InvalidParameter(format!(
            "mass must be finite and > 0, got {mass}"
        )));
    }
    if n_atoms == 0 {
        return Ok(Vec::new());
    }

    let mut velocities: Vec<Vector3<f64>> = (0..n_atoms)
        .map(|_| match distribution {
            VelocityDistribution::Uniform => Vector3::new(
                rng.gen::<f64>() - 0.5,
                rng.gen::<f64>() - 0.5,
                rng.gen::<f64>() - 0.5,
            ),
            VelocityDistribution::MaxwellBoltzmann => Vector3::new(
                StandardNormal.sample(rng),
                StandardNormal.sample(rng),
                StandardNormal.sample(rng),
            ),
        })
        .collect();

    // Remove center-of-mass motion
    let v_cm: Vector3<f64> = velocities.iter().sum::<Vector3<f64>>() / n_atoms as f64;
    for v in &mut velocities {
        *v -= v_cm;
    }

    let vsq: f64 = velocities.iter().map(|v| v.norm_squared()).sum();
    if vsq > 0.0 {
        let scale = (3.0 * n_atoms as f64 * temperature / (mass * vsq)).sqrt();
        for v in &mut velocities {
            *v *= scale;
        }
    }
    Ok(velocities)
}

/// Build a lattice system at the requested density and temperature.
///
/// Particles are labelled `p0`, `p1`, ... A `seed` makes the velocities reproducible.
pub fn build_system(
    name: &str,
    n_atoms: usize,
    density: f64,
    temperature: f64,
    mass: f64,
    distribution: VelocityDistribution,
    seed: Option<u64>,
) -> Result<(ParticleSystem, SimulationBox)> {
    let (positions, sim_box) = fcc_lattice(n_atoms, density)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let velocities = initial_velocities(n_atoms, temperature, mass, distribution, &mut rng)?;
    let labels = (0..n_atoms).map(|i| format!("p{i}")).collect();
    let system = ParticleSystem::new(name, labels, positions, velocities, mass)?;

    let v_cm: Vector3<f64> = system.velocities().iter().sum::<Vector3<f64>>() / n_atoms as f64;
    info!("Temperature = {:.6}", temperature);
    info!(
        "Centre-of-mass velocity = {:.6} {:.6} {:.6}",
        v_cm.x, v_cm.y, v_cm.z
    );
    Ok((system, sim_box))
}
