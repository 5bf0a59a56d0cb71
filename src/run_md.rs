use crate::error::{MdError, Result};
use crate::lj_pot::ForceProvider;
use crate::particles::ParticleSystem;
use crate::pbc::{rewrap, SimulationBox};
use itertools::izip;
use nalgebra::Vector3;

pub trait Integrator {
    /// Advance the system by one time step
    fn step(&self, system: &mut ParticleSystem);

    /// Kinetic, potential and total energy of the current configuration
    fn energies(&self, system: &ParticleSystem) -> Energies;

    fn total_energy(&self, system: &ParticleSystem) -> f64 {
        self.energies(system).total
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energies {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

/// Velocity-Verlet integration under periodic boundaries.
///
/// Forces are evaluated twice per step and never carried over between calls,
/// so the caller is free to edit positions or velocities between steps.
pub struct VelocityVerlet<F: ForceProvider> {
    provider: F,
    sim_box: SimulationBox,
    dt: f64,
}

impl<F: ForceProvider> VelocityVerlet<F> {
    pub fn new(provider: F, sim_box: SimulationBox, dt: f64) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(MdError::InvalidParameter(format!(
                "time step must be finite and > 0, got {dt}"
            )));
        }
        Ok(VelocityVerlet {
            provider,
            sim_box,
            dt,
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn sim_box(&self) -> &SimulationBox {
        &self.sim_box
    }

    pub fn provider(&self) -> &F {
        &self.provider
    }
}

impl<F: ForceProvider> Integrator for VelocityVerlet<F> {
    fn step(&self, system: &mut ParticleSystem) {
        let force_old = self.provider.compute_forces(system.positions());

        system.leap_pos_2nd(self.dt, &force_old);
        rewrap(system, &self.sim_box);

        let force_new = self.provider.compute_forces(system.positions());
        let force_avg: Vec<Vector3<f64>> = izip!(&force_old, &force_new)
            .map(|(f_old, f_new)| (f_old + f_new) * 0.5)
            .collect();
        system.leap_velocity(self.dt, &force_avg);
    }

    fn energies(&self, system: &ParticleSystem) -> Energies {
        let kinetic = system.kinetic_energy();
        let potential = self.provider.total_potential_energy(system.positions());
        Energies {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }
}
