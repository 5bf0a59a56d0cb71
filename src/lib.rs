pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod init;
pub mod io;
pub mod lj_pot;
pub mod particles;
pub mod pbc;
pub mod run_md;

pub use app::{run_simulation, RunSummary};
pub use error::{MdError, Result};
pub use lj_pot::{lj_force, lj_potential, total_potential_energy, ForceProvider, LennardJones};
pub use particles::ParticleSystem;
pub use pbc::{rewrap, SimulationBox};
pub use run_md::{Energies, Integrator, VelocityVerlet};
