//! Input/Output for MD runs
//!
//! System files, per-step record files and logging setup.

mod output;
mod records;
mod system_file;

pub use output::setup_output;
pub use records::{write_energy, write_msd, write_rdf, write_xyz_frame};
pub use system_file::{read_system, read_system_file, write_system, write_system_file};
