//! Run configuration
//!
//! A YAML file describes the system, the integration and the output files;
//! command-line flags can override individual values.

mod args;

pub use args::Args;

use crate::error::{MdError, Result};
use crate::init::{build_system, VelocityDistribution};
use crate::io::read_system_file;
use crate::particles::ParticleSystem;
use crate::pbc::SimulationBox;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for a molecular dynamics run
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MdConfig {
    /// System name, also the prefix of every output file
    pub name: String,
    pub system: SystemConfig,
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Initial condition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Lattice size; ignored when `input` supplies the particles
    #[serde(default)]
    pub n_particles: usize,
    /// Number density; fixes the cubic box edge (N / density)^(1/3)
    pub density: f64,
    /// Target temperature of the initial velocities (k_B = 1)
    pub temperature: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    #[serde(default)]
    pub velocities: VelocityDistribution,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Explicit system file; replaces lattice placement and random velocities
    #[serde(default)]
    pub input: Option<PathBuf>,
}

/// Integration parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimulationConfig {
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    pub total_steps: usize,
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
}

/// Output files
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Steps between retained samples; derived from the run length when absent
    #[serde(default)]
    pub sample_interval: Option<usize>,
    #[serde(default = "default_true")]
    pub trajectory: bool,
    #[serde(default = "default_rdf_bins")]
    pub rdf_bins: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: default_directory(),
            sample_interval: None,
            trajectory: true,
            rdf_bins: default_rdf_bins(),
        }
    }
}

fn default_mass() -> f64 {
    1.0
}
fn default_time_step() -> f64 {
    0.01
}
fn default_cutoff() -> f64 {
    3.0
}
fn default_directory() -> PathBuf {
    PathBuf::from(".")
}
fn default_true() -> bool {
    true
}
fn default_rdf_bins() -> usize {
    100
}

impl MdConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: MdConfig = serde_yml::from_str(content)?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(dt) = args.time_step {
            self.simulation.time_step = dt;
        }
        if let Some(steps) = args.total_steps {
            self.simulation.total_steps = steps;
        }
        if let Some(cutoff) = args.cutoff {
            self.simulation.cutoff = cutoff;
        }
        if let Some(seed) = args.seed {
            self.system.seed = Some(seed);
        }
        if let Some(dir) = &args.output_dir {
            self.output.directory = dir.clone();
        }
        if let Some(path) = &args.system_file {
            self.system.input = Some(path.clone());
        }
    }

    /// Check run parameters
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(MdError::InvalidParameter(msg.to_string()));

        if self.name.trim().is_empty() || self.name.contains(char::is_whitespace) {
            return invalid("system name must be a single non-empty word");
        }
        if self.system.input.is_none() && self.system.n_particles == 0 {
            return invalid("number of particles must be positive");
        }
        if !(self.system.density > 0.0 && self.system.density.is_finite()) {
            return invalid("density must be positive");
        }
        if !(self.system.temperature >= 0.0 && self.system.temperature.is_finite()) {
            return invalid("temperature must be non-negative");
        }
        if !(self.system.mass > 0.0 && self.system.mass.is_finite()) {
            return invalid("mass must be positive");
        }
        if !(self.simulation.time_step > 0.0 && self.simulation.time_step.is_finite()) {
            return invalid("time step must be positive");
        }
        if self.simulation.total_steps == 0 {
            return invalid("total steps must be positive");
        }
        if !(self.simulation.cutoff > 0.0 && self.simulation.cutoff.is_finite()) {
            return invalid("cutoff radius must be positive");
        }
        if self.output.sample_interval == Some(0) {
            return invalid("sample interval must be positive");
        }
        if self.output.rdf_bins == 0 {
            return invalid("rdf bins must be positive");
        }
        Ok(())
    }

    /// Every step for short runs, every 4th step beyond 1000 steps, unless set explicitly.
    pub fn sample_interval(&self) -> usize {
        match self.output.sample_interval {
            Some(interval) => interval,
            None if self.simulation.total_steps <= 1000 => 1,
            None => 4,
        }
    }

    /// Output file `{name}{suffix}` inside the output directory.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        self.output.directory.join(format!("{}{}", self.name, suffix))
    }

    /// Build the starting system and its box.
    ///
    /// With an `input` file the particles come from the file and the box edge
    /// from the file's particle count and the configured density; otherwise
    /// particles sit on an fcc lattice with random velocities.
    pub fn build_initial_system(&self) -> Result<(ParticleSystem, SimulationBox)> {
        match &self.system.input {
            Some(path) => {
                info!("Reading initial system from {}", path.display());
                let system = read_system_file(path)?;
                let edge = (system.len() as f64 / self.system.density).powf(1.0 / 3.0);
                let sim_box = SimulationBox::cubic(edge)?;
                info!("{} particles read, box edge {:.6}", system.len(), edge);
                Ok((system, sim_box))
            }
            None => build_system(
                &self.name,
                self.system.n_particles,
                self.system.density,
                self.system.temperature,
                self.system.mass,
                self.system.velocities,
                self.system.seed,
            ),
        }
    }
}
