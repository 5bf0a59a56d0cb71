//! Command-line arguments for the MD driver

use clap::Parser;
use std::path::PathBuf;

/// Lennard-Jones molecular dynamics in a periodic box, configured from YAML
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "md.yaml")]
    pub config_file: PathBuf,

    /// Write the log to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the time step
    #[arg(long)]
    pub time_step: Option<f64>,

    /// Override the number of steps
    #[arg(long)]
    pub total_steps: Option<usize>,

    /// Override the cutoff radius
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// Override the velocity seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the directory the trajectory, energy, MSD and RDF files go to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Read the initial system from this file instead of building a lattice
    #[arg(long)]
    pub system_file: Option<PathBuf>,

    /// Write the initial system to this file before integrating
    #[arg(long)]
    pub dump_system: Option<PathBuf>,
}
