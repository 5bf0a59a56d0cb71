//! Lennard-Jones molecular dynamics command-line interface
//!
//! Reads a YAML run description, integrates the system and writes the
//! trajectory, energy, MSD and RDF files.

use color_eyre::eyre::Result;
use ljmd::app::MdApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    MdApplication::from_cli()?.run()
}
