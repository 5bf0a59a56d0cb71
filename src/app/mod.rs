mod report;
mod runner;

pub use report::report_summary;
pub use runner::{run_simulation, RunSummary};

use crate::config::{Args, MdConfig};
use crate::io::{setup_output, write_system_file};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

pub struct MdApplication {
    args: Args,
    config: MdConfig,
}

impl MdApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_deref(), self.args.verbose)
            .wrap_err("Unable to set up logging")?;
        info!("Configuration loaded from {}", self.args.config_file.display());
        info!("{:?}", self.config);

        let (mut system, sim_box) = self
            .config
            .build_initial_system()
            .wrap_err("Failed to build the initial system")?;

        if let Some(path) = &self.args.dump_system {
            write_system_file(path, &system)
                .wrap_err_with(|| format!("Unable to write system file: {}", path.display()))?;
            info!("Initial system written to {}", path.display());
        }

        let summary = run_simulation(&mut system, sim_box, &self.config)
            .wrap_err("Simulation failed")?;
        report_summary(&self.config, &summary);
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<MdConfig> {
    let mut config = MdConfig::from_file(&args.config_file).wrap_err_with(|| {
        format!(
            "Unable to load configuration file: {}",
            args.config_file.display()
        )
    })?;

    config.apply_overrides(args);
    config
        .validate()
        .wrap_err("Invalid parameters after command-line overrides")?;
    Ok(config)
}
