use super::runner::RunSummary;
use crate::config::MdConfig;
use tracing::info;

pub fn report_summary(config: &MdConfig, summary: &RunSummary) {
    info!("\nMD run of '{}' finished after {} steps.", config.name, summary.steps);

    info!("\nEnergies (reduced units):");
    info!(
        "  Initial: KE = {:.6}  PE = {:.6}  E = {:.6}",
        summary.initial_energy.kinetic, summary.initial_energy.potential, summary.initial_energy.total
    );
    info!(
        "  Final:   KE = {:.6}  PE = {:.6}  E = {:.6}",
        summary.final_energy.kinetic, summary.final_energy.potential, summary.final_energy.total
    );
    info!("  Max relative energy drift: {:.3e}", summary.max_relative_drift);

    info!("\nFinal temperature: {:.4}", summary.final_temperature);
    info!("Final mean-squared displacement: {:.4}", summary.final_msd);

    info!("\nOutput written to {}:", config.output.directory.display());
    if config.output.trajectory {
        info!("  {}", config.output_path("VMD.xyz").display());
    }
    for suffix in ["energy.out", "msd.out", "rdf.out"] {
        info!("  {}", config.output_path(suffix).display());
    }
}
