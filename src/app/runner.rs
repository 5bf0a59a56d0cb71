use crate::analysis::{EnergySample, MeanSquaredDisplacement, RadialDistribution};
use crate::config::MdConfig;
use crate::error::Result;
use crate::io::{write_energy, write_msd, write_rdf, write_xyz_frame};
use crate::lj_pot::LennardJones;
use crate::particles::ParticleSystem;
use crate::pbc::SimulationBox;
use crate::run_md::{Energies, Integrator, VelocityVerlet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub initial_energy: Energies,
    pub final_energy: Energies,
    /// Largest |E(t) - E(0)| / |E(0)| seen at a retained step
    pub max_relative_drift: f64,
    pub final_temperature: f64,
    pub final_msd: f64,
}

/// Per-run output files, one writer each
struct Recorder {
    trajectory: Option<BufWriter<File>>,
    energy: BufWriter<File>,
    msd: BufWriter<File>,
    frames: usize,
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    debug!("Writing {}", path.display());
    Ok(BufWriter::new(File::create(path)?))
}

impl Recorder {
    fn open(config: &MdConfig) -> Result<Self> {
        fs::create_dir_all(&config.output.directory)?;
        let trajectory = if config.output.trajectory {
            Some(create(&config.output_path("VMD.xyz"))?)
        } else {
            None
        };
        Ok(Recorder {
            trajectory,
            energy: create(&config.output_path("energy.out"))?,
            msd: create(&config.output_path("msd.out"))?,
            frames: 0,
        })
    }

    fn record(&mut self, step: usize, system: &ParticleSystem, energies: Energies, msd: f64) -> Result<()> {
        if let Some(w) = self.trajectory.as_mut() {
            write_xyz_frame(w, system, self.frames)?;
            self.frames += 1;
        }
        write_energy(&mut self.energy, &EnergySample::new(step, energies))?;
        write_msd(&mut self.msd, step, msd)?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        if let Some(w) = self.trajectory.as_mut() {
            w.flush()?;
        }
        self.energy.flush()?;
        self.msd.flush()?;
        Ok(())
    }
}

fn relative_drift(reference: f64, current: f64) -> f64 {
    let diff = (current - reference).abs();
    if reference.abs() > f64::EPSILON {
        diff / reference.abs()
    } else {
        diff
    }
}

/// Integrate `system` for the configured number of steps, writing the
/// trajectory, energy, MSD and RDF files as it goes.
///
/// The MSD tracker is updated every step so boundary crossings are followed;
/// files and the RDF histogram only see retained steps (step 0, every
/// `sample_interval` steps, and the last step).
pub fn run_simulation(
    system: &mut ParticleSystem,
    sim_box: SimulationBox,
    config: &MdConfig,
) -> Result<RunSummary> {
    let params = &config.simulation;
    let potential = LennardJones::new(params.cutoff, sim_box)?;
    let integrator = VelocityVerlet::new(potential, sim_box, params.time_step)?;
    let interval = config.sample_interval();

    let mut recorder = Recorder::open(config)?;
    let mut rdf = RadialDistribution::new(config.output.rdf_bins, system.len(), &sim_box)?;
    let mut msd = MeanSquaredDisplacement::new(system);

    info!(
        "Running {} steps of dt = {} with cutoff {} ({} particles, box {:.4})",
        params.total_steps,
        params.time_step,
        params.cutoff,
        system.len(),
        sim_box.min_length()
    );
    info!("Retaining every {} step(s)", interval);

    let initial_energy = integrator.energies(system);
    recorder.record(0, system, initial_energy, 0.0)?;
    rdf.sample(system, &sim_box);

    let progress_every = (params.total_steps / 20).max(1);
    let mut final_energy = initial_energy;
    let mut max_relative_drift = 0.0f64;

    for step in 1..=params.total_steps {
        integrator.step(system);
        msd.update(system, &sim_box);

        if step % interval == 0 || step == params.total_steps {
            let energies = integrator.energies(system);
            max_relative_drift = max_relative_drift.max(relative_drift(initial_energy.total, energies.total));
            recorder.record(step, system, energies, msd.value())?;
            rdf.sample(system, &sim_box);
            final_energy = energies;
        }

        if step % progress_every == 0 {
            info!(
                "{:>3}% done: step {:>8}, E = {:.6}, T = {:.4}",
                100 * step / params.total_steps,
                step,
                final_energy.total,
                system.temperature()
            );
        }
    }
    recorder.finish()?;

    let mut rdf_out = create(&config.output_path("rdf.out"))?;
    write_rdf(&mut rdf_out, &rdf)?;
    rdf_out.flush()?;

    Ok(RunSummary {
        steps: params.total_steps,
        initial_energy,
        final_energy,
        max_relative_drift,
        final_temperature: system.temperature(),
        final_msd: msd.value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_relative_drift() {
        assert_relative_eq!(relative_drift(-2.0, -1.9), 0.05, epsilon = 1e-12);
        assert_relative_eq!(relative_drift(0.0, 0.25), 0.25, epsilon = 1e-12);
    }
}
