//! Plain-text records written once per retained step

use crate::analysis::{EnergySample, RadialDistribution};
use crate::particles::ParticleSystem;
use std::io::{self, Write};

/// One VMD-readable XYZ frame: particle count, `Point = k`, then `label x y z` lines.
pub fn write_xyz_frame<W: Write>(writer: &mut W, system: &ParticleSystem, frame: usize) -> io::Result<()> {
    writeln!(writer, "{}", system.len())?;
    writeln!(writer, "Point = {}", frame)?;
    for (label, r) in system.labels().iter().zip(system.positions()) {
        writeln!(writer, "{} {} {} {}", label, r.x, r.y, r.z)?;
    }
    Ok(())
}

/// `step kinetic potential total`
pub fn write_energy<W: Write>(writer: &mut W, sample: &EnergySample) -> io::Result<()> {
    writeln!(
        writer,
        "{} {:.4} {:.4} {:.4}",
        sample.step, sample.kinetic, sample.potential, sample.total
    )
}

/// `step msd`
pub fn write_msd<W: Write>(writer: &mut W, step: usize, msd: f64) -> io::Result<()> {
    writeln!(writer, "{} {:.4}", step, msd)
}

/// `r g(r) count` per bin, preceded by a comment header.
pub fn write_rdf<W: Write>(writer: &mut W, rdf: &RadialDistribution) -> io::Result<()> {
    writeln!(
        writer,
        "# r g(r) count  (bin width {:.6}, {} samples)",
        rdf.bin_width(),
        rdf.n_samples()
    )?;
    for (r, g, count) in rdf.normalized() {
        writeln!(writer, "{:.4} {:.6} {}", r, g, count)?;
    }
    Ok(())
}
