//! System file: `name N mass` header, then one `label x y z vx vy vz` line per particle

use crate::error::{MdError, Result};
use crate::particles::ParticleSystem;
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn parse_field<T: std::str::FromStr>(token: &str, what: &str, line: usize) -> Result<T> {
    token.parse().map_err(|_| MdError::Parse {
        line,
        message: format!("cannot read {what} from '{token}'"),
    })
}

/// Read a particle system; blank lines and lines starting with `#` are skipped.
pub fn read_system<R: BufRead>(reader: R) -> Result<ParticleSystem> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| match l {
            Ok(text) => {
                let t = text.trim();
                !t.is_empty() && !t.starts_with('#')
            }
            Err(_) => true,
        });

    let (header_no, header) = lines.next().ok_or_else(|| MdError::Parse {
        line: 1,
        message: "missing header line".into(),
    })?;
    let header = header?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(MdError::Parse {
            line: header_no,
            message: format!("header needs 'name N mass', got {} fields", fields.len()),
        });
    }
    let name = fields[0].to_string();
    let n: usize = parse_field(fields[1], "particle count", header_no)?;
    let mass: f64 = parse_field(fields[2], "mass", header_no)?;

    // the header count is untrusted until the particle lines are read
    let capacity = n.min(1024);
    let mut labels = Vec::with_capacity(capacity);
    let mut positions = Vec::with_capacity(capacity);
    let mut velocities = Vec::with_capacity(capacity);
    for (line_no, line) in lines.by_ref().take(n) {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(MdError::Parse {
                line: line_no,
                message: format!("expected 'label x y z vx vy vz', got {} fields", fields.len()),
            });
        }
        let mut values = [0.0f64; 6];
        for (v, token) in values.iter_mut().zip(&fields[1..]) {
            *v = parse_field(token, "coordinate", line_no)?;
        }
        labels.push(fields[0].to_string());
        positions.push(Vector3::new(values[0], values[1], values[2]));
        velocities.push(Vector3::new(values[3], values[4], values[5]));
    }
    if let Some((line_no, _)) = lines.next() {
        return Err(MdError::InvalidSystem(format!(
            "header declares {n} particles but line {line_no} holds another one"
        )));
    }

    // a short file surfaces as a length mismatch against N
    if labels.len() != n {
        return Err(MdError::InvalidSystem(format!(
            "header declares {n} particles but only {} were listed",
            labels.len()
        )));
    }
    ParticleSystem::new(name, labels, positions, velocities, mass)
}

pub fn read_system_file<P: AsRef<Path>>(path: P) -> Result<ParticleSystem> {
    let file = File::open(path)?;
    read_system(BufReader::new(file))
}

pub fn write_system<W: Write>(writer: &mut W, system: &ParticleSystem) -> Result<()> {
    writeln!(writer, "{} {} {}", system.name(), system.len(), system.mass())?;
    for (label, r, v) in itertools::izip!(system.labels(), system.positions(), system.velocities()) {
        writeln!(
            writer,
            "{} {} {} {} {} {} {}",
            label, r.x, r.y, r.z, v.x, v.y, v.z
        )?;
    }
    Ok(())
}

pub fn write_system_file<P: AsRef<Path>>(path: P, system: &ParticleSystem) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_system(&mut writer, system)?;
    writer.flush()?;
    Ok(())
}
