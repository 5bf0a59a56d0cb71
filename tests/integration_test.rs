//! End-to-end tests driving the public API: the two-particle reference
//! scenarios, energy conservation through the integrator and full runs
//! that write output files.

use approx::assert_relative_eq;
use ljmd::config::MdConfig;
use ljmd::io::{read_system_file, write_system_file};
use ljmd::{
    lj_force, lj_potential, run_simulation, total_potential_energy, Integrator, LennardJones,
    ParticleSystem, SimulationBox, VelocityVerlet,
};
use nalgebra::Vector3;
use std::fs;
use std::path::{Path, PathBuf};

fn pair(x0: f64, x1: f64) -> ParticleSystem {
    ParticleSystem::new(
        "pair",
        vec!["p0".into(), "p1".into()],
        vec![Vector3::new(x0, 5.0, 5.0), Vector3::new(x1, 5.0, 5.0)],
        vec![Vector3::zeros(); 2],
        1.0,
    )
    .unwrap()
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

fn example_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("example")
        .join(filename)
}

const LATTICE_RUN: &str = "
name: lattice
system:
  n_particles: 32
  density: 0.5
  temperature: 1.0
  seed: 7
simulation:
  time_step: 0.005
  total_steps: 20
  cutoff: 1.9
output:
  rdf_bins: 20
";

#[test]
fn test_pair_inside_cutoff() {
    let b = SimulationBox::cubic(10.0).unwrap();
    let sys = ParticleSystem::new(
        "pair",
        vec!["a".into(), "b".into()],
        vec![Vector3::zeros(), Vector3::new(1.5, 0.0, 0.0)],
        vec![Vector3::zeros(); 2],
        1.0,
    )
    .unwrap();

    let expected = 4.0 * (1.5f64.powi(-12) - 1.5f64.powi(-6));
    let total = total_potential_energy(&sys, &b, 3.0).unwrap();
    assert_relative_eq!(total, expected, epsilon = 1e-12);
    assert_relative_eq!(total, -0.320337, epsilon = 1e-6);

    let per_particle = lj_potential(&sys, &b, 3.0).unwrap();
    assert_relative_eq!(per_particle[0], expected, epsilon = 1e-12);
    assert_relative_eq!(per_particle[1], expected, epsilon = 1e-12);

    // r > 2^(1/6): particle 0 is pulled toward particle 1
    let forces = lj_force(&sys, &b, 3.0).unwrap();
    assert!(forces[0].x > 0.0);
    assert_relative_eq!(forces[0].y, 0.0);
    assert_relative_eq!(forces[0].z, 0.0);
    assert_relative_eq!((forces[0] + forces[1]).norm(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_pair_beyond_cutoff() {
    let b = SimulationBox::cubic(10.0).unwrap();
    let sys = ParticleSystem::new(
        "pair",
        vec!["a".into(), "b".into()],
        vec![Vector3::zeros(), Vector3::new(1.5, 0.0, 0.0)],
        vec![Vector3::zeros(); 2],
        1.0,
    )
    .unwrap();

    let forces = lj_force(&sys, &b, 1.0).unwrap();
    assert_eq!(forces, vec![Vector3::zeros(); 2]);
    assert_eq!(lj_potential(&sys, &b, 1.0).unwrap(), vec![0.0, 0.0]);
    assert_eq!(total_potential_energy(&sys, &b, 1.0).unwrap(), 0.0);
}

#[test]
fn test_pair_energy_is_conserved() {
    let b = SimulationBox::cubic(10.0).unwrap();
    let lj = LennardJones::new(3.0, b).unwrap();
    let integrator = VelocityVerlet::new(lj, b, 0.001).unwrap();
    let mut sys = pair(4.4, 5.6);

    let e0 = integrator.total_energy(&sys);
    let mut max_drift = 0.0f64;
    for _ in 0..1000 {
        integrator.step(&mut sys);
        let e = integrator.total_energy(&sys);
        max_drift = max_drift.max(((e - e0) / e0).abs());
    }
    assert!(max_drift < 1e-3, "relative drift {max_drift}");

    let momentum: Vector3<f64> = sys.velocities().iter().sum();
    assert_relative_eq!(momentum.norm(), 0.0, epsilon = 1e-10);
}

#[test]
fn test_pair_across_boundary_matches_interior_pair() {
    let b = SimulationBox::cubic(10.0).unwrap();
    let lj = LennardJones::new(3.0, b).unwrap();
    let integrator = VelocityVerlet::new(lj, b, 0.002).unwrap();

    // same 1.2 separation, once through the x boundary and once in the middle
    let mut wrapped = pair(9.4, 0.6);
    let mut interior = pair(4.4, 5.6);
    for _ in 0..500 {
        integrator.step(&mut wrapped);
        integrator.step(&mut interior);
    }

    let (_, d_wrapped) = b.separation(&wrapped.positions()[0], &wrapped.positions()[1]);
    let (_, d_interior) = b.separation(&interior.positions()[0], &interior.positions()[1]);
    assert_relative_eq!(d_wrapped, d_interior, epsilon = 1e-9);
    assert_relative_eq!(
        integrator.total_energy(&wrapped),
        integrator.total_energy(&interior),
        epsilon = 1e-9
    );
    for r in wrapped.positions() {
        for k in 0..3 {
            assert!(r[k] >= 0.0 && r[k] < 10.0);
        }
    }
}

#[test]
fn test_lattice_run_writes_all_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = MdConfig::from_yaml_str(LATTICE_RUN).unwrap();
    config.output.directory = dir.path().to_path_buf();
    config.validate().unwrap();

    let (mut system, sim_box) = config.build_initial_system().unwrap();
    let start = system.positions().to_vec();
    let summary = run_simulation(&mut system, sim_box, &config).unwrap();

    assert_eq!(summary.steps, 20);
    assert!(summary.max_relative_drift.is_finite());
    assert!(summary.final_msd > 0.0);
    assert_relative_eq!(summary.initial_energy.kinetic, 48.0, epsilon = 1e-9);
    assert_relative_eq!(summary.final_temperature, system.temperature());
    assert_ne!(system.positions(), start.as_slice());

    // steps 0..=20 are all retained
    assert_eq!(line_count(&dir.path().join("latticeenergy.out")), 21);
    assert_eq!(line_count(&dir.path().join("latticemsd.out")), 21);
    assert_eq!(line_count(&dir.path().join("latticeVMD.xyz")), 21 * (32 + 2));
    assert_eq!(line_count(&dir.path().join("latticerdf.out")), 1 + 20);

    let energy = fs::read_to_string(dir.path().join("latticeenergy.out")).unwrap();
    let first: Vec<&str> = energy.lines().next().unwrap().split_whitespace().collect();
    assert_eq!(first[0], "0");
    assert_eq!(first[1], "48.0000");

    let msd = fs::read_to_string(dir.path().join("latticemsd.out")).unwrap();
    assert_eq!(msd.lines().next().unwrap(), "0 0.0000");

    let xyz = fs::read_to_string(dir.path().join("latticeVMD.xyz")).unwrap();
    let mut lines = xyz.lines();
    assert_eq!(lines.next(), Some("32"));
    assert_eq!(lines.next(), Some("Point = 0"));
}

#[test]
fn test_long_run_keeps_every_fourth_step() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = MdConfig::from_yaml_str(LATTICE_RUN).unwrap();
    config.output.directory = dir.path().to_path_buf();
    config.output.trajectory = false;
    config.simulation.total_steps = 1002;
    assert_eq!(config.sample_interval(), 4);

    let (mut system, sim_box) = config.build_initial_system().unwrap();
    run_simulation(&mut system, sim_box, &config).unwrap();

    // step 0, multiples of 4 up to 1000, then the final step
    assert_eq!(line_count(&dir.path().join("latticeenergy.out")), 1 + 250 + 1);
    assert!(!dir.path().join("latticeVMD.xyz").exists());
    let energy = fs::read_to_string(dir.path().join("latticeenergy.out")).unwrap();
    assert!(energy.lines().last().unwrap().starts_with("1002 "));
}

#[test]
fn test_run_from_system_file() {
    let dir = tempfile::tempdir().unwrap();
    let sys_path = dir.path().join("dimer.sys");
    write_system_file(&sys_path, &pair(4.4, 5.6)).unwrap();

    let mut config = MdConfig::from_file(example_path("dimer.yaml")).unwrap();
    config.system.input = Some(sys_path);
    config.output.directory = dir.path().join("out");

    let (mut system, sim_box) = config.build_initial_system().unwrap();
    assert_eq!(system.len(), 2);
    assert_relative_eq!(sim_box.lengths().x, 10.0, epsilon = 1e-9);

    let summary = run_simulation(&mut system, sim_box, &config).unwrap();
    assert!(summary.max_relative_drift < 1e-3);
    assert_relative_eq!(
        summary.initial_energy.potential,
        4.0 * (1.2f64.powi(-12) - 1.2f64.powi(-6)),
        epsilon = 1e-12
    );
    assert_eq!(line_count(&dir.path().join("out/dimerenergy.out")), 1001);

    let dumped = dir.path().join("final.sys");
    write_system_file(&dumped, &system).unwrap();
    let back = read_system_file(&dumped).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back.name(), "pair");
}

#[test]
fn test_example_configs_are_valid() {
    let argon = MdConfig::from_file(example_path("argon.yaml")).unwrap();
    assert_eq!(argon.system.n_particles, 256);
    assert_eq!(argon.sample_interval(), 4);

    let dimer = MdConfig::from_file(example_path("dimer.yaml")).unwrap();
    assert_eq!(dimer.sample_interval(), 1);
    assert!(dimer.system.input.is_some());
}
