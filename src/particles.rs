use crate::error::{MdError, Result};
use itertools::izip;
use nalgebra::Vector3;

/// N equal-mass point particles stored as parallel arrays.
///
/// Index `i` refers to the same particle in `labels`, `positions` and
/// `velocities`. The arrays are only reachable as slices once the system is
/// built, so their lengths cannot drift apart.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    name: String,
    labels: Vec<String>,
    positions: Vec<Vector3<f64>>,
    velocities: Vec<Vector3<f64>>,
    mass: f64,
}

impl ParticleSystem {
    /// Build a system from an initial condition.
    ///
    /// Errors with `MdError::InvalidSystem` when the system is empty, the mass is
    /// not a finite positive number, or the three arrays disagree in length.
    pub fn new(
        name: impl Into<String>,
        labels: Vec<String>,
        positions: Vec<Vector3<f64>>,
        velocities: Vec<Vector3<f64>>,
        mass: f64,
    ) -> Result<Self> {
        let n = labels.len();
        if n == 0 {
            return Err(MdError::InvalidSystem(
                "a system needs at least one particle".into(),
            ));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(MdError::InvalidSystem(format!(
                "mass must be finite and > 0, got {mass}"
            )));
        }
        if positions.len() != n {
            return Err(MdError::InvalidSystem(format!(
                "{} positions supplied for {} particles",
                positions.len(),
                n
            )));
        }
        if velocities.len() != n {
            return Err(MdError::InvalidSystem(format!(
                "{} velocities supplied for {} particles",
                velocities.len(),
                n
            )));
        }
        Ok(Self {
            name: name.into(),
            labels,
            positions,
            velocities,
            mass,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.positions
    }

    pub fn velocities(&self) -> &[Vector3<f64>] {
        &self.velocities
    }

    pub fn velocities_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.velocities
    }

    /// Speed |v| of particle `i`.
    #[inline]
    pub fn speed(&self, i: usize) -> f64 {
        self.velocities[i].norm()
    }

    /// Total kinetic energy: sum of 1/2 m |v_i|^2.
    pub fn kinetic_energy(&self) -> f64 {
        self.velocities
            .iter()
            .map(|v| 0.5 * self.mass * v.norm_squared())
            .sum()
    }

    /// Instantaneous temperature from equipartition with k_B = 1: 2 KE / 3N.
    pub fn temperature(&self) -> f64 {
        2.0 * self.kinetic_energy() / (3.0 * self.len() as f64)
    }

    /// First-order position update: r += dt v.
    pub fn leap_pos_1st(&mut self, dt: f64) {
        for (r, v) in self.positions.iter_mut().zip(&self.velocities) {
            *r += v * dt;
        }
    }

    /// Second-order position update: r += dt v + dt^2 F / 2m.
    pub fn leap_pos_2nd(&mut self, dt: f64, forces: &[Vector3<f64>]) {
        assert_eq!(
            forces.len(),
            self.len(),
            "one force per particle is required"
        );
        let scale = 0.5 * dt * dt / self.mass;
        for (r, v, f) in izip!(&mut self.positions, &self.velocities, forces) {
            *r += v * dt + f * scale;
        }
    }

    /// Velocity update: v += dt F / m.
    pub fn leap_velocity(&mut self, dt: f64, forces: &[Vector3<f64>]) {
        assert_eq!(
            forces.len(),
            self.len(),
            "one force per particle is required"
        );
        let scale = dt / self.mass;
        for (v, f) in self.velocities.iter_mut().zip(forces) {
            *v += f * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_body() -> ParticleSystem {
        ParticleSystem::new(
            "pair",
            vec!["a".into(), "b".into()],
            vec![Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0)],
            vec![Vector3::new(3.0, 4.0, 0.0), Vector3::new(0.0, 0.0, 1.0)],
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn test_kinetic_energy() {
        let sys = two_body();
        // 0.5 * 2 * (25 + 1)
        assert_relative_eq!(sys.kinetic_energy(), 26.0, epsilon = 1e-12);
        assert_relative_eq!(sys.speed(0), 5.0, epsilon = 1e-12);
        assert_relative_eq!(sys.temperature(), 2.0 * 26.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_leap_pos_2nd() {
        let mut sys = two_body();
        let forces = vec![Vector3::new(4.0, 0.0, 0.0), Vector3::zeros()];
        sys.leap_pos_2nd(0.1, &forces);
        // 0.1 * 3 + 0.5 * 0.01 * 4 / 2
        assert_relative_eq!(sys.positions()[0].x, 0.31, epsilon = 1e-12);
        assert_relative_eq!(sys.positions()[0].y, 0.4, epsilon = 1e-12);
        assert_relative_eq!(sys.positions()[1].z, 0.1, epsilon = 1e-12);
        // velocities untouched
        assert_eq!(sys.velocities()[0], Vector3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn test_leap_velocity() {
        let mut sys = two_body();
        let forces = vec![Vector3::new(2.0, -2.0, 0.0), Vector3::zeros()];
        let before = sys.positions().to_vec();
        sys.leap_velocity(0.5, &forces);
        assert_relative_eq!(sys.velocities()[0].x, 3.5, epsilon = 1e-12);
        assert_relative_eq!(sys.velocities()[0].y, 3.5, epsilon = 1e-12);
        assert_eq!(sys.positions(), before.as_slice());
    }

    #[test]
    #[should_panic(expected = "one force per particle")]
    fn test_leap_pos_2nd_rejects_short_forces() {
        let mut sys = two_body();
        sys.leap_pos_2nd(0.1, &[Vector3::zeros()]);
    }

    #[test]
    #[should_panic(expected = "one force per particle")]
    fn test_leap_velocity_rejects_short_forces() {
        let mut sys = two_body();
        sys.leap_velocity(0.1, &[Vector3::zeros(); 3]);
    }

    #[test]
    fn test_leap_pos_1st() {
        let mut sys = two_body();
        sys.leap_pos_1st(2.0);
        assert_eq!(sys.positions()[0], Vector3::new(6.0, 8.0, 0.0));
    }

    #[test]
    fn test_rejects_empty_system() {
        let err = ParticleSystem::new("x", vec![], vec![], vec![], 1.0).unwrap_err();
        assert!(matches!(err, MdError::InvalidSystem(_)));
    }

    #[test]
    fn test_rejects_bad_mass() {
        for mass in [0.0, -1.0, f64::NAN] {
            let err = ParticleSystem::new(
                "x",
                vec!["a".into()],
                vec![Vector3::zeros()],
                vec![Vector3::zeros()],
                mass,
            )
            .unwrap_err();
            assert!(err.to_string().contains("mass"));
        }
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let err = ParticleSystem::new(
            "x",
            vec!["a".into(), "b".into()],
            vec![Vector3::zeros()],
            vec![Vector3::zeros(), Vector3::zeros()],
            1.0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("positions"));

        let err = ParticleSystem::new(
            "x",
            vec!["a".into()],
            vec![Vector3::zeros()],
            vec![Vector3::zeros(), Vector3::zeros()],
            1.0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("velocities"));
    }
}
