use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, MdError>;

/// Errors raised while setting up or driving a simulation.
///
/// The force kernel and the integrator never return these once constructed:
/// validation happens when a box, potential, integrator or particle system is
/// built, so the step loop itself stays infallible.
#[derive(Debug, Error)]
pub enum MdError {
    /// Malformed initial condition: empty system, bad mass, array length mismatch.
    #[error("invalid particle system: {0}")]
    InvalidSystem(String),

    /// Non-positive time step, cutoff radius or box edge, or a similar bad run parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A line of a system file could not be understood.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_yml::Error),
}
