//! Error types for solid generation and the holder protocol.

use thiserror::Error;

/// Errors raised while building a profile curve or a printable solid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The shape tag is not one of the eight known shapes.
    #[error("unknown shape tag: {0}")]
    UnknownShape(String),

    /// Solids need a strictly positive height.
    #[error("height must be > 0 (height={0})")]
    InvalidHeight(f32),

    /// The extrusion cross-section could not be triangulated.
    #[error("failed to triangulate profile: {0}")]
    Triangulation(String),
}

/// Violations of the single-slot holder protocol.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderError {
    /// The holder already carries an object.
    #[error("holder already has an object")]
    AlreadyHolding,

    /// There is nothing to give.
    #[error("holder has no object to give")]
    Empty,

    /// Locked holders reject both attach and detach.
    #[error("holder is locked")]
    Locked,
}

/// Errors raised while loading a [`crate::SimulationConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML text could not be parsed into a configuration.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written out as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A refused [`crate::Hold::receive`]: the reason plus the object, handed back
/// to the caller so nothing is lost.
pub struct Rejected<T> {
    pub error: HolderError,
    pub object: T,
}

impl<T> Rejected<T> {
    /// Takes back the object that was refused.
    pub fn into_inner(self) -> T {
        self.object
    }
}

impl<T> std::fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> std::fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.error, f)
    }
}

impl<T> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Rejected<T>> for HolderError {
    fn from(rejected: Rejected<T>) -> Self {
        rejected.error
    }
}
