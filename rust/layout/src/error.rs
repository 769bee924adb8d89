// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for room generation.

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort `generate()` or `reposition()`.
///
/// No partially built layout is ever returned alongside one of these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejection sampling ran out of attempts.
    #[error("{stage} generation gave up after {attempts} attempts")]
    GenerationTimeout { stage: &'static str, attempts: usize },

    /// Zone surface sampling produced no side-face candidate.
    #[error("zone {zone} produced no valid surface point after {attempts} attempts")]
    SamplingExhausted { zone: usize, attempts: usize },

    /// A wall, zone or footprint computation produced unusable geometry.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Generation parameters violate basic constraints.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Config (de)serialization failed.
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<roomor_geometry::Error> for Error {
    fn from(err: roomor_geometry::Error) -> Self {
        Error::DegenerateGeometry(err.to_string())
    }
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParameters(msg.into())
    }
}
