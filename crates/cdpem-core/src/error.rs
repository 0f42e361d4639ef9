use thiserror::Error;

pub type CdpemResult<T> = Result<T, CdpemError>;

/// Failure taxonomy shared by every numerical component.
///
/// Errors propagate synchronously to the immediate caller; nothing is
/// recovered silently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CdpemError {
    /// Non-conformable shapes, non-PSD covariances, invalid parameters.
    #[error("Configuration error: {what}")]
    Config { what: String },

    /// Singular matrices, division by zero, failed factorizations.
    #[error("Numerical error: {what}")]
    Numerical { what: String },

    /// Out-of-domain arguments such as negative rates or empty horizons.
    #[error("Invalid input: {what}")]
    Input { what: String },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl CdpemError {
    pub fn config(what: impl Into<String>) -> Self {
        CdpemError::Config { what: what.into() }
    }

    pub fn numerical(what: impl Into<String>) -> Self {
        CdpemError::Numerical { what: what.into() }
    }

    pub fn input(what: impl Into<String>) -> Self {
        CdpemError::Input { what: what.into() }
    }

    /// True for failures of arithmetic rather than of arguments.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            CdpemError::Numerical { .. } | CdpemError::NonFinite { .. }
        )
    }
}
