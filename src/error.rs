use thiserror::Error;

/// Rejected loan inputs. Always caused by the caller's data, never transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidTermsError {
    #[error("principal must be a positive amount, got {0}")]
    Principal(f64),

    #[error("APR must be greater than 0 and less than 100, got {0}")]
    Apr(f64),

    #[error("term must be 1 to 357913941 years, got {0}")]
    Term(u32),

    #[error("extra monthly principal must be zero or more, got {0}")]
    ExtraPrincipal(f64),

    #[error("lump sum must be a positive amount, got {0}")]
    LumpSum(f64),

    #[error("name must be 1 to 10 characters, got {0:?}")]
    Name(String),
}
