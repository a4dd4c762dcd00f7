//! Error types for the PC/SC transport

use cardwatch_core::Error;

/// PC/SC-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),

    /// Timed out waiting for a card
    #[error("Timed out waiting for a card")]
    Timeout,

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<PcscError> for Error {
    fn from(err: PcscError) -> Self {
        match err {
            PcscError::Timeout | PcscError::Pcsc(pcsc::Error::Timeout) => Self::Timeout,
            other => Self::message(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_core_timeout() {
        assert!(Error::from(PcscError::Timeout).is_timeout());
        assert!(Error::from(PcscError::Pcsc(pcsc::Error::Timeout)).is_timeout());
    }

    #[test]
    fn test_other_errors_keep_their_message() {
        let err = Error::from(PcscError::ReaderNotFound("ACR122U".to_string()));
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "Reader not found: ACR122U");
    }
}
