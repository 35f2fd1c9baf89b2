// discfinalize/src/error.rs
use std::io;

use thiserror::Error;

use crate::disc::layout::SIGNATURE_LEN;

#[derive(Debug, Error)]
pub enum RepairError {
    /// The top-level descriptor does not carry the expected signature.
    #[error("not a recognized disc image (found signature {found:02x?})")]
    Format { found: [u8; SIGNATURE_LEN] },
    /// Any seek, read or write failure on either image.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl RepairError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        RepairError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Attaches an operation description to an `io::Result`.
pub(crate) trait IoContext<T> {
    fn context_with<F: FnOnce() -> String>(self, f: F) -> Result<T, RepairError>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn context_with<F: FnOnce() -> String>(self, f: F) -> Result<T, RepairError> {
        self.map_err(|e| RepairError::io(f(), e))
    }
}
