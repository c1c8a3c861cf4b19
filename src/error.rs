use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type covering all failures this library can return.
///
/// The passes in this crate are total transforms over well-formed bodies and
/// define no recoverable error conditions of their own. Every variant below
/// reports a precondition failure: a body whose statement sequence, branch
/// targets or trap table are inconsistent, detected while constructing the
/// flow graph or the def-use chains. Such an error aborts processing for that
/// body only.
#[derive(Error, Debug)]
pub enum Error {
    /// The method body is inconsistent and could not be analyzed.
    ///
    /// Reported when flow-graph construction encounters a branch target or
    /// trap index outside the statement sequence, an inverted trap range, or
    /// a statement that falls through the end of the body. The source
    /// location of the detection is included for debugging.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// Description of what was malformed
        message: String,
        /// The source file in which this error was detected
        file: &'static str,
        /// The source line in which this error was detected
        line: u32,
    },

    /// Flow-graph or def-use chain construction failed.
    ///
    /// Covers inconsistencies detected after the body itself validated, such
    /// as a use site with no captured definition.
    #[error("{0}")]
    GraphError(String),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}
