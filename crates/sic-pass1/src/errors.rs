//! Error types for pass 1 and the intermediate-file pipeline.
//!
//! Pass errors carry the 1-indexed source line so the CLI can report them as
//! ```text
//! prog.sic:12: error: malformed operand 'TEN' for RESW (expected decimal integer)
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Numeric form an operand was required to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericBase {
    /// Base-16 unsigned value (`START` origin).
    Hexadecimal,
    /// Base-10 unsigned count (`RESW`, `RESB`).
    Decimal,
}

impl fmt::Display for NumericBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hexadecimal => write!(f, "hexadecimal address"),
            Self::Decimal => write!(f, "decimal integer"),
        }
    }
}

/// Classification of pass-1 errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Pass1ErrorKind {
    /// Operand of `START`, `RESW`, or `RESB` is not a valid number.
    #[error("malformed operand '{operand}' for {opcode} (expected {expected})")]
    MalformedOperand {
        /// Opcode whose operand was rejected.
        opcode: String,
        /// Operand text as written.
        operand: String,
        /// Required numeric form.
        expected: NumericBase,
    },
    /// A `START` directive after the program already started.
    #[error("duplicate START directive (program already started at line {first_start})")]
    DuplicateStart {
        /// Source line of the first `START`.
        first_start: usize,
    },
    /// Adding a line's size would overflow the location counter.
    #[error("location counter overflow: 0x{location:04X} + {size} bytes")]
    LocationOverflow {
        /// Counter before the line.
        location: u32,
        /// Size of the line.
        size: u64,
    },
}

/// A pass-1 error tied to its source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct Pass1Error {
    /// 1-indexed source line.
    pub line: usize,
    /// What went wrong.
    pub kind: Pass1ErrorKind,
}

impl Pass1Error {
    /// Creates a new pass-1 error.
    #[must_use]
    pub const fn new(line: usize, kind: Pass1ErrorKind) -> Self {
        Self { line, kind }
    }

    /// Returns true if this error is governed by the operand-error policy.
    #[must_use]
    pub const fn is_malformed_operand(&self) -> bool {
        matches!(self.kind, Pass1ErrorKind::MalformedOperand { .. })
    }
}

/// Errors from reading source, running pass 1, and writing the intermediate file.
#[derive(Debug, Error)]
pub enum IntermediateError {
    /// The source file could not be read.
    #[error("cannot open source file {}: {message}", .path.display())]
    ReadSource {
        /// Source path.
        path: PathBuf,
        /// Underlying I/O message.
        message: String,
    },
    /// The intermediate file could not be created.
    #[error("cannot create intermediate file {}: {message}", .path.display())]
    CreateOutput {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O message.
        message: String,
    },
    /// The intermediate file could not be written.
    #[error("failed to write intermediate file {}: {message}", .path.display())]
    WriteOutput {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O message.
        message: String,
    },
    /// Pass 1 rejected the source.
    #[error(transparent)]
    Pass1(#[from] Pass1Error),
}

impl IntermediateError {
    /// Formats the error for stderr, prefixed with `file:line` when known.
    #[must_use]
    pub fn format_for_stderr(&self, source: &std::path::Path) -> String {
        match self {
            Self::Pass1(e) => format!("{}:{}: error: {}", source.display(), e.line, e.kind),
            other => format!("error: {other}"),
        }
    }
}
