//! Pass-1 policy configuration.

use std::fmt;
use std::str::FromStr;

/// Treatment of empty source lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlankLinePolicy {
    /// Drop blank lines exactly like comments.
    #[default]
    Skip,
    /// Emit a record with blank location, label, opcode, and operand.
    Placeholder,
}

/// Reaction to an operand that cannot be parsed as the expected number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperandErrorPolicy {
    /// Stop the pass with the error.
    #[default]
    Abort,
    /// Drop the offending line, record a diagnostic, and keep going.
    SkipLine,
}

/// Display line-number sequence: `start`, `start + step`, ...
///
/// Every input line consumes one number, including comments and skipped
/// blank lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumbering {
    /// Number given to the first source line.
    pub start: usize,
    /// Increment per source line.
    pub step: usize,
}

impl LineNumbering {
    /// Returns the display number of the zero-based source line `index`.
    #[must_use]
    pub const fn number_for(self, index: usize) -> usize {
        self.start.saturating_add(self.step.saturating_mul(index))
    }
}

impl Default for LineNumbering {
    fn default() -> Self {
        Self { start: 5, step: 5 }
    }
}

/// Complete set of pass-1 policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pass1Config {
    /// Blank-line handling.
    pub blank_lines: BlankLinePolicy,
    /// Line-number sequence.
    pub numbering: LineNumbering,
    /// Malformed-operand handling.
    pub operand_errors: OperandErrorPolicy,
}

impl Pass1Config {
    /// Lines numbered 5, 10, 15, ...; blank lines skipped; malformed operands abort.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            blank_lines: BlankLinePolicy::Skip,
            numbering: LineNumbering { start: 5, step: 5 },
            operand_errors: OperandErrorPolicy::Abort,
        }
    }

    /// Lines numbered 1, 2, 3, ...; blank lines kept as placeholder records.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            blank_lines: BlankLinePolicy::Placeholder,
            numbering: LineNumbering { start: 1, step: 1 },
            operand_errors: OperandErrorPolicy::Abort,
        }
    }
}

/// Error returned when a policy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {setting} value '{value}' (expected {expected})")]
pub struct PolicyParseError {
    /// Setting being parsed.
    pub setting: &'static str,
    /// Rejected value.
    pub value: String,
    /// Accepted spellings.
    pub expected: &'static str,
}

impl FromStr for BlankLinePolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "placeholder" => Ok(Self::Placeholder),
            _ => Err(PolicyParseError {
                setting: "blank-lines",
                value: s.to_string(),
                expected: "skip|placeholder",
            }),
        }
    }
}

impl fmt::Display for BlankLinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Placeholder => write!(f, "placeholder"),
        }
    }
}

impl FromStr for OperandErrorPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::SkipLine),
            _ => Err(PolicyParseError {
                setting: "on-operand-error",
                value: s.to_string(),
                expected: "abort|skip",
            }),
        }
    }
}

impl fmt::Display for OperandErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::SkipLine => write!(f, "skip"),
        }
    }
}
