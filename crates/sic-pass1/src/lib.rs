//! Pass 1 of a two-pass SIC assembler: location counter assignment and
//! intermediate file generation.

use env_logger as _;
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;

/// Fixed mnemonic catalog and sizing rules.
pub mod catalog;
/// Pass-1 policy configuration.
pub mod config;
/// Structured pass and pipeline error types.
pub mod errors;
/// Fixed-width intermediate file rendering.
pub mod listing;
/// Source line classification and field extraction.
pub mod parser;
/// Location counter state machine and record production.
pub mod pass1;
/// Source file to intermediate file pipeline.
pub mod pipeline;

pub use config::{BlankLinePolicy, LineNumbering, OperandErrorPolicy, Pass1Config};
pub use errors::{IntermediateError, Pass1Error, Pass1ErrorKind};
pub use pass1::{
    assign_locations, process_line, run_pass1, AssemblyState, IntermediateRecord, Pass1Output,
    Pass1Summary, RecordSink,
};
pub use pipeline::generate_intermediate_file;
