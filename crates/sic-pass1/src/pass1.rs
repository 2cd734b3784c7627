//! Pass-1 location counter assignment.
//!
//! This module walks source lines one at a time, classifies each against the
//! mnemonic catalog, and assigns every statement the location counter value
//! at which it starts. Each input line produces at most one
//! [`IntermediateRecord`].
//!
//! The whole pass is driven by an explicit [`AssemblyState`] value:
//! [`process_line`] takes the state before a line and returns the state
//! after it, so a single line can be checked against any prior state.

use log::{debug, info};

use crate::catalog::{
    classify, MnemonicKind, SizeRule, INSTRUCTION_SIZE, RESB_MULTIPLIER, RESW_MULTIPLIER,
};
use crate::config::{BlankLinePolicy, OperandErrorPolicy, Pass1Config};
use crate::errors::{NumericBase, Pass1Error, Pass1ErrorKind};
use crate::parser::{
    classify_line, parse_decimal_operand, parse_hex_operand, ClassifiedLine, ParsedStatement,
};

/// One line of the intermediate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateRecord {
    /// Display line number from the configured numbering.
    pub line_number: usize,
    /// 1-indexed line in the source text.
    pub source_line: usize,
    /// Location counter at the start of the line; `None` for placeholders.
    pub location: Option<u32>,
    /// Label field.
    pub label: String,
    /// Upper-cased opcode field.
    pub opcode: String,
    /// Operand field.
    pub operand: String,
}

impl IntermediateRecord {
    /// Creates a record with every field but the line number blank.
    #[must_use]
    pub const fn placeholder(line_number: usize, source_line: usize) -> Self {
        Self {
            line_number,
            source_line,
            location: None,
            label: String::new(),
            opcode: String::new(),
            operand: String::new(),
        }
    }

    fn from_statement(
        line_number: usize,
        source_line: usize,
        location: u32,
        statement: ParsedStatement,
    ) -> Self {
        Self {
            line_number,
            source_line,
            location: Some(location),
            label: statement.label,
            opcode: statement.opcode,
            operand: statement.operand,
        }
    }

    /// Location as upper-case hex, zero-padded to four digits; empty for placeholders.
    #[must_use]
    pub fn location_hex(&self) -> String {
        self.location
            .map(|location| format!("{location:04X}"))
            .unwrap_or_default()
    }
}

/// Destination for records, fed in strict source order.
pub trait RecordSink {
    /// Accepts the next record.
    fn push_record(&mut self, record: IntermediateRecord);
}

impl RecordSink for Vec<IntermediateRecord> {
    fn push_record(&mut self, record: IntermediateRecord) {
        self.push(record);
    }
}

/// Location counter state carried from one source line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyState {
    location_counter: u32,
    program_started: bool,
    start_line: Option<usize>,
    origin: u32,
    lines_seen: usize,
}

impl AssemblyState {
    /// Creates the initial state: counter 0, program not started.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            location_counter: 0,
            program_started: false,
            start_line: None,
            origin: 0,
            lines_seen: 0,
        }
    }

    /// Current location counter.
    #[must_use]
    pub const fn location_counter(&self) -> u32 {
        self.location_counter
    }

    /// Whether a `START` directive has been processed.
    #[must_use]
    pub const fn program_started(&self) -> bool {
        self.program_started
    }

    /// Source line of the `START` directive, once seen.
    #[must_use]
    pub const fn start_line(&self) -> Option<usize> {
        self.start_line
    }

    /// Origin set by `START` (0 until then).
    #[must_use]
    pub const fn origin(&self) -> u32 {
        self.origin
    }

    /// Number of source lines consumed so far.
    #[must_use]
    pub const fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    /// Consumes one line without touching the counter.
    #[must_use]
    pub const fn skip_line(self) -> Self {
        Self {
            lines_seen: self.lines_seen + 1,
            ..self
        }
    }
}

/// Result of processing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStep {
    /// State after the line.
    pub state: AssemblyState,
    /// Record for the line, if it produces one.
    pub record: Option<IntermediateRecord>,
}

/// Processes one source line against `state`.
///
/// Comments (and blank lines under [`BlankLinePolicy::Skip`]) produce no
/// record but still consume a line number. Statements are recorded at the
/// counter value before their own size is added; a `START` line is recorded
/// at the origin it sets. No size accumulates before `START`, and `END` adds
/// nothing.
///
/// # Errors
///
/// Returns a `Pass1Error` if:
/// - A `START`, `RESW`, or `RESB` operand is not a valid number (`MalformedOperand`)
/// - A second `START` appears (`DuplicateStart`)
/// - The counter would overflow (`LocationOverflow`)
pub fn process_line(
    state: &AssemblyState,
    line: &str,
    config: &Pass1Config,
) -> Result<LineStep, Pass1Error> {
    let source_line = state.lines_seen + 1;
    let line_number = config.numbering.number_for(state.lines_seen);
    let mut next = state.skip_line();

    let statement = match classify_line(line) {
        ClassifiedLine::Comment => {
            debug!("line {source_line}: comment");
            return Ok(LineStep {
                state: next,
                record: None,
            });
        }
        ClassifiedLine::Blank => {
            let record = match config.blank_lines {
                BlankLinePolicy::Skip => None,
                BlankLinePolicy::Placeholder => {
                    Some(IntermediateRecord::placeholder(line_number, source_line))
                }
            };
            return Ok(LineStep { state: next, record });
        }
        ClassifiedLine::Statement(statement) => statement,
    };

    let kind = classify(&statement.opcode).map(|entry| entry.kind);

    if kind == Some(MnemonicKind::ProgramStart) {
        if let Some(first_start) = state.start_line {
            return Err(Pass1Error::new(
                source_line,
                Pass1ErrorKind::DuplicateStart { first_start },
            ));
        }
        if !statement.operand.is_empty() {
            next.location_counter = parse_hex_operand(&statement.operand).ok_or_else(|| {
                malformed(source_line, &statement, NumericBase::Hexadecimal)
            })?;
        }
        next.program_started = true;
        next.start_line = Some(source_line);
        next.origin = next.location_counter;
    }

    let location = next.location_counter;

    if next.program_started && kind != Some(MnemonicKind::ProgramEnd) {
        let size = statement_size(kind, &statement, source_line)?;
        next.location_counter = u64::from(location)
            .checked_add(size)
            .and_then(|end| u32::try_from(end).ok())
            .ok_or_else(|| {
                Pass1Error::new(
                    source_line,
                    Pass1ErrorKind::LocationOverflow { location, size },
                )
            })?;
    }

    debug!(
        "line {source_line}: {:04X} {} {} {}",
        location, statement.label, statement.opcode, statement.operand
    );

    Ok(LineStep {
        state: next,
        record: Some(IntermediateRecord::from_statement(
            line_number,
            source_line,
            location,
            statement,
        )),
    })
}

fn statement_size(
    kind: Option<MnemonicKind>,
    statement: &ParsedStatement,
    source_line: usize,
) -> Result<u64, Pass1Error> {
    let Some(kind) = kind else {
        debug!(
            "line {source_line}: unknown mnemonic '{}', assuming {INSTRUCTION_SIZE} bytes",
            statement.opcode
        );
        return Ok(u64::from(INSTRUCTION_SIZE));
    };

    match kind.size_rule() {
        SizeRule::Fixed(size) => Ok(u64::from(size)),
        SizeRule::OperandWords => count_operand(statement, source_line)
            .map(|count| count * u64::from(RESW_MULTIPLIER)),
        SizeRule::OperandBytes => count_operand(statement, source_line)
            .map(|count| count * u64::from(RESB_MULTIPLIER)),
        SizeRule::ByteLiteral => Ok(byte_operand_size(&statement.operand)),
    }
}

fn count_operand(statement: &ParsedStatement, source_line: usize) -> Result<u64, Pass1Error> {
    parse_decimal_operand(&statement.operand)
        .map(u64::from)
        .ok_or_else(|| malformed(source_line, statement, NumericBase::Decimal))
}

fn malformed(source_line: usize, statement: &ParsedStatement, expected: NumericBase) -> Pass1Error {
    Pass1Error::new(
        source_line,
        Pass1ErrorKind::MalformedOperand {
            opcode: statement.opcode.clone(),
            operand: statement.operand.clone(),
            expected,
        },
    )
}

/// Computes the size in bytes of a `BYTE` operand.
///
/// `C'text'` occupies one byte per UTF-8 byte of `text` and `X'hex'` one
/// byte per two hex digits, rounded up. Operands shorter than three bytes,
/// and any other type tag, occupy one byte. Quotes are not validated: the
/// tag and the first and last bytes are simply dropped.
#[must_use]
pub fn byte_operand_size(operand: &str) -> u64 {
    let length = operand.len();
    if length < 3 {
        return 1;
    }
    let content = u64::try_from(length - 3).unwrap_or(u64::MAX);

    match operand.as_bytes().first() {
        Some(b'C') => content,
        Some(b'X') => content.div_ceil(2),
        _ => 1,
    }
}

/// Totals for a completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pass1Summary {
    /// Source lines consumed, comments included.
    pub lines: usize,
    /// Records emitted.
    pub records: usize,
    /// Origin set by `START`, if one was seen.
    pub origin: Option<u32>,
    /// Location counter after the last line.
    pub final_location: u32,
    /// Lines dropped under [`OperandErrorPolicy::SkipLine`].
    pub skipped: Vec<Pass1Error>,
}

impl Pass1Summary {
    /// Bytes between the origin (or 0) and the final location counter.
    #[must_use]
    pub const fn program_length(&self) -> u32 {
        let origin = match self.origin {
            Some(origin) => origin,
            None => 0,
        };
        self.final_location.saturating_sub(origin)
    }
}

/// Runs pass 1 over `lines`, pushing each record into `sink` in order.
///
/// Malformed operands either stop the pass or drop the line, depending on
/// [`Pass1Config::operand_errors`]. Other errors always stop the pass.
///
/// # Errors
///
/// Returns the first `Pass1Error` that the configured policy does not absorb.
pub fn run_pass1<I, S>(
    lines: I,
    config: &Pass1Config,
    sink: &mut S,
) -> Result<Pass1Summary, Pass1Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    S: RecordSink + ?Sized,
{
    let mut state = AssemblyState::new();
    let mut summary = Pass1Summary::default();

    for line in lines {
        match process_line(&state, line.as_ref(), config) {
            Ok(step) => {
                state = step.state;
                if let Some(record) = step.record {
                    summary.records += 1;
                    sink.push_record(record);
                }
            }
            Err(error)
                if error.is_malformed_operand()
                    && config.operand_errors == OperandErrorPolicy::SkipLine =>
            {
                debug!("skipping {error}");
                state = state.skip_line();
                summary.skipped.push(error);
            }
            Err(error) => return Err(error),
        }
    }

    summary.lines = state.lines_seen();
    summary.origin = state.start_line().map(|_| state.origin());
    summary.final_location = state.location_counter();

    info!(
        "pass 1: {} lines, {} records, final location {:04X}, program length {}",
        summary.lines,
        summary.records,
        summary.final_location,
        summary.program_length()
    );

    Ok(summary)
}

/// Records and totals of a pass collected in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass1Output {
    /// Records in source order.
    pub records: Vec<IntermediateRecord>,
    /// Pass totals.
    pub summary: Pass1Summary,
}

/// Runs pass 1 over a whole source text.
///
/// Lines may end in `\n` or `\r\n`.
///
/// # Errors
///
/// Same as [`run_pass1`].
pub fn assign_locations(source: &str, config: &Pass1Config) -> Result<Pass1Output, Pass1Error> {
    let mut records = Vec::new();
    let summary = run_pass1(source.lines(), config, &mut records)?;
    Ok(Pass1Output { records, summary })
}
