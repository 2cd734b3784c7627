//! Fixed-width intermediate file rendering.
//!
//! ```text
//! Line      Loc       Label          Opcode         Operand
//! -----------------------------------------------------------------
//! 5         1000      COPY           START          1000
//! 10        1000                     LDA            FIVE
//! ```
//!
//! Every field is left-aligned and padded to its column width; longer values
//! overflow the column rather than being truncated.

use std::io::{self, Write};

use crate::pass1::IntermediateRecord;

/// Width of the `Line` column.
pub const LINE_WIDTH: usize = 10;
/// Width of the `Loc` column.
pub const LOC_WIDTH: usize = 10;
/// Width of the `Label`, `Opcode`, and `Operand` columns.
pub const FIELD_WIDTH: usize = 15;
/// Length of the dashed separator under the header.
pub const SEPARATOR_WIDTH: usize = 65;

/// Header row followed by the separator line, both newline-terminated.
#[must_use]
pub fn header() -> String {
    format!(
        "{:<LINE_WIDTH$}{:<LOC_WIDTH$}{:<FIELD_WIDTH$}{:<FIELD_WIDTH$}{:<FIELD_WIDTH$}\n{}\n",
        "Line",
        "Loc",
        "Label",
        "Opcode",
        "Operand",
        "-".repeat(SEPARATOR_WIDTH)
    )
}

/// Formats one record as a data row, without the trailing newline.
#[must_use]
pub fn format_record(record: &IntermediateRecord) -> String {
    format!(
        "{:<LINE_WIDTH$}{:<LOC_WIDTH$}{:<FIELD_WIDTH$}{:<FIELD_WIDTH$}{:<FIELD_WIDTH$}",
        record.line_number,
        record.location_hex(),
        record.label,
        record.opcode,
        record.operand
    )
}

/// Writes the header and one row per record.
///
/// # Errors
///
/// Returns any I/O error from `writer`.
pub fn write_listing<W: Write + ?Sized>(
    writer: &mut W,
    records: &[IntermediateRecord],
) -> io::Result<()> {
    writer.write_all(header().as_bytes())?;
    for record in records {
        writeln!(writer, "{}", format_record(record))?;
    }
    writer.flush()
}

/// Renders the complete intermediate file into a string.
#[must_use]
pub fn render_listing(records: &[IntermediateRecord]) -> String {
    let mut out = header();
    for record in records {
        out.push_str(&format_record(record));
        out.push('\n');
    }
    out
}
