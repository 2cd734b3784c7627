//! Source line classification and label/opcode/operand extraction.
//!
//! SIC source is column-insensitive: a line that starts with a space or tab
//! has no label, otherwise the first token is the label. Fields are separated
//! by runs of whitespace and the operand is everything after the opcode.

/// A statement split into its three fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStatement {
    /// Label text, empty when the line starts with whitespace.
    pub label: String,
    /// Upper-cased opcode text (empty for a label-only line).
    pub opcode: String,
    /// Remainder of the line after the opcode, trimmed.
    pub operand: String,
}

/// Classification of one raw source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    /// Line starting with `.`.
    Comment,
    /// Empty line.
    Blank,
    /// Anything else.
    Statement(ParsedStatement),
}

/// Classifies a raw source line.
///
/// Only a `.` in the very first column marks a comment; an indented `.` is
/// parsed as an (unknown) opcode. A line holding only spaces or tabs is not
/// blank: it parses as a statement with an empty opcode.
#[must_use]
pub fn classify_line(line: &str) -> ClassifiedLine {
    if line.starts_with('.') {
        ClassifiedLine::Comment
    } else if line.is_empty() {
        ClassifiedLine::Blank
    } else {
        ClassifiedLine::Statement(parse_statement(line))
    }
}

/// Splits a source line into label, opcode, and operand.
#[must_use]
pub fn parse_statement(line: &str) -> ParsedStatement {
    let (label, rest) = if starts_with_indent(line) {
        ("", line)
    } else {
        split_token(line)
    };
    let (opcode, operand) = split_token(rest);

    ParsedStatement {
        label: label.to_string(),
        opcode: opcode.to_ascii_uppercase(),
        operand: operand.trim().to_string(),
    }
}

fn starts_with_indent(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Returns the first whitespace-delimited token and the text after it.
fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    text.find(|c: char| c.is_ascii_whitespace())
        .map_or((text, ""), |pos| (&text[..pos], &text[pos..]))
}

/// Parses the leading token of an operand as an unsigned hexadecimal value.
///
/// An optional `0x`/`0X` prefix is accepted. Returns `None` for an empty
/// operand, a sign, or any non-hex digit in the token.
#[must_use]
pub fn parse_hex_operand(operand: &str) -> Option<u32> {
    let (token, _) = split_token(operand);
    let token = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(token, 16).ok()
}

/// Parses the leading token of an operand as an unsigned decimal count.
///
/// Returns `None` for an empty operand, a negative value, or non-digits.
#[must_use]
pub fn parse_decimal_operand(operand: &str) -> Option<u32> {
    let (token, _) = split_token(operand);
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
