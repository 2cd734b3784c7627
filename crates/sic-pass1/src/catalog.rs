//! Fixed SIC mnemonic catalog.
//!
//! Maps mnemonic text to a [`MnemonicKind`], which in turn selects the sizing
//! rule applied by pass 1.

/// Size in bytes of every standard (format 3) SIC instruction.
pub const INSTRUCTION_SIZE: u32 = 3;
/// Size in bytes of a `WORD` constant.
pub const WORD_SIZE: u32 = 3;
/// Bytes reserved per unit of a `RESW` operand.
pub const RESW_MULTIPLIER: u32 = 3;
/// Bytes reserved per unit of a `RESB` operand.
pub const RESB_MULTIPLIER: u32 = 1;

/// Classification of a recognized mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MnemonicKind {
    /// Machine instruction with the fixed 3-byte format.
    StandardInstruction,
    /// `START`: sets the program origin.
    ProgramStart,
    /// `END`: terminates size accumulation for its own line.
    ProgramEnd,
    /// `RESW n`: reserves `n` words.
    ReserveWords,
    /// `RESB n`: reserves `n` bytes.
    ReserveBytes,
    /// `WORD v`: one 3-byte constant.
    DefineWord,
    /// `BYTE C'..'` / `BYTE X'..'`: size taken from the operand.
    DefineByte,
}

/// How a mnemonic's size in bytes is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    /// Constant size regardless of operand.
    Fixed(u32),
    /// Operand is a decimal count of 3-byte words.
    OperandWords,
    /// Operand is a decimal count of bytes.
    OperandBytes,
    /// Operand is a `C'..'` or `X'..'` literal.
    ByteLiteral,
}

impl MnemonicKind {
    /// Returns the sizing rule for this kind.
    #[must_use]
    pub const fn size_rule(self) -> SizeRule {
        match self {
            Self::StandardInstruction => SizeRule::Fixed(INSTRUCTION_SIZE),
            Self::DefineWord => SizeRule::Fixed(WORD_SIZE),
            Self::ProgramStart | Self::ProgramEnd => SizeRule::Fixed(0),
            Self::ReserveWords => SizeRule::OperandWords,
            Self::ReserveBytes => SizeRule::OperandBytes,
            Self::DefineByte => SizeRule::ByteLiteral,
        }
    }
}

/// One entry of the mnemonic catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MnemonicEntry {
    /// Upper-case mnemonic text.
    pub name: &'static str,
    /// Sizing class.
    pub kind: MnemonicKind,
}

const fn instruction(name: &'static str) -> MnemonicEntry {
    MnemonicEntry {
        name,
        kind: MnemonicKind::StandardInstruction,
    }
}

const fn directive(name: &'static str, kind: MnemonicKind) -> MnemonicEntry {
    MnemonicEntry { name, kind }
}

const CATALOG: &[MnemonicEntry] = &[
    instruction("ADD"),
    instruction("AND"),
    instruction("COMP"),
    instruction("DIV"),
    instruction("J"),
    instruction("JEQ"),
    instruction("JGT"),
    instruction("JLT"),
    instruction("JSUB"),
    instruction("LDA"),
    instruction("LDCH"),
    instruction("LDL"),
    instruction("LDX"),
    instruction("MUL"),
    instruction("OR"),
    instruction("RD"),
    instruction("RSUB"),
    instruction("STA"),
    instruction("STCH"),
    instruction("STL"),
    instruction("STSW"),
    instruction("STX"),
    instruction("SUB"),
    instruction("TD"),
    instruction("TIX"),
    instruction("WD"),
    directive("START", MnemonicKind::ProgramStart),
    directive("END", MnemonicKind::ProgramEnd),
    directive("RESW", MnemonicKind::ReserveWords),
    directive("RESB", MnemonicKind::ReserveBytes),
    directive("WORD", MnemonicKind::DefineWord),
    directive("BYTE", MnemonicKind::DefineByte),
];

/// Looks up a mnemonic in the catalog.
///
/// Callers upper-case source text first; matching is ASCII case-insensitive
/// regardless. Absence means the mnemonic is unknown, which is not an error.
#[must_use]
pub fn classify(mnemonic: &str) -> Option<MnemonicEntry> {
    CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(mnemonic))
        .copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::{classify, MnemonicKind, SizeRule, CATALOG, INSTRUCTION_SIZE, WORD_SIZE};

    #[test]
    fn catalog_names_are_unique_and_upper_case() {
        let names: HashSet<_> = CATALOG.iter().map(|entry| entry.name).collect();
        assert_eq!(names.len(), CATALOG.len());
        for name in names {
            assert_eq!(name, name.to_ascii_uppercase());
        }
    }

    #[test]
    fn catalog_has_26_standard_instructions() {
        let count = CATALOG
            .iter()
            .filter(|entry| entry.kind == MnemonicKind::StandardInstruction)
            .count();
        assert_eq!(count, 26);
    }

    #[test]
    fn every_standard_instruction_is_three_bytes() {
        for entry in CATALOG {
            if entry.kind == MnemonicKind::StandardInstruction {
                assert_eq!(entry.kind.size_rule(), SizeRule::Fixed(INSTRUCTION_SIZE));
            }
        }
    }

    #[rstest]
    #[case("START", MnemonicKind::ProgramStart)]
    #[case("END", MnemonicKind::ProgramEnd)]
    #[case("RESW", MnemonicKind::ReserveWords)]
    #[case("RESB", MnemonicKind::ReserveBytes)]
    #[case("WORD", MnemonicKind::DefineWord)]
    #[case("BYTE", MnemonicKind::DefineByte)]
    #[case("LDA", MnemonicKind::StandardInstruction)]
    #[case("RSUB", MnemonicKind::StandardInstruction)]
    fn classifies_known_mnemonics(#[case] name: &str, #[case] kind: MnemonicKind) {
        let entry = classify(name).expect("mnemonic should be in the catalog");
        assert_eq!(entry.name, name);
        assert_eq!(entry.kind, kind);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(
            classify("ldch").map(|entry| entry.kind),
            Some(MnemonicKind::StandardInstruction)
        );
        assert_eq!(
            classify("Resw").map(|entry| entry.kind),
            Some(MnemonicKind::ReserveWords)
        );
    }

    #[rstest]
    #[case("LDB")]
    #[case("NOTAREALOP")]
    #[case("")]
    fn unknown_mnemonic_returns_none(#[case] name: &str) {
        assert_eq!(classify(name), None);
    }

    #[rstest]
    #[case(MnemonicKind::ProgramStart, SizeRule::Fixed(0))]
    #[case(MnemonicKind::ProgramEnd, SizeRule::Fixed(0))]
    #[case(MnemonicKind::DefineWord, SizeRule::Fixed(WORD_SIZE))]
    #[case(MnemonicKind::ReserveWords, SizeRule::OperandWords)]
    #[case(MnemonicKind::ReserveBytes, SizeRule::OperandBytes)]
    #[case(MnemonicKind::DefineByte, SizeRule::ByteLiteral)]
    fn directive_size_rules(#[case] kind: MnemonicKind, #[case] rule: SizeRule) {
        assert_eq!(kind.size_rule(), rule);
    }
}
