//! Source file to intermediate file pipeline.
//!
//! Both files are opened before any line is processed, and the intermediate
//! file is only left on disk when the whole pass succeeds.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::Pass1Config;
use crate::errors::IntermediateError;
use crate::listing::write_listing;
use crate::pass1::{assign_locations, IntermediateRecord, Pass1Summary};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateResult {
    /// Path of the written intermediate file.
    pub output_path: PathBuf,
    /// Records written, in source order.
    pub records: Vec<IntermediateRecord>,
    /// Pass totals.
    pub summary: Pass1Summary,
}

/// Reads a source file as text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
///
/// # Errors
///
/// Returns `IntermediateError::ReadSource` if the file cannot be read.
pub fn load_source(path: &Path) -> Result<String, IntermediateError> {
    let bytes = fs::read(path).map_err(|e| IntermediateError::ReadSource {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Runs pass 1 over `source` and writes the intermediate file to `output`.
///
/// # Errors
///
/// Returns an `IntermediateError` if:
/// - The source cannot be read (`ReadSource`)
/// - The output cannot be created or written (`CreateOutput`, `WriteOutput`)
/// - Pass 1 rejects the source (`Pass1`)
///
/// On any error after the output was created, the output is removed.
pub fn generate_intermediate_file(
    source: &Path,
    output: &Path,
    config: &Pass1Config,
) -> Result<IntermediateResult, IntermediateError> {
    let text = load_source(source)?;
    let file = File::create(output).map_err(|e| IntermediateError::CreateOutput {
        path: output.to_path_buf(),
        message: e.to_string(),
    })?;

    info!("pass 1: {} -> {}", source.display(), output.display());

    let pass = match assign_locations(&text, config) {
        Ok(pass) => pass,
        Err(e) => {
            drop(file);
            discard_output(output);
            return Err(e.into());
        }
    };

    write_or_discard(BufWriter::new(file), output, &pass.records)?;

    Ok(IntermediateResult {
        output_path: output.to_path_buf(),
        records: pass.records,
        summary: pass.summary,
    })
}

/// Writes the listing through `writer`, removing `output` if any write fails.
fn write_or_discard<W: Write>(
    mut writer: W,
    output: &Path,
    records: &[IntermediateRecord],
) -> Result<(), IntermediateError> {
    let written = write_listing(&mut writer, records);
    drop(writer);
    written.map_err(|e| {
        discard_output(output);
        IntermediateError::WriteOutput {
            path: output.to_path_buf(),
            message: e.to_string(),
        }
    })
}

fn discard_output(output: &Path) {
    if let Err(e) = fs::remove_file(output) {
        warn!("could not remove {}: {e}", output.display());
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::errors::Pass1ErrorKind;

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const SOURCE: &str = "\
COPY   START   1000
. load and return
       LDA     FIVE
       RSUB
FIVE   WORD    5
       END     COPY
";

    #[test]
    fn writes_intermediate_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("copy.sic");
        let output = dir.path().join("copy.int");
        fs::write(&source, SOURCE).unwrap();

        let result = generate_intermediate_file(&source, &output, &Pass1Config::classic()).unwrap();
        assert_eq!(result.records.len(), 5);
        assert_eq!(result.summary.final_location, 0x1009);

        let written = fs::read_to_string(&output).unwrap();
        let rows: Vec<_> = written.lines().collect();
        assert_eq!(rows.len(), 7);
        assert!(rows[0].starts_with("Line      Loc"));
        assert!(rows[2].starts_with("5         1000      COPY"));
        assert!(rows[3].starts_with("15        1000                     LDA"));
        assert!(rows[6].starts_with("30        1009                     END"));
    }

    #[test]
    fn missing_source_is_reported_before_output_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.int");
        let err = generate_intermediate_file(
            &dir.path().join("missing.sic"),
            &output,
            &Pass1Config::classic(),
        )
        .unwrap_err();
        assert!(matches!(err, IntermediateError::ReadSource { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn uncreatable_output_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("copy.sic");
        fs::write(&source, SOURCE).unwrap();
        let output = dir.path().join("no-such-dir").join("copy.int");

        let err = generate_intermediate_file(&source, &output, &Pass1Config::classic()).unwrap_err();
        assert!(matches!(err, IntermediateError::CreateOutput { .. }));
    }

    #[test]
    fn failed_pass_leaves_no_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.sic");
        let output = dir.path().join("bad.int");
        fs::write(&source, "P      START   0\nBUF    RESB    MANY\n").unwrap();

        let err = generate_intermediate_file(&source, &output, &Pass1Config::classic()).unwrap_err();
        assert!(matches!(
            err,
            IntermediateError::Pass1(ref e)
                if e.line == 2 && matches!(e.kind, Pass1ErrorKind::MalformedOperand { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn failed_write_removes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("full.int");
        fs::write(&output, "").unwrap();
        let pass = assign_locations(SOURCE, &Pass1Config::classic()).unwrap();

        let err = write_or_discard(FullDisk, &output, &pass.records).unwrap_err();
        assert!(matches!(
            err,
            IntermediateError::WriteOutput { ref message, .. } if message.contains("no space left")
        ));
        assert!(!output.exists());
    }

    #[test]
    fn successful_write_keeps_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("ok.int");
        fs::write(&output, "").unwrap();
        let pass = assign_locations(SOURCE, &Pass1Config::classic()).unwrap();

        let mut buffer = Vec::new();
        write_or_discard(&mut buffer, &output, &pass.records).unwrap();
        assert!(output.exists());
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            crate::listing::render_listing(&pass.records)
        );
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("latin1.sic");
        fs::write(&source, b"P      START   0\n. caf\xE9\n       RSUB\n").unwrap();

        let text = load_source(&source).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
