//! CLI entry point for the SIC pass-1 intermediate file generator.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::debug;
use sic_pass1::listing::render_listing;
use sic_pass1::pipeline::IntermediateResult;
use sic_pass1::{
    generate_intermediate_file, BlankLinePolicy, LineNumbering, OperandErrorPolicy, Pass1Config,
};
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: sic-pass1 <srcfile> [<intfile>] [options]

Arguments:
  <srcfile>  SIC assembly source
  <intfile>  Intermediate file to write (default: srcfile stem + .int)

Options:
  --compact                          Number lines 1, 2, 3... and keep blank lines
  --blank-lines <skip|placeholder>   Blank line handling (default: skip)
  --line-start <n>                   First line number (default: 5)
  --line-step <n>                    Line number increment (default: 5)
  --on-operand-error <abort|skip>    Malformed operand handling (default: abort)
  -v, --verbose                      Print the intermediate listing to stderr
  -h, --help                         Show this help message

Environment:
  SIC_LOG  Log filter (default: warn)

Examples:
  sic-pass1 copy.sic
  sic-pass1 copy.sic copy.int --compact
";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Pass1Config,
    verbose: bool,
}

#[derive(Debug)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

#[derive(Debug, Default)]
struct ConfigOverrides {
    compact: bool,
    blank_lines: Option<BlankLinePolicy>,
    line_start: Option<usize>,
    line_step: Option<usize>,
    operand_errors: Option<OperandErrorPolicy>,
}

impl ConfigOverrides {
    fn resolve(self) -> Pass1Config {
        let base = if self.compact {
            Pass1Config::compact()
        } else {
            Pass1Config::classic()
        };
        Pass1Config {
            blank_lines: self.blank_lines.unwrap_or(base.blank_lines),
            numbering: LineNumbering {
                start: self.line_start.unwrap_or(base.numbering.start),
                step: self.line_step.unwrap_or(base.numbering.step),
            },
            operand_errors: self.operand_errors.unwrap_or(base.operand_errors),
        }
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut positional: Vec<PathBuf> = Vec::new();
    let mut overrides = ConfigOverrides::default();
    let mut verbose = false;

    while let Some(arg) = args.next() {
        let text = arg.to_string_lossy().to_string();
        match text.as_str() {
            "-h" | "--help" => return Ok(ParseResult::Help),
            "-v" | "--verbose" => verbose = true,
            "--compact" => overrides.compact = true,
            "--blank-lines" => {
                let value = option_value(&mut args, &text)?;
                overrides.blank_lines = Some(value.parse().map_err(|e| format!("{e}"))?);
            }
            "--on-operand-error" => {
                let value = option_value(&mut args, &text)?;
                overrides.operand_errors = Some(value.parse().map_err(|e| format!("{e}"))?);
            }
            "--line-start" => {
                let value = option_value(&mut args, &text)?;
                overrides.line_start = Some(parse_number(&text, &value)?);
            }
            "--line-step" => {
                let value = option_value(&mut args, &text)?;
                let step = parse_number(&text, &value)?;
                if step == 0 {
                    return Err("line step must be at least 1".to_string());
                }
                overrides.line_step = Some(step);
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(format!("unknown option: {other}"));
            }
            _ => {
                if positional.len() == 2 {
                    return Err("too many arguments".to_string());
                }
                positional.push(PathBuf::from(arg));
            }
        }
    }

    let mut positional = positional.into_iter();
    let input = positional
        .next()
        .ok_or_else(|| "missing source file".to_string())?;
    Ok(ParseResult::Run(RunArgs {
        input,
        output: positional.next(),
        config: overrides.resolve(),
        verbose,
    }))
}

fn option_value(args: &mut impl Iterator<Item = OsString>, name: &str) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().to_string())
        .ok_or_else(|| format!("missing value for {name}"))
}

fn parse_number(name: &str, value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("invalid value for {name}: {value}"))
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("int")
}

fn run(args: RunArgs) -> Result<(), i32> {
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));
    debug!("config: {:?}", args.config);

    let result = match generate_intermediate_file(&args.input, &output, &args.config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", e.format_for_stderr(&args.input));
            return Err(1);
        }
    };

    for skipped in &result.summary.skipped {
        eprintln!(
            "{}:{}: warning: line skipped: {}",
            args.input.display(),
            skipped.line,
            skipped.kind
        );
    }

    if args.verbose {
        eprint!("{}", render_listing(&result.records));
    }

    report_success(&result);
    Ok(())
}

fn report_success(result: &IntermediateResult) {
    println!("Intermediate file generated successfully.");
    println!(
        "{} records, program length {} bytes (0x{:04X}) -> {}",
        result.summary.records,
        result.summary.program_length(),
        result.summary.program_length(),
        result.output_path.display()
    );
}

fn main() {
    let env = env_logger::Env::default()
        .filter_or("SIC_LOG", "warn")
        .write_style_or("SIC_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run(args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ParseResult, String> {
        parse_args(args.iter().map(OsString::from))
    }

    fn parse_run(args: &[&str]) -> RunArgs {
        match parse(args).expect("arguments should parse") {
            ParseResult::Run(run) => run,
            ParseResult::Help => panic!("expected run arguments"),
        }
    }

    #[test]
    fn parses_source_and_output() {
        let result = parse_run(&["copy.sic", "copy.int"]);
        assert_eq!(
            result,
            RunArgs {
                input: PathBuf::from("copy.sic"),
                output: Some(PathBuf::from("copy.int")),
                config: Pass1Config::classic(),
                verbose: false,
            }
        );
    }

    #[test]
    fn output_is_optional() {
        let result = parse_run(&["copy.sic", "-v"]);
        assert_eq!(result.output, None);
        assert!(result.verbose);
    }

    #[test]
    fn parses_help_flag() {
        let result = parse(&["--help"]).expect("help should parse without error");
        assert!(matches!(result, ParseResult::Help));
    }

    #[test]
    fn compact_preset() {
        let result = parse_run(&["--compact", "copy.sic"]);
        assert_eq!(result.config, Pass1Config::compact());
    }

    #[test]
    fn explicit_options_override_preset_in_any_order() {
        let result = parse_run(&[
            "--line-step",
            "10",
            "copy.sic",
            "--compact",
            "--blank-lines",
            "skip",
            "--on-operand-error",
            "skip",
        ]);
        assert_eq!(
            result.config,
            Pass1Config {
                blank_lines: BlankLinePolicy::Skip,
                numbering: LineNumbering { start: 1, step: 10 },
                operand_errors: OperandErrorPolicy::SkipLine,
            }
        );
    }

    #[test]
    fn line_start_override() {
        let result = parse_run(&["copy.sic", "--line-start", "100"]);
        assert_eq!(result.config.numbering, LineNumbering { start: 100, step: 5 });
    }

    #[test]
    fn rejects_missing_source() {
        let error = parse(&["-v"]).expect_err("missing source should fail");
        assert!(error.contains("missing source"));
    }

    #[test]
    fn rejects_extra_positionals() {
        let error = parse(&["a.sic", "a.int", "b.int"]).expect_err("third path should fail");
        assert!(error.contains("too many arguments"));
    }

    #[test]
    fn rejects_unknown_option() {
        let error = parse(&["copy.sic", "--fast"]).expect_err("unknown option should fail");
        assert!(error.contains("unknown option: --fast"));
    }

    #[test]
    fn rejects_bad_policy_and_number_values() {
        let error = parse(&["copy.sic", "--blank-lines", "maybe"]).expect_err("bad policy");
        assert!(error.contains("skip|placeholder"));

        let error = parse(&["copy.sic", "--line-step", "five"]).expect_err("bad number");
        assert!(error.contains("invalid value for --line-step"));

        let error = parse(&["copy.sic", "--line-step", "0"]).expect_err("zero step");
        assert!(error.contains("at least 1"));

        let error = parse(&["copy.sic", "--line-start"]).expect_err("missing value");
        assert!(error.contains("missing value for --line-start"));
    }

    #[test]
    fn default_output_path_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("src/copy.sic")),
            PathBuf::from("src/copy.int")
        );
        assert_eq!(default_output_path(Path::new("copy")), PathBuf::from("copy.int"));
    }
}
