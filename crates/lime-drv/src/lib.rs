//! lime-drv - Compiler Driver
//!
//! The driver is the only crate in the workspace that touches the file
//! system, a process environment, or `std::process::exit`. It owns:
//!
//! 1. COMMAND LINE PARSING — a hand-rolled `Config` built from
//!    `std::env::args()`, no `clap` dependency, matching the manual
//!    argument parsing this workspace's compiler-driver ancestor uses.
//! 2. FILE MANAGEMENT — reading the input source file, deriving the
//!    output path, and (optionally) writing the debug AST/IR dumps.
//! 3. PIPELINE ORCHESTRATION — lex → parse → codegen, in that order,
//!    stopping at the first stage that reports errors.
//! 4. ERROR REPORTING — formatting accumulated diagnostics to stderr and
//!    choosing the process exit code.
//!
//! ```text
//! source.lime
//!      │
//!      ▼
//! [Lexer + Parser] ──▶ Program (AST)
//!      │                  │
//!      │                  ▼ (--debug)
//!      │            debug/ast.json
//!      ▼
//! [Code Generator] ──▶ LLVM module
//!      │                  │
//!      │                  ▼ (--debug)
//!      │             debug/ir.ll
//!      ▼
//! <output>.ll   (--emit=ir, the default)
//! ```
//!
//! Exit codes: `0` success; `1` parse or codegen errors, or a driver-level
//! failure (missing file, bad flag, LLVM target-machine init failure).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use inkwell::context::Context;
use lime_gen::CodeGen;
use lime_par::Parser;
use thiserror::Error;

/// What the driver should produce after a successful compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitKind {
    /// Write the module's textual LLVM IR (`.ll`).
    Ir,
    /// Object-file emission. `spec.md`'s Non-goals explicitly exclude
    /// producing a linked, runnable executable; this variant exists so
    /// `--emit=obj` parses, but `run` reports it as not implemented
    /// rather than silently falling back to `--emit=ir`.
    Object,
}

impl EmitKind {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "ir" => Some(EmitKind::Ir),
            "obj" => Some(EmitKind::Object),
            _ => None,
        }
    }
}

/// Driver configuration, assembled from argv by [`Config::parse_args`].
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub emit: EmitKind,
    pub verbose: bool,
    pub debug: bool,
}

impl Config {
    /// Parses `lime <file_path> [-o <path>] [--emit=ir|obj] [-v|--verbose]
    /// [--debug] [-h|--help]` from a raw argument list (argv, without the
    /// program name).
    pub fn parse_args(args: &[String]) -> Result<Config, DriverError> {
        let mut input = None;
        let mut output = None;
        let mut emit = EmitKind::Ir;
        let mut verbose = false;
        let mut debug = false;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(DriverError::HelpRequested),
                "-v" | "--verbose" => verbose = true,
                "--debug" => debug = true,
                "-o" | "--output" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| DriverError::MissingValue(arg.clone()))?;
                    output = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--emit=") => {
                    let value = &flag["--emit=".len()..];
                    emit = EmitKind::parse(value)
                        .ok_or_else(|| DriverError::UnknownEmitKind(value.to_string()))?;
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(DriverError::UnknownFlag(flag.to_string()));
                }
                positional => {
                    if input.is_some() {
                        return Err(DriverError::UnexpectedArgument(positional.to_string()));
                    }
                    input = Some(PathBuf::from(positional));
                }
            }
        }

        Ok(Config {
            input: input.ok_or(DriverError::MissingInput)?,
            output,
            emit,
            verbose,
            debug,
        })
    }

    /// The path the compiled output is written to: the explicit `-o`
    /// path, or the input's file stem with a `.ll` extension in the
    /// current directory.
    fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let stem = self
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "a".to_string());
        PathBuf::from(format!("{stem}.ll"))
    }
}

/// Driver-level failures: argument parsing and I/O, as opposed to the
/// parser/codegen diagnostics (flat strings, per `spec.md` §7) that are
/// accumulated and printed separately.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("usage: lime <file_path> [-o <path>] [--emit=ir|obj] [-v|--verbose] [--debug]")]
    HelpRequested,
    #[error("no input file given")]
    MissingInput,
    #[error("flag `{0}` requires a value")]
    MissingValue(String),
    #[error("unknown flag `{0}`")]
    UnknownFlag(String),
    #[error("unexpected extra argument `{0}`")]
    UnexpectedArgument(String),
    #[error("unknown --emit kind `{0}` (expected `ir` or `obj`)")]
    UnknownEmitKind(String),
    #[error("failed to read source file `{path}`: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write output to `{path}`: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`--emit=obj` is not implemented: lime-gen only lowers to LLVM IR, and producing a linked executable is out of scope")]
    ObjectEmissionUnsupported,
    #[error("compilation failed with {0} error(s); see diagnostics above")]
    CompilationFailed(usize),
}

/// The outcome of a successful [`run`], surfaced for tests and for the
/// `--verbose` trace.
pub struct CompileReport {
    pub statement_count: usize,
    pub output_path: PathBuf,
}

impl fmt::Debug for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileReport")
            .field("statement_count", &self.statement_count)
            .field("output_path", &self.output_path)
            .finish()
    }
}

fn verbose_log(config: &Config, message: impl fmt::Display) {
    if config.verbose {
        eprintln!("[lime] {message}");
    }
}

/// Runs the whole pipeline for `config`: read, lex+parse, codegen, emit.
///
/// Parser and codegen diagnostics are printed to stderr as flat strings
/// (per `spec.md` §7) and turned into a single [`DriverError::CompilationFailed`]
/// if either stage reported any; driver-level failures (missing file, bad
/// flags) are reported directly as their own [`DriverError`] variant.
pub fn run(config: &Config) -> Result<CompileReport, DriverError> {
    let source = fs::read_to_string(&config.input).map_err(|source| DriverError::ReadSource {
        path: config.input.clone(),
        source,
    })?;
    verbose_log(config, format_args!("read {} bytes from {}", source.len(), config.input.display()));

    let mut parser = Parser::from_source(&source);
    let program = parser.parse_program();
    verbose_log(
        config,
        format_args!(
            "parsed {} statement(s), {} error(s)",
            program.statements.len(),
            parser.errors.len()
        ),
    );

    if config.debug {
        dump_ast_json(config, &program)?;
    }

    if !parser.errors.is_empty() {
        for error in &parser.errors {
            eprintln!("parse error: {error}");
        }
        return Err(DriverError::CompilationFailed(parser.errors.len()));
    }

    let context = Context::create();
    let mut codegen = CodeGen::new(&context);
    codegen.compile_program(&program);
    verbose_log(config, format_args!("codegen finished with {} error(s)", codegen.errors().len()));

    for warning in codegen.warnings() {
        verbose_log(config, warning);
    }

    if !codegen.errors().is_empty() {
        for error in codegen.errors() {
            eprintln!("codegen error: {error}");
        }
        return Err(DriverError::CompilationFailed(codegen.errors().len()));
    }

    match config.emit {
        EmitKind::Object => return Err(DriverError::ObjectEmissionUnsupported),
        EmitKind::Ir => {}
    }

    let ir = codegen.emit_ir();
    let output_path = config.output_path();
    fs::write(&output_path, &ir).map_err(|source| DriverError::WriteOutput {
        path: output_path.clone(),
        source,
    })?;
    verbose_log(config, format_args!("wrote IR to {}", output_path.display()));

    if config.debug {
        dump_ir_text(&ir)?;
    }

    Ok(CompileReport {
        statement_count: program.statements.len(),
        output_path,
    })
}

/// `debug/ast.json` — the pretty-printed JSON rendering of the parsed
/// `Program`, per `spec.md` §6.2.
fn dump_ast_json(config: &Config, program: &lime_par::Program) -> Result<(), DriverError> {
    let dir = Path::new("debug");
    fs::create_dir_all(dir).map_err(|source| DriverError::WriteOutput {
        path: dir.to_path_buf(),
        source,
    })?;
    let json = program
        .to_json_pretty()
        .unwrap_or_else(|err| format!("{{\"error\": \"failed to render AST as JSON: {err}\"}}"));
    let path = dir.join("ast.json");
    fs::write(&path, json).map_err(|source| DriverError::WriteOutput { path, source })?;
    verbose_log(config, "wrote debug/ast.json");
    Ok(())
}

/// `debug/ir.ll` — a copy of the emitted IR kept alongside the AST dump
/// so `--debug` always leaves both artifacts in the same place,
/// independent of where `-o` pointed the primary output.
fn dump_ir_text(ir: &str) -> Result<(), DriverError> {
    let dir = Path::new("debug");
    fs::create_dir_all(dir).map_err(|source| DriverError::WriteOutput {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join("ir.ll");
    fs::write(&path, ir).map_err(|source| DriverError::WriteOutput { path, source })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_bare_input_path() {
        let config = Config::parse_args(&args(&["main.lime"])).unwrap();
        assert_eq!(config.input, PathBuf::from("main.lime"));
        assert_eq!(config.emit, EmitKind::Ir);
        assert!(!config.verbose);
        assert!(!config.debug);
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = Config::parse_args(&args(&["--verbose"])).unwrap_err();
        assert!(matches!(err, DriverError::MissingInput));
    }

    #[test]
    fn parses_output_flag() {
        let config = Config::parse_args(&args(&["main.lime", "-o", "out.ll"])).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("out.ll")));
    }

    #[test]
    fn parses_emit_flag() {
        let config = Config::parse_args(&args(&["main.lime", "--emit=obj"])).unwrap();
        assert_eq!(config.emit, EmitKind::Object);
    }

    #[test]
    fn unknown_emit_kind_is_an_error() {
        let err = Config::parse_args(&args(&["main.lime", "--emit=exe"])).unwrap_err();
        assert!(matches!(err, DriverError::UnknownEmitKind(_)));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let err = Config::parse_args(&args(&["main.lime", "--bogus"])).unwrap_err();
        assert!(matches!(err, DriverError::UnknownFlag(_)));
    }

    #[test]
    fn derives_output_path_from_input_stem() {
        let config = Config::parse_args(&args(&["src/main.lime"])).unwrap();
        assert_eq!(config.output_path(), PathBuf::from("main.ll"));
    }

    #[test]
    fn explicit_output_path_wins_over_derived_one() {
        let config = Config::parse_args(&args(&["main.lime", "-o", "build/out.ll"])).unwrap();
        assert_eq!(config.output_path(), PathBuf::from("build/out.ll"));
    }

    #[test]
    fn run_reports_parse_errors_without_touching_the_filesystem_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.lime");
        fs::write(&input, "let x: int 5;").unwrap();

        let config = Config {
            input,
            output: Some(dir.path().join("broken.ll")),
            emit: EmitKind::Ir,
            verbose: false,
            debug: false,
        };

        let err = run(&config).unwrap_err();
        assert!(matches!(err, DriverError::CompilationFailed(_)));
        assert!(!config.output.unwrap().exists());
    }

    #[test]
    fn run_emits_ir_for_a_well_formed_program() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("main.lime");
        fs::write(&input, "fn main() -> int { return 2 + 3 * 4; }").unwrap();
        let output = dir.path().join("main.ll");

        let config = Config {
            input,
            output: Some(output.clone()),
            emit: EmitKind::Ir,
            verbose: false,
            debug: false,
        };

        let report = run(&config).unwrap();
        assert_eq!(report.statement_count, 1);
        let ir = fs::read_to_string(&output).unwrap();
        assert!(ir.contains("define i32 @main"));
    }
}
