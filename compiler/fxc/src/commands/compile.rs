//! The `compile` command: link every program of an effect manifest.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use fx_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use fx_diagnostic::DiagnosticQueue;
use fx_ir::{Header, HeaderError};
use fx_link::{LinkOptions, LinkReport, Linker, SourceGenerator};
use fx_naga::NagaBackend;

use crate::manifest::{Manifest, ManifestError};

/// Target profile used when `--target` is not given.
pub const DEFAULT_PROFILE: &str = "spv10";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("missing effect manifest")]
    MissingManifest,
    #[error("option '{0}' needs a value")]
    MissingValue(&'static str),
    #[error("unexpected argument '{0}'")]
    Unexpected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Header(#[from] HeaderError),
}

/// Parsed `fxc compile` arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub manifest: PathBuf,
    pub out_dir: PathBuf,
    pub profile: String,
    /// `/NAME` switches, applied to the header in order.
    pub switches: Vec<String>,
    pub link: LinkOptions,
}

impl CompileOptions {
    /// Parse the arguments after `compile`.
    pub fn parse(args: &[String]) -> Result<CompileOptions, UsageError> {
        let mut manifest = None;
        let mut out_dir = PathBuf::from(".");
        let mut profile = DEFAULT_PROFILE.to_owned();
        let mut switches = Vec::new();
        let mut link = LinkOptions::default();

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-o" => {
                    out_dir = args.next().ok_or(UsageError::MissingValue("-o"))?.into();
                }
                "--target" => {
                    args.next()
                        .ok_or(UsageError::MissingValue("--target"))?
                        .clone_into(&mut profile);
                }
                "--no-interface-check" => link.interface_validation = false,
                "--parallel" => link.parallel = true,
                _ => {
                    if let Some(value) = arg.strip_prefix("--target=") {
                        value.clone_into(&mut profile);
                    } else if is_switch(arg) {
                        switches.push(arg.clone());
                    } else if !arg.starts_with('-') && manifest.is_none() {
                        manifest = Some(PathBuf::from(arg));
                    } else {
                        return Err(UsageError::Unexpected(arg.clone()));
                    }
                }
            }
        }

        Ok(CompileOptions {
            manifest: manifest.ok_or(UsageError::MissingManifest)?,
            out_dir,
            profile,
            switches,
            link,
        })
    }

    /// Target header with the switches applied. Unknown switches are
    /// reported and skipped.
    pub fn header(&self) -> Result<Header, HeaderError> {
        let mut header = Header::from_profile(&self.profile)?;
        for unknown in header.apply_switches(self.switches.iter().map(String::as_str)) {
            tracing::warn!(switch = unknown, "ignoring unknown switch");
        }
        Ok(header)
    }
}

/// `/` followed by capitals only, like `/NOSUB`. Anything else starting
/// with `/` is an absolute path.
fn is_switch(arg: &str) -> bool {
    arg.strip_prefix('/')
        .is_some_and(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_uppercase()))
}

/// Load, link and write one effect. Diagnostics go to `emitter`, followed
/// by a summary when there were any.
#[tracing::instrument(level = "debug", skip_all, fields(manifest = %options.manifest.display()))]
pub fn compile_effect<W: Write>(
    options: &CompileOptions,
    emitter: &mut TerminalEmitter<W>,
) -> Result<LinkReport, CompileError> {
    let header = options.header()?;
    let effect = Manifest::load(&options.manifest)?;

    let mut diagnostics = DiagnosticQueue::new();
    let report = Linker::new(&SourceGenerator, &header, &options.out_dir)
        .with_options(options.link)
        .run(&NagaBackend, &effect, &mut diagnostics);

    let (errors, warnings) = (diagnostics.error_count(), diagnostics.warning_count());
    if errors + warnings > 0 {
        emitter.emit_all(&diagnostics.flush());
        emitter.emit_summary(errors, warnings);
    }
    emitter.flush();
    Ok(report)
}

/// Entry point for `fxc compile`.
pub fn compile_file(args: &[String]) {
    let options = match CompileOptions::parse(args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Usage: fxc compile <effect.json> -o <dir> --target <profile> [/NOSUB] [/O] [/OUTPUT]");
            std::process::exit(1);
        }
    };

    let is_tty = std::io::stderr().is_terminal();
    let mut emitter = TerminalEmitter::with_color_mode(std::io::stderr(), ColorMode::Auto, is_tty);
    match compile_effect(&options, &mut emitter) {
        Ok(report) => {
            for artifact in &report.artifacts {
                println!("wrote {}", artifact.display());
            }
            if !report.is_success() {
                eprintln!(
                    "error: {} of {} programs failed: {}",
                    report.failed.len(),
                    report.failed.len() + report.artifacts.len(),
                    report.failed.join(", ")
                );
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
