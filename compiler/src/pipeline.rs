// pipeline.rs — Whole-project compilation and build provenance
//
// Runs load → check → verilog → pcf over one project document and bundles
// the two text artifacts with the checker's warnings and a provenance record.
//
// Preconditions: none.
// Postconditions: on success the Verilog artifact is populated.
// Failure modes: malformed JSON, the first structural error (strict mode).
//                Missing pin metadata only drops the PCF artifact.
// Side effects: debug-level tracing with per-pass timings.

use std::path::Path;
use std::time::Instant;

use crate::check::check_project;
use crate::diag::{codes, CompileError, DiagLevel, Diagnostic};
use crate::pcf::compile_pins_with;
use crate::project::Project;
use crate::sanitize::{bytes_to_hex, Sanitizer};
use crate::verilog::compile_circuit_with;

// ── Options ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name of the top-level module.
    pub top: String,
    /// Run the structural checker and fail on its first error.
    /// When false, only an empty top name and dependency cycles fail.
    pub strict: bool,
    pub sanitizer: Sanitizer,
}

impl CompileOptions {
    pub fn new(top: impl Into<String>) -> Self {
        CompileOptions {
            top: top.into(),
            strict: true,
            sanitizer: Sanitizer::default(),
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions::new("main")
    }
}

// ── Passes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Load,
    Check,
    Verilog,
    Pcf,
}

impl Pass {
    pub fn name(self) -> &'static str {
        match self {
            Pass::Load => "load",
            Pass::Check => "check",
            Pass::Verilog => "verilog",
            Pass::Pcf => "pcf",
        }
    }
}

fn finish_pass(pass: Pass, started: Instant) {
    tracing::debug!(
        "{} complete, {:.1}ms",
        pass.name(),
        started.elapsed().as_secs_f64() * 1000.0
    );
}

// ── Provenance ─────────────────────────────────────────────────────────────

/// Hashes tying emitted artifacts to the project document they came from.
///
/// All hashes are SHA-256, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub top: String,
    pub source_hash: String,
    pub verilog_hash: String,
    /// `None` when no pin constraints were generated.
    pub pcf_hash: Option<String>,
    pub compiler_version: &'static str,
}

impl Provenance {
    /// Serialize provenance as pretty JSON for `--emit build-info`.
    pub fn to_json(&self) -> String {
        let value = serde_json::json!({
            "top": self.top,
            "source_hash": self.source_hash,
            "verilog_hash": self.verilog_hash,
            "pcf_hash": self.pcf_hash,
            "compiler_version": self.compiler_version,
        });
        format!("{value:#}\n")
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    bytes_to_hex(&Sha256::digest(bytes))
}

pub fn compute_provenance(
    source: &str,
    top: &str,
    verilog: &str,
    pcf: Option<&str>,
) -> Provenance {
    Provenance {
        top: top.to_string(),
        source_hash: sha256_hex(source.as_bytes()),
        verilog_hash: sha256_hex(verilog.as_bytes()),
        pcf_hash: pcf.map(|p| sha256_hex(p.as_bytes())),
        compiler_version: env!("CARGO_PKG_VERSION"),
    }
}

// ── Runner ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Artifacts {
    pub verilog: String,
    /// Pin constraints; `None` when an input/output block has no pin.
    pub pcf: Option<String>,
    pub warnings: Vec<Diagnostic>,
    pub provenance: Provenance,
}

/// Compile a project document (`.ice` JSON text).
pub fn compile_project(source: &str, options: &CompileOptions) -> Result<Artifacts, CompileError> {
    let t = Instant::now();
    let project = Project::from_json(source)?;
    finish_pass(Pass::Load, t);

    let mut warnings = Vec::new();
    if options.strict {
        let t = Instant::now();
        warnings = check_project(&options.top, &project, &options.sanitizer).into_result()?;
        finish_pass(Pass::Check, t);
    }

    // Already checked above.
    let emit_options = CompileOptions {
        strict: false,
        ..options.clone()
    };

    let t = Instant::now();
    let verilog = compile_circuit_with(&options.top, &project, &emit_options)?;
    finish_pass(Pass::Verilog, t);

    let t = Instant::now();
    let pcf = match compile_pins_with(&project, &options.sanitizer) {
        Ok(pcf) => Some(pcf),
        Err(err @ CompileError::MissingPin { .. }) => {
            warnings.push(
                Diagnostic::new(
                    DiagLevel::Warning,
                    format!("pin constraints not generated: {err}"),
                )
                .with_code(codes::W0002),
            );
            None
        }
        Err(err) => return Err(err),
    };
    finish_pass(Pass::Pcf, t);

    let provenance = compute_provenance(source, &options.top, &verilog, pcf.as_deref());
    Ok(Artifacts {
        verilog,
        pcf,
        warnings,
        provenance,
    })
}

/// Read and compile a project file.
pub fn compile_file(path: &Path, options: &CompileOptions) -> Result<Artifacts, CompileError> {
    let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile_project(&source, options)
}
