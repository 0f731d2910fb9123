// diag.rs — Error taxonomy and diagnostics model
//
// `CompileError` is the typed failure every compiler entry point returns.
// `Diagnostic` is the display record the checker and the CLI work with;
// each error converts into one, and non-fatal findings are raised directly
// as warning-level diagnostics.
//
// Preconditions: none (types only).
// Postconditions: none (types only).
// Failure modes: none.
// Side effects: none.

use std::fmt;
use std::path::PathBuf;

// ── Diagnostic code ──────────────────────────────────────────────────────

/// A stable diagnostic code (e.g., `E0001`, `W0001`).
///
/// Once assigned, a code must never be reassigned to a different meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagCode(pub &'static str);

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod codes {
    use super::DiagCode;

    pub const E0001: DiagCode = DiagCode("E0001"); // malformed project
    pub const E0002: DiagCode = DiagCode("E0002"); // dangling wire reference
    pub const E0003: DiagCode = DiagCode("E0003"); // cyclic dependency
    pub const E0004: DiagCode = DiagCode("E0004"); // unresolved block type
    pub const E0005: DiagCode = DiagCode("E0005"); // duplicate block id
    pub const E0006: DiagCode = DiagCode("E0006"); // duplicate module name
    pub const E0007: DiagCode = DiagCode("E0007"); // missing pin metadata
    pub const E0100: DiagCode = DiagCode("E0100"); // i/o failure

    pub const W0001: DiagCode = DiagCode("W0001"); // block without connections
    pub const W0002: DiagCode = DiagCode("W0002"); // pin constraints skipped
}

// ── Severity level ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Error,
    Warning,
}

// ── Compile error ────────────────────────────────────────────────────────

/// A structural problem that stops compilation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("malformed project: {reason}")]
    MalformedProject { reason: String },

    #[error("wire w{wire} in circuit `{circuit}` references {what}")]
    DanglingWireReference {
        circuit: String,
        wire: usize,
        what: String,
    },

    #[error("cyclic dependency: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    #[error("block `{block}` in circuit `{circuit}` has type `{type_name}`, which no dependency defines")]
    UnresolvedType {
        circuit: String,
        block: String,
        type_name: String,
    },

    #[error("block id `{block}` is used more than once in circuit `{circuit}`")]
    DuplicateBlockId { circuit: String, block: String },

    #[error("module `{module}` would be emitted more than once")]
    DuplicateModule { module: String },

    #[error("block `{block}` has no pin assignment")]
    MissingPin { block: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        CompileError::MalformedProject {
            reason: reason.into(),
        }
    }

    /// The stable code for this error.
    pub fn code(&self) -> DiagCode {
        match self {
            CompileError::MalformedProject { .. } => codes::E0001,
            CompileError::DanglingWireReference { .. } => codes::E0002,
            CompileError::CyclicDependency { .. } => codes::E0003,
            CompileError::UnresolvedType { .. } => codes::E0004,
            CompileError::DuplicateBlockId { .. } => codes::E0005,
            CompileError::DuplicateModule { .. } => codes::E0006,
            CompileError::MissingPin { .. } => codes::E0007,
            CompileError::Io { .. } => codes::E0100,
        }
    }

    /// The circuit the error was found in, when it belongs to one.
    pub fn circuit(&self) -> Option<&str> {
        match self {
            CompileError::DanglingWireReference { circuit, .. }
            | CompileError::UnresolvedType { circuit, .. }
            | CompileError::DuplicateBlockId { circuit, .. } => Some(circuit),
            _ => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag =
            Diagnostic::new(DiagLevel::Error, self.to_string()).with_code(self.code());
        if let Some(circuit) = self.circuit() {
            diag = diag.in_circuit(circuit);
        }
        match self {
            CompileError::UnresolvedType { type_name, .. } => diag.with_hint(format!(
                "add the project defining `{type_name}` to this circuit's `deps`"
            )),
            CompileError::CyclicDependency { .. } => {
                diag.with_hint("a circuit cannot instantiate itself, directly or indirectly")
            }
            _ => diag,
        }
    }
}

// ── Diagnostic ───────────────────────────────────────────────────────────

/// A compiler diagnostic, fatal or not.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<DiagCode>,
    pub level: DiagLevel,
    /// Module name of the circuit the finding belongs to.
    pub circuit: Option<String>,
    pub message: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with no code, location, or hint.
    pub fn new(level: DiagLevel, message: impl Into<String>) -> Self {
        Self {
            code: None,
            level,
            circuit: None,
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a stable diagnostic code.
    pub fn with_code(mut self, code: DiagCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach the circuit (module name) the finding belongs to.
    pub fn in_circuit(mut self, circuit: impl Into<String>) -> Self {
        self.circuit = Some(circuit.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagLevel::Error => "error",
            DiagLevel::Warning => "warning",
        };
        if let Some(code) = &self.code {
            write!(f, "{}[{}]: {}", level, code, self.message)?;
        } else {
            write!(f, "{}: {}", level, self.message)?;
        }
        if let Some(circuit) = &self.circuit {
            write!(f, "\n  --> {}", circuit)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

impl From<&CompileError> for Diagnostic {
    fn from(err: &CompileError) -> Self {
        err.to_diagnostic()
    }
}
