// check.rs — Structural checks over a project tree
//
// Walks the project the same way the Verilog compiler does (dependencies
// first, then the circuit using them) and records every structural problem
// that would make the emitted text wrong: dangling wire endpoints, block
// types no dependency defines, dependency cycles, duplicate block ids and
// duplicate generated modules.
//
// Preconditions: none.
// Postconditions: `errors` are in traversal order; the first one is the
//                 error compilation reports.
// Failure modes: none (findings are data).
// Side effects: none.

use std::collections::HashSet;

use crate::body::child_module_name;
use crate::diag::{codes, CompileError, DiagLevel, Diagnostic};
use crate::ports::extract_ports;
use crate::project::{Block, BlockKind, Project, CODE};
use crate::sanitize::Sanitizer;

/// Findings of one check run.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub errors: Vec<CompileError>,
    pub warnings: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// All findings as diagnostics, errors first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(CompileError::to_diagnostic)
            .chain(self.warnings.iter().cloned())
            .collect()
    }

    /// The error compilation reports: the first one in traversal order.
    pub fn first_error(&self) -> Option<&CompileError> {
        self.errors.first()
    }

    /// The first error, or the warnings when there is none.
    pub fn into_result(self) -> Result<Vec<Diagnostic>, CompileError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.warnings),
        }
    }
}

/// Check the project compiled as top-level module `name`.
pub fn check_project(name: &str, project: &Project, sanitizer: &Sanitizer) -> CheckReport {
    let mut checker = Checker {
        sanitizer,
        report: CheckReport::default(),
        ancestors: Vec::new(),
    };
    if name.is_empty() {
        checker
            .report
            .errors
            .push(CompileError::malformed("top-level module name is empty"));
    }
    checker.circuit(name, project);
    checker.report
}

struct Checker<'a> {
    sanitizer: &'a Sanitizer,
    report: CheckReport,
    /// Dependency type names from the top-level project down to the current one.
    ancestors: Vec<String>,
}

#[derive(Clone, Copy)]
enum End {
    Source,
    Target,
}

impl Checker<'_> {
    fn circuit(&mut self, name: &str, project: &Project) {
        for (type_name, sub) in &project.deps {
            if let Some(pos) = self.ancestors.iter().position(|t| t == type_name) {
                let mut chain = self.ancestors[pos..].to_vec();
                chain.push(type_name.clone());
                self.report
                    .errors
                    .push(CompileError::CyclicDependency { chain });
                continue;
            }
            self.ancestors.push(type_name.clone());
            let child = child_module_name(name, type_name, self.sanitizer);
            self.circuit(&child, sub);
            self.ancestors.pop();
        }
        self.graph(name, project);
    }

    fn graph(&mut self, name: &str, project: &Project) {
        let graph = &project.graph;

        let mut seen = HashSet::new();
        for block in &graph.blocks {
            if !seen.insert(block.id.as_str()) {
                self.report.errors.push(CompileError::DuplicateBlockId {
                    circuit: name.to_string(),
                    block: block.id.clone(),
                });
            }
        }

        let mut code_blocks = 0;
        for block in &graph.blocks {
            match &block.kind {
                BlockKind::Compound { type_name } if !project.deps.contains_key(type_name) => {
                    self.report.errors.push(CompileError::UnresolvedType {
                        circuit: name.to_string(),
                        block: block.id.clone(),
                        type_name: type_name.clone(),
                    });
                }
                BlockKind::Code { .. } => code_blocks += 1,
                _ => {}
            }
        }
        if code_blocks > 1 {
            self.report.errors.push(CompileError::DuplicateModule {
                module: child_module_name(name, CODE, self.sanitizer),
            });
        }

        for (w, wire) in graph.wires.iter().enumerate() {
            for (end, endpoint) in [(End::Source, &wire.source), (End::Target, &wire.target)] {
                let problem = match graph.block(&endpoint.block) {
                    None => Some(format!("unknown block `{}`", endpoint.block)),
                    Some(block) => self.port_problem(project, block, &endpoint.port, end),
                };
                if let Some(what) = problem {
                    self.report.errors.push(CompileError::DanglingWireReference {
                        circuit: name.to_string(),
                        wire: w,
                        what,
                    });
                }
            }
        }

        for block in graph.blocks.iter().filter(|b| !b.is_io()) {
            let connected = graph
                .wires
                .iter()
                .any(|w| w.source.block == block.id || w.target.block == block.id);
            if !connected {
                self.report.warnings.push(
                    Diagnostic::new(
                        DiagLevel::Warning,
                        format!("block `{}` has no connections", block.id),
                    )
                    .with_code(codes::W0001)
                    .in_circuit(name),
                );
            }
        }
    }

    fn port_problem(&self, project: &Project, block: &Block, port: &str, end: End) -> Option<String> {
        let port_id = self.sanitizer.sanitize(port, false);
        let direction = match end {
            End::Source => "output",
            End::Target => "input",
        };

        let ok = match (&block.kind, end) {
            (BlockKind::Input { .. }, End::Source) | (BlockKind::Output { .. }, End::Target) => true,
            (BlockKind::Input { .. }, End::Target) => {
                return Some(format!("input block `{}` as a wire target", block.id));
            }
            (BlockKind::Output { .. }, End::Source) => {
                return Some(format!("output block `{}` as a wire source", block.id));
            }
            (BlockKind::Code { ports, .. }, End::Source) => declares(&ports.outputs, &port_id),
            (BlockKind::Code { ports, .. }, End::Target) => declares(&ports.inputs, &port_id),
            (BlockKind::Compound { type_name }, _) => match project.deps.get(type_name) {
                // Reported as UnresolvedType.
                None => true,
                Some(dep) => {
                    let ports = extract_ports(&dep.graph, self.sanitizer);
                    match end {
                        End::Source => declares(&ports.outputs, &port_id),
                        End::Target => declares(&ports.inputs, &port_id),
                    }
                }
            },
        };

        if ok {
            None
        } else {
            Some(format!(
                "port `{}`, which block `{}` does not declare as an {}",
                port, block.id, direction
            ))
        }
    }
}

fn declares(names: &[String], port: &str) -> bool {
    names.iter().any(|n| n == port)
}
