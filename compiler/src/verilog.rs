// verilog.rs — Verilog generation for a circuit project
//
// Emits, in order: one module per dependency (recursively, each namespaced
// under its parent's module name), one module per inline code block, and
// finally the circuit's own module. Modules are separated by a blank line.
//
// Preconditions: none; in strict mode the structural checker runs first.
// Postconditions: identical projects produce byte-identical text.
// Failure modes: first structural error (strict), dependency cycles and an
//                empty module name (always).
// Side effects: debug-level tracing per emitted module.

use crate::body::{build_body, child_module_name};
use crate::check::check_project;
use crate::diag::CompileError;
use crate::module::render_module;
use crate::pipeline::CompileOptions;
use crate::ports::extract_ports;
use crate::project::{BlockKind, Project, CODE};
use crate::sanitize::Sanitizer;

/// Compile `project` as top-level module `name` with default options.
pub fn compile_circuit(name: &str, project: &Project) -> Result<String, CompileError> {
    compile_circuit_with(name, project, &CompileOptions::new(name))
}

/// Compile `project` as top-level module `name`.
///
/// `options.top` is ignored here; `name` wins.
pub fn compile_circuit_with(
    name: &str,
    project: &Project,
    options: &CompileOptions,
) -> Result<String, CompileError> {
    if options.strict {
        let report = check_project(name, project, &options.sanitizer);
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }
        report.into_result()?;
    } else if name.is_empty() {
        return Err(CompileError::malformed("top-level module name is empty"));
    }

    let emitter = Emitter {
        sanitizer: &options.sanitizer,
    };
    let mut ancestors = Vec::new();
    emitter.circuit(name, project, &mut ancestors)
}

struct Emitter<'a> {
    sanitizer: &'a Sanitizer,
}

impl Emitter<'_> {
    fn circuit(
        &self,
        name: &str,
        project: &Project,
        ancestors: &mut Vec<String>,
    ) -> Result<String, CompileError> {
        let mut code = String::new();

        // Dependency modules
        for (type_name, sub) in &project.deps {
            if let Some(pos) = ancestors.iter().position(|t| t == type_name) {
                let mut chain = ancestors[pos..].to_vec();
                chain.push(type_name.clone());
                return Err(CompileError::CyclicDependency { chain });
            }
            ancestors.push(type_name.clone());
            let child = child_module_name(name, type_name, self.sanitizer);
            code.push_str(&self.circuit(&child, sub, ancestors)?);
            code.push('\n');
            ancestors.pop();
        }

        // Code modules
        for block in &project.graph.blocks {
            if let BlockKind::Code { ports, code: body } = &block.kind {
                let module = child_module_name(name, CODE, self.sanitizer);
                tracing::debug!(module = %module, block = %block.id, "emitting code module");
                code.push_str(&render_module(&module, ports, body));
                code.push('\n');
            }
        }

        // Circuit module
        tracing::debug!(
            module = name,
            blocks = project.graph.blocks.len(),
            wires = project.graph.wires.len(),
            "emitting circuit module"
        );
        let ports = extract_ports(&project.graph, self.sanitizer);
        let body = build_body(name, &project.graph, self.sanitizer);
        code.push_str(&render_module(name, &ports, &body));

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Block, Graph, Ports, Wire};

    fn inverter() -> Block {
        Block::code(
            "inv",
            Ports {
                inputs: vec!["a".into()],
                outputs: vec!["q".into()],
            },
            "assign q = ~a;",
        )
    }

    fn not_dep() -> Project {
        Project::new(Graph::new(
            vec![Block::input("a"), inverter(), Block::output("q")],
            vec![Wire::new("a", "out", "inv", "a"), Wire::new("inv", "q", "q", "in")],
        ))
    }

    #[test]
    fn code_block_module_precedes_circuit_module() {
        let project = Project::new(Graph::new(
            vec![Block::input("a"), inverter(), Block::output("q")],
            vec![Wire::new("a", "out", "inv", "a"), Wire::new("inv", "q", "q", "in")],
        ));
        let v = compile_circuit("main", &project).unwrap();
        assert_eq!(
            v,
            "module main_vf83e2f (input a, output q);\n assign q = ~a;\nendmodule\n\
             \n\
             module main (input a, output q);\n wire w0;\n wire w1;\n assign w0 = a;\n assign q = w1;\n main_vf83e2f inv (\n   .a(w0),\n   .q(w1)\n );\nendmodule\n"
        );
    }

    #[test]
    fn dependencies_are_namespaced_under_the_parent() {
        let project = Project::new(Graph::new(
            vec![Block::input("sw"), Block::compound("g", "logic.not"), Block::output("led")],
            vec![Wire::new("sw", "out", "g", "a"), Wire::new("g", "q", "led", "in")],
        ))
        .with_dep("logic.not", not_dep());
        let v = compile_circuit("top", &project).unwrap();
        let modules: Vec<&str> = v
            .lines()
            .filter_map(|l| l.strip_prefix("module "))
            .map(|l| l.split(' ').next().unwrap())
            .collect();
        assert_eq!(modules, ["top_v7cfd8b_vf83e2f", "top_v7cfd8b", "top"]);
        assert!(v.contains(" top_v7cfd8b g (\n"));
    }

    #[test]
    fn empty_graph_renders_nothing() {
        assert_eq!(compile_circuit("main", &Project::default()).unwrap(), "");
    }

    #[test]
    fn io_only_graph_without_wires_renders_nothing() {
        let project = Project::new(Graph::new(vec![Block::input("a")], vec![]));
        assert_eq!(compile_circuit("main", &project).unwrap(), "");
    }

    #[test]
    fn empty_code_body_leaves_only_the_separator() {
        let project = Project::new(Graph::new(
            vec![Block::code(
                "c",
                Ports {
                    inputs: vec!["x".into()],
                    outputs: vec![],
                },
                "",
            )],
            vec![],
        ));
        let v = compile_circuit("main", &project).unwrap();
        assert_eq!(v, "\nmodule main ();\n main_vf83e2f c (\n );\nendmodule\n");
    }

    #[test]
    fn strict_mode_reports_the_first_error() {
        let project = Project::new(Graph::new(
            vec![Block::compound("g", "logic.xor")],
            vec![Wire::new("g", "o", "nowhere", "i")],
        ));
        let err = compile_circuit("main", &project).unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedType { .. }));
    }

    #[test]
    fn lenient_mode_emits_unresolved_instances() {
        let project = Project::new(Graph::new(vec![Block::compound("g", "logic.xor")], vec![]));
        let options = CompileOptions {
            strict: false,
            ..CompileOptions::new("main")
        };
        let v = compile_circuit_with("main", &project, &options).unwrap();
        assert_eq!(v, "module main ();\n main_vd7f852 g (\n );\nendmodule\n");
    }

    #[test]
    fn lenient_mode_still_rejects_cycles() {
        let project =
            Project::default().with_dep("a", Project::default().with_dep("a", Project::default()));
        let options = CompileOptions {
            strict: false,
            ..CompileOptions::new("main")
        };
        let err = compile_circuit_with("main", &project, &options).unwrap_err();
        assert!(matches!(err, CompileError::CyclicDependency { .. }));
    }

    #[test]
    fn output_is_deterministic() {
        let project = Project::new(Graph::new(
            vec![Block::input("sw"), Block::compound("g", "logic.not"), Block::output("led")],
            vec![Wire::new("sw", "out", "g", "a"), Wire::new("g", "q", "led", "in")],
        ))
        .with_dep("logic.not", not_dep());
        assert_eq!(
            compile_circuit("main", &project).unwrap(),
            compile_circuit("main", &project).unwrap()
        );
    }
}
