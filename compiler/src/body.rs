// body.rs — Module body generation
//
// Every wire becomes one net `w<index>`. Input and output blocks become
// `assign` statements tying the module ports to their nets; every other
// block becomes an instance of the module generated for its type, with
// named-port bindings for each wire it touches.
//
// Preconditions: `graph` passed the structural checker (unchecked graphs
//                still render; dangling endpoints simply bind nothing).
// Postconditions: net numbering, assignment order and instance order follow
//                 wire and block order exactly.
// Failure modes: none.
// Side effects: warns (tracing) about instances with no bindings.

use std::fmt::Write as _;

use crate::project::{Block, BlockKind, Graph};
use crate::sanitize::Sanitizer;

/// Name of the module generated for blocks of `type_name` inside `parent`.
pub fn child_module_name(parent: &str, type_name: &str, sanitizer: &Sanitizer) -> String {
    format!("{}_{}", parent, sanitizer.sanitize(type_name, true))
}

/// Build the body of module `circuit` from its graph.
pub fn build_body(circuit: &str, graph: &Graph, sanitizer: &Sanitizer) -> String {
    let mut content = String::new();

    // ── Nets ──
    for w in 0..graph.wires.len() {
        let _ = writeln!(content, "wire w{w};");
    }

    // ── Port assignments ──
    for (w, wire) in graph.wires.iter().enumerate() {
        for block in &graph.blocks {
            match block.kind {
                BlockKind::Input { .. } if wire.source.block == block.id => {
                    let _ = writeln!(
                        content,
                        "assign w{w} = {};",
                        sanitizer.sanitize(&block.id, false)
                    );
                }
                BlockKind::Output { .. } if wire.target.block == block.id => {
                    let _ = writeln!(
                        content,
                        "assign {} = w{w};",
                        sanitizer.sanitize(&block.id, false)
                    );
                }
                _ => {}
            }
        }
    }

    // ── Instances ──
    let instances: Vec<String> = graph
        .blocks
        .iter()
        .filter(|b| !b.is_io())
        .map(|b| instance(circuit, b, graph, sanitizer))
        .collect();
    content.push_str(&instances.join("\n"));

    content
}

fn instance(circuit: &str, block: &Block, graph: &Graph, sanitizer: &Sanitizer) -> String {
    let module = child_module_name(circuit, block.type_name(), sanitizer);
    let name = sanitizer.sanitize(&block.id, false);

    let mut bindings = Vec::new();
    for (w, wire) in graph.wires.iter().enumerate() {
        if wire.source.block == block.id {
            bindings.push(format!("  .{}(w{w})", sanitizer.sanitize(&wire.source.port, false)));
        }
        if wire.target.block == block.id {
            bindings.push(format!("  .{}(w{w})", sanitizer.sanitize(&wire.target.port, false)));
        }
    }
    if bindings.is_empty() {
        tracing::warn!(circuit, block = %block.id, "instance has no connections");
    }

    format!("{module} {name} (\n{}\n);", bindings.join(",\n"))
}
