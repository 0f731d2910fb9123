// ports.rs — Module port extraction
//
// A circuit's ports are its input and output blocks, named by sanitized
// block id, in block order.

use crate::project::{BlockKind, Graph, Ports};
use crate::sanitize::Sanitizer;

pub fn extract_ports(graph: &Graph, sanitizer: &Sanitizer) -> Ports {
    let mut ports = Ports::default();
    for block in &graph.blocks {
        match block.kind {
            BlockKind::Input { .. } => ports.inputs.push(sanitizer.sanitize(&block.id, false)),
            BlockKind::Output { .. } => ports.outputs.push(sanitizer.sanitize(&block.id, false)),
            _ => {}
        }
    }
    ports
}
