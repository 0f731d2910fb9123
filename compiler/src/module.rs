// module.rs — Verilog module text template
//
// Renders `module NAME (PORTS);`, the body indented by one space, and
// `endmodule`.
//
// Preconditions: port names and body are already valid Verilog.
// Postconditions: output ends with "endmodule\n", or is empty.
// Failure modes: none; an empty module name or body renders nothing.
// Side effects: none.

use crate::project::Ports;

/// Render one module.
///
/// The port list declares every input, then every output, in list order.
/// The first blank line in `body` is collapsed before each body line is
/// indented, which also folds the empty binding list of an unconnected
/// instance into `(\n);`. A module with no body renders as `""`.
pub fn render_module(name: &str, ports: &Ports, body: &str) -> String {
    if name.is_empty() || body.is_empty() {
        return String::new();
    }

    let mut code = String::new();

    // Header
    code.push_str("module ");
    code.push_str(name);
    code.push_str(" (");
    code.push_str(&port_list(ports));
    code.push_str(");\n");

    // Body
    let body = body.replacen("\n\n", "\n", 1);
    let lines: Vec<String> = body.split('\n').map(|line| format!(" {line}")).collect();
    code.push_str(&lines.join("\n"));

    // Footer
    code.push_str("\nendmodule\n");
    code
}

fn port_list(ports: &Ports) -> String {
    let mut groups = Vec::with_capacity(2);
    if !ports.inputs.is_empty() {
        groups.push(join_prefixed("input", &ports.inputs));
    }
    if !ports.outputs.is_empty() {
        groups.push(join_prefixed("output", &ports.outputs));
    }
    groups.join(", ")
}

fn join_prefixed(direction: &str, names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("{direction} {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}
