// pcf.rs — Pin constraint (PCF) generation
//
// One `set_io <port> <pin>` line per input/output block of the compiled
// circuit, in block order. Dependencies are not visited: only the outermost
// module's ports reach physical pins.

use crate::diag::CompileError;
use crate::project::Project;
use crate::sanitize::Sanitizer;

/// Compile pin constraints with the default sanitizer.
pub fn compile_pins(project: &Project) -> Result<String, CompileError> {
    compile_pins_with(project, &Sanitizer::default())
}

pub fn compile_pins_with(project: &Project, sanitizer: &Sanitizer) -> Result<String, CompileError> {
    let mut code = String::new();
    for block in project.graph.blocks.iter().filter(|b| b.is_io()) {
        let pin = block.pin().ok_or_else(|| CompileError::MissingPin {
            block: block.id.clone(),
        })?;
        code.push_str("set_io ");
        code.push_str(&sanitizer.sanitize(&block.id, false));
        code.push(' ');
        code.push_str(&pin.value);
        code.push('\n');
    }
    tracing::debug!(lines = code.lines().count(), "pin constraints emitted");
    Ok(code)
}
