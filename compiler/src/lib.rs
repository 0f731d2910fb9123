// icecc — Ice Circuit Compiler
//
// Library root. Compiles block-diagram circuit projects into a Verilog
// source file and a PCF pin-constraint file.

pub mod body;
pub mod check;
pub mod diag;
pub mod module;
pub mod pcf;
pub mod pipeline;
pub mod ports;
pub mod project;
pub mod sanitize;
pub mod verilog;

pub use diag::CompileError;
pub use pcf::compile_pins;
pub use pipeline::{compile_project, CompileOptions};
pub use project::Project;
pub use sanitize::sanitize;
pub use verilog::compile_circuit;
