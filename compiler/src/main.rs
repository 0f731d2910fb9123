use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum EmitStage {
    Verilog,
    Pcf,
    BuildInfo,
    All,
}

#[derive(Parser, Debug)]
#[command(
    name = "icecc",
    version,
    about = "Ice Circuit Compiler — compiles block-diagram circuit projects to Verilog and PCF pin constraints"
)]
struct Cli {
    /// Input .ice project file
    project: PathBuf,

    /// Name of the top-level Verilog module
    #[arg(short, long, default_value = "main")]
    top: String,

    /// Output stage
    #[arg(long, value_enum, default_value_t = EmitStage::Verilog)]
    emit: EmitStage,

    /// Output file (stdout when omitted); with `--emit all`, the stem of
    /// the `.v` and `.pcf` files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip structural checks and emit on a best-effort basis
    #[arg(long)]
    no_check: bool,

    /// Print compiler passes and timing
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "icecc=debug" } else { "icecc=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn write_output(path: Option<&Path>, text: &str) {
    match path {
        Some(path) => {
            if let Err(e) = std::fs::write(path, text) {
                eprintln!("icecc: error: {}: {}", path.display(), e);
                std::process::exit(2);
            }
            tracing::debug!("wrote {}", path.display());
        }
        None => print!("{}", text),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("project = {}", cli.project.display());
    tracing::debug!("top     = {}", cli.top);
    tracing::debug!("emit    = {:?}", cli.emit);

    if cli.emit == EmitStage::All && cli.output.is_none() {
        eprintln!("icecc: error: --emit all requires --output <STEM>");
        std::process::exit(2);
    }

    let options = icecc::CompileOptions {
        strict: !cli.no_check,
        ..icecc::CompileOptions::new(cli.top.clone())
    };

    let artifacts = match icecc::pipeline::compile_file(&cli.project, &options) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("icecc: {}", e.to_diagnostic());
            let status = if matches!(e, icecc::CompileError::Io { .. }) { 2 } else { 1 };
            std::process::exit(status);
        }
    };

    for warning in &artifacts.warnings {
        eprintln!("icecc: {}", warning);
    }

    let needs_pcf = matches!(cli.emit, EmitStage::Pcf | EmitStage::All);
    if needs_pcf && artifacts.pcf.is_none() {
        eprintln!("icecc: error: no pin constraints to emit");
        std::process::exit(1);
    }
    let pcf = artifacts.pcf.as_deref().unwrap_or_default();

    match cli.emit {
        EmitStage::Verilog => write_output(cli.output.as_deref(), &artifacts.verilog),
        EmitStage::Pcf => write_output(cli.output.as_deref(), pcf),
        EmitStage::BuildInfo => {
            write_output(cli.output.as_deref(), &artifacts.provenance.to_json())
        }
        EmitStage::All => {
            if let Some(stem) = &cli.output {
                write_output(Some(&stem.with_extension("v")), &artifacts.verilog);
                write_output(Some(&stem.with_extension("pcf")), pcf);
            }
        }
    }
}
