//! oasgate CLI entry point.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use oasgate::config::read_contract_config;

#[derive(Parser)]
#[command(
    name = "oasgate",
    version,
    about = "Compile OpenAPI contracts into typed, validated server artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate validation and routing artifacts from the configured OpenAPI spec
    Compile(CompileArgs),
}

#[derive(Args, Debug, Clone)]
struct CompileArgs {
    /// Project root containing oasgate.toml
    #[arg(long = "project-root", value_name = "DIR", default_value = ".")]
    project_root: PathBuf,
}

fn main() {
    oasgate::init_tracing();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Compile(args) => run_compile(&args),
    };
    std::process::exit(code);
}

fn run_compile(args: &CompileArgs) -> i32 {
    match compile_project(&args.project_root) {
        Ok(()) => {
            println!("regenerated");
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn compile_project(project_root: &Path) -> Result<(), String> {
    let config = read_contract_config(project_root)?;

    let spec_path = project_root.join(&config.spec_path);
    let document_text = fs::read_to_string(&spec_path)
        .map_err(|err| format!("Failed to read {}: {err}", spec_path.display()))?;

    let output_dir = project_root.join(&config.output_path);
    oasgate::compile_to_dir(&document_text, &output_dir).map_err(|err| err.to_string())
}
