//! JAF Compiler - static analysis frontend for JAF scripts
//!
//! Usage: jafc [OPTIONS] <input>

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser as ClapParser;
use jaf_compiler::frontend::{FrontendConfig, DEFAULT_AIN_VERSION};
use jaf_compiler::Pipeline;

#[derive(ClapParser, Debug)]
#[command(name = "jafc")]
#[command(author = "JAF Toolchain Team")]
#[command(version)]
#[command(about = "Static analysis frontend for JAF scripts targeting AIN containers", long_about = None)]
struct Args {
    /// Input source file (.jaf)
    #[arg(required = true)]
    input: PathBuf,

    /// AIN container version to target
    #[arg(long, default_value_t = DEFAULT_AIN_VERSION)]
    ain_version: u32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST after analysis (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Print the resulting struct, function and global tables
    #[arg(long)]
    dump_tables: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = FrontendConfig {
        ain_version: args.ain_version,
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        verbose: args.verbose,
    };

    if args.verbose {
        eprintln!(
            "Compiling {} (ain version {})",
            args.input.display(),
            args.ain_version
        );
    }

    let mut pipeline = Pipeline::new(config);
    let unit = pipeline
        .compile_file(&args.input)
        .with_context(|| format!("failed to compile {}", args.input.display()))?;

    if args.dump_tables {
        print!("{}", unit.ain);
    }

    if args.verbose {
        eprintln!(
            "Analyzed {}: {} structs, {} functions, {} globals, {} initvals",
            args.input.display(),
            unit.ain.structures.len(),
            unit.ain.functions.len(),
            unit.ain.globals.len(),
            unit.ain.initvals.len()
        );
    }

    Ok(())
}
