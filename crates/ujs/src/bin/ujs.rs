use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ujs::{Compiler, MathOp, RuntimeConfig};

#[derive(Debug, Parser)]
#[command(version, about = "UnleashedJS native runtime tools")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the runtime greeting and system information
    Info,
    /// Run the compiler against the built-in demo source
    Demo,
    /// Apply a fast-math operation (add, sub, mul, div)
    #[command(allow_negative_numbers = true)]
    Math { a: f64, b: f64, op: MathOp },
    /// Print the CPU cycle counter
    Cycles,
    /// Compile a source file and print the report
    Compile {
        /// UnleashedJS source file
        path: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn math_line(a: f64, b: f64, op: MathOp) -> String {
    format!("{a} {op} {b} = {:.2}", ujs::fast_math(a, b, op))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info => {
            let config = RuntimeConfig::default();
            config.validate()?;
            println!("{}", ujs::hello());
            println!();
            println!("{}", ujs::system_info(&config));
        }
        Commands::Demo => {
            let compiler = Compiler::new();
            println!("UnleashedJS Compiler Demo");
            println!("===============================");
            println!();
            println!("{}", compiler.banner());
            print!("{}", compiler.run_demo());
        }
        Commands::Math { a, b, op } => {
            println!("{}", math_line(a, b, op));
        }
        Commands::Cycles => {
            println!("{}", ujs::cpu_cycles());
        }
        Commands::Compile { path } => {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            log::info!("compiling {} ({} bytes)", path.display(), source.len());
            print!("{}", Compiler::new().compile(&source));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
