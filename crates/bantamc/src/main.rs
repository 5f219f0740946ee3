//! Bantam Compiler - semantic analyzer for Bantam Java
//!
//! Usage: bantamc [OPTIONS] <FILES>...

use anyhow::Context;
use bantam_compiler::driver::{Pipeline, PipelineConfig};
use bantam_compiler::sema::{AnalyzerConfig, DEFAULT_MAX_FIELDS};
use clap::Parser as ClapParser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "bantamc")]
#[command(author = "Bantam Toolchain Team")]
#[command(version = "0.1.0")]
#[command(about = "Semantic analyzer for the Bantam Java teaching language", long_about = None)]
struct Args {
    /// Source files of one program (.btm)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Class that must declare the entry method
    #[arg(long, default_value = "Main")]
    main_class: String,

    /// Name of the entry method
    #[arg(long, default_value = "main")]
    main_method: String,

    /// Maximum number of fields in one class, inherited ones included
    #[arg(long, default_value_t = DEFAULT_MAX_FIELDS)]
    max_fields: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump the resolved class hierarchy
    #[arg(long)]
    dump_hierarchy: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("failed to install logger")?;

    let config = PipelineConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        dump_hierarchy: args.dump_hierarchy,
        verbose: args.verbose,
        analyzer: AnalyzerConfig {
            entry_class: args.main_class.clone(),
            entry_method: args.main_method.clone(),
            max_fields: args.max_fields,
        },
    };

    let mut pipeline = Pipeline::new(config);
    for path in &args.files {
        pipeline
            .load_file(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
    }

    if args.verbose {
        eprintln!("Analysing {} file(s)", args.files.len());
    }

    pipeline.run()?;

    if args.verbose {
        eprintln!("No semantic errors");
    }

    Ok(())
}
