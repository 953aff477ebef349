mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, blocks, delete, duplicate, init, reorder, validate, AddArgs, BlocksArgs, DeleteArgs, DuplicateArgs,
    InitArgs, ReorderArgs, ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Storefront CLI - inspect and edit storefront page templates
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default storefront.config.json
    Init(InitArgs),

    /// Check template files for order and id problems
    Validate(ValidateArgs),

    /// List block types, or the blocks of a template page
    Blocks(BlocksArgs),

    /// Append a block to a page
    Add(AddArgs),

    /// Remove a block from a page
    Delete(DeleteArgs),

    /// Move a block above or below another block
    Reorder(ReorderArgs),

    /// Copy a block directly below itself
    Duplicate(DuplicateArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd).await,
        Command::Validate(args) => validate(args).await,
        Command::Blocks(args) => blocks(args).await,
        Command::Add(args) => add(args, &cwd).await,
        Command::Delete(args) => delete(args, &cwd).await,
        Command::Reorder(args) => reorder(args, &cwd).await,
        Command::Duplicate(args) => duplicate(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
