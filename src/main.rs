use anyhow::Result;
use bmt::cli::{Cli, Commands};
use bmt::{ProjectContext, commands};
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bmt=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    match cli.command {
        Commands::Init {
            no_gitignore,
            ignore,
        } => {
            commands::init::execute(no_gitignore, &ignore)?;
        }
        Commands::FindMods {
            no_gitignore,
            ignore,
        } => {
            let ctx = ProjectContext::discover()?;
            commands::find_mods::execute(&ctx, no_gitignore, &ignore)?;
        }
        Commands::List => {
            let ctx = ProjectContext::discover()?;
            commands::list::execute(&ctx)?;
        }
        Commands::Include { name } => {
            let ctx = ProjectContext::discover()?;
            commands::select::execute(&ctx, &name, true)?;
        }
        Commands::Exclude { name } => {
            let ctx = ProjectContext::discover()?;
            commands::select::execute(&ctx, &name, false)?;
        }
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
        }
    }

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
