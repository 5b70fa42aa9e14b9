use clap::Parser;
use miette::Result;
use polished::cli::{Cli, Commands};
use polished::output::Printer;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Info(args) => polished::cli::info::run(args, &printer)?,
        Commands::Check(args) => polished::cli::check::run(args, &printer)?,
        Commands::Resize(args) => polished::cli::resize::run(args, &printer)?,
        Commands::Fill(args) => polished::cli::fill::run(args, &printer)?,
        Commands::Completions(args) => polished::cli::completions::run(args)?,
    }

    Ok(())
}
