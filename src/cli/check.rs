//! `polished check`: validate a map against its blockset.

use clap::Args;

use crate::error::{PolishedError, Result};
use crate::output::{display_path, plural, Printer};
use crate::validation::{self, ValidationResult};

use super::MapArgs;

/// Check a map against its blockset and graphics
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Load the map and its blockset and run every check.
pub fn check(args: &CheckArgs, printer: &Printer) -> Result<ValidationResult> {
    let (project, guess) = args.map.resolve()?;
    let map = project.load_map(&args.map.blk, &guess)?;
    let metatileset = project
        .load_metatileset(&guess.attributes.tileset, guess.attributes.roof.as_deref())?;

    printer.status(
        "Checking",
        &format!(
            "{} ({}x{}, {}, {})",
            display_path(&args.map.blk),
            map.width(),
            map.height(),
            guess.attributes.tileset,
            plural(metatileset.size(), "block", "blocks")
        ),
    );
    Ok(validation::validate(&metatileset, &map))
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let result = check(&args, printer)?;
    validation::print_diagnostics(printer, &result);

    if result.has_errors() || (args.strict && result.has_warnings()) {
        return Err(PolishedError::Project {
            message: format!("{} failed validation", display_path(&args.map.blk)),
            help: None,
        });
    }
    Ok(())
}
