pub mod check;
pub mod completions;
pub mod fill;
pub mod info;
pub mod resize;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::error::{PolishedError, Result};
use crate::project::{MapGuess, Project};

/// polished - metatile and map tool for Game Boy disassembly projects
#[derive(Parser, Debug)]
#[command(name = "polished")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what the project says about a map
    Info(info::InfoArgs),

    /// Check a map against its blockset and graphics
    Check(check::CheckArgs),

    /// Resize a map
    Resize(resize::ResizeArgs),

    /// Flood fill a region of a map with one block
    Fill(fill::FillArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// The map file plus flags that override guessed values.
#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    /// The .blk file
    pub blk: PathBuf,

    /// Map width in blocks
    #[arg(long, requires = "height")]
    pub width: Option<usize>,

    /// Map height in blocks
    #[arg(long, requires = "width")]
    pub height: Option<usize>,

    /// Tileset name
    #[arg(long, short)]
    pub tileset: Option<String>,

    /// Roof graphics name
    #[arg(long)]
    pub roof: Option<String>,
}

impl MapArgs {
    /// Find the project and guess the map, with flags taking priority.
    pub fn resolve(&self) -> Result<(Project, MapGuess)> {
        if !self.blk.is_file() {
            return Err(PolishedError::Io {
                path: self.blk.clone(),
                message: "file not found".to_string(),
            });
        }
        let project = Project::discover(&absolute(&self.blk))?;
        let mut guess = project.resolve_map(&self.blk);
        self.apply(&mut guess);
        Ok((project, guess))
    }

    fn apply(&self, guess: &mut MapGuess) {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            guess.size = Some((width, height));
        }
        if let Some(tileset) = &self.tileset {
            guess.attributes.tileset = tileset.clone();
        }
        if self.roof.is_some() {
            guess.attributes.roof = self.roof.clone();
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
