//! Listing the tileset and roof graphics available in a project.

use std::path::Path;

use walkdir::WalkDir;

use super::metadata::TilesetNames;

const TILESET_DIR: &str = "gfx/tilesets";
const ROOF_DIR: &str = "gfx/tilesets/roofs";

/// Longest suffixes first so `.2bpp.unique.lz` is not cut as `.lz`.
const TILESET_EXTENSIONS: [&str; 3] = [".2bpp.unique.lz", ".2bpp.lz", ".png"];
const ROOF_EXTENSIONS: [&str; 2] = [".2bpp", ".png"];

/// Rendered previews that sit next to tileset graphics.
const PREVIEW_SUFFIX: &str = ".colored.png";

/// A tileset graphics file offered for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetChoice {
    /// Filename without its graphics extension.
    pub name: String,
    /// Display label, `"01: JOHTO"` for numbered tilesets with a known name.
    pub label: String,
}

/// Filenames directly inside `dir`, sorted.
fn file_names(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect()
}

fn strip_extension<'a>(name: &'a str, extensions: &[&str]) -> Option<&'a str> {
    extensions.iter().find_map(|ext| name.strip_suffix(ext))
}

/// Tileset graphics under `gfx/tilesets/`, one entry per name.
pub fn list_tilesets(root: &Path, names: &TilesetNames) -> Vec<TilesetChoice> {
    let mut choices: Vec<TilesetChoice> = Vec::new();
    for file in file_names(&root.join(TILESET_DIR)) {
        if file.ends_with(PREVIEW_SUFFIX) {
            continue;
        }
        let Some(name) = strip_extension(&file, &TILESET_EXTENSIONS) else {
            continue;
        };
        if choices.iter().any(|c| c.name == name) {
            continue;
        }
        let label = names
            .pretty
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string());
        choices.push(TilesetChoice {
            name: name.to_string(),
            label,
        });
    }
    choices.sort_by(|a, b| a.name.cmp(&b.name));
    choices
}

/// The choice matching a guessed tileset, by filename or by the guessable
/// name of a numbered tileset.
pub fn guess_choice<'a>(
    choices: &'a [TilesetChoice],
    guess: &str,
    names: &TilesetNames,
) -> Option<&'a TilesetChoice> {
    if guess.is_empty() {
        return None;
    }
    choices.iter().find(|c| {
        c.name == guess || names.guessable.get(&c.name).is_some_and(|g| g == guess)
    })
}

/// Roof graphics under `gfx/tilesets/roofs/`, one entry per name.
pub fn list_roofs(root: &Path) -> Vec<String> {
    let mut roofs: Vec<String> = file_names(&root.join(ROOF_DIR))
        .iter()
        .filter_map(|file| strip_extension(file, &ROOF_EXTENSIONS))
        .map(str::to_string)
        .collect();
    roofs.sort();
    roofs.dedup();
    roofs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::metadata::tileset_names;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_list_tilesets() {
        let dir = tempdir().unwrap();
        for file in [
            "gfx/tilesets/johto.png",
            "gfx/tilesets/johto.2bpp.lz",
            "gfx/tilesets/johto.colored.png",
            "gfx/tilesets/01.png",
            "gfx/tilesets/generic.2bpp.unique.lz",
            "gfx/tilesets/notes.txt",
        ] {
            touch(dir.path(), file);
        }
        let names = tileset_names("\tconst TILESET_OVERWORLD\n");
        let choices = list_tilesets(dir.path(), &names);

        let listed: Vec<(&str, &str)> = choices
            .iter()
            .map(|c| (c.name.as_str(), c.label.as_str()))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("01", "01: OVERWORLD"),
                ("generic", "generic"),
                ("johto", "johto")
            ]
        );

        assert_eq!(guess_choice(&choices, "johto", &names).unwrap().name, "johto");
        assert_eq!(guess_choice(&choices, "overworld", &names).unwrap().name, "01");
        assert!(guess_choice(&choices, "kanto", &names).is_none());
        assert!(guess_choice(&choices, "", &names).is_none());
    }

    #[test]
    fn test_list_roofs() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "gfx/tilesets/roofs/violet.2bpp");
        touch(dir.path(), "gfx/tilesets/roofs/violet.png");
        touch(dir.path(), "gfx/tilesets/roofs/azalea.png");
        assert_eq!(list_roofs(dir.path()), vec!["azalea", "violet"]);
    }

    #[test]
    fn test_missing_directories() {
        let dir = tempdir().unwrap();
        assert!(list_tilesets(dir.path(), &TilesetNames::default()).is_empty());
        assert!(list_roofs(dir.path()).is_empty());
    }
}
