//! Best-effort guesses of map metadata from filenames and project sources.
//!
//! Everything here works on plain text and never fails: a heuristic that
//! finds nothing returns `None` or an empty value and the caller falls back
//! to asking the user. Lines that do not match are skipped.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::types::MAX_MAP_SIZE;

const TILESET_PREFIX: &str = "TILESET_";

/// Map size and group read from a map constants file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapSize {
    pub width: usize,
    pub height: usize,
    pub group: u32,
}

/// Fields harvested from a map header record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapHeaderInfo {
    pub tileset: String,
    pub environment: String,
    pub landmark: String,
    pub palette: String,
}

/// Display names for numbered tilesets, keyed by two-digit id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilesetNames {
    /// `"01"` to `"01: JOHTO"`.
    pub pretty: BTreeMap<String, String>,
    /// `"01"` to `"johto"`.
    pub guessable: BTreeMap<String, String>,
}

/// The part of a filename before its first `.`.
pub fn map_name(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

fn is_upper_or_digit(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit()
}

fn to_constant(c: char) -> char {
    if c.is_ascii_alphanumeric() {
        c.to_ascii_uppercase()
    } else {
        '_'
    }
}

/// Map constant for a blk filename, with the trailing comma used to match
/// whole constants: `routeOne.blk` gives `ROUTE_ONE,`.
///
/// An underscore goes before an uppercase letter or digit that follows a
/// lowercase letter, and before the last capital of an uppercase run that
/// starts a new word (`RT1Entrance` gives `RT1_ENTRANCE,`).
pub fn map_constant(filename: &str) -> String {
    let mut chars = filename.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut constant = String::new();
    constant.push(first.to_ascii_uppercase());
    let mut prev = to_constant(first);

    let rest: Vec<char> = chars.take_while(|&c| c != '.').collect();
    let n = rest.len();
    for (i, &c) in rest.iter().enumerate() {
        let lower_to_upper = prev.is_ascii_lowercase() && is_upper_or_digit(c);
        let run_to_word = i + 1 < n
            && is_upper_or_digit(prev)
            && c.is_ascii_uppercase()
            && rest[i + 1].is_ascii_lowercase();
        if lower_to_upper || run_to_word {
            constant.push('_');
        }
        prev = c;
        constant.push(to_constant(c));
    }
    constant.push(',');
    constant
}

fn size_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^.+\.([0-9]+)x([0-9]+)(?:\.[A-Za-z0-9_-]+)?\.[Bb][Ll][Kk]$")
            .expect("valid size regex")
    })
}

fn tileset_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^.+\.([A-Za-z0-9_-]+)\.[Bb][Ll][Kk]$").expect("valid tileset regex")
    })
}

fn in_range(width: usize, height: usize) -> bool {
    (1..=MAX_MAP_SIZE).contains(&width) && (1..=MAX_MAP_SIZE).contains(&height)
}

/// Size embedded in a filename like `Route1.20x18.blk` or
/// `Route1.20x18.johto.blk`.
pub fn size_from_filename(filename: &str) -> Option<(usize, usize)> {
    let caps = size_regex().captures(filename)?;
    let width = caps[1].parse().ok()?;
    let height = caps[2].parse().ok()?;
    in_range(width, height).then_some((width, height))
}

/// Tileset embedded in a filename like `Route1.johto.blk`. A size token in
/// that position is not a tileset.
pub fn tileset_from_filename(filename: &str) -> Option<String> {
    let caps = tileset_regex().captures(filename)?;
    let token = &caps[1];
    let is_size = token
        .split_once('x')
        .is_some_and(|(w, h)| is_number(w) && is_number(h));
    (!is_size).then(|| token.to_string())
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Leading decimal integer of `s`, after whitespace.
fn leading_int(s: &str) -> Option<usize> {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

/// Look up a map's size in a map constants file.
///
/// `map_const NAME, W, H` lists width first; the older `mapgroup` and
/// `mapconst` directives list height first. Each `newgroup` line (but not a
/// `newgroup:` macro label) starts the next map group. Only the first line
/// naming the map is considered.
pub fn guess_map_size(filename: &str, constants: &str) -> Option<MapSize> {
    let constant = map_constant(filename);
    if constant.len() <= 1 {
        return None;
    }

    let mut group = 0;
    for line in constants.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("newgroup") {
            if !rest.starts_with(':') {
                group += 1;
            }
            continue;
        }

        let (rest, width_first) = if let Some(rest) = line.strip_prefix("map_const") {
            (rest, true)
        } else if let Some(rest) = line.strip_prefix("mapgroup") {
            (rest, false)
        } else if let Some(rest) = line.strip_prefix("mapconst") {
            (rest, false)
        } else {
            continue;
        };

        // Drop the separator after the directive
        let mut chars = rest.chars();
        chars.next();
        let Some(values) = chars.as_str().strip_prefix(constant.as_str()) else {
            continue;
        };

        let (first, second) = values.split_once(',')?;
        let (first, second) = (leading_int(first)?, leading_int(second)?);
        let (width, height) = if width_first {
            (first, second)
        } else {
            (second, first)
        };
        log::debug!("{} is {}x{} in group {}", constant, width, height, group);
        return in_range(width, height).then_some(MapSize {
            width,
            height,
            group,
        });
    }
    None
}

fn strip_comment(line: &str) -> &str {
    line.split(';').next().unwrap_or("").trim()
}

/// Normalise a header's tileset field: `TILESET_JOHTO` gives `johto`,
/// `$0a` gives `10`, `7` gives `07`. Anything else gives an empty string.
fn decode_tileset(field: &str) -> String {
    if let Some(name) = field.strip_prefix(TILESET_PREFIX) {
        name.to_ascii_lowercase()
    } else if let Some(hex) = field.strip_prefix('$') {
        u32::from_str_radix(hex, 16)
            .map(|id| format!("{:02}", id))
            .unwrap_or_default()
    } else if is_number(field) {
        format!("{:0>2}", field)
    } else {
        String::new()
    }
}

/// Find a map's record in a map headers file (`map_header` or `map`
/// directives) and decode its tileset, environment, landmark and palette.
pub fn guess_map_header(map: &str, headers: &str) -> Option<MapHeaderInfo> {
    let map = map_name(map);
    for line in headers.lines() {
        let line = strip_comment(line);
        let Some((directive, rest)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        if directive != "map_header" && directive != "map" {
            continue;
        }

        let mut fields = rest.split(',').map(str::trim);
        if fields.next() != Some(map) {
            continue;
        }
        let tileset = decode_tileset(fields.next().unwrap_or(""));
        let environment = fields.next().unwrap_or("").to_string();
        let landmark = fields.next().unwrap_or("").to_ascii_lowercase();
        // Music and phone service
        let palette = fields.nth(2).unwrap_or("").to_string();

        log::debug!("Header for {} names tileset {:?}", map, tileset);
        return Some(MapHeaderInfo {
            tileset,
            environment,
            landmark,
            palette,
        });
    }
    None
}

/// Tileset from a single-map header file: the first `db` line's operand,
/// lower-cased.
pub fn tileset_from_map_header(header: &str) -> Option<String> {
    header.lines().find_map(|line| {
        let mut tokens = strip_comment(line).split_whitespace();
        if tokens.next() != Some("db") {
            return None;
        }
        tokens.next().map(|t| t.trim_end_matches(',').to_ascii_lowercase())
    })
}

/// Number the `const` lines of a tileset constants file from 1.
pub fn tileset_names(constants: &str) -> TilesetNames {
    let mut names = TilesetNames::default();
    let mut id = 1;
    for line in constants.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("const") {
            continue;
        }
        let token = tokens.next().unwrap_or("");
        let name = token.strip_prefix(TILESET_PREFIX).unwrap_or(token);
        let key = format!("{:02}", id);
        names.pretty.insert(key.clone(), format!("{}: {}", key, name));
        names.guessable.insert(key, name.to_ascii_lowercase());
        id += 1;
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_map_constant() {
        assert_eq!(map_constant("routeOne.blk"), "ROUTE_ONE,");
        assert_eq!(map_constant("RT1Entrance"), "RT1_ENTRANCE,");
        assert_eq!(map_constant("newGameSFX"), "NEW_GAME_SFX,");
        assert_eq!(map_constant("Route1.20x18.blk"), "ROUTE_1,");
        assert_eq!(map_constant("GoldenrodPokecenter1F"), "GOLDENROD_POKECENTER_1F,");
        assert_eq!(map_constant("Mt-Moon"), "MT_MOON,");
        assert_eq!(map_constant(""), "");
    }

    #[test]
    fn test_size_from_filename() {
        assert_eq!(size_from_filename("Route1.20x18.blk"), Some((20, 18)));
        assert_eq!(size_from_filename("Route1.20x18.johto.BLK"), Some((20, 18)));
        assert_eq!(size_from_filename("Route1.0x18.blk"), None);
        assert_eq!(size_from_filename("Route1.300x18.blk"), None);
        assert_eq!(size_from_filename("Route1.blk"), None);
    }

    #[test]
    fn test_tileset_from_filename() {
        assert_eq!(tileset_from_filename("Route1.johto.blk"), Some("johto".to_string()));
        assert_eq!(tileset_from_filename("Route1.20x18.johto.blk"), Some("johto".to_string()));
        assert_eq!(tileset_from_filename("Route1.20x18.blk"), None);
        assert_eq!(tileset_from_filename("Route1.blk"), None);
    }

    #[test]
    fn test_guess_map_size_crystal() {
        let constants = "\
newgroup: MACRO
\tnewgroup ; 1
\tmap_const OLIVINE_POKECENTER_1F, 5, 4 ; 1
\tnewgroup ; 2
\tmap_const ROUTE_10, 10, 27
\tmap_const ROUTE_1, 10, 18 ; 2
";
        assert_eq!(
            guess_map_size("Route1.blk", constants),
            Some(MapSize {
                width: 10,
                height: 18,
                group: 2
            })
        );
        assert_eq!(guess_map_size("Route2.blk", constants), None);
    }

    #[test]
    fn test_guess_map_size_height_first() {
        let constants = "\tmapconst PALLET_TOWN, 9, 10\n";
        let size = guess_map_size("PalletTown.blk", constants).unwrap();
        assert_eq!((size.width, size.height), (10, 9));

        let constants = "\tmapgroup ROUTE_1, 18, 10\n";
        let size = guess_map_size("Route1.blk", constants).unwrap();
        assert_eq!((size.width, size.height), (10, 18));
    }

    #[test]
    fn test_guess_map_size_first_match_only() {
        let constants = "\tmap_const ROUTE_1, 0, 18\n\tmap_const ROUTE_1, 10, 18\n";
        assert_eq!(guess_map_size("Route1.blk", constants), None);
    }

    #[test]
    fn test_guess_map_header() {
        let headers = "\
\tmap_header OtherMap, TILESET_CAVE, CAVE, LANDMARK_Y, MUSIC, 0, PAL_GRAY
\tmap_header MyMap, TILESET_ROUTE, FOREST, LANDMARK_X, MUSIC, 0, PAL_GREEN ; comment
";
        assert_eq!(
            guess_map_header("MyMap.blk", headers),
            Some(MapHeaderInfo {
                tileset: "route".to_string(),
                environment: "FOREST".to_string(),
                landmark: "landmark_x".to_string(),
                palette: "PAL_GREEN".to_string(),
            })
        );
        assert_eq!(guess_map_header("Missing", headers), None);
    }

    #[test]
    fn test_guess_map_header_numeric_tilesets() {
        let headers = "\tmap Hex, $0a, ROUTE, LANDMARK, MUSIC, TRUE, PALETTE_DAY\n\
                       \tmap Dec, 7, ROUTE\n\
                       \tmap Odd, ?, ROUTE\n";
        assert_eq!(guess_map_header("Hex", headers).unwrap().tileset, "10");
        let dec = guess_map_header("Dec", headers).unwrap();
        assert_eq!(dec.tileset, "07");
        assert_eq!(dec.palette, "");
        assert_eq!(guess_map_header("Odd", headers).unwrap().tileset, "");
    }

    #[test]
    fn test_tileset_from_map_header() {
        let header = "PalletTown_h:\n\tdb OVERWORLD ; tileset\n\tdb PALLET_TOWN_HEIGHT\n";
        assert_eq!(tileset_from_map_header(header), Some("overworld".to_string()));
        assert_eq!(tileset_from_map_header("; nothing\n"), None);
    }

    #[test]
    fn test_tileset_names() {
        let constants = "\tconst_def 1\n\tconst TILESET_JOHTO ; 01\n\tconst TILESET_KANTO\n";
        let names = tileset_names(constants);
        assert_eq!(names.pretty["01"], "01: JOHTO");
        assert_eq!(names.pretty["02"], "02: KANTO");
        assert_eq!(names.guessable["02"], "kanto");
        assert_eq!(names.pretty.len(), 2);
    }
}
