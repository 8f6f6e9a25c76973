//! Character-grid map files: `Walls.txt`, `Props.txt`, `QuestionPos.txt`.
//!
//! One map row per line.  `// …` tails and `/* … */` spans are comments,
//! blank lines are skipped, the first remaining line fixes the width.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::world::{GridError, TileGrid};

/// Widths the map format allows.
pub const MAP_WIDTHS: [usize; 5] = [16, 32, 64, 128, 256];

#[derive(Debug, thiserror::Error)]
pub enum MapTextError {
    #[error("`{file}` has no map lines")]
    Empty { file: String },

    #[error("first line of `{file}` is {width} tiles wide; must be 16, 32, 64, 128 or 256")]
    BadWidth { file: String, width: usize },

    #[error("line {line} of `{file}` is {found} tiles wide, the first line is {expected}")]
    Ragged {
        file: String,
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("`{file}`: {source}")]
    Grid {
        file: String,
        #[source]
        source: GridError,
    },
}

fn strip_comments(line: &str) -> std::borrow::Cow<'_, str> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(/\*.*?\*/)|(//.*$)").unwrap());
    RE.replace_all(line, "")
}

/// Parse map text; `file` only names the source in errors.
pub fn parse_map_text(text: &str, file: &str) -> Result<TileGrid, MapTextError> {
    let mut rows: Vec<String> = Vec::new();

    for raw in text.lines() {
        let clean = strip_comments(raw);
        let clean = clean.trim();
        if clean.is_empty() {
            continue;
        }
        match rows.first().map(String::len) {
            None if !MAP_WIDTHS.contains(&clean.len()) => {
                return Err(MapTextError::BadWidth {
                    file: file.to_string(),
                    width: clean.len(),
                });
            }
            Some(expected) if expected != clean.len() => {
                return Err(MapTextError::Ragged {
                    file: file.to_string(),
                    line: rows.len() + 1,
                    found: clean.len(),
                    expected,
                });
            }
            _ => rows.push(clean.to_ascii_lowercase()),
        }
    }

    if rows.is_empty() {
        return Err(MapTextError::Empty {
            file: file.to_string(),
        });
    }
    TileGrid::from_rows(&rows).map_err(|source| MapTextError::Grid {
        file: file.to_string(),
        source,
    })
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
