//! Level descriptions: a named grid of glyphs, loaded from text or JSON.
//!
//! ```text
//! ; Name            optional first line
//! ' '  void         '.'  floor         '#'  wall
//! '~'  ice          'G'  goal          'B'  block
//! 'X'  block on goal                   'b'  block on ice
//! 'P'  player       'p'  player on ice
//! ```
//!
//! Other lines starting with `;` are comments. Short rows are padded with void.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::components::grid::TileId;
use crate::core::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Void,
    Floor,
    Wall,
    Ice,
    Goal,
    Block,
    BlockOnGoal,
    BlockOnIce,
    Player,
    PlayerOnIce,
}

impl Glyph {
    pub fn from_char(c: char) -> Option<Self> {
        let glyph = match c {
            ' ' => Self::Void,
            '.' => Self::Floor,
            '#' => Self::Wall,
            '~' => Self::Ice,
            'G' => Self::Goal,
            'B' => Self::Block,
            'X' => Self::BlockOnGoal,
            'b' => Self::BlockOnIce,
            'P' => Self::Player,
            'p' => Self::PlayerOnIce,
            _ => return None,
        };
        Some(glyph)
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Void => ' ',
            Self::Floor => '.',
            Self::Wall => '#',
            Self::Ice => '~',
            Self::Goal => 'G',
            Self::Block => 'B',
            Self::BlockOnGoal => 'X',
            Self::BlockOnIce => 'b',
            Self::Player => 'P',
            Self::PlayerOnIce => 'p',
        }
    }

    /// Walkability tile under this glyph; `None` for void.
    pub fn tile(self) -> Option<TileId> {
        match self {
            Self::Void => None,
            Self::Ice | Self::BlockOnIce | Self::PlayerOnIce => Some(TileId::ICE),
            Self::Goal | Self::BlockOnGoal => Some(TileId::GOAL),
            _ => Some(TileId::FLOOR),
        }
    }
}

/// A level as authored: a name and rows of glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDesc {
    #[serde(default)]
    pub name: String,
    pub rows: Vec<String>,
}

impl LevelDesc {
    /// Parse the plain-text form.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut name = String::new();
        let mut rows = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if let Some(comment) = line.strip_prefix(';') {
                if i == 0 {
                    name = comment.trim().to_string();
                }
                continue;
            }
            rows.push(line.to_string());
        }
        while rows.last().is_some_and(|r| r.trim().is_empty()) {
            rows.pop();
        }
        let desc = Self { name, rows };
        desc.validate()?;
        Ok(desc)
    }

    /// Parse the JSON form: `{ "name": "...", "rows": ["..."] }`.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let desc: LevelDesc = serde_json::from_str(json).map_err(LevelError::Json)?;
        desc.validate()?;
        Ok(desc)
    }

    pub fn width(&self) -> u32 {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Every non-void glyph with its cell, row by row.
    pub fn glyphs(&self) -> Result<Vec<(IVec2, Glyph)>, LevelError> {
        let mut out = Vec::new();
        for (row, line) in self.rows.iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                let glyph = Glyph::from_char(c).ok_or(LevelError::UnknownGlyph {
                    glyph: c,
                    row: row + 1,
                    col: col + 1,
                })?;
                if glyph != Glyph::Void {
                    out.push((IVec2::new(col as i32, row as i32), glyph));
                }
            }
        }
        Ok(out)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let glyphs = self.glyphs()?;
        if glyphs.is_empty() {
            return Err(LevelError::Empty);
        }
        let has_block = glyphs
            .iter()
            .any(|(_, g)| matches!(g, Glyph::Block | Glyph::BlockOnGoal | Glyph::BlockOnIce));
        let has_player = glyphs
            .iter()
            .any(|(_, g)| matches!(g, Glyph::Player | Glyph::PlayerOnIce));
        if has_block && !has_player {
            return Err(LevelError::NoPlayer);
        }
        Ok(())
    }
}

/// Errors raised while reading a level.
#[derive(Debug)]
pub enum LevelError {
    /// No walkable cell at all.
    Empty,
    /// A character outside the legend. `row` and `col` are 1-based.
    UnknownGlyph { glyph: char, row: usize, col: usize },
    /// Blocks were placed but nobody can push them.
    NoPlayer,
    Json(serde_json::Error),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "level has no walkable cells"),
            Self::UnknownGlyph { glyph, row, col } => {
                write!(f, "unknown glyph {glyph:?} at row {row}, column {col}")
            }
            Self::NoPlayer => write!(f, "level has blocks but no player"),
            Self::Json(err) => write!(f, "invalid level json: {err}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

/// Draw the world's current state with the level legend.
/// Movers and blocks are drawn at their resolved cell.
pub fn render_board(world: &World) -> String {
    let width = world.map.width() as i32;
    let height = world.map.height() as i32;
    let mut grid: Vec<Vec<Glyph>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| match world.map.get(IVec2::new(x, y)) {
                    None => Glyph::Void,
                    Some(_) => Glyph::Floor,
                })
                .collect()
        })
        .collect();

    for (id, _) in world.icy.iter() {
        if let Some(slot) = world.cell_of(id).and_then(|cell| slot_index(cell, width, height)) {
            grid[slot.1][slot.0] = Glyph::Ice;
        }
    }
    for (id, _) in world.goals.iter() {
        if let Some(slot) = world.cell_of(id).and_then(|cell| slot_index(cell, width, height)) {
            grid[slot.1][slot.0] = Glyph::Goal;
        }
    }
    for (id, _) in world.collidables.iter() {
        let Some((x, y)) = world.cell_of(id).and_then(|cell| slot_index(cell, width, height)) else {
            continue;
        };
        let under = grid[y][x];
        grid[y][x] = if world.inputs.contains(id) {
            if under == Glyph::Ice { Glyph::PlayerOnIce } else { Glyph::Player }
        } else if world.blocks.contains(id) || world.satisfied.contains(id) {
            match under {
                Glyph::Goal => Glyph::BlockOnGoal,
                Glyph::Ice => Glyph::BlockOnIce,
                _ => Glyph::Block,
            }
        } else {
            Glyph::Wall
        };
    }

    grid.iter()
        .map(|row| row.iter().map(|g| g.as_char()).collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn slot_index(cell: IVec2, width: i32, height: i32) -> Option<(usize, usize)> {
    (cell.x >= 0 && cell.y >= 0 && cell.x < width && cell.y < height)
        .then_some((cell.x as usize, cell.y as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_name_and_rows() {
        let desc = LevelDesc::parse("; First Steps\n#####\n#P.G#\n#####\n\n").unwrap();
        assert_eq!(desc.name, "First Steps");
        assert_eq!(desc.height(), 3);
        assert_eq!(desc.width(), 5);
    }

    #[test]
    fn unknown_glyph_reports_position() {
        let err = LevelDesc::parse("..\n.?P").unwrap_err();
        match err {
            LevelError::UnknownGlyph { glyph, row, col } => {
                assert_eq!((glyph, row, col), ('?', 2, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_and_playerless_levels_are_rejected() {
        assert!(matches!(LevelDesc::parse("   \n"), Err(LevelError::Empty)));
        assert!(matches!(LevelDesc::parse("; only a name"), Err(LevelError::Empty)));
        assert!(matches!(LevelDesc::parse("..B.G"), Err(LevelError::NoPlayer)));
    }

    #[test]
    fn json_form() {
        let desc = LevelDesc::from_json(r#"{ "name": "tiny", "rows": ["P.", ".G"] }"#).unwrap();
        assert_eq!(desc.rows, vec!["P.".to_string(), ".G".to_string()]);
        assert!(matches!(LevelDesc::from_json("{"), Err(LevelError::Json(_))));
    }

    #[test]
    fn glyph_chars_round_trip() {
        for c in [' ', '.', '#', '~', 'G', 'B', 'X', 'b', 'P', 'p'] {
            assert_eq!(Glyph::from_char(c).map(Glyph::as_char), Some(c));
        }
        assert_eq!(Glyph::Wall.tile(), Some(TileId::FLOOR));
        assert_eq!(Glyph::BlockOnIce.tile(), Some(TileId::ICE));
        assert_eq!(Glyph::Void.tile(), None);
    }
}
