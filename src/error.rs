//! Load-time error types
//!
//! The simulation itself never fails at runtime; only handing it a malformed
//! arena or unreadable tuning file does.

use thiserror::Error;

/// Problems with an arena handed over by the Arena Provider.
#[derive(Debug, Error, PartialEq)]
pub enum ArenaError {
    #[error("arena has no tiles")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("tile data length {found} does not match {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        found: usize,
    },

    #[error("border tile ({x}, {y}) is not a wall")]
    OpenBorder { x: usize, y: usize },

    #[error("unknown arena glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph {
        glyph: char,
        line: usize,
        column: usize,
    },

    #[error("arena has no player spawn")]
    MissingPlayerSpawn,

    #[error("arena has more than one player spawn")]
    DuplicatePlayerSpawn,

    #[error("player spawn ({x}, {y}) is not on a floor tile")]
    SpawnOnWall { x: f32, y: f32 },
}

/// Problems reading gameplay tuning.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("setting `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
