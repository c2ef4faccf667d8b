use thiserror::Error;

/// Errors raised while loading or validating a simulation config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RON parse error: {0}")]
    Parse(String),

    #[error("world is {rows}x{cols} tiles, need at least {min}x{min}")]
    WorldTooSmall { rows: u32, cols: u32, min: u32 },

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("{field} = {value} is not a probability in [0, 1]")]
    BadProbability { field: &'static str, value: f32 },
}

/// A tile id outside the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown tile id {0}")]
pub struct UnknownTileId(pub u8);
