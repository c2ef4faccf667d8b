use blockworld_core::config::SimConfig;

use crate::error::PersistError;
use crate::format::{SaveHeader, FORMAT_VERSION, KNOWN_FLAGS, MAGIC};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Identity of a generated world: seed and grid shape, FNV-1a hashed.
///
/// Two sessions with the same hash start from the same terrain and
/// structure lists, so a save made in one restores cleanly into the other.
pub fn world_hash(config: &SimConfig) -> u64 {
    let mut hash = FNV_OFFSET;
    let mut feed = |bytes: &[u8]| {
        for b in bytes {
            hash ^= u64::from(*b);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    };
    feed(&config.seed.to_le_bytes());
    feed(&config.world_rows.to_le_bytes());
    feed(&config.world_cols.to_le_bytes());
    feed(&config.tile_size.to_le_bytes());
    hash
}

/// Validate a save file header and return any compatibility warnings.
///
/// Returns Ok(warnings) on success, Err on fatal errors.
/// A world hash mismatch produces a warning, not an error.
pub fn validate_header(
    header: &SaveHeader,
    current_world_hash: u64,
) -> Result<Vec<String>, PersistError> {
    if header.magic != MAGIC {
        return Err(PersistError::InvalidMagic);
    }

    if header.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    if header.flags & !KNOWN_FLAGS != 0 {
        return Err(PersistError::UnknownFlags(header.flags));
    }

    let mut warnings = Vec::new();

    // Different world: fields that depend on the terrain may be rejected on restore.
    if header.world_hash != current_world_hash {
        warnings.push(format!(
            "save was made for a different world \
             (save: {:016x}, current: {:016x})",
            header.world_hash, current_world_hash
        ));
    }

    Ok(warnings)
}
