use blockworld_sim::{RestoreReport, Session, SessionSnapshot};
use serde_json::{Map, Value};

use crate::compat::{self, world_hash};
use crate::compress;
use crate::error::PersistError;
use crate::format::*;

/// Parsed save file data ready for restoring into a session.
#[derive(Debug, Clone)]
pub struct SaveData {
    pub header: SaveHeader,
    /// Every field that decoded. Broken fields are left empty.
    pub snapshot: SessionSnapshot,
    /// Compatibility and per-field decoding warnings.
    pub warnings: Vec<String>,
}

/// Load and parse a save file from raw bytes.
pub fn load(bytes: &[u8], current_world_hash: u64) -> Result<SaveData, PersistError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PersistError::FileTooSmall(bytes.len(), HEADER_SIZE));
    }

    let header: SaveHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    let mut warnings = compat::validate_header(&header, current_world_hash)?;

    let payload_end = HEADER_SIZE + header.payload_len as usize;
    if bytes.len() < payload_end {
        return Err(PersistError::TruncatedFile {
            expected: payload_end,
            actual: bytes.len(),
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    let json = if header.flags & FLAG_LZ4 != 0 {
        compress::decompress_payload(payload, header.raw_len as usize)?
    } else {
        payload.to_vec()
    };

    let Value::Object(fields) = serde_json::from_slice::<Value>(&json)? else {
        return Err(PersistError::PayloadNotObject);
    };
    let snapshot = decode_fields(fields, &mut warnings);

    Ok(SaveData {
        header,
        snapshot,
        warnings,
    })
}

/// Decode each field on its own so one bad value does not sink the rest.
fn decode_fields(fields: Map<String, Value>, warnings: &mut Vec<String>) -> SessionSnapshot {
    let mut snapshot = SessionSnapshot::default();
    for (key, value) in fields {
        if value.is_null() {
            continue;
        }
        let mut single = Map::new();
        single.insert(key.clone(), value);
        match serde_json::from_value::<SessionSnapshot>(Value::Object(single)) {
            Ok(part) if part.is_empty() => {
                log::warn!("save field {key}: unknown, ignored");
                warnings.push(format!("{key}: unknown field ignored"));
            }
            Ok(part) => snapshot.merge(part),
            Err(e) => {
                log::warn!("save field {key}: {e}");
                warnings.push(format!("{key}: dropped ({e})"));
            }
        }
    }
    snapshot
}

/// Load a save and apply it to `session`. Decoding warnings come first in
/// the returned report, followed by restore warnings.
pub fn load_into(session: &mut Session, bytes: &[u8]) -> Result<RestoreReport, PersistError> {
    let data = load(bytes, world_hash(session.config()))?;
    let mut report = session.restore(data.snapshot);
    let mut warnings = data.warnings;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{encode, save, save_session};
    use blockworld_core::config::SimConfig;
    use blockworld_core::tile::Tile;
    use blockworld_core::types::{Difficulty, GameMode, WorldPreset};
    use blockworld_sim::TickInput;
    use glam::Vec2;

    fn session() -> Session {
        let config = SimConfig {
            world_rows: 30,
            world_cols: 40,
            ..SimConfig::default()
        };
        Session::new(config, WorldPreset::Normal, Difficulty::Normal, GameMode::Survival)
            .expect("valid config")
    }

    #[test]
    fn test_session_save_load_roundtrip() {
        let mut played = session();
        for _ in 0..25 {
            played.tick(&TickInput::moving(Vec2::new(0.0, 1.0)));
        }
        let bytes = save_session(&played).expect("save should succeed");

        let mut fresh = session();
        let report = load_into(&mut fresh, &bytes).expect("load should succeed");
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!(fresh.capture(), played.capture());
    }

    #[test]
    fn test_bad_field_dropped_others_kept() {
        let json = br#"{"tick": 12, "health": "lots", "grid": {"rows": 1, "cols": 1, "tiles": [200]}}"#;
        let bytes = encode(json, 12, 7).expect("encode");
        let data = load(&bytes, 7).expect("load should succeed");
        assert_eq!(data.snapshot.tick, Some(12));
        assert_eq!(data.snapshot.health, None);
        assert_eq!(data.snapshot.grid, None);
        assert_eq!(data.warnings.len(), 2);
    }

    #[test]
    fn test_unknown_and_null_fields() {
        let json = br#"{"camera_zoom": 2.0, "drops": null, "blood_moon": true}"#;
        let bytes = encode(json, 0, 7).expect("encode");
        let data = load(&bytes, 7).expect("load should succeed");
        assert_eq!(data.snapshot.present_fields(), vec!["blood_moon"]);
        assert_eq!(data.warnings.len(), 1);
        assert!(data.warnings[0].starts_with("camera_zoom"));
    }

    #[test]
    fn test_world_mismatch_warns_and_restores_what_fits() {
        let snapshot = SessionSnapshot {
            grid: Some(blockworld_sim::GridSnapshot {
                rows: 3,
                cols: 3,
                tiles: vec![Tile::Stone; 9],
            }),
            tick: Some(99),
            ..SessionSnapshot::default()
        };
        let bytes = save(&snapshot, 0xDEAD).expect("save");
        let mut target = session();
        let report = load_into(&mut target, &bytes).expect("load should succeed");
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("different world"));
        assert!(report.warnings[1].starts_with("grid"));
        assert_eq!(target.tick_count(), 99);
    }

    #[test]
    fn test_payload_not_object_rejected() {
        let bytes = encode(b"[1, 2, 3]", 0, 0).expect("encode");
        assert!(matches!(load(&bytes, 0), Err(PersistError::PayloadNotObject)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let bytes = encode(b"{not json", 0, 0).expect("encode");
        assert!(matches!(load(&bytes, 0), Err(PersistError::Json(_))));
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut data = vec![0u8; HEADER_SIZE];
        data[0..4].copy_from_slice(b"NOPE");
        let result = load(&data, 0);
        assert!(matches!(result, Err(PersistError::InvalidMagic)));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let bytes = encode(br#"{"tick": 1}"#, 1, 0).expect("encode");
        let cut = &bytes[..bytes.len() - 1];
        assert!(matches!(load(cut, 0), Err(PersistError::TruncatedFile { .. })));
    }

    #[test]
    fn test_file_too_small_rejected() {
        let result = load(&[0u8; 10], 0);
        assert!(matches!(result, Err(PersistError::FileTooSmall(10, 32))));
    }

    #[test]
    fn test_uncompressed_payload_accepted() {
        let json = br#"{"tick": 3}"#;
        let header = SaveHeader {
            magic: MAGIC,
            version: FORMAT_VERSION,
            flags: 0,
            world_hash: 0,
            tick_count: 3,
            payload_len: json.len() as u32,
            raw_len: json.len() as u32,
        };
        let mut bytes = bytemuck::bytes_of(&header).to_vec();
        bytes.extend_from_slice(json);
        let data = load(&bytes, 0).expect("load should succeed");
        assert_eq!(data.snapshot.tick, Some(3));
    }

    #[test]
    fn test_corrupt_raw_length_rejected() {
        let mut bytes = encode(br#"{"tick": 1}"#, 1, 0).expect("encode");
        bytes[28..32].copy_from_slice(&u32::MAX.to_ne_bytes());
        assert!(matches!(load(&bytes, 0), Err(PersistError::RawLengthTooLarge { .. })));
    }
}
