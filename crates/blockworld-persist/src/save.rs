use blockworld_sim::{Session, SessionSnapshot};

use crate::compat::world_hash;
use crate::compress;
use crate::error::PersistError;
use crate::format::*;

/// Serialize a snapshot into the save binary format.
///
/// Layout: header (32B) + LZ4-compressed JSON object, one key per field.
pub fn save(snapshot: &SessionSnapshot, world_hash: u64) -> Result<Vec<u8>, PersistError> {
    let json = serde_json::to_vec(snapshot)?;
    encode(&json, snapshot.tick.unwrap_or(0), world_hash)
}

/// Capture a session and serialize it.
pub fn save_session(session: &Session) -> Result<Vec<u8>, PersistError> {
    save(&session.capture(), world_hash(session.config()))
}

/// Wrap an already serialized payload with a header.
pub fn encode(json: &[u8], tick_count: u64, world_hash: u64) -> Result<Vec<u8>, PersistError> {
    if json.len() > MAX_RAW_LEN {
        return Err(PersistError::PayloadTooLarge(json.len()));
    }
    let compressed = compress::compress_payload(json);
    let raw_len = u32::try_from(json.len()).map_err(|_| PersistError::PayloadTooLarge(json.len()))?;
    let payload_len = u32::try_from(compressed.len())
        .map_err(|_| PersistError::PayloadTooLarge(compressed.len()))?;

    let header = SaveHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        flags: FLAG_LZ4,
        world_hash,
        tick_count,
        payload_len,
        raw_len,
    };

    let mut output = Vec::with_capacity(HEADER_SIZE + compressed.len());
    output.extend_from_slice(bytemuck::bytes_of(&header));
    output.extend_from_slice(&compressed);
    log::debug!(
        "save encoded: {} bytes JSON, {} bytes on disk",
        json.len(),
        output.len()
    );
    Ok(output)
}
