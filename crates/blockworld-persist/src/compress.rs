use crate::error::PersistError;
use crate::format::{LZ4_MAX_RATIO, MAX_RAW_LEN};

/// Compress the JSON payload. The inflated length travels in the header.
pub fn compress_payload(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress(data)
}

/// Inflate a payload, validating the output size against the header.
///
/// `raw_len` is checked against what `compressed` could possibly expand to
/// before any buffer is allocated.
pub fn decompress_payload(compressed: &[u8], raw_len: usize) -> Result<Vec<u8>, PersistError> {
    let limit = compressed.len().saturating_mul(LZ4_MAX_RATIO).min(MAX_RAW_LEN);
    if raw_len > limit {
        return Err(PersistError::RawLengthTooLarge {
            declared: raw_len,
            limit,
        });
    }
    let inflated = lz4_flex::decompress(compressed, raw_len)
        .map_err(|e| PersistError::DecompressError(e.to_string()))?;

    if inflated.len() != raw_len {
        return Err(PersistError::LengthMismatch {
            expected: raw_len,
            actual: inflated.len(),
        });
    }

    Ok(inflated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let tiles: Vec<String> = (0..4000).map(|i| ((i * 7) % 9).to_string()).collect();
        format!("{{\"tiles\":[{}]}}", tiles.join(",")).into_bytes()
    }

    #[test]
    fn test_compress_decompress_roundtrip() {
        let data = sample();
        let compressed = compress_payload(&data);
        let inflated = decompress_payload(&compressed, data.len()).expect("decompress should succeed");
        assert_eq!(data, inflated);
    }

    #[test]
    fn test_uniform_grid_compresses_well() {
        let tiles = vec!["1"; 20_000].join(",");
        let data = format!("{{\"tiles\":[{tiles}]}}").into_bytes();
        let compressed = compress_payload(&data);
        assert!(
            compressed.len() < data.len() / 10,
            "uniform grass should compress to <10% (got {} of {} bytes)",
            compressed.len(),
            data.len()
        );
    }

    #[test]
    fn test_wrong_raw_length_rejected() {
        let data = sample();
        let compressed = compress_payload(&data);
        let result = decompress_payload(&compressed, data.len() + 10);
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_raw_length_rejected_before_inflating() {
        let compressed = compress_payload(&sample());
        let result = decompress_payload(&compressed, u32::MAX as usize);
        assert!(matches!(
            result,
            Err(PersistError::RawLengthTooLarge { declared, .. }) if declared == u32::MAX as usize
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let result = decompress_payload(&[0xFF, 0xFF, 0xFF, 0x00], 64);
        assert!(result.is_err());
    }
}
