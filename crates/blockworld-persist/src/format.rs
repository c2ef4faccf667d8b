/// Magic bytes identifying a Block World save file.
pub const MAGIC: [u8; 4] = *b"BWLD";

/// Current save format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Payload is LZ4 block-compressed. Without it the payload is raw JSON.
pub const FLAG_LZ4: u16 = 1 << 0;

/// Largest inflated payload a save may declare.
pub const MAX_RAW_LEN: usize = 256 * 1024 * 1024;

/// LZ4 block output never exceeds this multiple of its input.
pub const LZ4_MAX_RATIO: usize = 255;

/// Every flag this version understands.
pub const KNOWN_FLAGS: u16 = FLAG_LZ4;

/// Save file header. Fixed 32 bytes, repr(C) for byte-level serialization.
///
/// The payload that follows is a JSON object with one key per snapshot
/// field, `payload_len` bytes on disk and `raw_len` bytes once inflated.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SaveHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub flags: u16,
    /// Identity of the world the save belongs to, see `compat::world_hash`.
    pub world_hash: u64,
    pub tick_count: u64,
    pub payload_len: u32,
    pub raw_len: u32,
}
