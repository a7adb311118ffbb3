// ---------------------------------------------------------------------------
// file_header – Road save header with magic bytes, version, and checksum
// ---------------------------------------------------------------------------
//
// Header format (28 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "SRDS"
//   [4..8]   Header format version (u32)
//   [8..12]  Flags (u32: bit 0 = payload is LZ4 compressed)
//   [12..20] Timestamp (Unix epoch, u64)
//   [20..24] Size of the encoded road before compression (u32)
//   [24..28] xxHash32 checksum of the payload (everything after the header)

use xxhash_rust::xxh32::xxh32;

use crate::save_error::SaveError;

/// Magic bytes identifying a road save file.
pub const MAGIC: [u8; 4] = *b"SRDS";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 28;

/// Layout version of the header itself, distinct from the road schema version.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Payload is LZ4 compressed with a prepended size.
pub const FLAG_COMPRESSED: u32 = 1;

const XXHASH_SEED: u32 = 0;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub timestamp: u64,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    /// Create a header for `payload`, which decodes to `uncompressed_size` bytes.
    pub fn new(payload: &[u8], flags: u32, uncompressed_size: u32) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            format_version: HEADER_FORMAT_VERSION,
            flags,
            timestamp,
            uncompressed_size,
            checksum: xxh32(payload, XXHASH_SEED),
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }
}

/// Prepend a header to `payload`. Returns `[header (28 bytes)] ++ [payload]`.
pub fn wrap_with_header(payload: &[u8], flags: u32, uncompressed_size: u32) -> Vec<u8> {
    let header = FileHeader::new(payload, flags, uncompressed_size);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());

    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&header.format_version.to_le_bytes());
    out.extend_from_slice(&header.flags.to_le_bytes());
    out.extend_from_slice(&header.timestamp.to_le_bytes());
    out.extend_from_slice(&header.uncompressed_size.to_le_bytes());
    out.extend_from_slice(&header.checksum.to_le_bytes());

    out.extend_from_slice(payload);
    out
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse and validate the header, returning it with the payload that follows.
///
/// # Errors
///
/// Returns `SaveError::CorruptHeader` if the magic bytes are missing, the
/// buffer is shorter than a header, or the checksum does not match, and
/// `SaveError::VersionMismatch` for a header written by a newer build.
pub fn unwrap_header(bytes: &[u8]) -> Result<(FileHeader, &[u8]), SaveError> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(SaveError::CorruptHeader(
            "missing SRDS magic bytes".to_string(),
        ));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(SaveError::CorruptHeader(format!(
            "file is too short ({} bytes, need at least {} for header)",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let format_version = read_u32(bytes, 4);
    let flags = read_u32(bytes, 8);
    let timestamp = u64::from(read_u32(bytes, 12)) | (u64::from(read_u32(bytes, 16)) << 32);
    let uncompressed_size = read_u32(bytes, 20);
    let checksum = read_u32(bytes, 24);

    if format_version > HEADER_FORMAT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: HEADER_FORMAT_VERSION,
            found: format_version,
        });
    }

    let payload = &bytes[HEADER_SIZE..];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != checksum {
        return Err(SaveError::CorruptHeader(format!(
            "checksum mismatch (expected {checksum:#010X}, got {computed:#010X})"
        )));
    }

    Ok((
        FileHeader {
            format_version,
            flags,
            timestamp,
            uncompressed_size,
            checksum,
        },
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_and_unwrap_roundtrip() {
        let data = b"encoded road bytes";
        let wrapped = wrap_with_header(data, 0, data.len() as u32);

        assert_eq!(&wrapped[..4], b"SRDS");
        assert_eq!(wrapped.len(), HEADER_SIZE + data.len());

        let (header, payload) = unwrap_header(&wrapped).expect("unwrap should succeed");
        assert_eq!(header.format_version, HEADER_FORMAT_VERSION);
        assert!(!header.is_compressed());
        assert_eq!(header.uncompressed_size, data.len() as u32);
        assert_eq!(payload, data);
    }

    #[test]
    fn test_compressed_flag_is_preserved() {
        let wrapped = wrap_with_header(b"xyz", FLAG_COMPRESSED, 100);
        let (header, _) = unwrap_header(&wrapped).unwrap();
        assert!(header.is_compressed());
        assert_eq!(header.uncompressed_size, 100);
    }

    #[test]
    fn test_timestamp_is_recent() {
        let wrapped = wrap_with_header(b"t", 0, 1);
        let (header, _) = unwrap_header(&wrapped).unwrap();
        // 2020-01-01 in Unix seconds.
        assert!(header.timestamp > 1_577_836_800);
    }

    #[test]
    fn test_missing_magic_is_rejected() {
        let err = unwrap_header(b"\x00\x01\x02\x03raw bitcode").unwrap_err();
        assert!(matches!(err, SaveError::CorruptHeader(_)), "got: {err}");
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        let err = unwrap_header(b"SRDS\x01\x00").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("too short"), "got: {msg}");
    }

    #[test]
    fn test_checksum_mismatch_is_rejected() {
        let mut wrapped = wrap_with_header(b"intersection data", 0, 17);
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xFF;
        let err = unwrap_header(&wrapped).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("checksum mismatch"), "got: {msg}");
    }

    #[test]
    fn test_newer_header_version_is_rejected() {
        let mut wrapped = wrap_with_header(b"abc", 0, 3);
        wrapped[4..8].copy_from_slice(&(HEADER_FORMAT_VERSION + 1).to_le_bytes());
        let err = unwrap_header(&wrapped).unwrap_err();
        assert!(
            matches!(err, SaveError::VersionMismatch { found, .. } if found == HEADER_FORMAT_VERSION + 1),
            "got: {err}"
        );
    }

    #[test]
    fn test_empty_payload() {
        let wrapped = wrap_with_header(&[], 0, 0);
        let (_, payload) = unwrap_header(&wrapped).unwrap();
        assert!(payload.is_empty());
    }
}
