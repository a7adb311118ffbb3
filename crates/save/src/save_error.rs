// ---------------------------------------------------------------------------
// SaveError: error types for road save/load operations
// ---------------------------------------------------------------------------

use std::fmt;

use roads::RoadError;

/// Errors that can occur while saving or loading a road.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// Encoding failed.
    Encode(String),
    /// Bitcode decoding failed (corrupt or invalid save data).
    Decode(String),
    /// Save file version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// Missing magic bytes, truncated header, or checksum mismatch.
    CorruptHeader(String),
    /// LZ4 payload could not be decompressed.
    Decompress(String),
    /// Decoded data does not describe a valid road.
    InvalidRoad(RoadError),
    /// No road entity was available to save or load into.
    NoData,
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: save is v{found}, but this build only supports up to v{expected_max}"
            ),
            SaveError::CorruptHeader(msg) => write!(f, "Corrupt save file: {msg}"),
            SaveError::Decompress(msg) => write!(f, "Decompression error: {msg}"),
            SaveError::InvalidRoad(e) => write!(f, "Invalid road data: {e}"),
            SaveError::NoData => write!(f, "No road data available"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            SaveError::InvalidRoad(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<lz4_flex::block::DecompressError> for SaveError {
    fn from(e: lz4_flex::block::DecompressError) -> Self {
        SaveError::Decompress(e.to_string())
    }
}

impl From<RoadError> for SaveError {
    fn from(e: RoadError) -> Self {
        SaveError::InvalidRoad(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_display_io() {
        let err = SaveError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let msg = format!("{err}");
        assert!(msg.contains("I/O error"), "got: {msg}");
        assert!(msg.contains("file not found"), "got: {msg}");
    }

    #[test]
    fn test_save_error_display_version_mismatch() {
        let err = SaveError::VersionMismatch {
            expected_max: 1,
            found: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains("v7"), "got: {msg}");
        assert!(msg.contains("v1"), "got: {msg}");
    }

    #[test]
    fn test_save_error_display_invalid_road() {
        let err = SaveError::from(RoadError::TooFewJunctions(1));
        let msg = format!("{err}");
        assert!(msg.contains("Invalid road data"), "got: {msg}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_save_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let save_err: SaveError = io_err.into();
        assert!(matches!(save_err, SaveError::Io(_)));
    }

    #[test]
    fn test_save_error_corrupt_header_has_no_source() {
        let err = SaveError::CorruptHeader("bad magic".to_string());
        assert!(std::error::Error::source(&err).is_none());
        assert!(format!("{err:?}").contains("CorruptHeader"));
    }
}
