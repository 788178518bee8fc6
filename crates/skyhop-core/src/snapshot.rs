use serde::Serialize;
use serde::de::DeserializeOwned;

/// Current snapshot format version (first byte of every snapshot).
pub const SNAPSHOT_VERSION: u8 = 1;

/// Maximum encoded snapshot size in bytes.
pub const MAX_SNAPSHOT_SIZE: usize = 256 * 1024; // 256 KiB

#[derive(Debug)]
pub enum SnapshotError {
    Empty,
    UnsupportedVersion(u8),
    TooLarge(usize),
    Encode(String),
    Decode(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty snapshot"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported snapshot version: {v}"),
            Self::TooLarge(size) => {
                write!(
                    f,
                    "snapshot too large: {size} bytes (max {MAX_SNAPSHOT_SIZE})"
                )
            },
            Self::Encode(e) => write!(f, "encode error: {e}"),
            Self::Decode(e) => write!(f, "decode error: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Encode `state` as MessagePack with a 1-byte version prefix.
pub fn encode_snapshot<T: Serialize>(state: &T) -> Result<Vec<u8>, SnapshotError> {
    let body = rmp_serde::to_vec(state).map_err(|e| SnapshotError::Encode(e.to_string()))?;
    let total = 1 + body.len();
    if total > MAX_SNAPSHOT_SIZE {
        return Err(SnapshotError::TooLarge(total));
    }
    let mut buf = Vec::with_capacity(total);
    buf.push(SNAPSHOT_VERSION);
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Decode a snapshot produced by [`encode_snapshot`].
pub fn decode_snapshot<T: DeserializeOwned>(data: &[u8]) -> Result<T, SnapshotError> {
    let (&version, body) = data.split_first().ok_or(SnapshotError::Empty)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }
    if data.len() > MAX_SNAPSHOT_SIZE {
        return Err(SnapshotError::TooLarge(data.len()));
    }
    rmp_serde::from_slice(body).map_err(|e| SnapshotError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        score: u32,
        name: String,
    }

    #[test]
    fn version_byte_prefixes_body() {
        let data = encode_snapshot(&Sample {
            score: 7,
            name: "a".into(),
        })
        .unwrap();
        assert_eq!(data[0], SNAPSHOT_VERSION);
        let back: Sample = decode_snapshot(&data).unwrap();
        assert_eq!(back.score, 7);
    }

    #[test]
    fn empty_rejected() {
        let err = decode_snapshot::<Sample>(&[]).unwrap_err();
        assert!(matches!(err, SnapshotError::Empty));
    }

    #[test]
    fn wrong_version_rejected() {
        let mut data = encode_snapshot(&Sample {
            score: 1,
            name: String::new(),
        })
        .unwrap();
        data[0] = 99;
        let err = decode_snapshot::<Sample>(&data).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion(99)));
    }

    #[test]
    fn truncated_body_is_decode_error() {
        let data = encode_snapshot(&Sample {
            score: 1,
            name: "some longer name".into(),
        })
        .unwrap();
        let err = decode_snapshot::<Sample>(&data[..data.len() / 2]).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }

    #[test]
    fn oversized_rejected() {
        let big = vec![0u8; MAX_SNAPSHOT_SIZE];
        let err = encode_snapshot(&big).unwrap_err();
        assert!(matches!(err, SnapshotError::TooLarge(_)));
    }
}
