#![deny(unsafe_code)]

use std::fmt;

use sha2::Digest;

/// A deterministic record identifier.
///
/// Derived from the source identifier and the 1-based record position, so the
/// same input always yields the same ids. Rendered as lowercase hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId([u8; 16]);

impl RecordId {
    /// sha256("<source_id>\0<position>"), first 16 bytes.
    pub fn derive(source_id: &str, position: u64) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(source_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(position.to_string().as_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        Self::from_first_16_bytes_of_sha256(digest)
    }

    pub fn from_first_16_bytes_of_sha256(digest: [u8; 32]) -> Self {
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest[..16]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        if bytes.len() != 16 {
            return Err(serde::de::Error::custom("RecordId must be 16 bytes"));
        }
        let mut out = [0u8; 16];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A system-assigned dimension or fact row key. Keys start at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SurrogateKey(u32);

impl SurrogateKey {
    pub const FIRST: SurrogateKey = SurrogateKey(1);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Key for the row at zero-based `index` in a contiguous table.
    pub fn for_index(index: usize) -> Self {
        Self(u32::try_from(index + 1).unwrap_or(u32::MAX))
    }

    /// Zero-based index this key occupies in a contiguous table.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()?.checked_sub(1)
    }
}

impl fmt::Display for SurrogateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_is_deterministic() {
        let a = RecordId::derive("sales.csv", 1);
        let b = RecordId::derive("sales.csv", 1);
        let c = RecordId::derive("sales.csv", 2);
        let d = RecordId::derive("other.csv", 1);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.to_hex().len(), 32);
    }

    #[test]
    fn surrogate_key_index_round_trip() {
        assert_eq!(SurrogateKey::for_index(0), SurrogateKey::FIRST);
        assert_eq!(SurrogateKey::new(3).index(), Some(2));
        assert_eq!(SurrogateKey::new(0).index(), None);
    }
}
