//! Card UID value type
//!
//! The UID is whatever byte string the card reports for the GET DATA
//! UID command. Its length varies by card family (4, 7 or 10 bytes for
//! ISO 14443, other lengths for contact cards), so no structure beyond
//! "non-empty bytes" is imposed.

use std::fmt;

use crate::error::Error;

/// Unique identifier reported by a card
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardUid(Vec<u8>);

impl CardUid {
    /// Create a UID from raw bytes
    ///
    /// Returns an error if the byte string is empty; an empty UID means
    /// the card answered the command with no payload and must not be
    /// reported to listeners.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, Error> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::parse("UID must not be empty"));
        }
        Ok(Self(bytes))
    }

    /// Parse a UID from a hex string (case-insensitive)
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s).map_err(|_| Error::parse("invalid hex in UID"))?;
        Self::new(bytes)
    }

    /// Raw UID bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of UID bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A UID is never empty; present for API completeness
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Upper-case hex rendering, same as the `Display` impl
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for CardUid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_hex_display() {
        let uid = CardUid::new(vec![0x04, 0xA2, 0x24, 0x5F]).unwrap();
        assert_eq!(uid.to_string(), "04A2245F");
        assert_eq!(uid.to_hex(), "04A2245F");
        assert_eq!(uid.as_bytes(), &[0x04, 0xA2, 0x24, 0x5F]);
    }

    #[test]
    fn test_uid_from_hex() {
        let uid = CardUid::from_hex("04a2245f").unwrap();
        assert_eq!(uid, CardUid::new(vec![0x04, 0xA2, 0x24, 0x5F]).unwrap());

        assert!(CardUid::from_hex("not hex").is_err());
        assert!(CardUid::from_hex("").is_err());
    }

    #[test]
    fn test_uid_rejects_empty() {
        assert!(CardUid::new(Vec::new()).is_err());
    }

    #[test]
    fn test_uid_seven_bytes() {
        // 7-byte UIDs are common for NFC Type 2 tags
        let uid = CardUid::new(vec![0x04, 0x51, 0xD1, 0x3A, 0x8C, 0x5C, 0x80]).unwrap();
        assert_eq!(uid.len(), 7);
        assert_eq!(uid.to_string(), "0451D13A8C5C80");
    }
}
