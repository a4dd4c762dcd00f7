//! APDU command definition
//!
//! Only the case-2 command shape (header plus expected length) is
//! modeled: retrieving the UID never carries a data field. The byte
//! layout follows ISO/IEC 7816-4.

use bytes::{BufMut, Bytes, BytesMut};

/// A short APDU command: CLA, INS, P1, P2 and an optional Le
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    le: Option<u8>,
}

impl Command {
    /// Create a new command with the given header
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            le: None,
        }
    }

    /// Set the expected response length (Le); `0` means "up to 256 bytes"
    pub const fn with_le(mut self, le: u8) -> Self {
        self.le = Some(le);
        self
    }

    /// The GET DATA command retrieving the card UID
    ///
    /// `FF CA 00 00 00` is the contactless storage-card convention
    /// (PC/SC part 3): class `FF`, GET DATA, P1/P2 = UID, Le = 0.
    pub const fn get_data_uid() -> Self {
        Self::new(0xFF, 0xCA, 0x00, 0x00).with_le(0x00)
    }

    /// Command class (CLA)
    pub const fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction code (INS)
    pub const fn instruction(&self) -> u8 {
        self.ins
    }

    /// First parameter (P1)
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Second parameter (P2)
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Expected response length (Le), if any
    pub const fn expected_length(&self) -> Option<u8> {
        self.le
    }

    /// Serialize to raw APDU bytes
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(5);

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        // Le if present
        if let Some(le) = self.le {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_uid_bytes() {
        let cmd = Command::get_data_uid();
        assert_eq!(cmd.to_bytes().as_ref(), &[0xFF, 0xCA, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_header_only_command() {
        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.to_bytes().as_ref(), &[0x00, 0xA4, 0x04, 0x00]);
        assert_eq!(cmd.expected_length(), None);
    }

    #[test]
    fn test_accessors() {
        let cmd = Command::get_data_uid();
        assert_eq!(cmd.class(), 0xFF);
        assert_eq!(cmd.instruction(), 0xCA);
        assert_eq!(cmd.p1(), 0x00);
        assert_eq!(cmd.p2(), 0x00);
        assert_eq!(cmd.expected_length(), Some(0x00));
    }
}
