//! APDU response handling
//!
//! A response is the payload followed by the two status bytes SW1/SW2
//! (ISO/IEC 7816-4). For the UID retrieval this crate performs, the
//! payload on success is the UID itself.

use std::fmt;

use bytes::Bytes;
use tracing::trace;

use crate::error::Error;
use crate::uid::CardUid;

/// Status Word (SW1-SW2) from an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create from a u16 value (SW1 | SW2)
    pub const fn from_u16(status: u16) -> Self {
        Self {
            sw1: (status >> 8) as u8,
            sw2: status as u8,
        }
    }

    /// Convert to a u16 value (SW1 | SW2)
    pub const fn to_u16(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Get a description of this status word
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "Success",
            (0x61, _) => "More data available",
            (0x62, 0x82) => "End of data reached before Le bytes",
            (0x63, 0x00) => "No information given",
            (0x65, 0x81) => "Memory failure",
            (0x67, 0x00) => "Wrong length",
            (0x69, 0x82) => "Security status not satisfied",
            (0x69, 0x86) => "Command not allowed",
            (0x6A, 0x81) => "Function not supported",
            (0x6A, 0x82) => "File or data not found",
            (0x6A, 0x86) => "Incorrect parameters P1-P2",
            (0x6B, 0x00) => "Wrong parameters P1-P2",
            (0x6C, _) => "Wrong Le field",
            (0x6D, 0x00) => "Instruction code not supported or invalid",
            (0x6E, 0x00) => "Class not supported",
            (0x6F, 0x00) => "No precise diagnosis",
            _ => "Unknown status word",
        }
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X} ({})", self.sw1, self.sw2, self.description())
    }
}

/// Basic APDU response structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response payload data
    payload: Option<Bytes>,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Parse a raw response: payload bytes followed by SW1 and SW2
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 2 {
            return Err(Error::parse("response shorter than status word"));
        }

        let (payload, status) = data.split_at(data.len() - 2);
        let status = StatusWord::new(status[0], status[1]);
        trace!(status = %status, payload_len = payload.len(), "parsed response");

        let payload = if payload.is_empty() {
            None
        } else {
            Some(Bytes::copy_from_slice(payload))
        };

        Ok(Self { payload, status })
    }

    /// Response payload data
    pub const fn payload(&self) -> &Option<Bytes> {
        &self.payload
    }

    /// The status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Check if the response indicates success
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Interpret the payload of a successful response as a card UID
    ///
    /// A non-success status or an empty payload is an error; the caller
    /// decides whether that aborts or merely skips a notification round.
    pub fn into_uid(self) -> Result<CardUid, Error> {
        if !self.status.is_success() {
            return Err(Error::Status(self.status));
        }
        match self.payload {
            Some(payload) => CardUid::new(payload.to_vec()),
            None => Err(Error::parse("success response carried no UID")),
        }
    }
}
