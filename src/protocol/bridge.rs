//! Radio Bridge Serial Protocol
//!
//! The rover MCU reaches the ESP-NOW radio through a bridge module on a
//! UART. Every message is framed as:
//!
//! ```text
//! 0x7E | kind | len | body[len] | xor(kind, len, body...)
//! ```
//!
//! Datagrams carry the peer address followed by the radio payload, so the
//! same message is used for both received and transmitted packets.

use core::fmt;

use heapless::Vec;

use crate::types::PeerAddress;

/// Frame start marker
pub const START: u8 = 0x7E;

/// Largest body the one-byte length field can describe
pub const MAX_BODY: usize = 255;

/// Largest radio payload inside a datagram body
pub const MAX_DATAGRAM: usize = MAX_BODY - 6;

/// Largest encoded frame (start, kind, len, body, checksum)
pub const MAX_FRAME: usize = MAX_BODY + 4;

const KIND_DATAGRAM: u8 = 0x01;
const KIND_ADD_PEER: u8 = 0x02;
const KIND_QUERY_CHANNEL: u8 = 0x03;
const KIND_CHANNEL_REPORT: u8 = 0x04;
const KIND_STATUS: u8 = 0x05;

/// Result code reported by the bridge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeStatus {
    /// Request completed
    Ok,
    /// Peer was already registered
    Exists,
    /// Request failed with a radio error code
    Error(u8),
}

impl BridgeStatus {
    /// Decode from the wire byte
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Exists,
            other => Self::Error(other),
        }
    }

    /// Encode to the wire byte
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Exists => 1,
            Self::Error(code) => code,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BridgeStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Ok => defmt::write!(f, "OK"),
            Self::Exists => defmt::write!(f, "EXISTS"),
            Self::Error(code) => defmt::write!(f, "ERR({})", code),
        }
    }
}

/// Message exchanged with the bridge module
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BridgeMessage {
    /// Radio packet to or from a peer
    Datagram {
        /// Remote station
        peer: PeerAddress,
        /// Radio payload
        payload: Vec<u8, MAX_DATAGRAM>,
    },
    /// Register a peer on a channel (0 = current channel)
    AddPeer {
        /// Peer to register
        peer: PeerAddress,
        /// Radio channel
        channel: u8,
    },
    /// Ask for the radio's active channel
    QueryChannel,
    /// Active channel reply
    ChannelReport(u8),
    /// Completion status for the last request
    Status(BridgeStatus),
}

impl BridgeMessage {
    /// Build a datagram from a payload slice
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::PayloadTooLong`] if `data` exceeds [`MAX_DATAGRAM`].
    pub fn datagram(peer: PeerAddress, data: &[u8]) -> Result<Self, BridgeError> {
        let payload = Vec::from_slice(data).map_err(|()| BridgeError::PayloadTooLong(data.len()))?;
        Ok(Self::Datagram { peer, payload })
    }

    const fn kind(&self) -> u8 {
        match self {
            Self::Datagram { .. } => KIND_DATAGRAM,
            Self::AddPeer { .. } => KIND_ADD_PEER,
            Self::QueryChannel => KIND_QUERY_CHANNEL,
            Self::ChannelReport(_) => KIND_CHANNEL_REPORT,
            Self::Status(_) => KIND_STATUS,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BridgeMessage {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Datagram { peer, payload } => {
                defmt::write!(f, "Datagram({}, {}B)", peer, payload.len());
            }
            Self::AddPeer { peer, channel } => defmt::write!(f, "AddPeer({}, ch{})", peer, channel),
            Self::QueryChannel => defmt::write!(f, "QueryChannel"),
            Self::ChannelReport(ch) => defmt::write!(f, "ChannelReport({})", ch),
            Self::Status(status) => defmt::write!(f, "Status({})", status),
        }
    }
}

/// Bridge framing error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeError {
    /// Checksum byte did not match the frame contents
    Checksum {
        /// Computed checksum
        expected: u8,
        /// Received checksum
        actual: u8,
    },
    /// Unrecognized message kind
    UnknownKind(u8),
    /// Body length is wrong for the message kind
    BadLength {
        /// Message kind
        kind: u8,
        /// Received body length
        len: u8,
    },
    /// Datagram payload does not fit in one frame
    PayloadTooLong(usize),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checksum { expected, actual } => {
                write!(f, "checksum mismatch: expected {expected:#04x}, got {actual:#04x}")
            }
            Self::UnknownKind(kind) => write!(f, "unknown message kind {kind:#04x}"),
            Self::BadLength { kind, len } => write!(f, "bad length {len} for kind {kind:#04x}"),
            Self::PayloadTooLong(len) => write!(f, "payload of {len} bytes exceeds {MAX_DATAGRAM}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BridgeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Checksum { expected, actual } => {
                defmt::write!(f, "Checksum(expected={=u8:x}, got={=u8:x})", expected, actual);
            }
            Self::UnknownKind(kind) => defmt::write!(f, "UnknownKind({=u8:x})", kind),
            Self::BadLength { kind, len } => defmt::write!(f, "BadLength(kind={=u8:x}, len={})", kind, len),
            Self::PayloadTooLong(len) => defmt::write!(f, "PayloadTooLong({})", len),
        }
    }
}

/// Parser position within a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseState {
    Hunting,
    Kind,
    Len,
    Body,
    Checksum,
}

/// Byte-fed bridge frame parser
pub struct BridgeParser {
    state: ParseState,
    kind: u8,
    len: u8,
    /// Frame body buffer
    body: Vec<u8, MAX_BODY>,
}

impl BridgeParser {
    /// Create a new parser waiting for a start byte
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ParseState::Hunting,
            kind: 0,
            len: 0,
            body: Vec::new(),
        }
    }

    /// Feed a byte to the parser
    ///
    /// Returns `Ok(Some(_))` when a frame completes and `Ok(None)` while more
    /// bytes are needed.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] when a completed frame is corrupt. The parser
    /// has already dropped back to hunting for the next start byte.
    pub fn feed(&mut self, byte: u8) -> Result<Option<BridgeMessage>, BridgeError> {
        match self.state {
            ParseState::Hunting => {
                if byte == START {
                    self.state = ParseState::Kind;
                }
            }
            ParseState::Kind => {
                self.kind = byte;
                self.state = ParseState::Len;
            }
            ParseState::Len => {
                self.len = byte;
                self.body.clear();
                self.state = if byte == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Body
                };
            }
            ParseState::Body => {
                // Capacity equals the largest describable length, push cannot fail
                let _ = self.body.push(byte);
                if self.body.len() == usize::from(self.len) {
                    self.state = ParseState::Checksum;
                }
            }
            ParseState::Checksum => {
                self.state = ParseState::Hunting;
                let expected = checksum(self.kind, &self.body);
                if byte != expected {
                    return Err(BridgeError::Checksum {
                        expected,
                        actual: byte,
                    });
                }
                return self.parse_body().map(Some);
            }
        }
        Ok(None)
    }

    fn parse_body(&self) -> Result<BridgeMessage, BridgeError> {
        let body = self.body.as_slice();
        let bad_length = BridgeError::BadLength {
            kind: self.kind,
            len: self.len,
        };

        match self.kind {
            KIND_DATAGRAM => {
                if body.len() < 6 {
                    return Err(bad_length);
                }
                BridgeMessage::datagram(read_peer(body), &body[6..])
            }
            KIND_ADD_PEER => match body {
                [.., channel] if body.len() == 7 => Ok(BridgeMessage::AddPeer {
                    peer: read_peer(body),
                    channel: *channel,
                }),
                _ => Err(bad_length),
            },
            KIND_QUERY_CHANNEL if body.is_empty() => Ok(BridgeMessage::QueryChannel),
            KIND_CHANNEL_REPORT => match body {
                [channel] => Ok(BridgeMessage::ChannelReport(*channel)),
                _ => Err(bad_length),
            },
            KIND_STATUS => match body {
                [code] => Ok(BridgeMessage::Status(BridgeStatus::from_code(*code))),
                _ => Err(bad_length),
            },
            KIND_QUERY_CHANNEL => Err(bad_length),
            other => Err(BridgeError::UnknownKind(other)),
        }
    }

    /// Drop any partial frame
    pub fn clear(&mut self) {
        self.state = ParseState::Hunting;
        self.body.clear();
    }
}

impl Default for BridgeParser {
    fn default() -> Self {
        Self::new()
    }
}

fn read_peer(body: &[u8]) -> PeerAddress {
    let mut octets = [0u8; 6];
    octets.copy_from_slice(&body[..6]);
    PeerAddress::new(octets)
}

fn checksum(kind: u8, body: &[u8]) -> u8 {
    // Body length always fits the u8 length field
    #[allow(clippy::cast_possible_truncation)]
    let len = body.len() as u8;
    body.iter().fold(kind ^ len, |acc, b| acc ^ b)
}

/// Encode a message into a complete frame
#[must_use]
pub fn encode(msg: &BridgeMessage) -> Vec<u8, MAX_FRAME> {
    let mut body: Vec<u8, MAX_BODY> = Vec::new();
    // Every body below is bounded by MAX_BODY by construction
    match msg {
        BridgeMessage::Datagram { peer, payload } => {
            let _ = body.extend_from_slice(peer.as_bytes());
            let _ = body.extend_from_slice(payload);
        }
        BridgeMessage::AddPeer { peer, channel } => {
            let _ = body.extend_from_slice(peer.as_bytes());
            let _ = body.push(*channel);
        }
        BridgeMessage::QueryChannel => {}
        BridgeMessage::ChannelReport(channel) => {
            let _ = body.push(*channel);
        }
        BridgeMessage::Status(status) => {
            let _ = body.push(status.code());
        }
    }

    let kind = msg.kind();
    let mut out = Vec::new();
    #[allow(clippy::cast_possible_truncation)]
    let len = body.len() as u8;
    let _ = out.push(START);
    let _ = out.push(kind);
    let _ = out.push(len);
    let _ = out.extend_from_slice(&body);
    let _ = out.push(checksum(kind, &body));
    out
}

/// Read bytes until the bridge answers a request
///
/// Datagrams that arrive in between are skipped. Gives up with `None` once
/// `read` yields nothing (timeout or receive error) or after `budget` bytes
/// without a reply.
pub fn next_reply(
    parser: &mut BridgeParser,
    budget: usize,
    mut read: impl FnMut() -> Option<u8>,
) -> Option<BridgeMessage> {
    for _ in 0..budget {
        match parser.feed(read()?) {
            Ok(Some(BridgeMessage::Datagram { .. }) | None) => {}
            Ok(Some(msg)) => return Some(msg),
            Err(e) => warn!("bridge reply: {}", e),
        }
    }
    None
}
