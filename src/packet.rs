//! Connectionless packet framing.

use bytes::{BufMut, Bytes, BytesMut};

/// Out-of-band marker that starts every connectionless datagram.
pub const PREAMBLE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// Replies with a fixed textual tag, keyed by the request that produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// `infoResponse`, the reply to `getinfo`.
    Info,
    /// `statusResponse`, the reply to `getstatus`.
    Status,
}

impl ResponseType {
    /// The command that asks the server for this response.
    pub fn request(self) -> &'static str {
        match self {
            ResponseType::Info => "getinfo",
            ResponseType::Status => "getstatus",
        }
    }

    /// The tag the server puts right after the preamble.
    pub fn tag(self) -> &'static str {
        match self {
            ResponseType::Info => "infoResponse",
            ResponseType::Status => "statusResponse",
        }
    }

    /// Does `raw` start with the connectionless frame for this response type?
    pub fn matches(self, raw: &[u8]) -> bool {
        raw.starts_with(&connectionless(self.tag()))
    }
}

/// Build a connectionless frame: the 4 byte preamble followed by `command`.
///
/// The command is not validated in any way.
///
/// # Examples
/// ```
/// use q3_rcon::packet::connectionless;
///
/// assert_eq!(&connectionless("getinfo")[..], b"\xff\xff\xff\xffgetinfo");
/// ```
pub fn connectionless(command: &str) -> Bytes {
    let mut bytes = BytesMut::with_capacity(PREAMBLE.len() + command.len());
    bytes.put_slice(&PREAMBLE);
    bytes.put_slice(command.as_bytes());
    bytes.freeze()
}

/// Remove the 4 byte envelope from a reply.
///
/// Returns `None` when there is nothing after the envelope. The envelope bytes
/// themselves are not checked, servers only ever send the preamble here.
pub fn strip_envelope(raw: &[u8]) -> Option<&[u8]> {
    if raw.len() > PREAMBLE.len() {
        Some(&raw[PREAMBLE.len()..])
    } else {
        None
    }
}
