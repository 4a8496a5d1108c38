//! Server queries with `getinfo` and `getstatus`.

pub mod data;

use self::data::{Player, ServerInfo, ServerStatus};
use crate::{
    client::Q3Client,
    errors::{ProtocolError, Result},
    packet::{ResponseType, PREAMBLE},
    socket::Transport,
};
use regex::Regex;
use std::{collections::HashMap, sync::LazyLock};

static PLAYER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(-?\d+) (-?\d+) "(.*)"$"#).expect("player line pattern is valid")
});

impl<T: Transport> Q3Client<T> {
    /// Ask the server for its `getinfo` key/value pairs.
    ///
    /// # Errors
    /// Returns an [`Error::Protocol`](crate::Error::Protocol) if the reply is
    /// not a well formed `infoResponse`, and anything
    /// [`send_raw`](Q3Client::send_raw) returns.
    pub async fn server_info(&self) -> Result<ServerInfo> {
        let raw = self.send_raw(ResponseType::Info.request()).await?;
        parse_info(&raw)
    }

    /// Ask the server for its `getstatus` variables and player list.
    ///
    /// # Errors
    /// Returns an [`Error::Protocol`](crate::Error::Protocol) if the reply is
    /// not a well formed `statusResponse`, and anything
    /// [`send_raw`](Q3Client::send_raw) returns.
    pub async fn server_status(&self) -> Result<ServerStatus> {
        let raw = self.send_raw(ResponseType::Status.request()).await?;
        parse_status(&raw)
    }
}

/// Parse a raw `infoResponse` datagram.
///
/// # Errors
/// Returns [`ProtocolError`] if the header is wrong, the key/value line is
/// missing, or it holds nothing after the leading backslash.
///
/// # Examples
/// ```
/// use q3_rcon::query::parse_info;
///
/// let info = parse_info(b"\xff\xff\xff\xffinfoResponse\n\\modversion\\4.3.4\\game\\q3ut4").unwrap();
/// assert_eq!(info.get("game"), Some("q3ut4"));
/// ```
pub fn parse_info(raw: &[u8]) -> Result<ServerInfo> {
    let text = body(raw, ResponseType::Info)?;
    let line = text.split('\n').nth(1).ok_or(ProtocolError::MissingInfoLine)?;

    let mut tokens = line.split('\\');
    // the line starts with a backslash, so the first token is never a key
    tokens.next();
    let tokens: Vec<&str> = tokens.collect();

    if tokens.is_empty() {
        return Err(ProtocolError::EmptyInfo.into());
    }

    Ok(ServerInfo::from(key_values(&tokens)))
}

/// Parse a raw `statusResponse` datagram.
///
/// Lines after the variables that do not look like `<points> <ping> "<name>"`
/// are skipped.
///
/// # Errors
/// Returns [`ProtocolError`] if the header is wrong or the reply has fewer
/// than two lines.
pub fn parse_status(raw: &[u8]) -> Result<ServerStatus> {
    let text = body(raw, ResponseType::Status)?;
    let lines: Vec<&str> = text.split('\n').collect();

    if lines.len() < 2 {
        return Err(ProtocolError::MissingStatusLines.into());
    }

    let tokens: Vec<&str> = lines[1].split('\\').skip(1).collect();
    let players = lines[2..].iter().filter_map(|line| parse_player(line)).collect();

    Ok(ServerStatus {
        status: key_values(&tokens),
        players,
    })
}

fn parse_player(line: &str) -> Option<Player> {
    let caps = PLAYER_LINE.captures(line)?;

    Some(Player {
        points: caps[1].parse().ok()?,
        ping: caps[2].parse().ok()?,
        name: caps[3].to_string(),
    })
}

/// Check the header and return the text after the envelope.
fn body(raw: &[u8], expected: ResponseType) -> Result<String> {
    if !expected.matches(raw) {
        return Err(ProtocolError::BadResponse {
            expected: expected.tag(),
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&raw[PREAMBLE.len()..]).into_owned())
}

/// Pair up `key\value\key\value` tokens. A trailing key without a value is
/// dropped; a repeated key keeps its last value.
fn key_values(tokens: &[&str]) -> HashMap<String, String> {
    tokens
        .chunks_exact(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect()
}
