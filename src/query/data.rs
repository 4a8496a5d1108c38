//! Structured forms of `infoResponse` and `statusResponse`.

use serde::{Deserialize, Serialize};
use std::collections::{hash_map, HashMap};

/// Key/value pairs from an `infoResponse`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerInfo {
    values: HashMap<String, String>,
}

impl ServerInfo {
    /// Look up a single key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterate over all key/value pairs, in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.values.iter()
    }

    /// Number of keys the server reported.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Did the server report no keys at all?
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take the underlying map.
    pub fn into_inner(self) -> HashMap<String, String> {
        self.values
    }

    /// The `hostname` key, colour codes included.
    pub fn hostname(&self) -> Option<&str> {
        self.get("hostname")
    }

    /// The `mapname` key.
    pub fn map_name(&self) -> Option<&str> {
        self.get("mapname")
    }

    /// The `clients` key, if present and numeric.
    pub fn clients(&self) -> Option<u32> {
        self.get("clients")?.parse().ok()
    }

    /// The `sv_maxclients` key, if present and numeric.
    pub fn max_clients(&self) -> Option<u32> {
        self.get("sv_maxclients")?.parse().ok()
    }
}

impl From<HashMap<String, String>> for ServerInfo {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<'a> IntoIterator for &'a ServerInfo {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Server variables and player roster from a `statusResponse`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Server variables (`sv_hostname`, `g_gametype`, ...).
    pub status: HashMap<String, String>,

    /// Connected players, in the order the server listed them.
    pub players: Vec<Player>,
}

/// A player line from a `statusResponse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// The player's name, colour codes included.
    pub name: String,

    /// Score.
    pub points: i32,

    /// Ping in milliseconds. Bots and connecting players report 0 or 999.
    pub ping: i32,
}
