//! Async client for the connectionless protocol spoken by Quake 3 engine
//! servers ([ioquake3](https://ioquake3.org) and its mods): server info and
//! status queries, [remote console](https://ioquake3.org/help/sys-admin-guide/)
//! commands and console variable lookups.
//!
//! Every request is a single UDP datagram starting with four `0xff` bytes,
//! answered by at most one datagram. See [`Q3Client`] to get started.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod client;
pub mod config;
pub mod errors;
pub mod packet;
pub mod query;
pub mod rcon;
pub mod socket;

pub use client::Q3Client;
pub use config::ClientConfig;
pub use errors::{Error, Result};
pub use query::data::{Player, ServerInfo, ServerStatus};
pub use rcon::VariableValue;
