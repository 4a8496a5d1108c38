//! Remote console commands and console variable lookups.
//! See [`Q3Client::send_rcon`](crate::Q3Client::send_rcon) and
//! [`Q3Client::var_value`](crate::Q3Client::var_value).

mod client;
mod cvar;

pub use cvar::{parse_variable, VariableValue};
