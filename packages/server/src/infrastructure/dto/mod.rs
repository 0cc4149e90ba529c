//! Data Transfer Objects
//!
//! Domain Model と外部フォーマット（JSON）の境界。

pub mod conversion;
pub mod http;
pub mod websocket;

pub use conversion::{ProtocolError, decode_command, encode_envelope};
