//! Utilities shared between the trivia-relay binaries and libraries.

pub mod logger;
pub mod time;
