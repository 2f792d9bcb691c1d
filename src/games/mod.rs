//! Game engines.

pub mod board;
pub mod puzzle;
