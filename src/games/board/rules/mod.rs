//! Board game rules.
//!
//! Pure functions over a [`Board`](super::Board).

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};
