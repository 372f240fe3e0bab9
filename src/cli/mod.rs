//! Terminal front end — line parsing and the interactive game loop.
//!
//! - [`input`]: Turns a line like `C3 D4` into a `Move`.
//! - [`session`]: Read → validate → apply → report loop over any reader/writer.

pub mod input;
pub mod session;

pub use input::parse_move_line;
pub use session::run;
