//! Two-player checkers on 64-bit bitboards.
//!
//! - [`engine`]: bit primitives, square codec, position, move executor and
//!   the turn-by-turn game controller.
//! - [`cli`]: line parsing and the interactive terminal loop.
//! - [`config`]: environment-driven settings.

pub mod cli;
pub mod config;
pub mod engine;
