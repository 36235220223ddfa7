//! Solver core for an automated mine-clearing player.
//!
//! The pipeline per iteration: a captured frame of the game surface is
//! classified into a typed [`Board`], the [`deduce`] pass derives provably
//! safe and provably mined cells from it, and the [`Driver`] delivers the
//! resulting moves through the [`Capture`]/[`Actuator`] collaborator seams.
//! Everything in this crate is synchronous and free of shared mutable state;
//! the board is a value owned by the current iteration.

pub use board::*;
pub use cell::*;
pub use classify::*;
pub use deduce::*;
pub use driver::*;
pub use error::*;
pub use fallback::*;
pub use palette::*;
pub use types::*;

mod board;
mod cell;
mod classify;
mod deduce;
mod driver;
mod error;
mod fallback;
mod palette;
mod types;

#[cfg(test)]
pub(crate) mod testutil;
