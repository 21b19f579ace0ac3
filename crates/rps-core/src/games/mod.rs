//! Game definitions and logic.

mod rps;

pub use rps::{determine_winner, winning_move, Move};
