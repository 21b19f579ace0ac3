//! Rock-Paper-Scissors rules.

use crate::protocol::{MoveRecord, ValidationError, Winner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rock-Paper-Scissors move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Canonical lowercase form, as stored in move records
    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        winning_move(*self, *other) == Some(*self)
    }
}

impl FromStr for Move {
    type Err = ValidationError;

    /// Case-insensitive: "Rock", "ROCK" and "rock" all parse to `Move::Rock`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            _ => Err(ValidationError::InvalidMove(s.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The winning move for an ordered pair, `None` when both sides played the same.
///
/// Rock beats scissors, scissors beats paper, paper beats rock.
pub fn winning_move(a: Move, b: Move) -> Option<Move> {
    use Move::*;

    match (a, b) {
        (Rock, Scissors) | (Scissors, Rock) => Some(Rock),
        (Scissors, Paper) | (Paper, Scissors) => Some(Scissors),
        (Paper, Rock) | (Rock, Paper) => Some(Paper),
        (Rock, Rock) | (Paper, Paper) | (Scissors, Scissors) => None,
    }
}

/// Name the player who played the winning move, or `Winner::Tie`
pub fn determine_winner(a: &MoveRecord, b: &MoveRecord) -> Winner {
    match winning_move(a.player_move, b.player_move) {
        Some(m) if m == a.player_move => Winner::Player(a.player_name.clone()),
        Some(m) if m == b.player_move => Winner::Player(b.player_name.clone()),
        _ => Winner::Tie,
    }
}
