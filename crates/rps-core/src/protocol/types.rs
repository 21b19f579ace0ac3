//! Protocol types and record schemas.

use super::error::{RoundError, ValidationError};
use crate::games::Move;
use rps_store::{ClientId, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Record type of a player's move
pub const MOVE_RECORD_TYPE: &str = "rps-move";
/// Record type of a judged round
pub const RESULT_RECORD_TYPE: &str = "rps-result";
/// Plain (unencrypted, searchable) metadata key holding the round number
pub const ROUND_KEY: &str = "round-number";

pub const PLAYER_FIELD: &str = "player";
pub const CLIENT_ID_FIELD: &str = "client_id";
pub const MOVE_FIELD: &str = "move";
pub const WINNER_FIELD: &str = "winner";

/// Stored winner value of a drawn round
pub const TIE: &str = "TIE";

/// Positive round identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(NonZeroU64);

impl RoundId {
    pub fn new(round: u64) -> Result<Self, ValidationError> {
        NonZeroU64::new(round)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidRound(round.to_string()))
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// Plain metadata tagging a record with this round
    pub(crate) fn plain(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(ROUND_KEY.to_string(), self.to_string())])
    }
}

impl FromStr for RoundId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let round: u64 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidRound(s.to_string()))?;
        Self::new(round)
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a judged round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// Display name of the winning player
    Player(String),
    Tie,
}

impl Winner {
    /// The stored form: the player name, or `TIE`
    pub fn as_str(&self) -> &str {
        match self {
            Winner::Player(name) => name,
            Winner::Tie => TIE,
        }
    }

    /// Read back a stored winner value
    pub fn from_stored(value: &str) -> Self {
        if value == TIE {
            Winner::Tie
        } else {
            Winner::Player(value.to_string())
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Winner::Tie)
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One player's move for a round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub round: RoundId,
    pub player_name: String,
    pub client_id: ClientId,
    pub player_move: Move,
}

impl MoveRecord {
    /// Encrypted payload fields
    pub(crate) fn data(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (PLAYER_FIELD.to_string(), self.player_name.clone()),
            (CLIENT_ID_FIELD.to_string(), self.client_id.to_string()),
            (MOVE_FIELD.to_string(), self.player_move.as_str().to_string()),
        ])
    }

    /// Decode the `index`-th move record of a round.
    ///
    /// Fields are checked in the order `client_id`, `move`, `player`; the first
    /// missing or unusable one is reported.
    pub fn from_record(round: RoundId, index: usize, record: &Record) -> Result<Self, RoundError> {
        let malformed = |field: &'static str, problem: String| RoundError::MalformedRecord {
            round,
            index,
            field,
            problem,
        };
        let required = |field: &'static str| {
            record
                .field(field)
                .ok_or_else(|| malformed(field, "is missing".to_string()))
        };

        let client_id = required(CLIENT_ID_FIELD)?;
        let player_move = required(MOVE_FIELD)?;
        let player_name = required(PLAYER_FIELD)?;

        let player_move = player_move
            .parse::<Move>()
            .map_err(|_| malformed(MOVE_FIELD, format!("has invalid value '{}'", player_move)))?;

        Ok(Self {
            round,
            player_name: player_name.to_string(),
            client_id: ClientId::from(client_id),
            player_move,
        })
    }
}

/// Adjudicated outcome of a round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub round: RoundId,
    pub winner: Winner,
}

impl ResultRecord {
    pub(crate) fn data(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(WINNER_FIELD.to_string(), self.winner.as_str().to_string())])
    }

    pub fn from_record(round: RoundId, record: &Record) -> Result<Self, RoundError> {
        let winner = record
            .field(WINNER_FIELD)
            .ok_or_else(|| RoundError::MalformedRecord {
                round,
                index: 0,
                field: WINNER_FIELD,
                problem: "is missing".to_string(),
            })?;

        Ok(Self {
            round,
            winner: Winner::from_stored(winner),
        })
    }
}

/// The two validated moves of a round, as seen by the judge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundView {
    pub round: RoundId,
    pub first: MoveRecord,
    pub second: MoveRecord,
}

impl RoundView {
    /// Build a view, rejecting two moves from the same identity
    pub fn new(round: RoundId, first: MoveRecord, second: MoveRecord) -> Result<Self, RoundError> {
        if first.client_id == second.client_id {
            return Err(RoundError::IdentityCollision {
                round,
                client_id: first.client_id,
            });
        }
        Ok(Self {
            round,
            first,
            second,
        })
    }

    /// Identities of both players
    pub fn players(&self) -> [&ClientId; 2] {
        [&self.first.client_id, &self.second.client_id]
    }
}
