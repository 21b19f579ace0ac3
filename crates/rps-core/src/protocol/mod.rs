//! Protocol types, record schemas and errors.

mod error;
mod types;

pub use error::{RoundError, ValidationError};
pub use types::{
    MoveRecord, ResultRecord, RoundId, RoundView, Winner, CLIENT_ID_FIELD, MOVE_FIELD,
    MOVE_RECORD_TYPE, PLAYER_FIELD, RESULT_RECORD_TYPE, ROUND_KEY, TIE, WINNER_FIELD,
};
