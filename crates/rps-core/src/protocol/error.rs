//! Protocol errors.

use super::types::RoundId;
use rps_store::{ClientId, RecordId, StoreError};
use thiserror::Error;

/// Caller-correctable input errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Invalid round number: {0}")]
    InvalidRound(String),

    #[error("Player name must not be empty")]
    EmptyPlayerName,

    #[error("Client ID must not be empty")]
    EmptyClientId,
}

/// Errors from submitting, judging or reading a round
#[derive(Debug, Error)]
pub enum RoundError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A move has already been submitted for round {round} ({existing} visible)")]
    DuplicateSubmission { round: RoundId, existing: usize },

    #[error("Both moves for round {round} come from the same client ID {client_id}")]
    IdentityCollision { round: RoundId, client_id: ClientId },

    #[error("There should be exactly two moves for round {round}, found {found}")]
    IncompleteRound { round: RoundId, found: usize },

    #[error("Malformed record {index} for round {round}: field '{field}' {problem}")]
    MalformedRecord {
        round: RoundId,
        index: usize,
        field: &'static str,
        problem: String,
    },

    #[error("Round {round} has already been judged ({existing} result records)")]
    ResultAlreadyExists { round: RoundId, existing: usize },

    #[error("There is no result for round {round} yet")]
    ResultNotFound { round: RoundId },

    #[error("There appears to be more than one result for round {round} ({found} found)")]
    MultipleResults { round: RoundId, found: usize },

    #[error("Store error in round {round}: {source}")]
    Storage {
        round: RoundId,
        #[source]
        source: StoreError,
    },

    #[error("Error sharing {record_type} records with {grantee}: {source}")]
    Sharing {
        /// Round being submitted or judged; `None` for a standalone share retry
        round: Option<RoundId>,
        record_type: &'static str,
        grantee: ClientId,
        /// Record written before the share step failed; it stays in the store
        written: Option<RecordId>,
        #[source]
        source: StoreError,
    },
}

impl RoundError {
    /// Expected while polling too early; try again later.
    ///
    /// A round with more than two moves never recovers in an append-only
    /// store, so only a short count is transient.
    pub fn is_transient(&self) -> bool {
        match self {
            RoundError::IncompleteRound { found, .. } => *found < 2,
            RoundError::ResultNotFound { .. } => true,
            _ => false,
        }
    }

    /// Store-level failure the caller may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, RoundError::Storage { .. } | RoundError::Sharing { .. })
    }

    /// Record that was written before a later step failed
    pub fn written_record(&self) -> Option<RecordId> {
        match self {
            RoundError::Sharing { written, .. } => *written,
            _ => None,
        }
    }

    /// Attach the round and the id of a record written before a sharing failure
    pub(crate) fn with_written(self, round: RoundId, record_id: RecordId) -> Self {
        match self {
            RoundError::Sharing {
                record_type,
                grantee,
                source,
                ..
            } => RoundError::Sharing {
                round: Some(round),
                record_type,
                grantee,
                written: Some(record_id),
                source,
            },
            other => other,
        }
    }

    pub(crate) fn storage(round: RoundId) -> impl FnOnce(StoreError) -> RoundError {
        move |source| RoundError::Storage { round, source }
    }
}
