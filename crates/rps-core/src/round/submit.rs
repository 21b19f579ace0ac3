//! Move submission.

use super::records_for_round;
use crate::games::Move;
use crate::protocol::{MoveRecord, RoundError, RoundId, ValidationError, MOVE_RECORD_TYPE};
use rps_store::{ClientId, RecordId, RecordStore};
use tracing::{info, warn};

/// A validated move, ready to be written
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveSubmission {
    record: MoveRecord,
}

impl MoveSubmission {
    /// Validate the inputs of a submission; the move is case-normalized
    pub fn new(
        round: RoundId,
        player_name: impl Into<String>,
        player_move: &str,
        client_id: impl Into<ClientId>,
    ) -> Result<Self, ValidationError> {
        let player_name = player_name.into();
        if player_name.trim().is_empty() {
            return Err(ValidationError::EmptyPlayerName);
        }
        let client_id = client_id.into();
        if client_id.is_empty() {
            return Err(ValidationError::EmptyClientId);
        }
        let player_move: Move = player_move.parse()?;

        Ok(Self {
            record: MoveRecord {
                round,
                player_name,
                client_id,
                player_move,
            },
        })
    }

    pub fn round(&self) -> RoundId {
        self.record.round
    }

    pub fn record(&self) -> &MoveRecord {
        &self.record
    }
}

/// Write a player's move for a round and share it with the judge.
///
/// This is an optimistic submission: the store has no conditional write, so the
/// "no move yet for this round" check and the write are two separate calls. Two
/// agents racing through the check can both write. That race is not closed here;
/// the judge's exact-count and distinct-identity checks are what catch it, and
/// only some manifestations of it (see [`collect_round`](super::collect_round)).
///
/// The check covers every move record the caller can see for the round, not just
/// its own. If sharing fails after the write, the move stays in the store and the
/// returned [`RoundError::Sharing`] carries its id; retry with
/// [`share_moves_with_judge`] alone.
pub async fn submit_move<S: RecordStore + ?Sized>(
    store: &S,
    submission: &MoveSubmission,
    judge: &ClientId,
) -> Result<RecordId, RoundError> {
    let round = submission.round();

    let existing = records_for_round(store, MOVE_RECORD_TYPE, round).await?;
    if !existing.is_empty() {
        warn!(%round, existing = existing.len(), "move already submitted");
        return Err(RoundError::DuplicateSubmission {
            round,
            existing: existing.len(),
        });
    }

    let record = submission.record();
    let written = store
        .write(MOVE_RECORD_TYPE, record.data(), round.plain())
        .await
        .map_err(RoundError::storage(round))?;
    let record_id = written.id();
    info!(%round, %record_id, player = %record.player_name, "saved move");

    share_moves_with_judge(store, judge)
        .await
        .map_err(|err| err.with_written(round, record_id))?;

    Ok(record_id)
}

/// Grant the judge read access to this client's move records
pub async fn share_moves_with_judge<S: RecordStore + ?Sized>(
    store: &S,
    judge: &ClientId,
) -> Result<(), RoundError> {
    store
        .share(MOVE_RECORD_TYPE, judge)
        .await
        .map_err(|source| {
            warn!(%judge, error = %source, "failed to share moves with judge");
            RoundError::Sharing {
                round: None,
                record_type: MOVE_RECORD_TYPE,
                grantee: judge.clone(),
                written: None,
                source,
            }
        })?;

    info!(%judge, "shared moves with judge");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_store::{MemoryRecordStore, SearchQuery};

    fn round(n: u64) -> RoundId {
        RoundId::new(n).unwrap()
    }

    fn judge_id() -> ClientId {
        ClientId::from("judge")
    }

    #[test]
    fn test_submission_validation() {
        assert!(MoveSubmission::new(round(1), "Alice", "ROCK", "aaa").is_ok());
        assert_eq!(
            MoveSubmission::new(round(1), "Alice", "lizard", "aaa").unwrap_err(),
            ValidationError::InvalidMove("lizard".to_string())
        );
        assert_eq!(
            MoveSubmission::new(round(1), " ", "rock", "aaa").unwrap_err(),
            ValidationError::EmptyPlayerName
        );
        assert_eq!(
            MoveSubmission::new(round(1), "Alice", "rock", "").unwrap_err(),
            ValidationError::EmptyClientId
        );
    }

    #[tokio::test]
    async fn test_submit_stores_normalized_move_and_shares() {
        let alice = MemoryRecordStore::new("aaa");
        let judge = alice.connect("judge");
        let submission = MoveSubmission::new(round(1), "Alice", "Rock", "aaa").unwrap();

        let record_id = submit_move(&alice, &submission, &judge_id()).await.unwrap();

        let seen = judge
            .search(&SearchQuery::new(MOVE_RECORD_TYPE, "round-number", "1"))
            .await
            .unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id(), record_id);
        assert_eq!(seen[0].field("move"), Some("rock"));
        assert_eq!(seen[0].field("player"), Some("Alice"));
        assert_eq!(seen[0].field("client_id"), Some("aaa"));
    }

    #[tokio::test]
    async fn test_second_submission_same_player_rejected() {
        let alice = MemoryRecordStore::new("aaa");
        let first = MoveSubmission::new(round(3), "Alice", "rock", "aaa").unwrap();
        let second = MoveSubmission::new(round(3), "Alice", "paper", "aaa").unwrap();

        submit_move(&alice, &first, &judge_id()).await.unwrap();
        let err = submit_move(&alice, &second, &judge_id()).await.unwrap_err();

        assert!(matches!(
            err,
            RoundError::DuplicateSubmission { existing: 1, .. }
        ));
        assert_eq!(alice.record_count(), 1);
    }

    #[tokio::test]
    async fn test_visible_move_from_other_player_rejects_submission() {
        let alice = MemoryRecordStore::new("aaa");
        let bob = alice.connect("bbb");
        let first = MoveSubmission::new(round(5), "Alice", "rock", "aaa").unwrap();
        submit_move(&alice, &first, &judge_id()).await.unwrap();
        alice.share(MOVE_RECORD_TYPE, &ClientId::from("bbb")).await.unwrap();

        let second = MoveSubmission::new(round(5), "Bob", "paper", "bbb").unwrap();
        let err = submit_move(&bob, &second, &judge_id()).await.unwrap_err();

        assert!(matches!(err, RoundError::DuplicateSubmission { .. }));
    }

    #[tokio::test]
    async fn test_other_rounds_do_not_block_submission() {
        let alice = MemoryRecordStore::new("aaa");
        let r1 = MoveSubmission::new(round(1), "Alice", "rock", "aaa").unwrap();
        let r2 = MoveSubmission::new(round(2), "Alice", "rock", "aaa").unwrap();

        submit_move(&alice, &r1, &judge_id()).await.unwrap();
        submit_move(&alice, &r2, &judge_id()).await.unwrap();
        assert_eq!(alice.record_count(), 2);
    }

    #[tokio::test]
    async fn test_write_failure_is_storage_error() {
        let alice = MemoryRecordStore::new("aaa");
        alice.fail_next_write();
        let submission = MoveSubmission::new(round(1), "Alice", "rock", "aaa").unwrap();

        let err = submit_move(&alice, &submission, &judge_id()).await.unwrap_err();

        assert!(matches!(err, RoundError::Storage { .. }));
        assert_eq!(alice.record_count(), 0);
    }

    #[tokio::test]
    async fn test_search_failure_is_storage_error_and_writes_nothing() {
        let alice = MemoryRecordStore::new("aaa");
        alice.fail_next_search();
        let submission = MoveSubmission::new(round(4), "Alice", "rock", "aaa").unwrap();

        let err = submit_move(&alice, &submission, &judge_id()).await.unwrap_err();

        assert!(matches!(err, RoundError::Storage { round: r, .. } if r == round(4)));
        assert_eq!(alice.record_count(), 0);
    }

    #[tokio::test]
    async fn test_share_failure_keeps_move_and_can_be_retried() {
        let alice = MemoryRecordStore::new("aaa");
        let judge = alice.connect("judge");
        alice.fail_next_share();
        let submission = MoveSubmission::new(round(1), "Alice", "rock", "aaa").unwrap();

        let err = submit_move(&alice, &submission, &judge_id()).await.unwrap_err();
        let written = err.written_record().expect("move should have been written");
        assert!(matches!(err, RoundError::Sharing { round: Some(r), .. } if r == round(1)));
        assert_eq!(alice.record_count(), 1);

        let query = SearchQuery::new(MOVE_RECORD_TYPE, "round-number", "1");
        assert!(judge.search(&query).await.unwrap().is_empty());

        share_moves_with_judge(&alice, &judge_id()).await.unwrap();
        let seen = judge.search(&query).await.unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id(), written);
    }
}
