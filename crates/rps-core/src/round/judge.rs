//! Judging: aggregate two moves, pick the winner, publish the result.

use super::records_for_round;
use crate::games::determine_winner;
use crate::protocol::{
    MoveRecord, ResultRecord, RoundError, RoundId, RoundView, Winner, MOVE_RECORD_TYPE,
    RESULT_RECORD_TYPE,
};
use rps_store::{ClientId, RecordId, RecordStore};
use tracing::{info, warn};

/// A published result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Judgement {
    pub round: RoundId,
    pub winner: Winner,
    /// The written result record
    pub record_id: RecordId,
    /// The moves the result was computed from
    pub view: RoundView,
}

/// Fetch and validate the two moves of a round.
///
/// Anything other than exactly two visible moves is `IncompleteRound`, whether
/// nobody has played yet or a racing submission produced a third record. Every
/// record must carry `client_id`, `move` and `player`, and the two client ids
/// must differ. Two distinct players plus a spurious third write shows up only
/// as a count mismatch.
pub async fn collect_round<S: RecordStore + ?Sized>(
    store: &S,
    round: RoundId,
) -> Result<RoundView, RoundError> {
    let records = records_for_round(store, MOVE_RECORD_TYPE, round).await?;

    let [first, second] = records.as_slice() else {
        if records.len() > 2 {
            warn!(%round, found = records.len(), "too many moves for round");
        }
        return Err(RoundError::IncompleteRound {
            round,
            found: records.len(),
        });
    };

    let first = MoveRecord::from_record(round, 0, first)?;
    let second = MoveRecord::from_record(round, 1, second)?;

    RoundView::new(round, first, second).inspect_err(|err| {
        warn!(%round, error = %err, "identity collision");
    })
}

/// Judge a round and publish its result to both players.
///
/// A round that already has a visible result is rejected with
/// `ResultAlreadyExists` before anything else is read. If sharing fails after
/// the result is written, the returned `Sharing` error carries the result id;
/// retry with [`share_result_with_players`] alone.
pub async fn judge_round<S: RecordStore + ?Sized>(
    store: &S,
    round: RoundId,
) -> Result<Judgement, RoundError> {
    let existing = records_for_round(store, RESULT_RECORD_TYPE, round).await?;
    if !existing.is_empty() {
        warn!(%round, existing = existing.len(), "round already judged");
        return Err(RoundError::ResultAlreadyExists {
            round,
            existing: existing.len(),
        });
    }

    let view = collect_round(store, round).await?;
    let winner = determine_winner(&view.first, &view.second);

    let result = ResultRecord {
        round,
        winner: winner.clone(),
    };
    let written = store
        .write(RESULT_RECORD_TYPE, result.data(), round.plain())
        .await
        .map_err(RoundError::storage(round))?;
    let record_id = written.id();
    info!(%round, %record_id, %winner, "saved result");

    share_result_with_players(store, view.players())
        .await
        .map_err(|err| err.with_written(round, record_id))?;

    info!(%round, %winner, "round judged");
    Ok(Judgement {
        round,
        winner,
        record_id,
        view,
    })
}

/// Grant both players read access to this client's result records
pub async fn share_result_with_players<S: RecordStore + ?Sized>(
    store: &S,
    players: [&ClientId; 2],
) -> Result<(), RoundError> {
    for player in players {
        store
            .share(RESULT_RECORD_TYPE, player)
            .await
            .map_err(|source| {
                warn!(%player, error = %source, "failed to share result");
                RoundError::Sharing {
                    round: None,
                    record_type: RESULT_RECORD_TYPE,
                    grantee: player.clone(),
                    written: None,
                    source,
                }
            })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ROUND_KEY;
    use rps_store::{MemoryRecordStore, SearchQuery};
    use std::collections::BTreeMap;

    fn round(n: u64) -> RoundId {
        RoundId::new(n).unwrap()
    }

    /// Write a raw move record as `writer` and share it with the judge
    async fn raw_move(judge: &MemoryRecordStore, writer: &str, round: u64, fields: &[(&str, &str)]) {
        let player = judge.connect(writer);
        let data: BTreeMap<String, String> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let plain = BTreeMap::from([(ROUND_KEY.to_string(), round.to_string())]);
        player.write(MOVE_RECORD_TYPE, data, plain).await.unwrap();
        player
            .share(MOVE_RECORD_TYPE, judge.client_id())
            .await
            .unwrap();
    }

    async fn play(judge: &MemoryRecordStore, writer: &str, name: &str, round: u64, m: &str) {
        raw_move(
            judge,
            writer,
            round,
            &[("player", name), ("client_id", writer), ("move", m)],
        )
        .await;
    }

    #[tokio::test]
    async fn test_judge_publishes_winner_to_both_players() {
        let judge = MemoryRecordStore::new("judge");
        play(&judge, "aaa", "Alice", 1, "rock").await;
        play(&judge, "bbb", "Bob", 1, "scissors").await;

        let judgement = judge_round(&judge, round(1)).await.unwrap();
        assert_eq!(judgement.winner, Winner::Player("Alice".to_string()));

        let query = SearchQuery::new(RESULT_RECORD_TYPE, ROUND_KEY, "1");
        for player in ["aaa", "bbb"] {
            let seen = judge.connect(player).search(&query).await.unwrap();
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0].id(), judgement.record_id);
            assert_eq!(seen[0].field("winner"), Some("Alice"));
        }
    }

    #[tokio::test]
    async fn test_winner_independent_of_arrival_order() {
        let judge = MemoryRecordStore::new("judge");
        play(&judge, "bbb", "Bob", 2, "paper").await;
        play(&judge, "aaa", "Alice", 2, "scissors").await;

        let judgement = judge_round(&judge, round(2)).await.unwrap();
        assert_eq!(judgement.winner, Winner::Player("Alice".to_string()));
    }

    #[tokio::test]
    async fn test_incomplete_round() {
        let judge = MemoryRecordStore::new("judge");

        let err = judge_round(&judge, round(4)).await.unwrap_err();
        assert!(matches!(err, RoundError::IncompleteRound { found: 0, .. }));

        play(&judge, "aaa", "Alice", 4, "rock").await;
        let err = judge_round(&judge, round(4)).await.unwrap_err();
        assert!(matches!(err, RoundError::IncompleteRound { found: 1, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_three_moves_is_incomplete() {
        let judge = MemoryRecordStore::new("judge");
        play(&judge, "aaa", "Alice", 6, "rock").await;
        play(&judge, "bbb", "Bob", 6, "paper").await;
        play(&judge, "ccc", "Carol", 6, "scissors").await;

        let err = judge_round(&judge, round(6)).await.unwrap_err();
        assert!(matches!(err, RoundError::IncompleteRound { found: 3, .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_search_failure_is_storage_error() {
        let judge = MemoryRecordStore::new("judge");
        play(&judge, "aaa", "Alice", 13, "rock").await;
        play(&judge, "bbb", "Bob", 13, "paper").await;

        judge.fail_next_search();
        let err = collect_round(&judge, round(13)).await.unwrap_err();
        assert!(matches!(err, RoundError::Storage { round: r, .. } if r == round(13)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_result_write_failure_publishes_nothing() {
        let judge = MemoryRecordStore::new("judge");
        play(&judge, "aaa", "Alice", 14, "rock").await;
        play(&judge, "bbb", "Bob", 14, "scissors").await;
        let moves_only = judge.record_count();

        judge.fail_next_write();
        let err = judge_round(&judge, round(14)).await.unwrap_err();
        assert!(matches!(err, RoundError::Storage { round: r, .. } if r == round(14)));
        assert!(err.written_record().is_none());
        assert_eq!(judge.record_count(), moves_only);

        let query = SearchQuery::new(RESULT_RECORD_TYPE, ROUND_KEY, "14");
        for player in ["aaa", "bbb"] {
            assert!(judge.connect(player).search(&query).await.unwrap().is_empty());
        }

        let judgement = judge_round(&judge, round(14)).await.unwrap();
        assert_eq!(judgement.winner, Winner::Player("Alice".to_string()));
    }

    #[tokio::test]
    async fn test_identity_collision_with_two_moves() {
        let judge = MemoryRecordStore::new("judge");
        play(&judge, "aaa", "Alice", 8, "rock").await;
        play(&judge, "aaa", "Alice", 8, "paper").await;

        let err = judge_round(&judge, round(8)).await.unwrap_err();
        assert!(matches!(err, RoundError::IdentityCollision { .. }));
    }

    #[tokio::test]
    async fn test_payload_identity_collision_from_different_writers() {
        let judge = MemoryRecordStore::new("judge");
        raw_move(&judge, "w1", 9, &[("player", "A"), ("client_id", "same"), ("move", "rock")]).await;
        raw_move(&judge, "w2", 9, &[("player", "B"), ("client_id", "same"), ("move", "paper")]).await;

        let err = collect_round(&judge, round(9)).await.unwrap_err();
        assert!(matches!(err, RoundError::IdentityCollision { .. }));
    }

    #[tokio::test]
    async fn test_malformed_record_names_field() {
        let judge = MemoryRecordStore::new("judge");
        raw_move(&judge, "aaa", 10, &[("player", "Alice"), ("client_id", "aaa")]).await;
        raw_move(&judge, "bbb", 10, &[("player", "Bob"), ("client_id", "bbb"), ("move", "rock")]).await;

        let err = collect_round(&judge, round(10)).await.unwrap_err();
        assert!(matches!(
            err,
            RoundError::MalformedRecord { index: 0, field: "move", .. }
        ));
    }

    #[tokio::test]
    async fn test_second_judging_rejected() {
        let judge = MemoryRecordStore::new("judge");
        play(&judge, "aaa", "Alice", 11, "rock").await;
        play(&judge, "bbb", "Bob", 11, "rock").await;

        let judgement = judge_round(&judge, round(11)).await.unwrap();
        assert!(judgement.winner.is_tie());

        let err = judge_round(&judge, round(11)).await.unwrap_err();
        assert!(matches!(
            err,
            RoundError::ResultAlreadyExists { existing: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_share_failure_keeps_result() {
        let judge = MemoryRecordStore::new("judge");
        play(&judge, "aaa", "Alice", 12, "paper").await;
        play(&judge, "bbb", "Bob", 12, "rock").await;
        judge.fail_next_share();

        let err = judge_round(&judge, round(12)).await.unwrap_err();
        assert!(matches!(err, RoundError::Sharing { round: Some(r), .. } if r == round(12)));
        assert!(err.written_record().is_some());

        let players = [&ClientId::from("aaa"), &ClientId::from("bbb")];
        share_result_with_players(&judge, players).await.unwrap();
        let seen = judge
            .connect("bbb")
            .search(&SearchQuery::new(RESULT_RECORD_TYPE, ROUND_KEY, "12"))
            .await
            .unwrap();
        assert_eq!(seen.len(), 1);
    }
}
