//! Round coordination: move submission, judging and result retrieval.
//!
//! Every operation is a single shot against the store: no polling, no retries.
//! Callers decide when to try again, guided by [`RoundError::is_transient`] and
//! [`RoundError::is_retryable`].
//!
//! [`RoundError::is_transient`]: crate::protocol::RoundError::is_transient
//! [`RoundError::is_retryable`]: crate::protocol::RoundError::is_retryable

mod judge;
mod result;
mod submit;

pub use judge::{collect_round, judge_round, share_result_with_players, Judgement};
pub use result::{fetch_result, lookup_result, ResultStatus};
pub use submit::{share_moves_with_judge, submit_move, MoveSubmission};

use crate::protocol::{RoundError, RoundId};
use rps_store::{Record, RecordStore, SearchQuery};

/// All records of `record_type` tagged with `round` that the caller can see
async fn records_for_round<S: RecordStore + ?Sized>(
    store: &S,
    record_type: &str,
    round: RoundId,
) -> Result<Vec<Record>, RoundError> {
    let query = SearchQuery::new(record_type, crate::protocol::ROUND_KEY, round.to_string());
    let records = store
        .search(&query)
        .await
        .map_err(RoundError::storage(round))?;

    tracing::debug!(%round, record_type, count = records.len(), "searched round records");
    Ok(records)
}
