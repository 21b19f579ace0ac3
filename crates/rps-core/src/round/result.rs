//! Result retrieval.

use super::records_for_round;
use crate::protocol::{ResultRecord, RoundError, RoundId, Winner, RESULT_RECORD_TYPE};
use rps_store::{RecordId, RecordStore};
use tracing::warn;

/// What the store knows about a round's result
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultStatus {
    Judged { winner: Winner, record_id: RecordId },
    /// Not judged yet, or not yet shared with the caller
    Pending,
}

/// Look up a round's result without treating "not judged yet" as an error
pub async fn lookup_result<S: RecordStore + ?Sized>(
    store: &S,
    round: RoundId,
) -> Result<ResultStatus, RoundError> {
    let records = records_for_round(store, RESULT_RECORD_TYPE, round).await?;

    match records.as_slice() {
        [] => Ok(ResultStatus::Pending),
        [record] => {
            let result = ResultRecord::from_record(round, record)?;
            Ok(ResultStatus::Judged {
                winner: result.winner,
                record_id: record.id(),
            })
        }
        many => {
            warn!(%round, found = many.len(), "multiple results for round");
            Err(RoundError::MultipleResults {
                round,
                found: many.len(),
            })
        }
    }
}

/// The winner of a judged round; `ResultNotFound` while it is still pending
pub async fn fetch_result<S: RecordStore + ?Sized>(
    store: &S,
    round: RoundId,
) -> Result<Winner, RoundError> {
    match lookup_result(store, round).await? {
        ResultStatus::Judged { winner, .. } => Ok(winner),
        ResultStatus::Pending => Err(RoundError::ResultNotFound { round }),
    }
}
