//! RPS Core Library
//!
//! This crate implements the round-coordination protocol for two-player
//! rock-paper-scissors played through a shared, append-only record store:
//! move submission, judging, result publication and result retrieval.

pub mod config;
pub mod games;
pub mod protocol;
pub mod round;

pub use config::{resolve_judge_id, ConfigError, JudgeConfig, DEFAULT_JUDGE_CONFIG_PATH};
pub use games::{determine_winner, winning_move, Move};
pub use protocol::{
    MoveRecord, ResultRecord, RoundError, RoundId, RoundView, ValidationError, Winner,
};
pub use round::{
    collect_round, fetch_result, judge_round, lookup_result, share_moves_with_judge,
    share_result_with_players, submit_move, Judgement, MoveSubmission, ResultStatus,
};

pub use rps_store::{ClientId, RecordId, RecordStore};
