//! Beacon chain primitives shared by the validator registry: validator records and their
//! lifecycle statuses, shard committee schedules, aggregated attestations and the chain
//! configuration every registry operation is parameterised with.

mod safe_arith;
pub use safe_arith::{ArithError, SafeArith, SafeArithIter};

mod validator;
pub use validator::{UnknownValidatorStatus, ValidatorRecord, ValidatorStatus};

mod committee;
pub use committee::{
    CommitteeSchedule, ShardCommittee, ShardCommitteeArray, ValidatorAssignment, ValidatorRole,
};

mod attestation;
pub use attestation::AggregatedAttestation;

mod spec;
pub use spec::{ChainSpec, SpecError};

pub type Hash256 = alloy_primitives::B256;
pub type BLSPubkey = alloy_primitives::Bytes;
pub type Slot = u64;
pub type Gwei = u64;
pub type ShardId = u64;
/// Position of a record in the validator registry.
///
/// Only stable within a single registry snapshot: a rotation may mark the slot `Withdrawn` and a
/// later deposit may reuse it for a different validator.
pub type ValidatorIndex = usize;
