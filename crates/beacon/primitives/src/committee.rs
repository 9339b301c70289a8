use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};

use crate::{ShardId, ValidatorIndex};

/// The validators assigned to attest one shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShardCommittee {
    pub shard: ShardId,
    /// Registry indices in committee order; position `i` maps to bit `i` of an attestation.
    pub committee: Vec<ValidatorIndex>,
}

impl ShardCommittee {
    pub fn new(shard: ShardId, committee: Vec<ValidatorIndex>) -> Self {
        Self { shard, committee }
    }

    /// Position of `validator_index` within the committee, if it is a member.
    pub fn position_of(&self, validator_index: ValidatorIndex) -> Option<usize> {
        self.committee.iter().position(|&member| member == validator_index)
    }

    pub fn len(&self) -> usize {
        self.committee.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committee.is_empty()
    }
}

/// All committees active during a single slot. A shard may be split over several of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deref, From, Serialize, Deserialize)]
pub struct ShardCommitteeArray {
    pub committees: Vec<ShardCommittee>,
}

impl FromIterator<ShardCommittee> for ShardCommitteeArray {
    fn from_iter<I: IntoIterator<Item = ShardCommittee>>(iter: I) -> Self {
        Self { committees: iter.into_iter().collect() }
    }
}

/// Committee assignments for consecutive slots, indexed by slot offset from a reference slot.
///
/// The schedule repeats with a period of one cycle (`ChainSpec::cycle_length`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deref, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitteeSchedule(Vec<ShardCommitteeArray>);

impl CommitteeSchedule {
    pub fn new(slots: Vec<ShardCommitteeArray>) -> Self {
        Self(slots)
    }

    pub fn into_inner(self) -> Vec<ShardCommitteeArray> {
        self.0
    }
}

impl FromIterator<ShardCommitteeArray> for CommitteeSchedule {
    fn from_iter<I: IntoIterator<Item = ShardCommitteeArray>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Duty of a committee member in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidatorRole {
    Proposer,
    Attester,
}

/// Where a validator sits in a [`CommitteeSchedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatorAssignment {
    /// Index into the schedule.
    pub slot_offset: usize,
    pub shard: ShardId,
    /// The position of the validator within the committee.
    pub committee_position: usize,
    /// The total number of members in the committee.
    pub committee_len: usize,
    pub role: ValidatorRole,
}
