use beacon_primitives::{
    ChainSpec, CommitteeSchedule, SafeArith, ShardCommitteeArray, ShardId, Slot, ValidatorAssignment,
    ValidatorIndex, ValidatorRole,
};
use tracing::trace;

use crate::{validator_index, RegistryError, ValidatorRegistry};

/// Locates `validator_index` in `schedule`, scanning slots in order.
///
/// The member at position 0 of a committee proposes; everyone else attests.
pub fn committee_assignment(
    validator_index: ValidatorIndex,
    schedule: &CommitteeSchedule,
) -> Option<ValidatorAssignment> {
    schedule.iter().enumerate().find_map(|(slot_offset, slot_committees)| {
        slot_committees.iter().find_map(|shard_committee| {
            shard_committee.position_of(validator_index).map(|committee_position| {
                ValidatorAssignment {
                    slot_offset,
                    shard: shard_committee.shard,
                    committee_position,
                    committee_len: shard_committee.len(),
                    role: if committee_position == 0 {
                        ValidatorRole::Proposer
                    } else {
                        ValidatorRole::Attester
                    },
                }
            })
        })
    })
}

/// Shard the validator holding `pubkey` attests to in the given slot.
pub fn validator_shard_id(
    pubkey: &[u8],
    registry: &ValidatorRegistry,
    slot_committees: &ShardCommitteeArray,
) -> Result<ShardId, RegistryError> {
    let index = validator_index(pubkey, registry)?;

    slot_committees
        .iter()
        .find(|shard_committee| shard_committee.position_of(index).is_some())
        .map(|shard_committee| shard_committee.shard)
        .ok_or(RegistryError::NotAssigned(index))
}

/// Slot offset and duty of the validator holding `pubkey` within `schedule`.
pub fn validator_slot_and_role(
    pubkey: &[u8],
    registry: &ValidatorRegistry,
    schedule: &CommitteeSchedule,
) -> Result<ValidatorAssignment, RegistryError> {
    let index = validator_index(pubkey, registry)?;
    committee_assignment(index, schedule).ok_or(RegistryError::NotAssigned(index))
}

/// Committees of `slot`, for a schedule that starts one cycle before `reference_slot`.
///
/// Valid slots lie in `[reference_slot - cycle_length, reference_slot + 2 * cycle_length)`, with
/// the lower bound saturating at genesis.
pub fn shard_committees_for_slot<'a>(
    schedule: &'a CommitteeSchedule,
    slot: Slot,
    reference_slot: Slot,
    spec: &ChainSpec,
) -> Result<&'a ShardCommitteeArray, RegistryError> {
    let invalid = || RegistryError::InvalidOffset { slot, reference_slot };

    let lower_bound = reference_slot.saturating_sub(spec.cycle_length);
    let upper_bound = spec.cycle_length.safe_mul(2)?.safe_add(reference_slot)?;
    if slot < lower_bound || slot >= upper_bound {
        return Err(invalid())
    }

    let offset = usize::try_from(slot - lower_bound).map_err(|_| invalid())?;
    schedule.get(offset).ok_or_else(invalid)
}

/// Shard and in-committee index of the proposer of `slot`.
///
/// The proposer comes from the first committee of the slot, at position `slot % committee_len`.
pub fn proposer_shard_and_index(
    schedule: &CommitteeSchedule,
    slot: Slot,
    reference_slot: Slot,
    spec: &ChainSpec,
) -> Result<(ShardId, usize), RegistryError> {
    let slot_committees = shard_committees_for_slot(schedule, slot, reference_slot, spec)?;
    let first = slot_committees
        .first()
        .filter(|shard_committee| !shard_committee.is_empty())
        .ok_or(RegistryError::EmptyCommittee(slot))?;

    let committee_len = first.len() as u64;
    let index = slot.safe_rem(committee_len)? as usize;

    trace!(target: "beacon::committee", slot, shard = first.shard, index, "resolved proposer");
    Ok((first.shard, index))
}
