use beacon_primitives::{
    AggregatedAttestation, ArithError, ChainSpec, Gwei, SafeArith, SafeArithIter, ValidatorIndex,
};
use tracing::warn;

use crate::{
    bitfield::{attesting_positions, bitfield_len, check_bit},
    RegistryError, ValidatorRegistry,
};

/// Sum of the balances of all `Active` validators.
pub fn total_active_deposit(registry: &ValidatorRegistry) -> Result<Gwei, ArithError> {
    registry
        .iter()
        .filter(|validator| validator.is_active())
        .map(|validator| validator.balance)
        .safe_sum()
}

/// [`total_active_deposit`] in whole ETH, rounded down.
pub fn total_active_deposit_in_eth(
    registry: &ValidatorRegistry,
    spec: &ChainSpec,
) -> Result<u64, ArithError> {
    total_active_deposit(registry)?.safe_div(spec.gwei_per_eth)
}

/// Members of the committee whose bit is set in the attestation, in committee order.
pub fn attesting_indices(
    member_indices: &[ValidatorIndex],
    attestation: &AggregatedAttestation,
) -> Vec<ValidatorIndex> {
    attesting_positions(&attestation.attester_bitfield, member_indices.len())
        .map(|position| member_indices[position])
        .collect()
}

/// Returns `(total_balance, voted_balance)` of a committee: the stake of every member and the
/// stake of the members who voted in `attestation`.
///
/// `member_indices` are in committee order, so position `i` corresponds to bit `i`.
pub fn voted_balance_in_attestation(
    registry: &ValidatorRegistry,
    member_indices: &[ValidatorIndex],
    attestation: &AggregatedAttestation,
) -> Result<(Gwei, Gwei), RegistryError> {
    let bitfield = &attestation.attester_bitfield;
    let members = member_indices.len();
    if bitfield.len() < bitfield_len(members) {
        warn!(
            target: "beacon::attestation",
            shard = attestation.shard,
            members,
            bitfield_len = bitfield.len(),
            "attester bitfield too short for committee"
        );
        return Err(RegistryError::BitfieldMismatch { members, found: bitfield.len() })
    }

    let mut total_balance: Gwei = 0;
    let mut voted_balance: Gwei = 0;
    for (position, &index) in member_indices.iter().enumerate() {
        let balance = registry.get_validator(index)?.balance;
        total_balance.safe_add_assign(balance)?;
        if check_bit(bitfield, position) == Some(true) {
            voted_balance.safe_add_assign(balance)?;
        }
    }

    Ok((total_balance, voted_balance))
}
