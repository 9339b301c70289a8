use beacon_primitives::{ArithError, BLSPubkey, Slot, ValidatorIndex};

/// Errors surfaced by registry operations.
///
/// All of them are recoverable from the caller's point of view: whether an unassigned validator or
/// a malformed attestation is rejected or treated as fatal is decided by the state transition.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no live validator with pubkey {0}")]
    NotFound(BLSPubkey),
    #[error("validator {0} is not a member of any committee")]
    NotAssigned(ValidatorIndex),
    #[error("slot {slot} is outside the committee schedule for reference slot {reference_slot}")]
    InvalidOffset { slot: Slot, reference_slot: Slot },
    #[error("first committee of slot {0} is empty")]
    EmptyCommittee(Slot),
    #[error("validator index {index} is out of range for a registry of {len}")]
    IndexOutOfRange { index: ValidatorIndex, len: usize },
    #[error("bitfield of {found} bytes cannot address {members} committee members")]
    BitfieldMismatch { members: usize, found: usize },
    /// A record changed status after the slot the registry is being advanced to.
    #[error(
        "validator {index} changed status at slot {latest_status_change_slot}, after current slot {current_slot}"
    )]
    SlotRegression { index: ValidatorIndex, current_slot: Slot, latest_status_change_slot: Slot },
    #[error(transparent)]
    Arith(#[from] ArithError),
}
