//! Validator registry core of the beacon chain.
//!
//! Tracks the ordered validator set, rotates validators through their lifecycle under a bounded
//! churn, resolves committee and proposer duties from a committee schedule, validates attestation
//! participation bitfields and aggregates the stake behind an attestation.
//!
//! Every operation is a pure function over a [`ValidatorRegistry`] snapshot: operations that change
//! the registry return a new value and leave their input untouched, so snapshots may be shared
//! freely between readers. Validator indices are only meaningful within the snapshot they were
//! resolved against; a rotation or a new deposit may reassign a withdrawn index.

mod error;
pub use error::RegistryError;

mod store;
pub use store::{
    active_validator_indices, add_pending_validator, copy_registry, initial_registry,
    min_empty_validator, validator_index, ValidatorRegistry,
};

mod rotation;
pub use rotation::{change_validator_registry, check_validator_min_deposit, rotation_budget};

mod committee;
pub use committee::{
    committee_assignment, proposer_shard_and_index, shard_committees_for_slot,
    validator_shard_id, validator_slot_and_role,
};

mod bitfield;
pub use bitfield::{attesting_positions, bitfield_is_valid, bitfield_len, check_bit, set_bit};

mod balance;
pub use balance::{
    attesting_indices, total_active_deposit, total_active_deposit_in_eth,
    voted_balance_in_attestation,
};
