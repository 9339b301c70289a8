use alloy_primitives::{keccak256, Bytes};
use beacon_primitives::{ChainSpec, Hash256, ValidatorIndex, ValidatorRecord, ValidatorStatus};
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::RegistryError;

/// The ordered validator set. A validator's index is its position in this list.
///
/// Entries are never removed: a withdrawn record keeps its position until a new deposit reuses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorRegistry {
    validators: Vec<ValidatorRecord>,
}

impl ValidatorRegistry {
    pub fn new(validators: Vec<ValidatorRecord>) -> Self {
        Self { validators }
    }

    /// Safe indexer for the registry.
    pub fn get_validator(&self, index: ValidatorIndex) -> Result<&ValidatorRecord, RegistryError> {
        self.validators
            .get(index)
            .ok_or(RegistryError::IndexOutOfRange { index, len: self.validators.len() })
    }

    pub fn into_inner(self) -> Vec<ValidatorRecord> {
        self.validators
    }

    pub(crate) fn validators_mut(&mut self) -> &mut [ValidatorRecord] {
        &mut self.validators
    }
}

impl From<Vec<ValidatorRecord>> for ValidatorRegistry {
    fn from(validators: Vec<ValidatorRecord>) -> Self {
        Self::new(validators)
    }
}

impl FromIterator<ValidatorRecord> for ValidatorRegistry {
    fn from_iter<I: IntoIterator<Item = ValidatorRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Builds the genesis registry: `bootstrapped_validators_count` active validators, each holding a
/// single deposit.
///
/// Pubkeys and randao commitments are derived from the validator index so the genesis set is
/// deterministic and free of duplicates.
pub fn initial_registry(spec: &ChainSpec) -> Result<ValidatorRegistry, RegistryError> {
    let balance = spec.deposit_size_in_gwei()?;

    let registry: ValidatorRegistry = (0..spec.bootstrapped_validators_count as u64)
        .map(|i| {
            let pubkey = keccak256(i.to_be_bytes());
            ValidatorRecord {
                pubkey: Bytes::copy_from_slice(pubkey.as_slice()),
                randao_commitment: keccak256(pubkey),
                balance,
                status: ValidatorStatus::Active,
                latest_status_change_slot: 0,
            }
        })
        .collect();

    debug!(target: "beacon::registry", validators = registry.len(), "built genesis registry");
    Ok(registry)
}

/// Returns a registry with a new validator holding one deposit.
///
/// The record takes the lowest withdrawn index if there is one, otherwise it is appended.
pub fn add_pending_validator(
    registry: &ValidatorRegistry,
    pubkey: Bytes,
    randao_commitment: Hash256,
    status: ValidatorStatus,
    spec: &ChainSpec,
) -> Result<ValidatorRegistry, RegistryError> {
    let record = ValidatorRecord::from_deposit(pubkey, randao_commitment, status, spec)?;
    let mut next = registry.clone();

    match min_empty_validator(registry) {
        Some(index) => {
            trace!(target: "beacon::registry", index, pubkey = %record.pubkey, "reusing withdrawn slot");
            next.validators[index] = record;
        }
        None => {
            trace!(
                target: "beacon::registry",
                index = next.validators.len(),
                pubkey = %record.pubkey,
                "appending validator"
            );
            next.validators.push(record);
        }
    }

    Ok(next)
}

/// Index of the live validator holding `pubkey`.
///
/// Withdrawn records are skipped: their index may already belong to someone else.
pub fn validator_index(
    pubkey: &[u8],
    registry: &ValidatorRegistry,
) -> Result<ValidatorIndex, RegistryError> {
    registry
        .iter()
        .position(|validator| validator.is_live() && validator.pubkey.as_ref() == pubkey)
        .ok_or_else(|| RegistryError::NotFound(Bytes::copy_from_slice(pubkey)))
}

/// Deep copy of the registry. No byte storage is shared with `registry`.
pub fn copy_registry(registry: &ValidatorRegistry) -> ValidatorRegistry {
    registry.iter().map(ValidatorRecord::deep_copy).collect()
}

/// Lowest index whose record is `Withdrawn`, if any.
pub fn min_empty_validator(registry: &ValidatorRegistry) -> Option<ValidatorIndex> {
    registry.iter().position(ValidatorRecord::is_withdrawn)
}

/// Indices of all `Active` validators, ascending.
pub fn active_validator_indices(registry: &ValidatorRegistry) -> Vec<ValidatorIndex> {
    registry
        .iter()
        .enumerate()
        .filter_map(|(index, validator)| validator.is_active().then_some(index))
        .collect()
}
