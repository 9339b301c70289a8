use alloy_primitives::Bytes;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{ArithError, BLSPubkey, ChainSpec, Gwei, Hash256, SafeArith, Slot};

/// Lifecycle status of a validator record.
///
/// ```text
/// PendingActivation -> Active -> PendingExit -> PendingWithdraw -> Withdrawn
///                                                    Penalized -> Withdrawn
/// ```
///
/// `Penalized` is only ever set by slashing detection outside the registry.
#[derive(
    Debug, Display, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u64)]
pub enum ValidatorStatus {
    #[default]
    PendingActivation = 0,
    Active = 1,
    PendingExit = 2,
    PendingWithdraw = 3,
    Withdrawn = 4,
    Penalized = 127,
}

/// A status code that does not name any [`ValidatorStatus`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown validator status code {0}")]
pub struct UnknownValidatorStatus(pub u64);

impl ValidatorStatus {
    /// Numeric status code.
    pub const fn code(self) -> u64 {
        self as u64
    }

    /// Returns `true` if `self -> next` is an edge of the lifecycle state machine.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::PendingActivation, Self::Active) |
                (Self::Active, Self::PendingExit) |
                (Self::PendingExit, Self::PendingWithdraw) |
                (Self::PendingWithdraw | Self::Penalized, Self::Withdrawn)
        )
    }
}

impl TryFrom<u64> for ValidatorStatus {
    type Error = UnknownValidatorStatus;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::PendingActivation,
            1 => Self::Active,
            2 => Self::PendingExit,
            3 => Self::PendingWithdraw,
            4 => Self::Withdrawn,
            127 => Self::Penalized,
            other => return Err(UnknownValidatorStatus(other)),
        })
    }
}

impl From<ValidatorStatus> for u64 {
    fn from(status: ValidatorStatus) -> Self {
        status.code()
    }
}

/// A single entry of the validator registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatorRecord {
    pub pubkey: BLSPubkey,
    /// Opaque to the registry.
    pub randao_commitment: Hash256,
    pub balance: Gwei,
    pub status: ValidatorStatus,
    pub latest_status_change_slot: Slot,
}

impl ValidatorRecord {
    /// A fresh record holding exactly one deposit.
    pub fn from_deposit(
        pubkey: BLSPubkey,
        randao_commitment: Hash256,
        status: ValidatorStatus,
        spec: &ChainSpec,
    ) -> Result<Self, ArithError> {
        Ok(Self {
            pubkey,
            randao_commitment,
            balance: spec.deposit_size_in_gwei()?,
            status,
            latest_status_change_slot: 0,
        })
    }

    /// Returns `true` if the validator is on active duty.
    pub fn is_active(&self) -> bool {
        self.status == ValidatorStatus::Active
    }

    /// Returns `true` if the record slot may be reused by a new deposit.
    pub fn is_withdrawn(&self) -> bool {
        self.status == ValidatorStatus::Withdrawn
    }

    /// Every status other than `Withdrawn` still owns its index and pubkey.
    pub fn is_live(&self) -> bool {
        !self.is_withdrawn()
    }

    pub fn is_penalized(&self) -> bool {
        self.status == ValidatorStatus::Penalized
    }

    /// Waiting on the rotation budget: either to activate or to start withdrawing.
    pub fn is_pending(&self) -> bool {
        matches!(self.status, ValidatorStatus::PendingActivation | ValidatorStatus::PendingExit)
    }

    /// Leaves the registry on the next rotation regardless of churn.
    pub fn is_exiting(&self) -> bool {
        matches!(self.status, ValidatorStatus::PendingWithdraw | ValidatorStatus::Penalized)
    }

    /// Slots elapsed since the last status change.
    ///
    /// A `current_slot` before `latest_status_change_slot` is an underflow error.
    pub fn slots_since_status_change(&self, current_slot: Slot) -> Result<u64, ArithError> {
        current_slot.safe_sub(self.latest_status_change_slot)
    }

    /// Moves the record to `status` and stamps the change slot.
    pub fn set_status(&mut self, status: ValidatorStatus, slot: Slot) {
        debug_assert!(
            self.status.can_transition_to(status),
            "invalid validator status transition {} -> {}",
            self.status,
            status
        );
        self.status = status;
        self.latest_status_change_slot = slot;
    }

    /// Copies the record without sharing any byte storage with `self`.
    pub fn deep_copy(&self) -> Self {
        Self {
            pubkey: Bytes::copy_from_slice(&self.pubkey),
            randao_commitment: Hash256::from_slice(self.randao_commitment.as_slice()),
            balance: self.balance,
            status: self.status,
            latest_status_change_slot: self.latest_status_change_slot,
        }
    }
}
