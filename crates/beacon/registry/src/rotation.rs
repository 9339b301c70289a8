use std::cmp;

use beacon_primitives::{ArithError, ChainSpec, Gwei, SafeArith, Slot, ValidatorStatus};
use tracing::{debug, trace};

use crate::{RegistryError, ValidatorRegistry};

/// Maximum number of `PendingActivation -> Active` and `PendingExit -> PendingWithdraw`
/// transitions a single rotation may apply.
///
/// `max(min_per_epoch_churn_limit, deposits / churn_limit_quotient)` where `deposits` is the
/// active stake expressed in whole deposits. Non-decreasing in `total_active_balance`.
pub fn rotation_budget(total_active_balance: Gwei, spec: &ChainSpec) -> Result<u64, ArithError> {
    let deposits = total_active_balance.safe_div(spec.deposit_size_in_gwei()?)?;
    Ok(cmp::max(spec.min_per_epoch_churn_limit, deposits.safe_div(spec.churn_limit_quotient)?))
}

/// Transition counts of one rotation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RotationSummary {
    activated: u64,
    exited: u64,
    withdrawn: u64,
    /// Eligible validators left pending because the budget ran out.
    deferred: u64,
}

/// Advances validator statuses for the rotation at `current_slot` and returns the new registry.
///
/// Validators are visited in index order and judged on the status they held when the call
/// started, so a validator moves at most one step per rotation. Pending validators past
/// `min_withdrawal_period` consume the rotation budget; `PendingWithdraw` and `Penalized`
/// validators are withdrawn without touching it.
pub fn change_validator_registry(
    current_slot: Slot,
    total_active_balance: Gwei,
    registry: &ValidatorRegistry,
    spec: &ChainSpec,
) -> Result<ValidatorRegistry, RegistryError> {
    let mut budget = rotation_budget(total_active_balance, spec)?;
    let mut summary = RotationSummary::default();
    let mut next = registry.clone();

    for (index, validator) in next.validators_mut().iter_mut().enumerate() {
        if !validator.is_pending() && !validator.is_exiting() {
            continue
        }

        if validator.is_pending() || spec.gate_withdrawals_on_delay {
            let elapsed = validator.slots_since_status_change(current_slot).map_err(|_| {
                RegistryError::SlotRegression {
                    index,
                    current_slot,
                    latest_status_change_slot: validator.latest_status_change_slot,
                }
            })?;
            if elapsed < spec.min_withdrawal_period {
                continue
            }
        }

        let from = validator.status;
        let to = match from {
            ValidatorStatus::PendingActivation | ValidatorStatus::PendingExit => {
                if budget == 0 {
                    summary.deferred.safe_add_assign(1)?;
                    continue
                }
                budget.safe_sub_assign(1)?;
                if from == ValidatorStatus::PendingActivation {
                    summary.activated.safe_add_assign(1)?;
                    ValidatorStatus::Active
                } else {
                    summary.exited.safe_add_assign(1)?;
                    ValidatorStatus::PendingWithdraw
                }
            }
            _ => {
                summary.withdrawn.safe_add_assign(1)?;
                ValidatorStatus::Withdrawn
            }
        };

        trace!(target: "beacon::rotation", index, %from, %to, "validator status change");
        validator.set_status(to, current_slot);
    }

    debug!(
        target: "beacon::rotation",
        current_slot,
        activated = summary.activated,
        exited = summary.exited,
        withdrawn = summary.withdrawn,
        deferred = summary.deferred,
        "rotated validator registry"
    );
    Ok(next)
}

/// Schedules every active validator whose balance fell below the minimum online deposit for exit.
pub fn check_validator_min_deposit(
    registry: &ValidatorRegistry,
    current_slot: Slot,
    spec: &ChainSpec,
) -> Result<ValidatorRegistry, RegistryError> {
    let min_deposit = spec.min_online_deposit_in_gwei()?;
    let mut next = registry.clone();

    for (index, validator) in next.validators_mut().iter_mut().enumerate() {
        if validator.is_active() && validator.balance < min_deposit {
            debug!(
                target: "beacon::rotation",
                index,
                balance = validator.balance,
                min_deposit,
                "validator below minimum online deposit"
            );
            validator.set_status(ValidatorStatus::PendingExit, current_slot);
        }
    }

    Ok(next)
}
