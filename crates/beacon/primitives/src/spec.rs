use serde::{Deserialize, Serialize};

use crate::{ArithError, Gwei, SafeArith, Slot};

/// Invalid chain configuration.
#[derive(thiserror::Error, Debug)]
pub enum SpecError {
    #[error("failed to parse chain spec: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`{0}` must be non-zero")]
    ZeroValue(&'static str),
    #[error("min online deposit ({min_online}) exceeds deposit size ({deposit})")]
    MinDepositAboveDeposit { min_online: u64, deposit: u64 },
    #[error(transparent)]
    Arith(#[from] ArithError),
}

/// Protocol constants consumed by the registry.
///
/// Passed explicitly to every operation that needs it; nothing in the registry reads global
/// configuration.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainSpec {
    /*
     * Deposits, in whole ETH
     */
    pub deposit_size: u64,
    /// Active validators below this balance are scheduled for exit.
    pub min_online_deposit_size: u64,
    pub gwei_per_eth: u64,

    /*
     * Time
     */
    /// Slots a pending validator waits after its last status change before it may rotate.
    pub min_withdrawal_period: Slot,
    /// Slots per rotation epoch; the committee schedule repeats with this period.
    pub cycle_length: u64,

    /*
     * Genesis
     */
    pub bootstrapped_validators_count: usize,

    /*
     * Churn
     */
    /// Floor of the per-rotation churn, in validators.
    pub min_per_epoch_churn_limit: u64,
    /// Whole deposits of active stake per allowed status change.
    pub churn_limit_quotient: u64,
    /// Apply `min_withdrawal_period` to `PendingWithdraw`/`Penalized -> Withdrawn` as well.
    pub gate_withdrawals_on_delay: bool,
}

impl ChainSpec {
    pub fn mainnet() -> Self {
        Self {
            deposit_size: 32,
            min_online_deposit_size: 16,
            gwei_per_eth: u64::checked_pow(10, 9).expect("pow does not overflow"),

            min_withdrawal_period: 4096,
            cycle_length: 64,

            bootstrapped_validators_count: 1000,

            min_per_epoch_churn_limit: 4,
            churn_limit_quotient: 32,
            gate_withdrawals_on_delay: false,
        }
    }

    /// Small periods and genesis set for tests.
    pub fn minimal() -> Self {
        Self {
            min_withdrawal_period: 4,
            cycle_length: 8,
            bootstrapped_validators_count: 16,
            ..Self::mainnet()
        }
    }

    /// Parses a TOML document. Missing keys fall back to [`ChainSpec::mainnet`].
    pub fn from_toml_str(s: &str) -> Result<Self, SpecError> {
        let spec: Self = toml::from_str(s)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Rejects values that would make registry arithmetic divide by zero or overflow.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.deposit_size == 0 {
            return Err(SpecError::ZeroValue("deposit_size"));
        }
        if self.gwei_per_eth == 0 {
            return Err(SpecError::ZeroValue("gwei_per_eth"));
        }
        if self.cycle_length == 0 {
            return Err(SpecError::ZeroValue("cycle_length"));
        }
        if self.churn_limit_quotient == 0 {
            return Err(SpecError::ZeroValue("churn_limit_quotient"));
        }
        if self.min_online_deposit_size > self.deposit_size {
            return Err(SpecError::MinDepositAboveDeposit {
                min_online: self.min_online_deposit_size,
                deposit: self.deposit_size,
            });
        }
        self.deposit_size_in_gwei()?;
        Ok(())
    }

    /// Balance credited to a new validator.
    pub fn deposit_size_in_gwei(&self) -> Result<Gwei, ArithError> {
        self.deposit_size.safe_mul(self.gwei_per_eth)
    }

    /// Threshold below which an active validator is scheduled for exit.
    pub fn min_online_deposit_in_gwei(&self) -> Result<Gwei, ArithError> {
        self.min_online_deposit_size.safe_mul(self.gwei_per_eth)
    }
}

impl Default for ChainSpec {
    fn default() -> Self {
        Self::mainnet()
    }
}
