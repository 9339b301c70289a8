use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::ShardId;

/// Votes of one shard committee aggregated into a participation bitfield.
///
/// Bit `i` (MSB-first within each byte) is set when the committee member at position `i` voted.
/// Signatures are verified before an attestation reaches the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregatedAttestation {
    pub shard: ShardId,
    pub attester_bitfield: Bytes,
}

impl AggregatedAttestation {
    pub fn new(shard: ShardId, attester_bitfield: impl Into<Bytes>) -> Self {
        Self { shard, attester_bitfield: attester_bitfield.into() }
    }
}
