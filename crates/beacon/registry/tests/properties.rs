//! Property tests over randomly generated registries, schedules and bitfields.

use alloy_primitives::{Bytes, B256};
use beacon_primitives::{
    AggregatedAttestation, ChainSpec, CommitteeSchedule, ShardCommittee, ShardCommitteeArray,
    ValidatorRecord, ValidatorStatus,
};
use beacon_registry::{
    add_pending_validator, attesting_indices, bitfield_is_valid, bitfield_len,
    change_validator_registry, check_bit, copy_registry, min_empty_validator, rotation_budget,
    set_bit, validator_shard_id, validator_slot_and_role, voted_balance_in_attestation,
    ValidatorRegistry,
};
use proptest::prelude::*;

fn status() -> impl Strategy<Value = ValidatorStatus> {
    prop_oneof![
        Just(ValidatorStatus::PendingActivation),
        Just(ValidatorStatus::Active),
        Just(ValidatorStatus::PendingExit),
        Just(ValidatorStatus::PendingWithdraw),
        Just(ValidatorStatus::Withdrawn),
        Just(ValidatorStatus::Penalized),
    ]
}

/// Registries whose records all changed status at or before slot 64, with unique pubkeys.
fn arb_registry(max_len: usize) -> impl Strategy<Value = ValidatorRegistry> {
    prop::collection::vec((status(), 0u64..=64, 0u64..=64_000_000_000), 0..max_len).prop_map(
        |records| {
            records
                .into_iter()
                .enumerate()
                .map(|(i, (status, latest_status_change_slot, balance))| ValidatorRecord {
                    pubkey: Bytes::from((i as u64).to_be_bytes().to_vec()),
                    randao_commitment: B256::ZERO,
                    balance,
                    status,
                    latest_status_change_slot,
                })
                .collect::<ValidatorRegistry>()
        },
    )
}

/// Splits `0..validators` into committees of random sizes over `slots` slots.
fn arb_schedule(validators: usize, slots: usize) -> impl Strategy<Value = CommitteeSchedule> {
    prop::collection::vec(1usize..8, slots * 2).prop_map(move |sizes| {
        let mut next = 0;
        sizes
            .chunks(2)
            .enumerate()
            .map(|(slot, chunk)| {
                chunk
                    .iter()
                    .enumerate()
                    .map(|(i, &size)| {
                        let end = (next + size).min(validators);
                        let committee = (next..end).collect();
                        next = end;
                        ShardCommittee::new((slot * 2 + i) as u64, committee)
                    })
                    .collect::<ShardCommitteeArray>()
            })
            .collect::<CommitteeSchedule>()
    })
}

proptest! {
    #[test]
    fn rotation_applies_only_legal_transitions(
        registry in arb_registry(64),
        total_active_balance in 0u64..=100_000_000_000_000,
        gate in any::<bool>(),
    ) {
        let spec = ChainSpec { gate_withdrawals_on_delay: gate, ..ChainSpec::minimal() };
        let current_slot = 100;
        let budget = rotation_budget(total_active_balance, &spec).unwrap();

        let next = change_validator_registry(current_slot, total_active_balance, &registry, &spec)
            .unwrap();

        prop_assert_eq!(next.len(), registry.len());
        let mut budgeted = 0;
        for (before, after) in registry.iter().zip(next.iter()) {
            prop_assert_eq!(&before.pubkey, &after.pubkey);
            prop_assert_eq!(before.balance, after.balance);
            if before.status == after.status {
                prop_assert_eq!(before.latest_status_change_slot, after.latest_status_change_slot);
                continue
            }
            prop_assert!(before.status.can_transition_to(after.status));
            prop_assert_eq!(after.latest_status_change_slot, current_slot);
            if before.is_pending() {
                budgeted += 1;
            }
        }
        prop_assert!(budgeted <= budget);

        // without gating every exiting validator is withdrawn
        if !gate {
            for (before, after) in registry.iter().zip(next.iter()) {
                if before.is_exiting() {
                    prop_assert_eq!(after.status, ValidatorStatus::Withdrawn);
                }
            }
        }
    }

    #[test]
    fn rotation_budget_is_monotonic(a in any::<u64>(), b in any::<u64>()) {
        let spec = ChainSpec::mainnet();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_budget = rotation_budget(low, &spec).unwrap();
        prop_assert!(low_budget >= spec.min_per_epoch_churn_limit);
        prop_assert!(low_budget <= rotation_budget(high, &spec).unwrap());
    }

    #[test]
    fn added_validator_fills_lowest_withdrawn_slot(registry in arb_registry(32)) {
        let spec = ChainSpec::mainnet();
        let pubkey = Bytes::from_static(b"new validator");

        let next = add_pending_validator(
            &registry,
            pubkey.clone(),
            B256::ZERO,
            ValidatorStatus::PendingActivation,
            &spec,
        )
        .unwrap();

        let expected_index = match min_empty_validator(&registry) {
            Some(index) => {
                prop_assert_eq!(next.len(), registry.len());
                index
            }
            None => {
                prop_assert_eq!(next.len(), registry.len() + 1);
                registry.len()
            }
        };
        prop_assert_eq!(&next[expected_index].pubkey, &pubkey);
        prop_assert_eq!(next[expected_index].status, ValidatorStatus::PendingActivation);
    }

    #[test]
    fn copy_matches_source(registry in arb_registry(32)) {
        let copy = copy_registry(&registry);
        prop_assert_eq!(&copy, &registry);
        for (original, copied) in registry.iter().zip(copy.iter()) {
            if !original.pubkey.is_empty() {
                prop_assert_ne!(original.pubkey.as_ptr(), copied.pubkey.as_ptr());
            }
        }
    }

    #[test]
    fn shard_and_slot_role_agree(
        (schedule, member) in arb_schedule(40, 4).prop_flat_map(|schedule| {
            let assigned: usize =
                schedule.iter().flat_map(|slot| slot.iter()).map(ShardCommittee::len).sum();
            (Just(schedule), 0..assigned.max(1))
        }),
    ) {
        let registry: ValidatorRegistry = (0..40u64)
            .map(|i| ValidatorRecord {
                pubkey: Bytes::from(i.to_be_bytes().to_vec()),
                status: ValidatorStatus::Active,
                ..Default::default()
            })
            .collect();
        let pubkey = (member as u64).to_be_bytes();

        let assignment = validator_slot_and_role(&pubkey, &registry, &schedule).unwrap();
        let shard = validator_shard_id(&pubkey, &registry, &schedule[assignment.slot_offset]).unwrap();
        prop_assert_eq!(shard, assignment.shard);
        prop_assert!(assignment.committee_position < assignment.committee_len);
    }

    #[test]
    fn valid_bitfields_have_clear_padding(
        member_count in 0usize..40,
        votes in prop::collection::vec(any::<bool>(), 40),
        padding in 0usize..8,
    ) {
        let mut bitfield = vec![0u8; bitfield_len(member_count)];
        for (position, _) in votes.iter().enumerate().take(member_count).filter(|&(_, &voted)| voted) {
            prop_assert!(set_bit(&mut bitfield, position));
        }
        prop_assert!(bitfield_is_valid(&bitfield, member_count));

        let position = member_count + padding;
        if set_bit(&mut bitfield, position) {
            prop_assert!(!bitfield_is_valid(&bitfield, member_count));
        }
    }

    #[test]
    fn voted_balance_is_bounded_by_total(
        registry in arb_registry(64).prop_filter("non-empty", |registry| !registry.is_empty()),
        votes in prop::collection::vec(any::<bool>(), 16),
        seed in any::<usize>(),
    ) {
        let members: Vec<usize> = (0..16).map(|i| seed.wrapping_add(i * 7) % registry.len()).collect();
        let mut bitfield = vec![0u8; bitfield_len(members.len())];
        for (position, &voted) in votes.iter().enumerate() {
            if voted {
                set_bit(&mut bitfield, position);
            }
        }
        let attestation = AggregatedAttestation::new(0, bitfield.clone());

        let (total, voted) = voted_balance_in_attestation(&registry, &members, &attestation).unwrap();
        prop_assert!(voted <= total);

        let voters = attesting_indices(&members, &attestation);
        let expected: u64 = voters.iter().map(|&index| registry[index].balance).sum();
        prop_assert_eq!(voted, expected);
        prop_assert_eq!(
            voters.len(),
            (0..members.len()).filter(|&p| check_bit(&bitfield, p) == Some(true)).count()
        );
    }
}
