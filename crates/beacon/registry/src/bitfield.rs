//! Attestation participation bitfields.
//!
//! Bits are addressed MSB-first: position `i` lives in byte `i / 8` under the mask
//! `0x80 >> (i % 8)`.

/// Number of bytes needed to address `member_count` committee members.
pub const fn bitfield_len(member_count: usize) -> usize {
    member_count.div_ceil(8)
}

/// Reads the bit at `position`, or `None` if it lies past the end of `bitfield`.
pub fn check_bit(bitfield: &[u8], position: usize) -> Option<bool> {
    let byte = bitfield.get(position / 8)?;
    Some(byte & (0x80 >> (position % 8)) != 0)
}

/// Sets the bit at `position`. Returns `false` if it lies past the end of `bitfield`.
pub fn set_bit(bitfield: &mut [u8], position: usize) -> bool {
    match bitfield.get_mut(position / 8) {
        Some(byte) => {
            *byte |= 0x80 >> (position % 8);
            true
        }
        None => false,
    }
}

/// Returns `true` if `bitfield` is well formed for a committee of `member_count`.
///
/// The length must be exactly [`bitfield_len`] and the padding bits past the last member must be
/// clear. Whether anyone voted is not checked.
pub fn bitfield_is_valid(bitfield: &[u8], member_count: usize) -> bool {
    if bitfield.len() != bitfield_len(member_count) {
        return false
    }

    let used_bits = member_count % 8;
    if used_bits == 0 {
        return true
    }

    let padding_mask = 0xff_u8 >> used_bits;
    bitfield.last().is_some_and(|last| last & padding_mask == 0)
}

/// Positions below `member_count` whose bit is set, in ascending order.
pub fn attesting_positions(bitfield: &[u8], member_count: usize) -> impl Iterator<Item = usize> + '_ {
    (0..member_count).filter(move |&position| check_bit(bitfield, position) == Some(true))
}
