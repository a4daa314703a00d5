//! EVM storage slot derivation for hook storage updates.

use alloy_primitives::{keccak256, B256};

pub const WORD_LENGTH: usize = 32;
const EFFECTIVE_VALUE_OFFSET: usize = 16;

/// Left-pads `bytes` to a 32-byte word, keeping the trailing 32 bytes of longer input.
pub fn left_pad32(bytes: &[u8]) -> [u8; WORD_LENGTH] {
    let mut word = [0u8; WORD_LENGTH];
    let bytes = &bytes[bytes.len().saturating_sub(WORD_LENGTH)..];
    word[WORD_LENGTH - bytes.len()..].copy_from_slice(bytes);
    word
}

/// Slot of `mapping[key]` for the mapping stored at `mapping_slot`.
pub fn mapping_slot_for_key(key: &[u8], mapping_slot: &[u8]) -> B256 {
    let mut preimage = [0u8; WORD_LENGTH * 2];
    preimage[..WORD_LENGTH].copy_from_slice(&left_pad32(key));
    preimage[WORD_LENGTH..].copy_from_slice(&left_pad32(mapping_slot));
    keccak256(preimage)
}

/// Slot of `mapping[keccak256(preimage)]` for the mapping stored at `mapping_slot`.
pub fn mapping_slot_for_preimage(preimage: &[u8], mapping_slot: &[u8]) -> B256 {
    let mut hashed = [0u8; WORD_LENGTH * 2];
    hashed[..WORD_LENGTH].copy_from_slice(keccak256(preimage).as_slice());
    hashed[WORD_LENGTH..].copy_from_slice(&left_pad32(mapping_slot));
    keccak256(hashed)
}

/// The value written to a slot, `None` for a zero word, which deletes the slot.
///
/// Only the trailing 16 bytes of the padded word are kept; the leading half is padding.
pub fn effective_value(value: &[u8]) -> Option<Vec<u8>> {
    if value.iter().all(|byte| *byte == 0) {
        return None;
    }
    Some(left_pad32(value)[EFFECTIVE_VALUE_OFFSET..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_pad32() {
        let word = left_pad32(&[0x01, 0x02]);
        assert_eq!(&word[..30], &[0u8; 30]);
        assert_eq!(&word[30..], &[0x01, 0x02]);

        let long: Vec<u8> = (0..40).collect();
        assert_eq!(left_pad32(&long).as_slice(), &long[8..]);
    }

    #[test]
    fn test_mapping_slot_for_key_matches_solidity_layout() {
        // keccak256(abi.encode(uint256(0), uint256(0)))
        let slot = mapping_slot_for_key(&[], &[]);
        assert_eq!(
            hex::encode(slot),
            "ad3228b676f7d3cd4284a5443f17f1962b36e491b30a40b2405849e597ba5fb5"
        );
        assert_eq!(slot, mapping_slot_for_key(&[0, 0], &[0]));
        assert_ne!(slot, mapping_slot_for_key(&[1], &[]));
    }

    #[test]
    fn test_mapping_slot_for_preimage_hashes_the_preimage_first() {
        let preimage = b"owner";
        let key = keccak256(preimage);
        assert_eq!(
            mapping_slot_for_preimage(preimage, &[2]),
            mapping_slot_for_key(key.as_slice(), &[2])
        );
    }

    #[test]
    fn test_effective_value() {
        assert_eq!(effective_value(&[]), None);
        assert_eq!(effective_value(&[0, 0]), None);

        let value = effective_value(&[0x2a]).unwrap();
        assert_eq!(value.len(), 16);
        assert_eq!(value[15], 0x2a);
    }
}
