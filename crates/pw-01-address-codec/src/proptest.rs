//! Property-based tests for the address codec.

use proptest::prelude::*;

use crate::{decode, encode, verify, ALPHABET, SEPARATOR};

fn arb_identifier() -> impl Strategy<Value = [u8; 20]> {
    prop::array::uniform20(any::<u8>())
}

fn arb_prefix() -> impl Strategy<Value = String> {
    "[a-z]{1,16}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Decoding an encoded identifier returns the same prefix and bytes
    #[test]
    fn prop_decode_inverts_encode(prefix in arb_prefix(), id in arb_identifier()) {
        let address = encode(&prefix, &id).expect("20 bytes always encode");
        let (decoded_prefix, bytes) = decode(&address).expect("fresh address decodes");
        prop_assert_eq!(decoded_prefix, prefix);
        prop_assert_eq!(bytes, id.to_vec());
    }

    /// Encoding is deterministic
    #[test]
    fn prop_encode_deterministic(prefix in arb_prefix(), id in arb_identifier()) {
        prop_assert_eq!(encode(&prefix, &id).unwrap(), encode(&prefix, &id).unwrap());
    }

    /// Any single data-character substitution breaks the checksum
    #[test]
    fn prop_single_substitution_detected(
        prefix in arb_prefix(),
        id in arb_identifier(),
        pos_seed in any::<usize>(),
        sym_seed in 1usize..32,
    ) {
        let address = encode(&prefix, &id).unwrap();
        let data_start = address.rfind(SEPARATOR).unwrap() + 1;
        let pos = data_start + pos_seed % (address.len() - data_start);

        let original = address.as_bytes()[pos];
        let idx = ALPHABET.iter().position(|c| *c == original).unwrap();
        let replacement = ALPHABET[(idx + sym_seed) % 32];

        let mut mutated = address.into_bytes();
        mutated[pos] = replacement;
        let mutated = String::from_utf8(mutated).unwrap();
        prop_assert!(!verify(&mutated));
    }

    /// Anything but 20 bytes is rejected
    #[test]
    fn prop_wrong_length_rejected(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(bytes.len() != 20);
        prop_assert!(encode("cosmos", &bytes).is_err());
    }
}
