use campaign_core::{Codec, Lzss};
use proptest::collection::vec;
use proptest::num::u8;
use proptest::prelude::*;

fn round_trip(data: &[u8]) -> Vec<u8> {
    let packed = Lzss.compress(data).expect("compress");
    Lzss.decompress(&packed, data.len()).expect("decompress")
}

proptest! {
    #[test]
    fn arbitrary_bytes_round_trip(data in vec(u8::ANY, 0..4096)) {
        prop_assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn low_entropy_bytes_round_trip(data in vec(0u8..4, 0..8192)) {
        prop_assert_eq!(round_trip(&data), data);
    }
}

#[test]
fn empty_buffer_round_trips() {
    assert!(round_trip(&[]).is_empty());
}

#[test]
fn large_section_round_trips() {
    // Mixed runs and noise, past the window size many times over.
    let mut state = 0x1234_5678u32;
    let data: Vec<u8> = (0..96 * 1024)
        .map(|i| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            if (i / 512) % 2 == 0 {
                (i % 7) as u8
            } else {
                (state >> 16) as u8
            }
        })
        .collect();
    let packed = Lzss.compress(&data).expect("compress");
    assert!(packed.len() < data.len());
    assert_eq!(Lzss.decompress(&packed, data.len()).expect("decompress"), data);
}

#[test]
fn wrong_expected_length_is_an_error() {
    let packed = Lzss.compress(b"campaign").expect("compress");
    assert!(Lzss.decompress(&packed, 9).is_err());
}
