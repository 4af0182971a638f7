//! Host-facing behaviour of `Generator`: creation, parameter validation, word widths
//! and reproducibility from a seed source.

use ctrblock::{Error, Family, Generator};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

fn seed(n: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(n)
}

#[test]
fn every_family_creates_by_default() {
    for family in Family::ALL {
        let mut rng = Generator::create(family, &mut seed(0), "").unwrap();
        assert_eq!(rng.family(), family);
        assert!(rng.self_test(), "{family}");
        if rng.word_bits() == 32 {
            for _ in 0..100 {
                assert!(rng.next_word() <= u32::MAX as u64);
            }
        }
    }
}

#[test]
fn word_bits_per_family() {
    let expected = [
        (Family::Philox4x32, 32),
        (Family::Philox2x32, 32),
        (Family::Philox4x64, 64),
        (Family::Threefry4x64, 64),
        (Family::Threefry2x64, 64),
        (Family::ChaCha, 32),
        (Family::Speck128, 64),
        (Family::Xtea, 64),
        (Family::Lea128, 32),
    ];
    for (family, bits) in expected {
        assert_eq!(family.word_bits(), bits, "{family}");
    }
}

#[test]
fn unknown_params_are_rejected() {
    let cases = [
        (Family::Philox4x32, "fast"),
        (Family::Philox2x32, "vector"),
        (Family::Philox4x64, "avx2"),
        (Family::ChaCha, "16"),
        (Family::ChaCha, "vector-16"),
        (Family::Threefry4x64, "threefish-neon"),
        (Family::Speck128, "r16"),
        (Family::Speck128, "scalar-r16"),
        (Family::Xtea, "cbc"),
        (Family::Lea128, "vector-r12"),
    ];
    for (family, param) in cases {
        assert_eq!(
            Generator::create(family, &mut seed(1), param).unwrap_err(),
            Error::UnknownVariant { family },
            "{family} {param:?}"
        );
    }
}

#[test]
fn unknown_family_by_name() {
    assert_eq!(
        Generator::create_by_name("mt19937", &mut seed(2), "").unwrap_err(),
        Error::UnknownFamily
    );
    let rng = Generator::create_by_name("threefry2x64", &mut seed(2), "vector").unwrap();
    assert_eq!(rng.family(), Family::Threefry2x64);
}

#[cfg(any(
    not(any(target_arch = "x86_64", target_arch = "x86")),
    not(target_feature = "avx2"),
    feature = "force-soft"
))]
#[test]
fn avx2_unsupported_without_backend() {
    for family in [Family::Philox4x32, Family::ChaCha, Family::Lea128] {
        assert_eq!(
            Generator::create(family, &mut seed(3), "avx2").unwrap_err(),
            Error::Unsupported {
                family,
                feature: "avx2"
            }
        );
    }
}

#[cfg(all(
    any(target_arch = "x86_64", target_arch = "x86"),
    target_feature = "avx2",
    not(feature = "force-soft")
))]
#[test]
fn avx2_matches_vector() {
    for family in Family::ALL {
        if matches!(family, Family::Philox2x32 | Family::Philox4x64) {
            continue;
        }
        let mut a = Generator::create(family, &mut seed(3), "avx2").unwrap();
        let mut b = Generator::create(family, &mut seed(3), "vector").unwrap();
        for _ in 0..1000 {
            assert_eq!(a.next_word(), b.next_word(), "{family}");
        }
    }
}

#[test]
fn same_seed_same_stream() {
    for family in Family::ALL {
        let mut a = Generator::create(family, &mut seed(4), "").unwrap();
        let mut b = Generator::create(family, &mut seed(4), "").unwrap();
        let mut c = Generator::create(family, &mut seed(5), "").unwrap();
        let (mut same, mut differs) = (true, false);
        for _ in 0..64 {
            let x = a.next_word();
            same &= x == b.next_word();
            differs |= x != c.next_word();
        }
        assert!(same, "{family}");
        assert!(differs, "{family}");
    }
}

#[test]
fn chacha_vector_stream_matches_scalar() {
    for rounds in ["8", "12", "20"] {
        let mut scalar =
            Generator::create(Family::ChaCha, &mut seed(6), &format!("scalar-{rounds}")).unwrap();
        let mut vector =
            Generator::create(Family::ChaCha, &mut seed(6), &format!("vector-{rounds}")).unwrap();
        for _ in 0..2000 {
            assert_eq!(scalar.next_word(), vector.next_word());
        }
    }
}

#[test]
fn lane_streams_hold_scalar_blocks() {
    // Lanes of a word-major engine interleave word by word: the first LANES words are
    // word 0 of blocks 0..LANES.
    let mut scalar = Generator::create(Family::Lea128, &mut seed(7), "").unwrap();
    let mut vector = Generator::create(Family::Lea128, &mut seed(7), "vector").unwrap();
    let blocks: Vec<[u64; 4]> = (0..8)
        .map(|_| core::array::from_fn(|_| scalar.next_word()))
        .collect();
    for word in 0..4 {
        for block in &blocks {
            assert_eq!(vector.next_word(), block[word]);
        }
    }
}

#[test]
fn fill_bytes_follows_words() {
    let mut a = Generator::create(Family::Threefry4x64, &mut seed(8), "threefish").unwrap();
    let mut b = a.clone();
    let mut bytes = [0u8; 24];
    a.fill_bytes(&mut bytes);
    for chunk in bytes.chunks_exact(8) {
        assert_eq!(u64::from_le_bytes(chunk.try_into().unwrap()), b.next_word());
    }
}
