use bitfloat::{
    components, decode, decode16, encode, encode16, format_decimal, step,
    toggle_bit, Direction, Precision,
};
use half::f16;
use proptest::prelude::*;

fn any_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<u64>().prop_map(f64::from_bits),
        // Values that are close to the binary16 range.
        (-70000.0..70000.0f64),
        (-1e-4..1e-4f64),
    ]
}

fn any_precision() -> impl Strategy<Value = Precision> {
    prop_oneof![
        Just(Precision::Half),
        Just(Precision::Single),
        Just(Precision::Double),
    ]
}

proptest! {
    #[test]
    fn round_trip_is_idempotent(v in any_f64(), p in any_precision()) {
        let first = encode(v, p);
        let second = encode(decode(first), p);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn components_fill_the_width(v in any_f64(), p in any_precision()) {
        let c = components(v, p);
        prop_assert_eq!(c.full_binary.len(), p.total_bits());
        let from_binary = u64::from_str_radix(&c.full_binary, 2).unwrap();
        let from_hex = u64::from_str_radix(&c.hex, 16).unwrap();
        prop_assert_eq!(c.pattern.bits(), from_binary);
        prop_assert_eq!(c.pattern.bits(), from_hex);
        prop_assert_eq!(c.pattern.decode().to_bits(), c.value.to_bits());
    }

    #[test]
    fn toggle_twice_restores_the_value(
        v in any_f64(),
        p in any_precision(),
        bit in 0usize..64,
    ) {
        let index = bit % p.total_bits();
        let before = decode(encode(v, p));
        let once = toggle_bit(v, p, index).unwrap();
        let twice = toggle_bit(once, p, index).unwrap();
        if before.is_nan() {
            prop_assert!(twice.is_nan());
        } else if !(p == Precision::Half && once.is_nan()) {
            prop_assert_eq!(twice.to_bits(), before.to_bits());
        }
        prop_assert!(toggle_bit(v, p, p.total_bits() + bit).is_err());
    }

    #[test]
    fn step_is_monotonic(v in any_f64(), p in any_precision()) {
        let x = decode(encode(v, p));
        prop_assume!(x.is_finite() && x != 0.0);
        let up = step(x, p, Direction::Next);
        let down = step(x, p, Direction::Prev);
        prop_assert!(down < x);
        prop_assert!(x < up);
        prop_assert_eq!(step(up, p, Direction::Prev).to_bits(), x.to_bits());
    }

    #[test]
    fn decimal_text_is_exact(v in any_f64(), p in any_precision()) {
        let stored = components(v, p).value;
        let text = format_decimal(stored);
        prop_assert!(!text.contains('e') && !text.contains('E'));
        if stored.is_finite() {
            let parsed: f64 = text.parse().unwrap();
            prop_assert_eq!(parsed.to_bits(), stored.to_bits());
        }
    }

    #[test]
    fn encode16_matches_half_crate(v in any_f64()) {
        prop_assume!(!v.is_nan());
        let expected = f16::from_f32(v as f32).to_bits();
        prop_assert_eq!(encode16(v), expected);
    }
}

#[test]
fn binary16_matches_half_crate_for_all_patterns() {
    for bits in 0..=u16::MAX {
        let ours = decode16(bits);
        let theirs = f16::from_bits(bits).to_f64();
        if theirs.is_nan() {
            assert!(ours.is_nan());
            assert_eq!(ours.is_sign_negative(), theirs.is_sign_negative());
            continue;
        }
        assert_eq!(ours.to_bits(), theirs.to_bits(), "{:#06x}", bits);
        assert_eq!(encode16(theirs), f16::from_f64(theirs).to_bits());
    }
}

#[test]
fn half_clamps_to_infinity() {
    assert_eq!(decode(encode(1e5, Precision::Half)), f64::INFINITY);
    assert_eq!(decode(encode(-1e5, Precision::Half)), f64::NEG_INFINITY);
    assert_eq!(decode(encode(65504.0, Precision::Half)), 65504.0);
    assert_eq!(f16::MAX.to_f64(), bitfloat::HALF_MAX);
}
