use bitfloat::{encode, format_decimal, step, Direction, Precision};

///! Walks across zero in binary16, one unit in the last place at a time.
///!  cargo run --example walk_ulps

fn main() {
    let p = Precision::Half;
    let mut val = -3.0 * 5.960464477539063e-8;
    for _ in 0..7 {
        println!("{:>8} {}", encode(val, p), format_decimal(val));
        val = step(val, p, Direction::Next);
    }

    // The top of the range.
    let mut val = 65504.0;
    for _ in 0..3 {
        println!("{:>8} {}", encode(val, p), format_decimal(val));
        val = step(val, p, Direction::Next);
    }
}
