use bitfloat::{format_decimal, parse_input, Inspector, Precision};

///! Prints the stored pattern of a number in all of the formats.
///!  cargo run --example inspect -- 0.1

fn main() {
    let arg = std::env::args().nth(1);
    let text = arg.unwrap_or_else(|| "0.1".to_string());
    let value = match parse_input(&text) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{:?}: {}", text, err);
            std::process::exit(1);
        }
    };

    let mut session = Inspector::new();
    session.set_input(&text);
    for p in Precision::ALL {
        session.set_precision(p);
        let c = session.components();
        println!("{}", p);
        println!("  {}", c);
        println!("  category: {}", c.category().as_string());
        if let Some(r) = session.reconstruction() {
            println!(
                "  {}{} * 2^{}",
                if r.sign { "-" } else { "" },
                format_decimal(r.significand),
                r.effective_exponent
            );
        }
        if session.is_precision_lost() {
            println!(
                "  precision lost: {} is stored instead of {}",
                c.value, value
            );
        }
    }
}
