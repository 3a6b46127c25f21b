use clap::Parser;
use compact_dict::Dict;
use compact_dict::dict;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Rounds of put/pop on a single key before filling.
    #[arg(short = 'r', long = "churn_rounds", default_value_t = 0)]
    churn_rounds: usize,
}

fn walkthrough() {
    let mut dict = dict! {
        "D" => 1,
        "G" => 2,
        "V" => 3,
        "C" => 6,
    };

    println!("{:?}", dict.items());
    println!("{}", dict.set_default("D", 2));
    println!("{}", dict.set_default("A", 30));
    println!("{:?}", dict.items());
}

fn main() {
    let args = Args::parse();

    walkthrough();
    println!();

    println!(
        "Creating Dict with target capacity: {}",
        args.target_capacity
    );
    let mut dict: Dict<u64, u64> = Dict::with_capacity(args.target_capacity);
    println!("Actual capacity: {}", dict.capacity());

    for i in 0..args.churn_rounds {
        dict.put(u64::MAX, i as u64);
        if let Err(err) = dict.pop(&u64::MAX) {
            eprintln!("churn round {i} failed: {err}");
            return;
        }
    }

    println!("Filling dict with u64 values...");
    for i in 0..args.target_capacity {
        dict.put(i as u64, i as u64);
    }

    println!("Inserted {} values into dict", dict.len());
    println!(
        "Final load factor: {:.2}%",
        (dict.len() as f64 / dict.capacity() as f64) * 100.0
    );

    dict.probe_histogram().print();
    dict.debug_stats().print();
}
