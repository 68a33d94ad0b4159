use std::env;
use std::fs::{create_dir_all, File};
use std::io::{self, stdout, Write};
use std::path::Path;

use rand::Rng;
use rust_decimal::Decimal;

const PROBABILITY_REQUESTED: f64 = 0.1;
const PROBABILITY_MISSING_RATE: f64 = 0.02;

/// Reserve rates in hundredths.
const RESERVE_RATES: [i64; 4] = [3, 4, 5, 6];
const NAME_PREFIXES: [&str; 6] = ["Nord", "Sued", "Hafen", "Alpen", "Rhein", "Wald"];
const NAME_SUFFIXES: [&str; 5] = ["Moebel", "Elektro", "Reisen", "Bau", "Handel"];

struct GeneratorConfig {
    num_records: usize,
    num_merchants: u64,
    output_path: String,
}

impl GeneratorConfig {
    fn from_args(args: &[String]) -> io::Result<Self> {
        let num_records = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
        let num_merchants = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(250);

        if num_merchants == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "at least one merchant is required"));
        }

        Ok(Self {
            num_records,
            num_merchants,
            output_path: "samples/generated.csv".to_string(),
        })
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = GeneratorConfig::from_args(&args)?;

    println!(
        "Generating {} settlement rows for {} merchants in {}...",
        config.num_records, config.num_merchants, config.output_path
    );

    if let Some(parent) = Path::new(&config.output_path).parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(&config.output_path)?;
    let mut writer = io::BufWriter::new(file);

    writeln!(writer, "merchant_id,merchant_name,status,receivables_amount,merchant_payout_amount,partner_margin_amount,reserve_withheld_amount,reserve_rate")?;

    let mut rng = rand::thread_rng();
    let merchants: Vec<(u64, String, Decimal)> = (1..=config.num_merchants)
        .map(|merchant_id| {
            let rate = Decimal::new(RESERVE_RATES[rng.gen_range(0..RESERVE_RATES.len())], 2);
            (merchant_id, merchant_name(merchant_id), rate)
        })
        .collect();

    for row in 1..=config.num_records {
        let (merchant_id, name, rate) = &merchants[rng.gen_range(0..merchants.len())];
        generate_row(&mut writer, &mut rng, *merchant_id, name, *rate)?;

        if row % 10_000 == 0 {
            print!(".");
            stdout().flush()?;
        }
    }

    println!("\nGeneration complete.");

    Ok(())
}

fn merchant_name(merchant_id: u64) -> String {
    let prefix = NAME_PREFIXES[merchant_id as usize % NAME_PREFIXES.len()];
    let suffix = NAME_SUFFIXES[(merchant_id as usize / NAME_PREFIXES.len()) % NAME_SUFFIXES.len()];

    format!("{prefix}{suffix} {merchant_id}")
}

fn generate_row<W: Write, R: Rng>(writer: &mut W, rng: &mut R, merchant_id: u64, name: &str, reserve_rate: Decimal) -> io::Result<()> {
    let receivables = Decimal::new(rng.gen_range(10_000..2_500_000), 2);
    let margin_rate = Decimal::new(rng.gen_range(100..400), 4);

    let reserve = (receivables * reserve_rate).round_dp(2);
    let margin = (receivables * margin_rate).round_dp(2);
    let payout = receivables - reserve - margin;

    let status = if rng.gen_bool(PROBABILITY_REQUESTED) { "Requested" } else { "Ready" };
    let rate_cell = if rng.gen_bool(PROBABILITY_MISSING_RATE) { String::new() } else { reserve_rate.to_string() };

    writeln!(writer, "{},{},{},{},{},{},{},{}", merchant_id, name, status, receivables, payout, margin, reserve, rate_cell)?;

    Ok(())
}
