use clap::Parser;
use cropshare::application::engine::BatchEngine;
use cropshare::domain::contribution::ParticipantId;
use cropshare::infrastructure::in_memory::RecordingTransfer;
use cropshare::infrastructure::json_store::JsonStateStore;
use cropshare::interfaces::csv::contribution_reader::ContributionReader;
use cropshare::interfaces::csv::payout_writer::PayoutWriter;
use cropshare::interfaces::currency;
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input contributions CSV file (participant, name, phone, quantity)
    input: PathBuf,

    /// Price per kilogram, in currency units (e.g. 1.25)
    #[arg(long)]
    price: Option<Decimal>,

    /// Buyer identity; when given, a payment is received and distributed
    #[arg(long)]
    buyer: Option<String>,

    /// Payment amount in currency units; defaults to the exact batch price
    #[arg(long)]
    payment: Option<Decimal>,

    /// Free-text label for the batch
    #[arg(long)]
    label: Option<String>,

    /// Path to a JSON state file (optional). Loaded if present, saved on exit.
    #[arg(long)]
    state_path: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let transfer = RecordingTransfer::new();
    let store = cli.state_path.clone().map(JsonStateStore::new);

    let snapshot = match &store {
        Some(store) => store.load().into_diagnostic()?,
        None => None,
    };
    let engine = match snapshot {
        Some(snapshot) => BatchEngine::with_snapshot(snapshot, Box::new(transfer.clone())),
        None => BatchEngine::new(Box::new(transfer.clone())),
    };

    if let Some(label) = &cli.label {
        engine.set_label(label.clone()).into_diagnostic()?;
    }

    // Record contributions; a bad row is reported and skipped, the rest of
    // the batch still goes through.
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = ContributionReader::new(file);
    for row in reader.contributions() {
        match row {
            Ok(record) => {
                if let Err(e) = engine.add_contribution(
                    ParticipantId::new(record.participant),
                    record.name,
                    record.phone,
                    record.quantity,
                ) {
                    eprintln!("Error recording contribution: {e}");
                }
            }
            Err(e) => {
                eprintln!("Error reading contribution: {e}");
            }
        }
    }

    if let Some(price) = cli.price {
        let minor = currency::to_minor_units(price)
            .ok_or_else(|| miette!("price must be a non-negative amount in whole cents"))?;
        engine.set_price_per_unit(minor).into_diagnostic()?;
    }

    if let Some(buyer) = &cli.buyer {
        let amount = match cli.payment {
            Some(payment) => currency::to_minor_units(payment)
                .ok_or_else(|| miette!("payment must be a non-negative amount in whole cents"))?,
            None => engine.total_price().into_diagnostic()?,
        };
        engine
            .receive_payment(ParticipantId::new(buyer.clone()), amount)
            .into_diagnostic()?;
        engine.distribute().into_diagnostic()?;
    }

    let stdout = io::stdout();
    let mut writer = PayoutWriter::new(stdout.lock());
    writer.write_payouts(&engine).into_diagnostic()?;

    if let Some(store) = &store {
        store.save(&engine.snapshot()).into_diagnostic()?;
    }

    Ok(())
}
