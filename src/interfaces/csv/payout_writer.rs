use crate::application::engine::BatchEngine;
use crate::error::Result;
use crate::interfaces::currency;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct PayoutRow<'a> {
    participant: &'a str,
    name: &'a str,
    quantity_kg: u64,
    paid: bool,
    amount: Decimal,
}

/// Writes the payout report for a batch as CSV.
///
/// Amounts are rendered in display currency units; the engine itself only
/// deals in minor units.
pub struct PayoutWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PayoutWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes one row per contribution, in the ledger's iteration order.
    pub fn write_payouts(&mut self, engine: &BatchEngine) -> Result<()> {
        for index in 0..engine.count() {
            let contribution = engine.get_by_index(index)?;
            self.writer.serialize(PayoutRow {
                participant: contribution.participant.as_str(),
                name: &contribution.display_name,
                quantity_kg: contribution.quantity,
                paid: contribution.paid,
                amount: currency::from_minor_units(contribution.paid_amount),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
