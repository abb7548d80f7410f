use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of the contribution intake file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ContributionRecord {
    pub participant: String,
    pub name: String,
    pub phone: String,
    pub quantity: u64,
}

/// Reads contribution rows from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<…>`, trimming
/// whitespace and tolerating flexible record lengths.
pub struct ContributionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ContributionReader<R> {
    /// Creates a new `ContributionReader` from any `Read` source.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rows.
    pub fn contributions(self) -> impl Iterator<Item = Result<ContributionRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "participant, name, phone, quantity\nf1, Alice, 555-0100, 3\nf2, Bob, 555-0101, 7";
        let reader = ContributionReader::new(data.as_bytes());
        let rows: Vec<Result<ContributionRecord>> = reader.contributions().collect();

        assert_eq!(rows.len(), 2);
        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.participant, "f1");
        assert_eq!(first.name, "Alice");
        assert_eq!(first.quantity, 3);
    }

    #[test]
    fn test_reader_rejects_negative_quantity() {
        let data = "participant, name, phone, quantity\nf1, Alice, 555-0100, -3";
        let reader = ContributionReader::new(data.as_bytes());
        let rows: Vec<Result<ContributionRecord>> = reader.contributions().collect();

        assert!(rows[0].is_err());
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "participant, name, phone, quantity\nf1, Alice, 555-0100, lots";
        let reader = ContributionReader::new(data.as_bytes());
        let rows: Vec<Result<ContributionRecord>> = reader.contributions().collect();

        assert!(rows[0].is_err());
    }
}
