//! In-memory catalog index.
//!
//! Built once from the downloaded scrip-master CSV. Header names vary
//! between catalog revisions, so the relevant columns are detected from
//! candidate lists rather than hard-coded positions.

use crate::error::{CatalogError, CatalogResult};
use csv::ReaderBuilder;
use ltp_core::ExchangeSegment;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

/// Candidate header names for the trading-symbol column.
const TRADING_SYMBOL_COLUMNS: &[&str] = &[
    "tradingsymbol",
    "trading_symbol",
    "symbol",
    "trade_symbol",
    "scrip",
    "sem_trading_symbol",
];

/// Candidate header names for the instrument-name column.
const NAME_COLUMNS: &[&str] = &["name", "instrumentname", "securityname", "sm_symbol_name"];

/// Candidate header names for the security-id column.
const SECURITY_ID_COLUMNS: &[&str] = &[
    "securityid",
    "security_id",
    "id",
    "sem_smst_security_id",
];

/// Candidate header names for the exchange-segment column.
const SEGMENT_COLUMNS: &[&str] = &[
    "exchangesegment",
    "segment",
    "exchange_segment",
    "exchange",
    "sem_exm_exch_id",
];

/// A single catalog row relevant to resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub security_id: String,
    pub segment: ExchangeSegment,
}

/// Normalized lookup tables over the instrument catalog.
///
/// Keys are trimmed and uppercased. Where multiple rows share a key the
/// first row wins, matching the catalog's convention of listing primary
/// listings first.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    by_trading_symbol: HashMap<String, CatalogEntry>,
    by_name: HashMap<String, CatalogEntry>,
    row_count: usize,
}

/// Normalize a symbol or name for lookup: trim and uppercase.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_uppercase()
}

impl CatalogIndex {
    /// Parse CSV content into an index.
    ///
    /// Fails when the header row lacks a recognizable trading-symbol or
    /// security-id column; rows with an empty security id are skipped.
    pub fn parse(reader: impl Read) -> CatalogResult<Self> {
        let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| CatalogError::Parse(format!("missing header row: {e}")))?
            .clone();

        let find_column = |candidates: &[&str]| -> Option<usize> {
            headers
                .iter()
                .position(|h| candidates.contains(&h.trim().to_lowercase().as_str()))
        };

        let trading_col = find_column(TRADING_SYMBOL_COLUMNS).ok_or_else(|| {
            CatalogError::Parse("no trading-symbol column in catalog header".to_string())
        })?;
        let secid_col = find_column(SECURITY_ID_COLUMNS).ok_or_else(|| {
            CatalogError::Parse("no security-id column in catalog header".to_string())
        })?;
        let name_col = find_column(NAME_COLUMNS);
        let segment_col = find_column(SEGMENT_COLUMNS);

        debug!(
            trading_col,
            secid_col,
            ?name_col,
            ?segment_col,
            "Detected catalog columns"
        );

        let mut index = Self::default();

        for record in csv_reader.records() {
            let record = record?;
            let security_id = record.get(secid_col).unwrap_or("").trim();
            if security_id.is_empty() {
                continue;
            }

            let segment = segment_col
                .and_then(|c| record.get(c))
                .map(ExchangeSegment::parse)
                .unwrap_or_default();

            let entry = CatalogEntry {
                security_id: security_id.to_string(),
                segment,
            };

            let trading_symbol = normalize(record.get(trading_col).unwrap_or(""));
            if !trading_symbol.is_empty() {
                index
                    .by_trading_symbol
                    .entry(trading_symbol)
                    .or_insert_with(|| entry.clone());
            }

            if let Some(name) = name_col.and_then(|c| record.get(c)) {
                let name = normalize(name);
                if !name.is_empty() {
                    index.by_name.entry(name).or_insert_with(|| entry.clone());
                }
            }

            index.row_count += 1;
        }

        Ok(index)
    }

    /// Look up a normalized symbol: trading symbol first, then name.
    pub fn lookup(&self, symbol: &str) -> Option<&CatalogEntry> {
        let key = normalize(symbol);
        self.by_trading_symbol
            .get(&key)
            .or_else(|| self.by_name.get(&key))
    }

    /// Number of catalog rows indexed.
    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
tradingsymbol,name,securityid,exchangesegment
RELIANCE,RELIANCE INDUSTRIES,2885,NSE_EQ
TCS,TATA CONSULTANCY SERVICES,11536,NSE_EQ
NIFTY,NIFTY 50,13,NSE_INDEX
RELIANCE,RELIANCE INDUSTRIES BSE,500325,BSE_EQ
";

    #[test]
    fn test_parse_and_lookup_trading_symbol() {
        let index = CatalogIndex::parse(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(index.len(), 4);

        let entry = index.lookup("reliance ").unwrap();
        // First row wins for duplicate trading symbols
        assert_eq!(entry.security_id, "2885");
        assert_eq!(entry.segment, ExchangeSegment::NseEq);
    }

    #[test]
    fn test_lookup_falls_back_to_name() {
        let index = CatalogIndex::parse(SAMPLE_CSV.as_bytes()).unwrap();
        let entry = index.lookup("NIFTY 50").unwrap();
        assert_eq!(entry.security_id, "13");
        assert_eq!(entry.segment, ExchangeSegment::NseIndex);
    }

    #[test]
    fn test_lookup_miss() {
        let index = CatalogIndex::parse(SAMPLE_CSV.as_bytes()).unwrap();
        assert!(index.lookup("UNKNOWN").is_none());
    }

    #[test]
    fn test_alternate_header_names() {
        let csv = "\
SEM_TRADING_SYMBOL,SM_SYMBOL_NAME,SEM_SMST_SECURITY_ID,SEM_EXM_EXCH_ID
TATAMOTORS,TATA MOTORS,3456,NSE_EQ
";
        let index = CatalogIndex::parse(csv.as_bytes()).unwrap();
        assert_eq!(index.lookup("TATAMOTORS").unwrap().security_id, "3456");
    }

    #[test]
    fn test_missing_required_column_is_error() {
        let csv = "foo,bar\n1,2\n";
        assert!(matches!(
            CatalogIndex::parse(csv.as_bytes()),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_rows_without_security_id_skipped() {
        let csv = "\
tradingsymbol,securityid
GOOD,42
EMPTY,
";
        let index = CatalogIndex::parse(csv.as_bytes()).unwrap();
        assert!(index.lookup("GOOD").is_some());
        assert!(index.lookup("EMPTY").is_none());
    }
}
