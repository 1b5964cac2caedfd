//! Instrument identity types.
//!
//! A configured symbol is resolved against the provider's instrument
//! catalog into a `ResolvedInstrument` carrying the provider-specific
//! security id and exchange segment. When resolution fails the symbol
//! itself becomes the trading identifier (identity fallback) so a
//! best-effort price query can still be attempted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange segment an instrument trades on.
///
/// The provider groups price queries by segment; unknown segment strings
/// from the catalog are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangeSegment {
    NseEq,
    NseIndex,
    BseEq,
    BseIndex,
    Other(String),
}

impl ExchangeSegment {
    /// Parse a segment from catalog/response text.
    ///
    /// Empty input maps to the default equity segment.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_uppercase().as_str() {
            "" | "NSE_EQ" => Self::NseEq,
            "NSE_INDEX" | "IDX_I" => Self::NseIndex,
            "BSE_EQ" => Self::BseEq,
            "BSE_INDEX" => Self::BseIndex,
            other => Self::Other(other.to_string()),
        }
    }

    /// Provider wire form used as the payload grouping key.
    pub fn as_wire(&self) -> &str {
        match self {
            Self::NseEq => "NSE_EQ",
            Self::NseIndex => "NSE_INDEX",
            Self::BseEq => "BSE_EQ",
            Self::BseIndex => "BSE_INDEX",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl Default for ExchangeSegment {
    fn default() -> Self {
        Self::NseEq
    }
}

impl fmt::Display for ExchangeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// Outcome of resolving a configured symbol against the catalog.
///
/// Immutable once produced; cached for the process lifetime keyed by the
/// configured symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInstrument {
    /// The symbol exactly as configured by the operator.
    pub symbol: String,
    /// Provider security id, or the raw symbol when resolution failed.
    pub trading_identifier: String,
    /// Exchange segment, when known from the catalog.
    pub segment: ExchangeSegment,
    /// Whether this is an identity fallback rather than a catalog match.
    pub is_fallback: bool,
}

impl ResolvedInstrument {
    /// Catalog match.
    pub fn resolved(
        symbol: impl Into<String>,
        trading_identifier: impl Into<String>,
        segment: ExchangeSegment,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            trading_identifier: trading_identifier.into(),
            segment,
            is_fallback: false,
        }
    }

    /// Identity fallback: the raw symbol doubles as the trading identifier.
    pub fn fallback(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            trading_identifier: symbol.clone(),
            symbol,
            segment: ExchangeSegment::default(),
            is_fallback: true,
        }
    }
}

impl fmt::Display for ResolvedInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}:{})",
            self.symbol, self.segment, self.trading_identifier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_parse_known() {
        assert_eq!(ExchangeSegment::parse("NSE_EQ"), ExchangeSegment::NseEq);
        assert_eq!(ExchangeSegment::parse(" nse_index "), ExchangeSegment::NseIndex);
        assert_eq!(ExchangeSegment::parse(""), ExchangeSegment::NseEq);
    }

    #[test]
    fn test_segment_parse_unknown_roundtrips() {
        let seg = ExchangeSegment::parse("MCX_COMM");
        assert_eq!(seg, ExchangeSegment::Other("MCX_COMM".to_string()));
        assert_eq!(seg.as_wire(), "MCX_COMM");
    }

    #[test]
    fn test_fallback_uses_symbol_as_identifier() {
        let inst = ResolvedInstrument::fallback("RELIANCE");
        assert_eq!(inst.trading_identifier, "RELIANCE");
        assert!(inst.is_fallback);
        assert_eq!(inst.segment, ExchangeSegment::NseEq);
    }
}
