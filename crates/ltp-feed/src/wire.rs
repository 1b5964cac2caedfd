//! Provider wire format: request payloads and response extraction.
//!
//! The LTP endpoint takes `{"<SEGMENT>": [secid, ...], ...}` and returns
//! `{"data": {"<SEGMENT>": {"<secid>": {"last_price": ...}}}}`. The OHLC
//! endpoint shares the request shape and additionally carries a `close`
//! usable as a stand-in price.

use ltp_core::{Price, ResolvedInstrument};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

/// Keys a response entry may carry the price under, in precedence order.
const PRICE_KEYS: &[&str] = &["last_price", "ltp", "lastPrice"];

/// Key used only by the OHLC fallback.
const CLOSE_KEY: &str = "close";

/// Build the segment-grouped request body for a batch of instruments.
///
/// Numeric security ids are sent as JSON integers, matching the
/// provider's expectation; non-numeric fallback identifiers are sent as
/// strings so a best-effort query is still made.
pub(crate) fn build_payload(instruments: &[&ResolvedInstrument]) -> Value {
    let mut groups: Map<String, Value> = Map::new();

    for inst in instruments {
        let id = match i64::from_str(&inst.trading_identifier) {
            Ok(n) => json!(n),
            Err(_) => json!(inst.trading_identifier),
        };
        groups
            .entry(inst.segment.as_wire().to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .expect("group is always an array")
            .push(id);
    }

    Value::Object(groups)
}

/// Extract per-identifier prices from a response body into `out`,
/// keyed by `(segment, security_id)`.
///
/// Tolerates missing and malformed entries: anything unreadable is
/// simply not inserted, leaving the instrument marked failed.
pub(crate) fn extract_prices(
    body: &Value,
    allow_close: bool,
    out: &mut HashMap<(String, String), Price>,
) {
    // Some responses nest under "data", some are flat
    let data = body.get("data").unwrap_or(body);
    let Some(segments) = data.as_object() else {
        return;
    };

    for (segment, mapping) in segments {
        let Some(mapping) = mapping.as_object() else {
            continue;
        };
        for (secid, info) in mapping {
            if let Some(price) = entry_price(info, allow_close) {
                out.insert((segment.clone(), secid.clone()), price);
            }
        }
    }
}

fn entry_price(info: &Value, allow_close: bool) -> Option<Price> {
    let mut keys = PRICE_KEYS.to_vec();
    if allow_close {
        keys.push(CLOSE_KEY);
    }
    keys.iter()
        .find_map(|k| info.get(*k))
        .and_then(value_to_price)
}

fn value_to_price(value: &Value) -> Option<Price> {
    let decimal = match value {
        // Parse the JSON number's textual form to keep the exact scale
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok()?,
        Value::String(s) => Decimal::from_str(s.trim()).ok()?,
        _ => return None,
    };
    if decimal.is_sign_negative() {
        return None;
    }
    Some(Price::new(decimal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltp_core::ExchangeSegment;
    use rust_decimal_macros::dec;

    fn inst(symbol: &str, id: &str, segment: ExchangeSegment) -> ResolvedInstrument {
        ResolvedInstrument::resolved(symbol, id, segment)
    }

    #[test]
    fn test_build_payload_groups_by_segment() {
        let a = inst("RELIANCE", "2885", ExchangeSegment::NseEq);
        let b = inst("TCS", "11536", ExchangeSegment::NseEq);
        let c = inst("NIFTY", "13", ExchangeSegment::NseIndex);

        let payload = build_payload(&[&a, &b, &c]);
        assert_eq!(payload["NSE_EQ"], json!([2885, 11536]));
        assert_eq!(payload["NSE_INDEX"], json!([13]));
    }

    #[test]
    fn test_build_payload_non_numeric_fallback_id() {
        let raw = ResolvedInstrument::fallback("RELIANCE");
        let payload = build_payload(&[&raw]);
        assert_eq!(payload["NSE_EQ"], json!(["RELIANCE"]));
    }

    #[test]
    fn test_extract_prices_nested_data() {
        let body = json!({
            "data": {
                "NSE_EQ": {
                    "2885": {"last_price": 2500.50},
                    "11536": {"error": "invalid"}
                }
            }
        });

        let mut out = HashMap::new();
        extract_prices(&body, false, &mut out);

        assert_eq!(
            out.get(&("NSE_EQ".to_string(), "2885".to_string())),
            Some(&Price::new(dec!(2500.50)))
        );
        assert!(!out.contains_key(&("NSE_EQ".to_string(), "11536".to_string())));
    }

    #[test]
    fn test_extract_prices_alternate_keys_and_strings() {
        let body = json!({
            "NSE_EQ": {
                "1": {"ltp": "100.25"},
                "2": {"lastPrice": 50}
            }
        });

        let mut out = HashMap::new();
        extract_prices(&body, false, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[&("NSE_EQ".to_string(), "1".to_string())],
            Price::new(dec!(100.25))
        );
    }

    #[test]
    fn test_close_only_used_when_allowed() {
        let body = json!({"NSE_EQ": {"1": {"close": 99.5}}});

        let mut out = HashMap::new();
        extract_prices(&body, false, &mut out);
        assert!(out.is_empty());

        extract_prices(&body, true, &mut out);
        assert_eq!(
            out[&("NSE_EQ".to_string(), "1".to_string())],
            Price::new(dec!(99.5))
        );
    }

    #[test]
    fn test_negative_and_garbage_values_rejected() {
        let body = json!({
            "NSE_EQ": {
                "1": {"last_price": -5},
                "2": {"last_price": null},
                "3": {"last_price": [1, 2]}
            }
        });

        let mut out = HashMap::new();
        extract_prices(&body, false, &mut out);
        assert!(out.is_empty());
    }
}
