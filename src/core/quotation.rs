//! Quotation types as they travel between the upstream API, storage and the client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single quotation as published by the upstream API.
///
/// Every field stays text so the upstream formatting (leading zeros, decimal
/// places) reaches storage and the client untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    pub code: String,
    pub codein: String,
    pub name: String,
    pub high: String,
    pub low: String,
    #[serde(rename = "varBid")]
    pub var_bid: String,
    #[serde(rename = "pctChange")]
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    pub timestamp: String,
    pub create_date: String,
}

/// Upstream response shape: the quotation keyed by its traded pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationEnvelope {
    #[serde(rename = "USDBRL")]
    pub usd_brl: Quotation,
}

/// One stored fetch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub quotation: Quotation,
    pub stored_at: DateTime<Utc>,
}

impl QuotationRecord {
    /// Builds a record with a freshly generated id.
    pub fn new(quotation: Quotation) -> Self {
        Self {
            id: Uuid::new_v4(),
            quotation,
            stored_at: Utc::now(),
        }
    }
}

/// The part of the service response the client consumes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientResult {
    pub bid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPSTREAM_JSON: &str = r#"{
        "USDBRL": {
            "code": "USD",
            "codein": "BRL",
            "name": "Dólar Americano/Real Brasileiro",
            "high": "5.4610",
            "low": "5.4020",
            "varBid": "-0.0050",
            "pctChange": "-0.09",
            "bid": "5.4300",
            "ask": "5.4310",
            "timestamp": "1718301600",
            "create_date": "2024-06-13 15:00:00"
        }
    }"#;

    #[test]
    fn test_envelope_keeps_text_formatting() {
        let envelope: QuotationEnvelope = serde_json::from_str(UPSTREAM_JSON).unwrap();
        assert_eq!(envelope.usd_brl.bid, "5.4300");
        assert_eq!(envelope.usd_brl.var_bid, "-0.0050");

        let reencoded = serde_json::to_value(&envelope).unwrap();
        let original: serde_json::Value = serde_json::from_str(UPSTREAM_JSON).unwrap();
        assert_eq!(reencoded, original);
    }

    #[test]
    fn test_envelope_rejects_non_object_quotation() {
        let result = serde_json::from_str::<QuotationEnvelope>(r#"{"USDBRL": "not-an-object"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_flattens_quotation_fields() {
        let envelope: QuotationEnvelope = serde_json::from_str(UPSTREAM_JSON).unwrap();
        let record = QuotationRecord::new(envelope.usd_brl.clone());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["bid"], "5.4300");
        assert_eq!(value["pctChange"], "-0.09");
        assert_eq!(value["id"], record.id.to_string());

        let decoded: QuotationRecord = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_records_get_distinct_ids() {
        let envelope: QuotationEnvelope = serde_json::from_str(UPSTREAM_JSON).unwrap();
        let first = QuotationRecord::new(envelope.usd_brl.clone());
        let second = QuotationRecord::new(envelope.usd_brl);
        assert_ne!(first.id, second.id);
        assert_eq!(first.quotation, second.quotation);
    }

    #[test]
    fn test_client_result_reads_only_bid() {
        let inner = serde_json::from_str::<serde_json::Value>(UPSTREAM_JSON).unwrap()["USDBRL"].clone();
        let result: ClientResult = serde_json::from_value(inner).unwrap();
        assert_eq!(result.bid, "5.4300");
    }
}
