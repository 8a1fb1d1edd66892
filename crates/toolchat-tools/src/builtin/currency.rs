//! `convert_currency`: conversion through an ExchangeRate-API compatible service

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use url::Url;

use crate::tool::{Tool, parse_arguments};

pub struct CurrencyConverter {
    client: Client,
    base_url: Url,
}

impl CurrencyConverter {
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn latest_url(&self, code: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/latest/{code}")
    }
}

#[derive(Debug, Deserialize)]
struct ConvertArgs {
    amount: f64,
    from_currency: String,
    to_currency: String,
}

/// `GET /latest/{code}` response body
#[derive(Debug, Deserialize)]
struct LatestRates {
    result: String,
    #[serde(default)]
    time_last_update_unix: Option<i64>,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl Tool for CurrencyConverter {
    fn name(&self) -> &str {
        "convert_currency"
    }

    fn description(&self) -> &str {
        "Convert an amount from one currency to another"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "amount": {
                    "type": "number",
                    "description": "Amount to convert"
                },
                "from_currency": {
                    "type": "string",
                    "description": "Source currency code, e.g., 'USD', 'EUR', 'JPY'"
                },
                "to_currency": {
                    "type": "string",
                    "description": "Target currency code, e.g., 'USD', 'EUR', 'JPY'"
                }
            },
            "required": ["amount", "from_currency", "to_currency"]
        })
    }

    async fn execute(&self, arguments: Map<String, Value>) -> anyhow::Result<Value> {
        let args: ConvertArgs = parse_arguments(arguments)?;
        let from = args.from_currency.trim().to_ascii_uppercase();
        let to = args.to_currency.trim().to_ascii_uppercase();

        if from.is_empty() || !from.chars().all(|c| c.is_ascii_alphabetic()) {
            anyhow::bail!("invalid currency code '{}'", args.from_currency);
        }

        let response = self
            .client
            .get(self.latest_url(&from))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("error fetching exchange rates: {e}"))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("error fetching exchange rates: {e}"))?;

        let latest: LatestRates = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("error processing exchange rates: {e}"))?;

        if latest.result != "success" {
            let reason = latest.error_type.as_deref().unwrap_or("unknown error");
            anyhow::bail!("failed to fetch exchange rates for '{from}': {reason}");
        }

        let rate = *latest
            .rates
            .get(&to)
            .ok_or_else(|| anyhow::anyhow!("currency '{to}' not found"))?;

        Ok(json!({
            "from": from,
            "to": to,
            "amount": args.amount,
            "converted_amount": args.amount * rate,
            "rate": rate,
            "timestamp": latest.time_last_update_unix,
        }))
    }
}
