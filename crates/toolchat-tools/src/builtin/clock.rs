//! `get_time`: current wall-clock time in an IANA time zone

use async_trait::async_trait;
use jiff::Zoned;
use jiff::tz::TimeZone;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::tool::{Tool, parse_arguments};

pub struct Clock;

#[derive(Debug, Default, Deserialize)]
struct TimeArgs {
    #[serde(default)]
    timezone: Option<String>,
}

#[async_trait]
impl Tool for Clock {
    fn name(&self) -> &str {
        "get_time"
    }

    fn description(&self) -> &str {
        "Get current time, optionally for a specific timezone"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "Timezone name from IANA Time Zone Database (optional), e.g., 'America/New_York', 'Europe/London'"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, arguments: Map<String, Value>) -> anyhow::Result<Value> {
        let args: TimeArgs = parse_arguments(arguments)?;
        let name = args
            .timezone
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("UTC");

        let tz = TimeZone::get(name).map_err(|_| {
            anyhow::anyhow!("unknown timezone '{name}', use a name from the IANA Time Zone Database")
        })?;

        Ok(describe(&Zoned::now().with_time_zone(tz), name))
    }
}

fn describe(now: &Zoned, timezone: &str) -> Value {
    json!({
        "timestamp": now.timestamp().as_duration().as_secs_f64(),
        "iso_format": now.strftime("%Y-%m-%dT%H:%M:%S%.f%:z").to_string(),
        "date": now.strftime("%Y-%m-%d").to_string(),
        "time": now.strftime("%H:%M:%S").to_string(),
        "day_of_week": now.strftime("%A").to_string(),
        "timezone": timezone,
    })
}
