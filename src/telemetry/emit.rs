use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "news.v1";

#[derive(Debug, Clone, Serialize, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'a str,
    pub result: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    pub fn result(op: &'a str, result: &'a T, meta: Option<Meta>) -> Self {
        Envelope { schema_version: SCHEMA_VERSION, time: Utc::now(), request_id: Uuid::new_v4(), op, result, meta }
    }
}

pub fn print_result<T: Serialize>(op: &str, result: &T, meta: Option<Meta>) -> Result<()> {
    let env = Envelope::result(op, result, meta);
    let mut out = io::stdout();
    serde_json::to_writer(&mut out, &env)?;
    writeln!(&mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_result_envelope() {
        let result = json!({"total": 3});
        let env = Envelope::result("stories", &result, Some(Meta { duration_ms: Some(12), run_id: None }));
        let s = serde_json::to_string(&env).unwrap();
        assert!(s.contains("\"schema_version\":\"news.v1\""));
        assert!(s.contains("\"op\":\"stories\""));
        assert!(s.contains("\"total\":3"));
        assert!(s.contains("\"duration_ms\":12"));
        assert!(!s.contains("run_id"));
    }
}
