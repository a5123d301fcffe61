//! Deterministic digests of analysis inputs.
//!
//! Two runs with equal configuration and equal record data carry equal
//! digests, which is what makes a stored report comparable to a rerun.

use crate::config::AnalysisConfig;
use crate::error::{GapError, Result};
use crate::gaps::GapRecord;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

/// `in1_<sha256>` over the canonical JSON of the config and the record data.
pub fn input_digest(config: &AnalysisConfig, records: &[GapRecord]) -> Result<String> {
    let config = serde_json::to_value(config).map_err(|e| GapError::Config(e.to_string()))?;
    let records = serde_json::to_value(records).map_err(|e| GapError::Config(e.to_string()))?;
    let material = json!({ "config": config, "records": records });
    let hash = Sha256::digest(canonical_json(&material).as_bytes());
    Ok(format!("in1_{}", hex_lower(&hash)))
}

/// JSON with object keys sorted at every level and no whitespace.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (idx, (key, item)) in entries.into_iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn hex_lower(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::KNOWN_MAXIMAL_GAPS;

    #[test]
    fn canonical_json_sorts_keys() {
        let value = json!({"b": 1, "a": {"d": [true, null], "c": "x"}});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":{"c":"x","d":[true,null]},"b":1}"#
        );
    }

    #[test]
    fn digest_is_stable_for_equal_inputs() {
        let config = AnalysisConfig::default();
        let a = input_digest(&config, &KNOWN_MAXIMAL_GAPS).expect("digest");
        let b = input_digest(&config.clone(), &KNOWN_MAXIMAL_GAPS).expect("digest");
        assert_eq!(a, b);
        assert!(a.starts_with("in1_"));
        assert_eq!(a.len(), 4 + 64);
    }

    #[test]
    fn digest_tracks_config_and_records() {
        let config = AnalysisConfig::default();
        let base = input_digest(&config, &KNOWN_MAXIMAL_GAPS).expect("digest");

        let other_bound = AnalysisConfig {
            bound: 1_000,
            ..config.clone()
        };
        assert_ne!(base, input_digest(&other_bound, &KNOWN_MAXIMAL_GAPS).expect("digest"));
        assert_ne!(base, input_digest(&config, &KNOWN_MAXIMAL_GAPS[..5]).expect("digest"));
    }
}
