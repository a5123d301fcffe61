//! Sources of maximal-gap records: the sieve, an embedded table of known
//! records, or OEIS-style b-files on disk.

use crate::error::{GapError, Result};
use crate::gaps::GapRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Maximal gaps among the sieved primes up to the configured bound.
    #[default]
    Sieve,
    /// [`KNOWN_MAXIMAL_GAPS`].
    KnownTable,
    /// A pair of b-files: lower-end primes and gap sizes.
    #[serde(rename = "bfile")]
    BFile,
}

/// The first twenty maximal prime gaps, by lower-end prime (A002386, A005250).
pub const KNOWN_MAXIMAL_GAPS: [GapRecord; 20] = [
    GapRecord { p: 2, gap: 1 },
    GapRecord { p: 3, gap: 2 },
    GapRecord { p: 7, gap: 4 },
    GapRecord { p: 23, gap: 6 },
    GapRecord { p: 89, gap: 8 },
    GapRecord { p: 113, gap: 14 },
    GapRecord { p: 523, gap: 18 },
    GapRecord { p: 887, gap: 20 },
    GapRecord { p: 1129, gap: 22 },
    GapRecord { p: 1327, gap: 34 },
    GapRecord { p: 9551, gap: 36 },
    GapRecord { p: 15683, gap: 44 },
    GapRecord { p: 19609, gap: 52 },
    GapRecord { p: 31397, gap: 72 },
    GapRecord { p: 155921, gap: 86 },
    GapRecord { p: 360653, gap: 96 },
    GapRecord { p: 370261, gap: 112 },
    GapRecord { p: 492113, gap: 114 },
    GapRecord { p: 1349533, gap: 118 },
    GapRecord { p: 1357201, gap: 132 },
];

/// Parse b-file text: `index value` per line, `#` comments and blank lines
/// ignored. Values are returned in file order.
pub fn parse_bfile(text: &str, label: &str) -> Result<Vec<u64>> {
    let mut values = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let value = match (fields.next(), fields.next()) {
            (Some(_index), Some(value)) => value,
            _ => {
                return Err(bfile_error(
                    label,
                    format!("line {}: expected `index value`", line_no + 1),
                ));
            }
        };
        let value = value.parse::<u64>().map_err(|e| {
            bfile_error(label, format!("line {}: bad value `{value}`: {e}", line_no + 1))
        })?;
        values.push(value);
    }
    Ok(values)
}

pub fn read_bfile(path: impl AsRef<Path>) -> Result<Vec<u64>> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| bfile_error(&label, e.to_string()))?;
    parse_bfile(&text, &label)
}

/// Zip lower-end primes with gap sizes. Both files must list the same
/// number of terms and the gaps must strictly increase.
pub fn records_from_bfiles(
    starts_path: impl AsRef<Path>,
    gaps_path: impl AsRef<Path>,
) -> Result<Vec<GapRecord>> {
    let starts = read_bfile(&starts_path)?;
    let gaps = read_bfile(&gaps_path)?;
    let label = gaps_path.as_ref().display().to_string();
    if starts.len() != gaps.len() {
        return Err(bfile_error(
            &label,
            format!(
                "{} gaps do not match {} starting primes",
                gaps.len(),
                starts.len()
            ),
        ));
    }

    let records: Vec<GapRecord> = starts
        .into_iter()
        .zip(gaps)
        .map(|(p, gap)| GapRecord { p, gap })
        .collect();
    if let Some(i) = records.windows(2).position(|w| w[1].gap <= w[0].gap) {
        return Err(bfile_error(
            &label,
            format!("term {} does not set a new record", i + 2),
        ));
    }
    Ok(records)
}

fn bfile_error(label: &str, message: String) -> GapError {
    GapError::BFile {
        path: label.to_string(),
        message,
    }
}
