//! Rebounds: record transitions where the normalized gap grows.

use crate::gaps::NormalizedGap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rebound {
    /// Index of the earlier record.
    pub idx: usize,
    pub p_n: u64,
    pub p_next: u64,
    pub r_n: f64,
    pub r_next: f64,
    /// `r_next - r_n`, always positive.
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReboundSummary {
    pub rebounds: Vec<Rebound>,
    pub count: usize,
    pub transitions: usize,
    /// Share of transitions that rebound, in percent.
    pub percentage: f64,
    pub mean_amplitude: f64,
    pub max_amplitude: f64,
}

pub fn find_rebounds(records: &[NormalizedGap]) -> ReboundSummary {
    let rebounds: Vec<Rebound> = records
        .windows(2)
        .enumerate()
        .filter_map(|(idx, w)| {
            let delta = w[1].r - w[0].r;
            (delta > 0.0).then_some(Rebound {
                idx,
                p_n: w[0].p,
                p_next: w[1].p,
                r_n: w[0].r,
                r_next: w[1].r,
                delta,
            })
        })
        .collect();

    let transitions = records.len().saturating_sub(1);
    let count = rebounds.len();
    let percentage = if transitions == 0 {
        0.0
    } else {
        100.0 * count as f64 / transitions as f64
    };
    let mean_amplitude = if count == 0 {
        0.0
    } else {
        rebounds.iter().map(|r| r.delta).sum::<f64>() / count as f64
    };
    let max_amplitude = rebounds.iter().map(|r| r.delta).fold(0.0, f64::max);

    ReboundSummary {
        rebounds,
        count,
        transitions,
        percentage,
        mean_amplitude,
        max_amplitude,
    }
}
