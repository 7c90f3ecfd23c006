//! Quality Monitor: HV, spread, additive ε-indicator and IGD over a
//! sliding window of archive snapshots (§4.7 of SPEC_FULL.md).
//!
//! Drives the driver's forced-diversification and early-termination
//! decisions; never mutates the archive itself.

use std::collections::VecDeque;

use crate::archive::Archive;
use crate::hypervolume::{hypervolume, worst_observed, ReferencePoint};
use crate::model::Objectives;

/// Extra slack applied when extending the monitor's own reference point
/// beyond the worst value observed on each axis (§4.7: "extended by a 10%
/// slack on minimized axes, and by -10% on maximized axes").
const MINIMIZE_SLACK: f64 = 0.10;
const MAXIMIZE_SLACK: f64 = 0.10;

/// How many past snapshots the ring buffer retains (§4.7: "length 3").
const SNAPSHOT_HISTORY_LEN: usize = 3;

/// Tunable thresholds and window lengths, resolved as configurable per
/// §9's open-question notes (the 10-vs-50-loop figures both exist in the
/// source documentation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMonitorConfig {
    /// Outer loops between snapshots (§4.7 default 10).
    pub snapshot_interval: u32,
    /// Spread threshold above which loops count toward "spread-stuck".
    pub spread_threshold: f64,
    /// Consecutive outer loops above `spread_threshold` before signaling.
    pub spread_window: u32,
    /// ε below which a snapshot-to-snapshot window counts as converged.
    pub epsilon_threshold: f64,
    /// Consecutive converged windows before signaling "epsilon-converged".
    pub epsilon_windows: u32,
}

impl Default for QualityMonitorConfig {
    fn default() -> Self {
        Self {
            snapshot_interval: 10,
            spread_threshold: 0.35,
            spread_window: 50,
            epsilon_threshold: 0.05,
            epsilon_windows: 3,
        }
    }
}

/// Everything reported back to the driver after one `tick`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReport {
    pub hv: f64,
    pub spread: f64,
    /// `None` until a second snapshot exists to compare against.
    pub epsilon: Option<f64>,
    /// `None` when no reference front is available yet
    /// (`ReferenceFrontUnavailable`, never fatal per §7).
    pub igd: Option<f64>,
    pub spread_stuck: bool,
    pub epsilon_converged: bool,
}

/// Ring buffer of past archive snapshots plus streak counters for the two
/// signals the driver acts on.
#[derive(Debug, Clone)]
pub struct QualityMonitor {
    config: QualityMonitorConfig,
    outer_loop: u64,
    snapshots: VecDeque<Vec<Objectives>>,
    spread_stuck_streak: u32,
    epsilon_converged_streak: u32,
    /// Running worst-observed-so-far per axis, used to build a reference
    /// point that only ever grows more permissive across the run (so HV
    /// stays monotone under a fixed reference, per §8 property 4).
    observed_worst: Option<ReferencePoint>,
    /// Externally supplied reference front for IGD, if the caller has one
    /// (e.g. from a prior run); otherwise IGD is derived from the union of
    /// snapshots once at least one exists.
    external_reference_front: Option<Vec<Objectives>>,
}

impl QualityMonitor {
    pub fn new(config: QualityMonitorConfig) -> Self {
        Self {
            config,
            outer_loop: 0,
            snapshots: VecDeque::with_capacity(SNAPSHOT_HISTORY_LEN),
            spread_stuck_streak: 0,
            epsilon_converged_streak: 0,
            observed_worst: None,
            external_reference_front: None,
        }
    }

    pub fn with_reference_front(mut self, front: Vec<Objectives>) -> Self {
        self.external_reference_front = Some(front);
        self
    }

    /// Called once per driver outer loop with the current archive.
    pub fn tick(&mut self, archive: &Archive) -> MonitorReport {
        self.outer_loop += 1;
        let front: Vec<Objectives> = archive.members().iter().map(|m| m.objectives).collect();

        self.extend_observed_reference(&front);
        let reference = self.reference_point();
        let hv = hypervolume(&front, &reference);
        let spread = spread_of(&front);

        if spread > self.config.spread_threshold {
            self.spread_stuck_streak += 1;
        } else {
            self.spread_stuck_streak = 0;
        }
        let spread_stuck = self.spread_stuck_streak >= self.config.spread_window;

        let mut epsilon = None;
        if self.outer_loop % self.config.snapshot_interval as u64 == 0 {
            if let Some(previous) = self.snapshots.back() {
                let eps = additive_epsilon_indicator(&front, previous);
                epsilon = Some(eps);
                if eps < self.config.epsilon_threshold {
                    self.epsilon_converged_streak += 1;
                } else {
                    self.epsilon_converged_streak = 0;
                }
            }
            self.push_snapshot(front.clone());
        }
        let epsilon_converged = self.epsilon_converged_streak >= self.config.epsilon_windows;

        let igd = self.reference_front().map(|reference_front| igd_of(&front, reference_front));

        MonitorReport { hv, spread, epsilon, igd, spread_stuck, epsilon_converged }
    }

    fn push_snapshot(&mut self, front: Vec<Objectives>) {
        if self.snapshots.len() == SNAPSHOT_HISTORY_LEN {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(front);
    }

    fn extend_observed_reference(&mut self, front: &[Objectives]) {
        if front.is_empty() {
            return;
        }
        let raw = worst_observed(front);
        self.observed_worst = Some(match self.observed_worst {
            None => raw,
            Some(prev) => ReferencePoint {
                f1: prev.f1.min(raw.f1),
                f2: prev.f2.min(raw.f2),
                f3: prev.f3.max(raw.f3),
                f4: prev.f4.max(raw.f4),
            },
        });
    }

    fn reference_point(&self) -> ReferencePoint {
        let raw = self.observed_worst.unwrap_or(ReferencePoint { f1: 0.0, f2: 0.0, f3: 0.0, f4: 0.0 });
        ReferencePoint {
            f1: raw.f1 * (1.0 - MAXIMIZE_SLACK),
            f2: raw.f2 * (1.0 - MAXIMIZE_SLACK),
            f3: raw.f3 * (1.0 + MINIMIZE_SLACK),
            f4: raw.f4 * (1.0 + MINIMIZE_SLACK),
        }
    }

    fn reference_front(&self) -> Option<&[Objectives]> {
        self.external_reference_front
            .as_deref()
            .or_else(|| self.snapshots.back().map(|v| v.as_slice()))
    }
}

/// Objectives normalized to `[0, 1]` per axis using the front's own
/// observed min/max, with maximized objectives flipped so that in this
/// space every axis is "lower is better" - a shared basis for spread and
/// IGD distance calculations.
fn normalize_front(front: &[Objectives]) -> Vec<[f64; 4]> {
    if front.is_empty() {
        return Vec::new();
    }
    let raw: Vec<[f64; 4]> = front.iter().map(|o| [-(o.f1 as f64), -o.f2, o.f3 as f64, o.f4]).collect();
    let mut mins = [f64::INFINITY; 4];
    let mut maxs = [f64::NEG_INFINITY; 4];
    for p in &raw {
        for i in 0..4 {
            mins[i] = mins[i].min(p[i]);
            maxs[i] = maxs[i].max(p[i]);
        }
    }
    raw.into_iter()
        .map(|p| {
            let mut out = [0.0; 4];
            for i in 0..4 {
                let span = maxs[i] - mins[i];
                out[i] = if span > 0.0 { (p[i] - mins[i]) / span } else { 0.0 };
            }
            out
        })
        .collect()
}

fn euclidean(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

/// Spread Δ: average nearest-neighbor gap on the normalized front,
/// divided by the unit hypercube's diagonal so the result is roughly
/// comparable across runs. Zero for fronts with 0 or 1 members - there is
/// no gap to measure.
fn spread_of(front: &[Objectives]) -> f64 {
    let points = normalize_front(front);
    if points.len() < 2 {
        return 0.0;
    }
    let diagonal = (points[0].len() as f64).sqrt();
    let gaps: Vec<f64> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, q)| euclidean(p, q))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    (gaps.iter().sum::<f64>() / gaps.len() as f64) / diagonal
}

/// `to_min_space` matching `hypervolume`'s convention: maximized
/// objectives negated so every axis is "lower is better".
fn to_min_space(o: &Objectives) -> [f64; 4] {
    [-(o.f1 as f64), -o.f2, o.f3 as f64, o.f4]
}

/// Additive ε-indicator: the minimum ε such that every point of `older`
/// is ε-dominated by some point of `newer`, in min-space (§4.7/GLOSSARY).
fn additive_epsilon_indicator(newer: &[Objectives], older: &[Objectives]) -> f64 {
    if older.is_empty() {
        return 0.0;
    }
    if newer.is_empty() {
        return f64::INFINITY;
    }
    older
        .iter()
        .map(|b| {
            let b = to_min_space(b);
            newer
                .iter()
                .map(|a| {
                    let a = to_min_space(a);
                    (0..4).map(|i| a[i] - b[i]).fold(f64::NEG_INFINITY, f64::max)
                })
                .fold(f64::INFINITY, f64::min)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Inverted Generational Distance from `reference` to `front`: average,
/// over each reference point, of the Euclidean distance (in normalized
/// min-space) to the nearest point of `front`. Reported only, never
/// terminating (§4.7).
fn igd_of(front: &[Objectives], reference: &[Objectives]) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    if front.is_empty() {
        return f64::INFINITY;
    }
    let combined: Vec<Objectives> = front.iter().chain(reference.iter()).copied().collect();
    let normalized = normalize_front(&combined);
    let (front_norm, reference_norm) = normalized.split_at(front.len());
    reference_norm
        .iter()
        .map(|r| front_norm.iter().map(|f| euclidean(r, f)).fold(f64::INFINITY, f64::min))
        .sum::<f64>()
        / reference_norm.len() as f64
}
