use std::fmt;
use std::io;
use std::path::Path;

use crate::runner::BenchmarkResult;

/// Results of one run kept for later comparison.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub label: String,
    /// World seed the scenes were generated from.
    pub seed: u64,
    pub results: Vec<BenchmarkResult>,
}

/// Read a baseline written by [`save_baseline`]. A file that exists but does
/// not parse is reported as `InvalidData`.
pub fn load_baseline(path: &Path) -> io::Result<Baseline> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn save_baseline(path: &Path, baseline: &Baseline) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(io::Error::other)?;
    std::fs::write(path, json)
}

/// Timing figure a regression was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TickMean,
    TickP95,
    Generation,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::TickMean => "mean tick",
            Metric::TickP95 => "p95 tick",
            Metric::Generation => "world generation",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene: String,
    pub metric: Metric,
    pub baseline_ms: f64,
    pub current_ms: f64,
    pub pct_change: f64,
}

/// Outcome of checking a run against a baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub regressions: Vec<Regression>,
    /// Scenes with the same seed and length whose gameplay counters changed.
    /// The script is deterministic, so this means simulation behavior moved.
    pub drifted: Vec<String>,
    /// Scenes with no baseline entry.
    pub unmatched: Vec<String>,
}

impl Comparison {
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}

/// Check `current` against `baseline`. A metric regresses when it grew by
/// more than `threshold_pct` percent.
pub fn compare(
    current: &[BenchmarkResult],
    seed: u64,
    baseline: &Baseline,
    threshold_pct: f64,
) -> Comparison {
    let mut comparison = Comparison::default();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            comparison.unmatched.push(result.scene_name.clone());
            continue;
        };

        let pairs = [
            (Metric::TickMean, base.timings.mean_ms, result.timings.mean_ms),
            (Metric::TickP95, base.timings.p95_ms, result.timings.p95_ms),
            (Metric::Generation, base.generation_ms, result.generation_ms),
        ];
        for (metric, before, now) in pairs {
            if before <= 0.0 {
                continue;
            }
            let pct_change = (now - before) / before * 100.0;
            if pct_change > threshold_pct {
                comparison.regressions.push(Regression {
                    scene: result.scene_name.clone(),
                    metric,
                    baseline_ms: before,
                    current_ms: now,
                    pct_change,
                });
            }
        }

        if baseline.seed == seed
            && base.tick_count == result.tick_count
            && base.counters != result.counters
        {
            comparison.drifted.push(result.scene_name.clone());
        }
    }

    comparison
}

/// Markdown table, one row per scene.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Ticks | Gen (ms) | Spawned | Peak agents | Deaths | Kills | Chunks seen | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Max (ms) |\n");
    out.push_str("|-------|-------|----------|---------|-------------|--------|-------|-------------|-----------|-------------|----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {:.1} | {} | {} | {} | {} | {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |\n",
            r.scene_name,
            r.tick_count,
            r.generation_ms,
            r.counters.spawned,
            r.counters.peak_agents,
            r.counters.deaths,
            r.counters.kills,
            r.counters.chunks_seen,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.max_ms,
        ));
    }

    out
}

pub fn format_comparison(comparison: &Comparison, threshold_pct: f64) -> String {
    let mut out = String::new();
    if comparison.has_regressions() {
        out.push_str(&format!("Slower than baseline (>{threshold_pct:.0}%):\n"));
        for r in &comparison.regressions {
            out.push_str(&format!(
                "  - {} {}: {:.3} -> {:.3} ms (+{:.1}%)\n",
                r.scene, r.metric, r.baseline_ms, r.current_ms, r.pct_change
            ));
        }
    } else {
        out.push_str(&format!("Every scene within {threshold_pct:.0}% of baseline.\n"));
    }
    if !comparison.drifted.is_empty() {
        out.push_str(&format!(
            "Gameplay counters changed: {}\n",
            comparison.drifted.join(", ")
        ));
    }
    if !comparison.unmatched.is_empty() {
        out.push_str(&format!(
            "No baseline entry: {}\n",
            comparison.unmatched.join(", ")
        ));
    }
    out
}
