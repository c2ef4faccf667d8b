use std::time::Instant;

use blockworld_core::config::SimConfig;
use blockworld_core::error::ConfigError;
use blockworld_sim::agents::AttackOutcome;
use blockworld_sim::Session;

use crate::scenes::{scripted_input, SceneConfig};

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Gameplay totals over a run, to tell a slow tick from a busy one.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneCounters {
    pub spawned: usize,
    pub peak_agents: usize,
    pub deaths: u32,
    pub kills: u32,
    pub chunks_seen: usize,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub tick_count: u32,
    pub generation_ms: f64,
    pub counters: SceneCounters,
    pub timings: TimingSeries,
}

/// A finished scene and the session it ran.
pub struct SceneRun {
    pub result: BenchmarkResult,
    pub session: Session,
}

/// Runs scripted sessions headless and times every tick.
pub struct BenchmarkRunner {
    config: SimConfig,
    tick_count: u32,
}

impl BenchmarkRunner {
    pub fn new(config: SimConfig, tick_count: u32) -> Self {
        Self { config, tick_count }
    }

    /// Generate the scene's world, run the script and return timing results.
    pub fn run_scene(&self, scene: &SceneConfig) -> Result<SceneRun, ConfigError> {
        log::info!(
            "Running scene '{}' ({:?}, {:?}, {:?})...",
            scene.name,
            scene.preset,
            scene.difficulty,
            scene.mode
        );

        let gen_start = Instant::now();
        let mut session = Session::new(
            self.config.clone(),
            scene.preset,
            scene.difficulty,
            scene.mode,
        )?;
        let generation_ms = gen_start.elapsed().as_secs_f64() * 1000.0;

        let mut counters = SceneCounters::default();
        let mut frame_times = Vec::with_capacity(self.tick_count as usize);

        for tick in 1..=u64::from(self.tick_count) {
            let input = scripted_input(tick, session.player().pos);

            let frame_start = Instant::now();
            let report = session.tick(&input);
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);

            counters.spawned += report.spawned;
            counters.peak_agents = counters.peak_agents.max(session.agents().len());
            if report.died {
                counters.deaths += 1;
            }
            if matches!(report.attack, Some(AttackOutcome::Killed)) {
                counters.kills += 1;
            }
        }
        counters.chunks_seen = session.visibility().len();

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: gen={:.1}ms, mean={:.3}ms, p95={:.3}ms, p99={:.3}ms, {} spawned",
            generation_ms,
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms,
            counters.spawned
        );

        Ok(SceneRun {
            result: BenchmarkResult {
                scene_name: scene.name.to_string(),
                tick_count: self.tick_count,
                generation_ms,
                counters,
                timings,
            },
            session,
        })
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
