use std::path::PathBuf;
use std::process;

use blockworld_bench::report;
use blockworld_bench::runner::BenchmarkRunner;
use blockworld_bench::scenes;
use blockworld_core::config::SimConfig;

struct Args {
    baseline_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    save_path: Option<PathBuf>,
    regression_threshold: f64,
    tick_count: u32,
}

fn usage() {
    eprintln!("Usage: bench-runner [OPTIONS]");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --config <path>                Simulation config (RON), defaults otherwise");
    eprintln!("  --save <path>                  Write the last scene's session as a save file");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
    eprintln!("  --ticks <n>                    Ticks per scene (default: 3600)");
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        baseline_path: None,
        output_path: None,
        config_path: None,
        save_path: None,
        regression_threshold: 10.0,
        tick_count: 3600,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--help" || flag == "-h" {
            usage();
            process::exit(0);
        }
        i += 1;
        let value = args
            .get(i)
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag {
            "--baseline" => parsed.baseline_path = Some(PathBuf::from(value)),
            "--output" => parsed.output_path = Some(PathBuf::from(value)),
            "--config" => parsed.config_path = Some(PathBuf::from(value)),
            "--save" => parsed.save_path = Some(PathBuf::from(value)),
            "--regression-threshold" => {
                parsed.regression_threshold = value
                    .parse()
                    .map_err(|_| format!("invalid --regression-threshold value: {value}"))?;
            }
            "--ticks" => {
                parsed.tick_count = value
                    .parse()
                    .map_err(|_| format!("invalid --ticks value: {value}"))?;
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig, String> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    SimConfig::from_ron_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            usage();
            process::exit(1);
        }
    };
    let config = match load_config(args.config_path.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    };

    log::info!(
        "World {}x{} tiles, seed {:#x}, {} ticks per scene",
        config.world_cols,
        config.world_rows,
        config.seed,
        args.tick_count
    );
    let seed = config.seed;
    let runner = BenchmarkRunner::new(config, args.tick_count);

    let mut results = Vec::new();
    let mut last_session = None;
    for scene in &scenes::standard_scenes() {
        match runner.run_scene(scene) {
            Ok(run) => {
                results.push(run.result);
                last_session = Some(run.session);
            }
            Err(e) => {
                eprintln!("ERROR: scene '{}': {e}", scene.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let (Some(path), Some(session)) = (&args.save_path, &last_session) {
        let written = blockworld_persist::save_session(session)
            .map_err(|e| e.to_string())
            .and_then(|bytes| std::fs::write(path, &bytes).map(|_| bytes.len()).map_err(|e| e.to_string()));
        match written {
            Ok(len) => log::info!("Saved session ({len} bytes) to {}", path.display()),
            Err(e) => {
                eprintln!("ERROR: failed to write save {}: {e}", path.display());
                process::exit(1);
            }
        }
    }

    if let Some(ref path) = args.output_path {
        let baseline = report::Baseline {
            label: run_label(),
            seed,
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            eprintln!("ERROR: failed to save baseline {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = args.baseline_path {
        match report::load_baseline(path) {
            Ok(baseline) => {
                if baseline.seed != seed {
                    log::warn!(
                        "Baseline seed {:#x} differs from {:#x}; timings only",
                        baseline.seed,
                        seed
                    );
                }
                let comparison =
                    report::compare(&results, seed, &baseline, args.regression_threshold);
                println!(
                    "{}",
                    report::format_comparison(&comparison, args.regression_threshold)
                );
                if comparison.has_regressions() {
                    eprintln!(
                        "ERROR: {} regressions detected, exiting with code 1",
                        comparison.regressions.len()
                    );
                    process::exit(1);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Baseline file not found: {}", path.display());
            }
            Err(e) => {
                eprintln!("ERROR: unreadable baseline {}: {e}", path.display());
                process::exit(1);
            }
        }
    }

    log::info!("Benchmark complete.");
}

/// Seconds since the epoch, enough to tell baselines apart.
fn run_label() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("bench-{secs}")
}
