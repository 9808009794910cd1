//! insight-runner: headless dashboard runner for WealthPulse analytics.
//!
//! Usage:
//!   insight-runner --history sims.json --goal 50000
//!   insight-runner --demo 30 --seed 12345
//!   insight-runner --history sims.json --config analytics.json --ipc-mode

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::env;
use std::io::{self, BufRead, Write};
use uuid::Uuid;
use wealthpulse_core::{
    clock::SystemClock,
    command::DashboardCommand,
    config::{AnalyticsConfig, ConfigPatch},
    record::{GrowthParameters, GrowthResult, RateBasis, SimulationPayload, SimulationRecord},
    rng::{RngBank, StreamSlot},
    scenario::{StressScenario, VolatilityScenario},
    session::DashboardSession,
    snapshot::DashboardSnapshot,
    state::DashboardState,
};

const MODALITIES: [&str; 4] = ["savings", "cdb", "treasury", "stocks"];

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Recompute,
    GetState,
    Command { command: DashboardCommand },
    Volatility { record_id: String, scenario: VolatilityScenario },
    Stress { record_id: String, scenario: StressScenario },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let demo = parse_arg(&args, "--demo", 0usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let history_path = string_arg(&args, "--history");
    let config_path = string_arg(&args, "--config");
    let state_path = string_arg(&args, "--state");

    let mut config = match config_path {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };
    if let Some(goal) = goal_arg(&args)? {
        config.apply(ConfigPatch { goal_amount: Some(Some(goal)), ..Default::default() })?;
    }

    let history = match history_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read history {path}"))?;
            serde_json::from_str::<Vec<SimulationRecord>>(&raw)
                .with_context(|| format!("Malformed history {path}"))?
        }
        None if demo > 0 => demo_history(seed, demo),
        None => Vec::new(),
    };

    let state = match state_path {
        Some(path) if std::path::Path::new(path).exists() => {
            serde_json::from_str::<DashboardState>(&std::fs::read_to_string(path)?)?
        }
        _ => DashboardState::default(),
    };

    if !ipc_mode {
        println!("WealthPulse — insight-runner");
        println!("  records:   {}", history.len());
        println!("  seed:      {seed}");
        println!("  goal:      {}", fmt_goal(config.goal_amount));
        println!();
    }

    let session = DashboardSession::restore(config, state, Box::new(SystemClock))?;

    if ipc_mode {
        run_ipc_loop(&session, &history)?;
    } else {
        let snapshot = session.recompute(Some(&history))?;
        print_summary(&snapshot);
    }

    if let Some(path) = state_path {
        std::fs::write(path, serde_json::to_string_pretty(&session.state()?)?)?;
        log::info!("state saved to {path}");
    }

    Ok(())
}

fn run_ipc_loop(session: &DashboardSession, history: &[SimulationRecord]) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                reply_error(&mut stdout, e)?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Recompute => {
                let snapshot = session.recompute(Some(history))?;
                writeln!(stdout, "{}", serde_json::to_string(&snapshot)?)?;
            }
            IpcCommand::GetState => {
                writeln!(stdout, "{}", serde_json::to_string(&session.state()?)?)?;
            }
            IpcCommand::Command { command } => match session.apply(command) {
                Ok(()) => writeln!(stdout, "{}", serde_json::json!({ "ok": true }))?,
                Err(e) => reply_error(&mut stdout, e)?,
            },
            IpcCommand::Volatility { record_id, scenario } => {
                match find_parameters(history, &record_id).map(|p| scenario.run(p)) {
                    Some(Ok(outcome)) => writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?,
                    Some(Err(e)) => reply_error(&mut stdout, e)?,
                    None => reply_error(&mut stdout, format!("no growth record {record_id}"))?,
                }
            }
            IpcCommand::Stress { record_id, scenario } => {
                match find_parameters(history, &record_id).map(|p| scenario.run(p)) {
                    Some(Ok(outcome)) => writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?,
                    Some(Err(e)) => reply_error(&mut stdout, e)?,
                    None => reply_error(&mut stdout, format!("no growth record {record_id}"))?,
                }
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn reply_error(out: &mut impl Write, e: impl std::fmt::Display) -> Result<()> {
    writeln!(out, "{}", serde_json::json!({ "error": e.to_string() }))?;
    out.flush()?;
    Ok(())
}

fn find_parameters<'a>(history: &'a [SimulationRecord], id: &str) -> Option<&'a GrowthParameters> {
    history
        .iter()
        .find(|r| r.id == id)
        .and_then(|r| r.growth())
        .map(|g| g.parameters)
}

/// Seeded sample history: one record a day, contributions drifting upward.
fn demo_history(seed: u64, count: usize) -> Vec<SimulationRecord> {
    let mut rng = RngBank::new(seed).for_stream(StreamSlot::DemoHistory);
    let start = Utc::now() - Duration::days(count as i64);
    let mut contribution = 200.0;

    (0..count)
        .map(|i| {
            contribution += rng.next_u64_below(60) as f64;
            let parameters = GrowthParameters {
                initial_value:        1_000.0 + rng.next_u64_below(9_000) as f64,
                monthly_contribution: contribution,
                rate_percent:         6.0 + rng.next_f64() * 8.0,
                rate_basis:           RateBasis::Annual,
                period_months:        12 + rng.next_u64_below(108) as u32,
                modality: MODALITIES[rng.next_u64_below(MODALITIES.len() as u64) as usize].to_string(),
            };
            let final_value = wealthpulse_core::projector::project_parameters(&parameters);
            let total_invested = parameters.invested_value();
            SimulationRecord {
                id: Uuid::from_u64_pair(rng.next_u64(), rng.next_u64()).to_string(),
                created_at: start + Duration::days(i as i64),
                payload: SimulationPayload::CompoundGrowth {
                    parameters,
                    result: Some(GrowthResult {
                        final_value,
                        total_invested,
                        total_interest: final_value - total_invested,
                    }),
                },
            }
        })
        .collect()
}

fn print_summary(snapshot: &DashboardSnapshot) {
    let summary = &snapshot.executive_summary;
    let profile = &snapshot.behavioral_profile;

    println!("=== EXECUTIVE SUMMARY ===");
    println!("  simulations:    {}", summary.total_simulations);
    println!("  avg return:     {:.2}%", summary.avg_projected_return);
    println!("  near goals:     {}", summary.near_goals_count);
    println!("  opportunities:  {}", summary.opportunities_count);
    println!("  overall score:  {:.1}", summary.overall_score);
    println!("  level:          {} ({} pts, {} to next)",
        snapshot.score.level, snapshot.score.total, snapshot.score.points_to_next_level);
    println!("  risk profile:   {:?}", profile.risk_profile);

    println!();
    println!("=== TRENDS ===");
    if snapshot.trend_patterns.is_empty() {
        println!("  (No significant trends)");
    }
    for t in &snapshot.trend_patterns {
        println!("  {:<22} {:?} {:.1}% (confidence {:.0})",
            t.metric.as_str(), t.direction, t.magnitude_percent, t.confidence);
    }

    println!();
    println!("=== SUGGESTIONS ===");
    for s in &snapshot.suggestions {
        println!("  [{}] {} (impact {:.2})", s.priority.as_str(), s.title, s.total_impact());
    }

    println!();
    println!("=== ALERTS ===");
    for a in snapshot.active_alerts() {
        println!("  [{}] {}", a.urgency.as_str(), a.title);
    }

    println!();
    println!("=== ACHIEVEMENTS ===");
    for a in &snapshot.achievements {
        let mark = if a.unlocked { "x" } else { " " };
        println!("  [{mark}] {} (+{})", a.name, a.point_reward);
    }

    println!();
    println!("=== RECOMMENDATIONS ===");
    for r in &profile.recommendations {
        println!("  * {r}");
    }
}

fn fmt_goal(goal: Option<f64>) -> String {
    goal.map_or_else(|| "none".to_string(), |g| format!("{g:.2}"))
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

/// `--goal`, if given. An unparseable amount is an error, not a missing goal.
fn goal_arg(args: &[String]) -> Result<Option<f64>> {
    string_arg(args, "--goal")
        .map(|raw| {
            raw.parse::<f64>()
                .with_context(|| format!("Invalid --goal amount {raw}"))
        })
        .transpose()
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn goal_is_optional_but_must_parse() {
        assert_eq!(goal_arg(&args(&["insight-runner"])).unwrap(), None);
        assert_eq!(goal_arg(&args(&["insight-runner", "--goal", "50000"])).unwrap(), Some(50_000.0));

        let err = goal_arg(&args(&["insight-runner", "--goal", "50k"])).unwrap_err();
        assert!(err.to_string().contains("50k"));
    }

    #[test]
    fn demo_history_is_seeded() {
        let a = demo_history(7, 5);
        let b = demo_history(7, 5);
        let ids = |h: &[SimulationRecord]| h.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
        assert!(a.iter().all(|r| r.validate().is_ok()));
    }
}
