use clap::Subcommand;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::Serialize;
use streakwheel_core::habit::reset_stale_streaks;
use streakwheel_core::spin::format_cooldown;
use streakwheel_core::{RewardEngine, RewardProbabilities, SpinMode, SpinStatus};

use super::{print_json, Clock, Workspace};

#[derive(Subcommand)]
pub enum WheelAction {
    /// Show whether a spin is available
    Status {
        /// Use this habit's streak instead of the combined one
        #[arg(long)]
        habit: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Spin the wheel
    Spin {
        /// Practice spin: ignores the gate, claims nothing
        #[arg(long)]
        demo: bool,
        /// Seed the draw for a reproducible result
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        habit: Option<String>,
    },
    /// Wheel layout for the current odds
    Segments {
        #[arg(long)]
        habit: Option<String>,
    },
    /// Switch the spin mode (cooldown, once_per_milestone)
    Mode {
        mode: String,
    },
}

#[derive(Serialize)]
struct WheelReport {
    streak: u32,
    mode: SpinMode,
    can_spin: bool,
    status: SpinStatus,
    message: String,
    cooldown_remaining: Option<String>,
    probabilities: RewardProbabilities,
}

pub fn run(action: WheelAction, clock: Clock) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    reset_stale_streaks(&mut ws.snapshot.habits, clock.today);

    match action {
        WheelAction::Status { habit, json } => {
            let engine = ws.engine();
            let streak = wheel_streak(&ws, &engine, habit.as_deref())?;
            let status = engine.spin_status(streak, clock.now);
            let report = WheelReport {
                streak,
                mode: engine.spin_state().mode,
                can_spin: status.is_ready(),
                message: status.to_string(),
                cooldown_remaining: engine
                    .gate()
                    .with_gate(|gate| gate.time_remaining(clock.now))
                    .map(format_cooldown),
                probabilities: engine.probabilities(streak),
                status,
            };
            ws.save()?;
            if json {
                print_json(&report)?;
            } else {
                println!("Streak: {} ({})", report.streak, report.mode);
                println!("{}", report.message);
                let p = report.probabilities;
                println!("Odds: small {:.1}% / medium {:.1}% / large {:.1}%", p.small, p.medium, p.large);
            }
        }
        WheelAction::Spin { demo, seed, habit } => {
            let mut engine = ws.engine();
            let streak = wheel_streak(&ws, &engine, habit.as_deref())?;
            let mut rng = match seed {
                Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
                None => Mcg128Xsl64::from_entropy(),
            };
            let outcome = engine.spin(&mut rng, streak, demo, clock.now)?;
            engine.write_back(&mut ws.snapshot);
            ws.save()?;
            print_json(&outcome)?;
        }
        WheelAction::Segments { habit } => {
            let engine = ws.engine();
            let streak = wheel_streak(&ws, &engine, habit.as_deref())?;
            print_json(&engine.segments(streak))?;
        }
        WheelAction::Mode { mode } => {
            let mode: SpinMode = mode.parse()?;
            ws.config.wheel.mode = mode;
            ws.config.save()?;
            ws.snapshot.spin_state.mode = mode;
            ws.save()?;
            println!("Spin mode: {mode}");
        }
    }
    Ok(())
}

fn wheel_streak(
    ws: &Workspace,
    engine: &RewardEngine,
    habit: Option<&str>,
) -> Result<u32, Box<dyn std::error::Error>> {
    Ok(match habit {
        Some(id) => ws.snapshot.habit(id)?.streak,
        None => engine.effective_streak(&ws.snapshot.habits),
    })
}
