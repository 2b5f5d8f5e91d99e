use clap::Subcommand;
use streakwheel_core::habit::{parse_date, reset_stale_streaks};
use streakwheel_core::{CompletionValue, Frequency, HabitRecord};

use super::{print_json, Clock, Workspace};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Start tracking a habit
    Add {
        /// Habit id
        id: String,
        /// daily, weekly, monthly or yearly
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Completions needed per period (ignored for daily habits)
        #[arg(long, default_value_t = 1)]
        target: i32,
    },
    /// Stop tracking a habit
    Remove {
        id: String,
    },
    /// Log a completion
    Complete {
        id: String,
        /// Completion date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Logged amount, or true/false
        #[arg(long)]
        value: Option<String>,
    },
    /// List habits with their current streaks
    List {
        #[arg(long)]
        json: bool,
    },
    /// Re-run the streak reset policy for every habit
    Refresh,
}

pub fn run(action: HabitAction, clock: Clock) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    match action {
        HabitAction::Add { id, frequency, target } => {
            let frequency: Frequency = frequency.parse()?;
            if ws.snapshot.habits.iter().any(|h| h.id == id) {
                return Err(format!("habit already exists: {id}").into());
            }
            ws.snapshot.habits.push(HabitRecord::new(id.clone(), frequency, target));
            ws.save()?;
            println!("Habit added: {id} ({frequency})");
        }
        HabitAction::Remove { id } => {
            let before = ws.snapshot.habits.len();
            ws.snapshot.habits.retain(|h| h.id != id);
            if ws.snapshot.habits.len() == before {
                return Err(streakwheel_core::CoreError::UnknownHabit(id).into());
            }
            ws.save()?;
            println!("Habit removed: {id}");
        }
        HabitAction::Complete { id, date, value } => {
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => clock.today,
            };
            let value = parse_value(value.as_deref())?;
            let habit = ws.snapshot.habit_mut(&id)?;
            habit.record_completion(date, value, clock.today);
            println!("{id}: completed {date}, streak {}", habit.streak);
            ws.save()?;
        }
        HabitAction::List { json } => {
            reset_stale_streaks(&mut ws.snapshot.habits, clock.today);
            ws.save()?;
            if json {
                print_json(&ws.snapshot.habits)?;
            } else if ws.snapshot.habits.is_empty() {
                println!("No habits yet.");
            } else {
                for habit in &ws.snapshot.habits {
                    let done = if habit.is_completed_on(clock.today) { "x" } else { " " };
                    println!(
                        "[{done}] {:<20} {:<8} target {:<3} streak {}",
                        habit.id, habit.frequency.as_str(), habit.frequency_target, habit.streak
                    );
                }
            }
        }
        HabitAction::Refresh => {
            let reset = reset_stale_streaks(&mut ws.snapshot.habits, clock.today);
            ws.save()?;
            if reset.is_empty() {
                println!("No streaks reset.");
            } else {
                println!("Reset: {}", reset.join(", "));
            }
        }
    }
    Ok(())
}

fn parse_value(value: Option<&str>) -> Result<CompletionValue, Box<dyn std::error::Error>> {
    let Some(value) = value else {
        return Ok(CompletionValue::default());
    };
    if let Ok(done) = value.parse::<bool>() {
        return Ok(CompletionValue::Done(done));
    }
    value
        .parse::<f64>()
        .map(CompletionValue::Amount)
        .map_err(|_| format!("cannot parse '{value}' as true/false or a number").into())
}
