use clap::Subcommand;
use streakwheel_core::milestone::sorted_milestones;
use streakwheel_core::{default_milestones, MilestoneRow, MilestoneTable};

use super::{print_json, Workspace};

#[derive(Subcommand)]
pub enum MilestoneAction {
    /// List milestones in threshold order
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create or replace the milestone for a day count
    Set {
        /// Streak length that unlocks this milestone
        days: i32,
        /// Small reward chance (%)
        small: f64,
        /// Medium reward chance (%)
        medium: f64,
        /// Large reward chance (%)
        large: f64,
        #[arg(long, default_value = "")]
        label: String,
    },
    /// Remove the milestone for a day count
    Remove {
        days: i32,
    },
    /// Restore the default milestones
    Reset,
}

pub fn run(action: MilestoneAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    match action {
        MilestoneAction::List { json } => {
            ws.snapshot.milestones.validate()?;
            let rows = sorted_milestones(ws.snapshot.milestones.rows());
            if json {
                print_json(&rows)?;
            } else {
                for row in rows {
                    println!(
                        "{:>4} days  {:>5.1} / {:>5.1} / {:>5.1}  {}",
                        row.days, row.small_chance, row.medium_chance, row.large_chance, row.label
                    );
                }
            }
        }
        MilestoneAction::Set {
            days,
            small,
            medium,
            large,
            label,
        } => {
            if days <= 0 {
                return Err(format!("days must be positive, got {days}").into());
            }
            ws.snapshot
                .milestones
                .upsert(MilestoneRow::new(days, small, medium, large, label));
            ws.save()?;
            if let Some(row) = ws.snapshot.milestones.rows().iter().find(|r| r.days == days) {
                println!(
                    "Milestone {days}: {:.1} / {:.1} / {:.1}",
                    row.small_chance, row.medium_chance, row.large_chance
                );
            }
        }
        MilestoneAction::Remove { days } => match ws.snapshot.milestones.remove(days) {
            Some(_) => {
                ws.save()?;
                println!("Milestone removed: {days}");
            }
            None => return Err(format!("no milestone at {days} days").into()),
        },
        MilestoneAction::Reset => {
            ws.snapshot.milestones = MilestoneTable::from_rows(default_milestones());
            ws.save()?;
            println!("milestones reset to defaults");
        }
    }
    Ok(())
}
