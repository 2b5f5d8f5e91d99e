use clap::Subcommand;
use streakwheel_core::reward::{rewards_by_tier, unclaimed_rewards};
use streakwheel_core::{default_rewards, RewardRecord, RewardStats, RewardTier};

use super::{print_json, Workspace};

#[derive(Subcommand)]
pub enum RewardAction {
    /// List rewards
    List {
        /// Only this tier (small, medium, large)
        #[arg(long)]
        tier: Option<String>,
        /// Hide claimed rewards
        #[arg(long)]
        unclaimed: bool,
        #[arg(long)]
        json: bool,
    },
    /// Add a reward to the pool
    Add {
        id: String,
        name: String,
        #[arg(long, default_value = "small")]
        tier: String,
    },
    /// Remove a reward from the pool
    Remove {
        id: String,
    },
    /// Claim counts per tier
    Stats,
    /// Restore the default reward pool
    Reset,
}

pub fn run(action: RewardAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    match action {
        RewardAction::List { tier, unclaimed, json } => {
            let pool = &ws.snapshot.rewards;
            let mut rewards: Vec<&RewardRecord> = match tier {
                Some(tier) => rewards_by_tier(pool, tier.parse::<RewardTier>()?),
                None if unclaimed => unclaimed_rewards(pool),
                None => pool.iter().collect(),
            };
            if unclaimed {
                rewards.retain(|r| !r.claimed);
            }
            if json {
                print_json(&rewards)?;
            } else {
                for reward in rewards {
                    let mark = if reward.claimed { "claimed" } else { "" };
                    println!("{:<12} {:<7} {} {mark}", reward.id, reward.tier.as_str(), reward.name);
                }
            }
        }
        RewardAction::Add { id, name, tier } => {
            let tier: RewardTier = tier.parse()?;
            if ws.snapshot.rewards.iter().any(|r| r.id == id) {
                return Err(format!("reward already exists: {id}").into());
            }
            ws.snapshot.rewards.push(RewardRecord::new(id.clone(), name, tier));
            ws.save()?;
            println!("Reward added: {id} ({tier})");
        }
        RewardAction::Remove { id } => {
            let before = ws.snapshot.rewards.len();
            ws.snapshot.rewards.retain(|r| r.id != id);
            if ws.snapshot.rewards.len() == before {
                return Err(format!("unknown reward: {id}").into());
            }
            ws.save()?;
            println!("Reward removed: {id}");
        }
        RewardAction::Stats => {
            print_json(&RewardStats::compute(&ws.snapshot.rewards))?;
        }
        RewardAction::Reset => {
            ws.snapshot.rewards = default_rewards();
            ws.save()?;
            println!("rewards reset to defaults");
        }
    }
    Ok(())
}
