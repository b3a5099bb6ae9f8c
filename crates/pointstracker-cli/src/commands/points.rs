use clap::Subcommand;

use super::{now_ms, print_event, CliResult, Context};

#[derive(Subcommand)]
pub enum PointsAction {
    /// Add points to a counter
    Add {
        /// Counter name (case-insensitive)
        counter: String,
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        amount: i64,
    },
    /// Subtract points from a counter
    Subtract {
        /// Counter name (case-insensitive)
        counter: String,
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        amount: i64,
    },
    /// Approve the pending change with the PIN
    Pin {
        pin: String,
    },
    /// Discard the pending change
    Cancel,
}

pub async fn run(action: PointsAction) -> CliResult {
    let mut ctx = Context::open().await?;

    let event = match action {
        PointsAction::Add { counter, amount } => {
            ctx.tracker.change_points(&counter, amount, now_ms()).await?
        }
        PointsAction::Subtract { counter, amount } => {
            ctx.tracker.change_points(&counter, -amount, now_ms()).await?
        }
        PointsAction::Pin { pin } => ctx.tracker.submit_pin(&pin, now_ms()).await?,
        PointsAction::Cancel => ctx.tracker.cancel_challenge()?,
    };

    ctx.save_session()?;
    print_event(&event)
}
