use pointstracker_core::StateRepository;
use serde_json::json;

use super::{CliResult, Context};

pub async fn run(as_json: bool) -> CliResult {
    let ctx = Context::open().await?;
    let tracker = &ctx.tracker;
    let state = tracker.state();

    if as_json {
        let status = json!({
            "backend": tracker.store().name(),
            "scores": state.scores,
            "pinThreshold": state.pin_threshold,
            "pending": tracker.pending(),
            "adminLoggedIn": tracker.is_admin(),
            "loadedFromDefaults": tracker.loaded_from_defaults(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    for (counter, score) in &state.scores {
        println!("{counter}: {score}");
    }
    println!("threshold: {} pts per 5 minutes", state.pin_threshold);
    if let Some(pending) = tracker.pending() {
        println!(
            "pending: {:+} for {} (awaiting PIN)",
            pending.amount, pending.counter
        );
    }
    if tracker.is_admin() {
        println!("admin: logged in");
    }
    Ok(())
}
