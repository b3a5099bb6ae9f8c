use pointstracker_core::carriers::{CARRIER_GATEWAYS, CUSTOM_CARRIER};

use super::CliResult;

pub fn run() -> CliResult {
    for (name, domain) in CARRIER_GATEWAYS {
        println!("{name:<14} {domain}");
    }
    println!("{CUSTOM_CARRIER:<14} (pass the gateway domain as the carrier)");
    Ok(())
}
