use clap::{ArgGroup, Subcommand};
use pointstracker_core::carriers;
use pointstracker_core::{AuthError, RecipientField};
use serde_json::json;

use super::{print_event, CliResult, Context};

#[derive(Subcommand)]
pub enum AdminAction {
    /// Start an admin session
    Login { password: String },
    /// End the admin session
    Logout,
    /// Show the current PIN and threshold
    Show,
    /// Change the approval PIN (4 digits)
    SetPin { pin: String },
    /// Change the admin password (ends the session)
    SetPassword { password: String },
    /// Change the 5 minute approval threshold
    SetThreshold { value: String },
    /// SMS recipient slots
    Recipients {
        #[command(subcommand)]
        action: RecipientsAction,
    },
}

#[derive(Subcommand)]
pub enum RecipientsAction {
    /// Show the five recipient slots
    List,
    /// Edit a slot and save
    #[command(group(ArgGroup::new("field").required(true).multiple(true).args(["phone", "carrier"])))]
    Set {
        /// Slot index (0-4)
        slot: usize,
        /// Phone number; non-digits are dropped
        #[arg(long)]
        phone: Option<String>,
        /// Carrier name or a custom gateway domain
        #[arg(long)]
        carrier: Option<String>,
    },
    /// Empty a slot and save
    Clear { slot: usize },
}

pub async fn run(action: AdminAction) -> CliResult {
    let mut ctx = Context::open().await?;

    let event = match action {
        AdminAction::Login { password } => ctx.tracker.admin_login(&password)?,
        AdminAction::Logout => ctx.tracker.admin_logout(),
        AdminAction::Show => return show_settings(&ctx),
        AdminAction::SetPin { pin } => ctx.tracker.update_pin(&pin).await?,
        AdminAction::SetPassword { password } => {
            ctx.tracker.update_admin_password(&password).await?
        }
        AdminAction::SetThreshold { value } => ctx.tracker.update_threshold(&value).await?,
        AdminAction::Recipients { action } => match action {
            RecipientsAction::List => return list_recipients(&ctx),
            RecipientsAction::Set {
                slot,
                phone,
                carrier,
            } => {
                if let Some(phone) = phone {
                    ctx.tracker
                        .edit_recipient(slot, RecipientField::Phone, &phone)?;
                }
                if let Some(carrier) = carrier {
                    ctx.tracker
                        .edit_recipient(slot, RecipientField::Carrier, &carrier)?;
                }
                ctx.tracker.save_recipients().await?
            }
            RecipientsAction::Clear { slot } => {
                ctx.tracker.edit_recipient(slot, RecipientField::Phone, "")?;
                ctx.tracker.edit_recipient(slot, RecipientField::Carrier, "")?;
                ctx.tracker.save_recipients().await?
            }
        },
    };

    ctx.save_session()?;
    print_event(&event)
}

fn show_settings(ctx: &Context) -> CliResult {
    let current_pin = ctx.tracker.current_pin()?;
    let settings = json!({
        "currentPin": current_pin,
        "pinThreshold": ctx.tracker.state().pin_threshold,
    });
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn list_recipients(ctx: &Context) -> CliResult {
    if !ctx.tracker.is_admin() {
        return Err(AuthError::NotLoggedIn.into());
    }
    let slots: Vec<_> = ctx
        .tracker
        .recipient_draft()
        .iter()
        .enumerate()
        .map(|(slot, r)| {
            let gateway = r
                .is_complete()
                .then(|| carriers::gateway_address(&r.phone, &r.carrier));
            json!({
                "slot": slot,
                "phone": r.phone,
                "carrier": r.carrier,
                "gateway": gateway,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&slots)?);
    Ok(())
}
