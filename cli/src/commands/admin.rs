//! Administrator commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use notes_client::AdminStore;
use notes_core::Role;

use super::{Context, format_timestamp, output};

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List every account
    Users,
}

pub async fn execute(ctx: &mut Context, command: AdminCommand) -> Result<()> {
    let mut store = AdminStore::new(ctx.api.clone());

    match command {
        AdminCommand::Users => {
            let users = store.fetch_users().await?;
            if !ctx.human {
                return output(&users.to_vec(), false);
            }

            println!("{}", "Accounts".green().bold());
            println!("{}", "=".repeat(80));
            for user in users {
                let role = match user.role {
                    Role::Admin => user.role.to_string().yellow(),
                    _ => user.role.to_string().normal(),
                };
                println!("  {} <{}> [{}]", user.username.bold(), user.email, role);
                println!(
                    "    {} {}  {} {}",
                    "ID:".cyan(),
                    user.id,
                    "Joined:".cyan(),
                    format_timestamp(&user.created_at)
                );
            }
            println!();
            println!("  {} {}", "Total:".cyan(), users.len());
            Ok(())
        }
    }
}
