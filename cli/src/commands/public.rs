//! Browse other users' published notes. No session needed.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use notes_client::{PublicNotesStore, Route};
use notes_core::PublicNote;

use super::{Context, HumanReadable, format_timestamp, output, truncate};

#[derive(Subcommand)]
pub enum PublicCommand {
    /// List a user's published notes
    List {
        /// Author's username
        username: String,
    },

    /// Show one published note
    Show {
        /// Author's username
        username: String,

        /// Note slug
        slug: String,
    },
}

impl PublicCommand {
    pub fn route(&self) -> Route {
        match self {
            Self::List { username } => Route::PublicNotes {
                username: username.clone(),
            },
            Self::Show { username, slug } => Route::PublicNote {
                username: username.clone(),
                slug: slug.clone(),
            },
        }
    }
}

impl HumanReadable for PublicNote {
    fn print_human(&self) {
        println!("{}", self.title.bold());
        println!("  {} {}", "Slug:".cyan(), self.slug);
        println!("  {} {}", "Published:".cyan(), format_timestamp(&self.updated_at));
        println!();
        for line in self.content.lines() {
            println!("  {}", line);
        }
        println!();
    }
}

pub async fn execute(ctx: &mut Context, command: PublicCommand) -> Result<()> {
    let mut store = PublicNotesStore::new(ctx.api.clone());

    match command {
        PublicCommand::List { username } => {
            let notes = store.fetch_user_notes(&username).await?;
            if !ctx.human {
                return output(&notes.to_vec(), false);
            }

            println!("{} {}", "Published by".green().bold(), username.bold());
            println!("{}", "=".repeat(80));
            if notes.is_empty() {
                println!("  {}", "(Nothing published)".dimmed());
            }
            for note in notes {
                println!("  {} {}", truncate(&note.title, 50).bold(), note.slug.dimmed());
            }
            Ok(())
        }
        PublicCommand::Show { username, slug } => {
            let note = store.fetch_by_slug(&username, &slug).await?;
            output(&note, ctx.human)
        }
    }
}
