//! Commands on the logged-in user's own notes.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use notes_client::NotesStore;
use notes_core::{Note, NoteId, NoteUpdate, ShareLink};

use super::{Context, Done, HumanReadable, confirm, format_timestamp, output, truncate};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only show published notes
    #[arg(long)]
    pub published: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Note ID
    pub id: NoteId,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Note title
    pub title: String,

    /// Note body
    #[arg(long, short = 'c', default_value = "")]
    pub content: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Note ID
    pub id: NoteId,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New body
    #[arg(long, short = 'c')]
    pub content: Option<String>,
}

/// Arguments for the publish command (toggles the current state).
#[derive(Args)]
pub struct PublishArgs {
    pub id: NoteId,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Note ID to delete
    pub id: NoteId,

    /// Skip confirmation prompt (for non-interactive use)
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args)]
pub struct LinkArgs {
    pub id: NoteId,
}

impl HumanReadable for Note {
    fn print_human(&self) {
        let visibility = if self.is_public {
            "public".green()
        } else {
            "private".dimmed()
        };
        println!("{} [{}]", self.title.bold(), visibility);
        println!("  {} {}", "ID:".cyan(), self.id);
        if let Some(slug) = &self.slug {
            println!("  {} {}", "Slug:".cyan(), slug);
        }
        println!("  {} {}", "Updated:".cyan(), format_timestamp(&self.updated_at));
        println!();
        for line in self.content.lines() {
            println!("  {}", line);
        }
        println!();
    }
}

impl HumanReadable for ShareLink {
    fn print_human(&self) {
        println!("{}", self.link);
    }
}

/// Listing view: one line per note.
fn print_listing(notes: &[Note]) {
    println!("{}", "Your Notes".green().bold());
    println!("{}", "=".repeat(80));

    if notes.is_empty() {
        println!("  {}", "(No notes yet)".dimmed());
        return;
    }

    for note in notes {
        let marker = if note.is_public { "*".yellow() } else { " ".normal() };
        println!(
            "  {} {} {}",
            marker,
            truncate(&note.title, 40).bold(),
            note.id.to_string().dimmed()
        );
        if !note.content.is_empty() {
            println!("      {}", truncate(note.content.lines().next().unwrap_or(""), 70));
        }
    }

    println!();
    println!("  {} {}", "Total:".cyan(), notes.len());
    println!("  {}", "* = published".dimmed());
}

pub async fn list(ctx: &mut Context, args: ListArgs) -> Result<()> {
    let mut store = NotesStore::new(ctx.api.clone());
    let notes: Vec<Note> = store
        .fetch_all()
        .await?
        .iter()
        .filter(|n| !args.published || n.is_public)
        .cloned()
        .collect();

    if ctx.human {
        print_listing(&notes);
        Ok(())
    } else {
        output(&notes, false)
    }
}

pub async fn show(ctx: &mut Context, args: ShowArgs) -> Result<()> {
    let mut store = NotesStore::new(ctx.api.clone());
    let note = store.fetch_one(&args.id).await?;
    output(&note, ctx.human)
}

pub async fn create(ctx: &mut Context, args: CreateArgs) -> Result<()> {
    let mut store = NotesStore::new(ctx.api.clone());
    let note = store.create(&args.title, &args.content).await?;
    output(&note, ctx.human)
}

pub async fn edit(ctx: &mut Context, args: EditArgs) -> Result<()> {
    if args.title.is_none() && args.content.is_none() {
        bail!("nothing to change; pass --title and/or --content");
    }

    let mut update = NoteUpdate::for_note(args.id);
    if let Some(title) = args.title {
        update = update.title(title);
    }
    if let Some(content) = args.content {
        update = update.content(content);
    }

    let mut store = NotesStore::new(ctx.api.clone());
    let note = store.update(update).await?;
    output(&note, ctx.human)
}

pub async fn publish(ctx: &mut Context, args: PublishArgs) -> Result<()> {
    let mut store = NotesStore::new(ctx.api.clone());
    let note = store.toggle_publish(&args.id).await?;
    output(&note, ctx.human)
}

pub async fn delete(ctx: &mut Context, args: DeleteArgs) -> Result<()> {
    if ctx.human && !args.yes && !confirm(&format!("Delete note {}?", args.id))? {
        eprintln!("Aborted.");
        return Ok(());
    }

    let mut store = NotesStore::new(ctx.api.clone());
    store.delete(&args.id).await?;
    output(&Done::new(format!("Deleted note {}", args.id)), ctx.human)
}

pub async fn link(ctx: &mut Context, args: LinkArgs) -> Result<()> {
    let mut store = NotesStore::new(ctx.api.clone());
    let link = store.share_link(&args.id).await?;
    output(&link, ctx.human)
}
