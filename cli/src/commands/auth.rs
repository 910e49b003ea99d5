//! Session and account commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_core::User;

use super::{Context, Done, HumanReadable, confirm, format_timestamp, output};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "NOTES_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the signup command.
#[derive(Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "NOTES_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    /// New username
    #[arg(long)]
    pub username: String,

    /// Avatar URL or path; omit to clear it
    #[arg(long)]
    pub avatar: Option<String>,
}

#[derive(Args)]
pub struct ForgotPasswordArgs {
    /// Email the reset link is sent to
    #[arg(long)]
    pub email: String,
}

#[derive(Args)]
pub struct ResetPasswordArgs {
    /// Token from the reset email
    pub token: String,

    /// New password
    #[arg(long, env = "NOTES_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args)]
pub struct DeleteAccountArgs {
    /// Skip confirmation prompt (for non-interactive use)
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl HumanReadable for User {
    fn print_human(&self) {
        println!("{}", self.username.green().bold());
        println!("  {} {}", "ID:".cyan(), self.id);
        println!("  {} {}", "Email:".cyan(), self.email);
        println!("  {} {}", "Role:".cyan(), self.role);
        if let Some(avatar) = &self.avatar {
            println!("  {} {}", "Avatar:".cyan(), avatar);
        }
        println!("  {} {}", "Joined:".cyan(), format_timestamp(&self.created_at));
    }
}

pub async fn login(ctx: &mut Context, args: LoginArgs) -> Result<()> {
    let user = ctx.session.login(&args.email, &args.password).await?;
    output(&user, ctx.human)
}

pub async fn signup(ctx: &mut Context, args: SignupArgs) -> Result<()> {
    let user = ctx
        .session
        .signup(&args.username, &args.email, &args.password)
        .await?;
    output(&user, ctx.human)
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    ctx.session.logout();
    output(&Done::new("Logged out"), ctx.human)
}

/// Refresh the user from the server; an expired session ends up logged out.
pub async fn whoami(ctx: &mut Context) -> Result<()> {
    match ctx.session.fetch_current_profile().await {
        Some(user) => output(&user, ctx.human),
        None => output(&Done::new("Not logged in"), ctx.human),
    }
}

pub async fn profile(ctx: &mut Context, args: ProfileArgs) -> Result<()> {
    ctx.session
        .update_profile(&args.username, args.avatar.as_deref())
        .await?;
    match ctx.session.user() {
        Some(user) => output(&user, ctx.human),
        None => output(&Done::new("Profile updated"), ctx.human),
    }
}

pub async fn forgot_password(ctx: &mut Context, args: ForgotPasswordArgs) -> Result<()> {
    ctx.session.forgot_password(&args.email).await?;
    output(
        &Done::new(format!("Reset instructions sent to {}", args.email)),
        ctx.human,
    )
}

pub async fn reset_password(ctx: &mut Context, args: ResetPasswordArgs) -> Result<()> {
    ctx.session
        .reset_password(&args.token, &args.password)
        .await?;
    output(&Done::new("Password updated; you can log in now"), ctx.human)
}

/// Delete the account, then drop the local session.
pub async fn delete_account(ctx: &mut Context, args: DeleteAccountArgs) -> Result<()> {
    if ctx.human && !args.yes && !confirm("Delete your account and all of its notes?")? {
        eprintln!("Aborted.");
        return Ok(());
    }

    ctx.session.delete_account().await?;
    ctx.session.logout();
    output(&Done::new("Account deleted"), ctx.human)
}
