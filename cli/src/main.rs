//! Command-line client for the notes service.
//!
//! Commands:
//! - login, signup, logout, whoami: session management
//! - profile, delete-account: account maintenance
//! - forgot-password, reset-password: password recovery
//! - list, show, create, edit, publish, delete, link: your own notes
//! - public list, public show: other users' published notes
//! - admin users: every account (administrators only)
//!
//! Configuration via environment:
//! - NOTES_API_URL: API base URL (default: http://localhost:3000/api)
//! - NOTES_SESSION_FILE: where the session is kept (default: ~/.notes/session.json)
//! - LOG_LEVEL / RUST_LOG: log filter for stderr diagnostics (default: warn)

mod commands;

use clap::{Parser, Subcommand};
use notes_client::{ClientConfig, Route};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::{
    Context,
    admin::AdminCommand,
    auth::{
        DeleteAccountArgs, ForgotPasswordArgs, LoginArgs, ProfileArgs, ResetPasswordArgs,
        SignupArgs,
    },
    notes::{CreateArgs, DeleteArgs, EditArgs, LinkArgs, ListArgs, PublishArgs, ShowArgs},
    public::PublicCommand,
};

/// Notes service CLI
///
/// Prints JSON by default; pass --human for formatted output.
#[derive(Parser)]
#[command(name = "notes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// API base URL
    #[arg(long, env = "NOTES_API_URL", global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login(LoginArgs),

    /// Create an account and log in as it
    Signup(SignupArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Change username and avatar
    Profile(ProfileArgs),

    /// Request a password-reset email
    ForgotPassword(ForgotPasswordArgs),

    /// Set a new password with a reset token
    ResetPassword(ResetPasswordArgs),

    /// Delete your account
    DeleteAccount(DeleteAccountArgs),

    /// List your notes
    List(ListArgs),

    /// Show one of your notes
    Show(ShowArgs),

    /// Create a note
    Create(CreateArgs),

    /// Edit a note's title or content
    Edit(EditArgs),

    /// Publish or unpublish a note
    Publish(PublishArgs),

    /// Delete a note
    Delete(DeleteArgs),

    /// Print a note's share link
    Link(LinkArgs),

    /// Browse published notes
    #[command(subcommand)]
    Public(PublicCommand),

    /// Administrator commands
    #[command(subcommand)]
    Admin(AdminCommand),
}

impl Commands {
    /// The route a command runs under, checked against the session first.
    fn route(&self) -> Route {
        match self {
            Self::Login(_) => Route::Login,
            Self::Signup(_) => Route::Signup,
            Self::ForgotPassword(_) => Route::ForgotPassword,
            Self::ResetPassword(args) => Route::ResetPassword(args.token.clone()),
            Self::Logout | Self::Whoami => Route::Home,
            Self::Profile(_) | Self::DeleteAccount(_) | Self::List(_) | Self::Create(_) => {
                Route::Notes
            }
            Self::Show(ShowArgs { id })
            | Self::Edit(EditArgs { id, .. })
            | Self::Publish(PublishArgs { id })
            | Self::Delete(DeleteArgs { id, .. })
            | Self::Link(LinkArgs { id }) => Route::Note(id.clone()),
            Self::Public(command) => command.route(),
            Self::Admin(_) => Route::Admin,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.url.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    let mut ctx = match Context::new(&config, cli.human) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = run(&mut ctx, cli.command).await;

    // Rejected tokens are reported after the command's own error.
    ctx.settle();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(ctx: &mut Context, command: Commands) -> anyhow::Result<()> {
    ctx.enter(&command.route())?;

    match command {
        Commands::Login(args) => commands::auth::login(ctx, args).await,
        Commands::Signup(args) => commands::auth::signup(ctx, args).await,
        Commands::Logout => commands::auth::logout(ctx),
        Commands::Whoami => commands::auth::whoami(ctx).await,
        Commands::Profile(args) => commands::auth::profile(ctx, args).await,
        Commands::ForgotPassword(args) => commands::auth::forgot_password(ctx, args).await,
        Commands::ResetPassword(args) => commands::auth::reset_password(ctx, args).await,
        Commands::DeleteAccount(args) => commands::auth::delete_account(ctx, args).await,
        Commands::List(args) => commands::notes::list(ctx, args).await,
        Commands::Show(args) => commands::notes::show(ctx, args).await,
        Commands::Create(args) => commands::notes::create(ctx, args).await,
        Commands::Edit(args) => commands::notes::edit(ctx, args).await,
        Commands::Publish(args) => commands::notes::publish(ctx, args).await,
        Commands::Delete(args) => commands::notes::delete(ctx, args).await,
        Commands::Link(args) => commands::notes::link(ctx, args).await,
        Commands::Public(command) => commands::public::execute(ctx, command).await,
        Commands::Admin(command) => commands::admin::execute(ctx, command).await,
    }
}

fn load_config(url: Option<&str>) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::from_env()?;
    Ok(match url {
        Some(url) => config.with_api_url(url)?,
        None => config,
    })
}

/// Initialize tracing with environment filter, writing to stderr.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
