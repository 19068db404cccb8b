//! CLI entry and dispatch.
//!
//! One subcommand per screen of the client. Every protected screen runs
//! the route guard against the in-memory session before doing anything
//! else; the guard result is resolved before dispatch continues, so it
//! never evaluates against a stale session.

use anyhow::{Context, Result};
use clap::Parser;
use connectly_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "connectly")]
#[command(version)]
#[command(about = "Connectly social network terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        #[arg(long = "first-name")]
        first_name: String,
        #[arg(long = "last-name")]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Password confirmation (read from stdin when omitted)
        #[arg(long = "confirm-password")]
        confirm_password: Option<String>,
    },

    /// Clear the stored session (no-op when already signed out)
    Logout,

    /// Show the current session state without touching the network
    Whoami,

    /// Show the home feed
    Feed {
        /// Toggle comment visibility for a post instead of rendering
        #[arg(long, value_name = "POST_ID")]
        comments: Option<String>,
    },

    /// Publish a new post
    Post {
        /// Body text (may be empty when media is attached)
        content: String,
        /// Media URL; repeatable
        #[arg(long, value_name = "URL")]
        media: Vec<String>,
        #[arg(long)]
        location: Option<String>,
        /// Tag; repeatable
        #[arg(long)]
        tag: Vec<String>,
    },

    /// Comment on a post, or reply to a comment
    Comment {
        post_id: String,
        body: String,
        /// Reply under an existing comment instead of the post itself
        #[arg(long = "reply-to", value_name = "COMMENT_ID")]
        reply_to: Option<String>,
    },

    /// Like a post or a comment
    Like {
        #[arg(long, value_name = "POST_ID")]
        post: Option<String>,
        #[arg(long, value_name = "COMMENT_ID")]
        comment: Option<String>,
    },

    /// Delete one of your own posts
    DeletePost {
        post_id: String,
    },

    /// Show your profile
    Profile,

    /// Edit your profile (only the provided fields change)
    EditProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long, value_name = "URL")]
        avatar: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&config, email, password).await,

        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
        } => {
            commands::auth::register(
                &config,
                commands::auth::RegisterArgs {
                    first_name,
                    last_name,
                    email,
                    password,
                    confirm_password,
                },
            )
            .await
        }

        Commands::Logout => commands::auth::logout(),

        Commands::Whoami => commands::auth::whoami(),

        Commands::Feed { comments } => match comments {
            Some(post_id) => commands::feed::toggle_comments(&post_id),
            None => commands::feed::show(),
        },

        Commands::Post {
            content,
            media,
            location,
            tag,
        } => commands::feed::post(&content, media, location, tag),

        Commands::Comment {
            post_id,
            body,
            reply_to,
        } => commands::feed::comment(&post_id, &body, reply_to.as_deref()),

        Commands::Like { post, comment } => match (post, comment) {
            (Some(post_id), None) => commands::feed::like_post(&post_id),
            (None, Some(comment_id)) => commands::feed::like_comment(&comment_id),
            _ => anyhow::bail!("Please specify exactly one of --post or --comment"),
        },

        Commands::DeletePost { post_id } => commands::feed::delete_post(&post_id),

        Commands::Profile => commands::profile::show(),

        Commands::EditProfile {
            name,
            bio,
            avatar,
            email,
            location,
        } => commands::profile::edit(name, bio, avatar, email, location),

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
