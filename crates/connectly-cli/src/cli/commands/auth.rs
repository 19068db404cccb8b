//! Authentication command handlers (login, register, logout, whoami).

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use connectly_core::auth::{AuthClient, AuthConfig, Credentials, Registration};
use connectly_core::config::Config;
use connectly_core::session::SessionStore;

pub async fn login(config: &Config, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };

    let client = AuthClient::new(AuthConfig::from_config(config))?;
    let issued = client
        .login(&Credentials {
            email: email.clone(),
            password,
        })
        .await
        .context("login failed")?;

    // The session is stored before any navigation that follows this
    // response, so the route guard never sees a stale session.
    let mut session = SessionStore::load()?;
    session.set_session(issued.token.into_inner())?;
    tracing::info!(attempt = issued.attempt, "session established");

    println!("Logged in as {email}.");
    println!("Run `connectly feed` to open your home feed.");
    Ok(())
}

/// Register form input, flags first, stdin for the passwords otherwise.
pub struct RegisterArgs {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

pub async fn register(config: &Config, args: RegisterArgs) -> Result<()> {
    let password = match args.password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };
    let confirm_password = match args.confirm_password {
        Some(p) => p,
        None => prompt("Confirm password: ")?,
    };

    let client = AuthClient::new(AuthConfig::from_config(config))?;
    let issued = client
        .register(&Registration {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email.clone(),
            password,
            confirm_password,
        })
        .await
        .context("registration failed")?;

    let mut session = SessionStore::load()?;
    session.set_session(issued.token.into_inner())?;
    tracing::info!(attempt = issued.attempt, "session established");

    println!("Welcome to Connectly, {}.", args.email);
    println!("Run `connectly edit-profile` to fill in your profile.");
    Ok(())
}

pub fn logout() -> Result<()> {
    let mut session = SessionStore::load()?;
    if session.is_authenticated() {
        session.clear_session()?;
        println!("Logged out.");
    } else {
        // Clearing an already-clear session is a no-op, not an error.
        session.clear_session()?;
        println!("Not signed in.");
    }
    Ok(())
}

pub fn whoami() -> Result<()> {
    let session = SessionStore::load()?;
    if session.is_authenticated() {
        println!("Signed in.");
    } else {
        println!("Anonymous — run `connectly login`.");
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
