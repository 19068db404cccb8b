//! Profile command handlers.

use anyhow::{Context, Result};
use connectly_core::config::paths;
use connectly_core::profile::{ProfileEdit, UserProfile};
use connectly_core::routes;
use connectly_core::session::SessionStore;

pub fn show() -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::PROFILE, &session)?;

    let profile = UserProfile::load_from(&paths::profile_path()).context("load profile")?;
    if profile.name.is_empty() {
        println!("Your profile is empty. Run `connectly edit-profile --name <name>` to fill it in.");
        return Ok(());
    }

    println!("{}", profile.name);
    if !profile.bio.is_empty() {
        println!("{}", profile.bio);
    }
    if !profile.email.is_empty() {
        println!("email: {}", profile.email);
    }
    if !profile.location.is_empty() {
        println!("location: {}", profile.location);
    }
    if !profile.avatar_url.is_empty() {
        println!("avatar: {}", profile.avatar_url);
    }
    println!("joined: {}", profile.joined.format("%B %Y"));
    Ok(())
}

pub fn edit(
    name: Option<String>,
    bio: Option<String>,
    avatar: Option<String>,
    email: Option<String>,
    location: Option<String>,
) -> Result<()> {
    let session = SessionStore::load()?;
    super::enter(routes::EDIT_PROFILE, &session)?;

    let edit = ProfileEdit {
        name,
        bio,
        avatar_url: avatar,
        email,
        location,
    };
    if edit.is_empty() {
        anyhow::bail!("nothing to update; pass at least one of --name, --bio, --avatar, --email, --location");
    }

    let path = paths::profile_path();
    let mut profile = UserProfile::load_from(&path).context("load profile")?;
    profile.apply_edit(edit);
    profile.save_to(&path).context("save profile")?;

    println!("Profile updated.");
    Ok(())
}
