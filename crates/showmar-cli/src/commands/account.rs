use super::progress::Spinner;
use super::{prompts, tables, until_interrupted, App};
use crate::ProfileCommands;
use color_eyre::Result;
use serde_json::json;
use showmar_core::ClientError;
use showmar_models::ProfileUpdate;
use std::path::PathBuf;

pub async fn run_login(app: &App, email: Option<String>) -> Result<()> {
    login_flow(app, email).await?;
    Ok(())
}

/// Prompt for whatever is missing and log in. Returns whether it worked;
/// failures have already been shown to the user.
pub async fn login_flow(app: &App, email: Option<String>) -> Result<bool> {
    let email = match email {
        Some(email) => email,
        None => prompts::prompt_required("Email", None)?,
    };
    let password = prompts::prompt_password("Password")?;

    let session = app.session();
    let spinner = Spinner::start("Logging in...", &app.output);
    let result = until_interrupted(session.login(&email, &password)).await;
    drop(spinner);

    match result {
        Ok(_) => Ok(true),
        // A rejected login already produced its own message
        Err(ClientError::Remote(e)) => {
            tracing::debug!("Login rejected: {}", e);
            Ok(false)
        }
        Err(ClientError::Cancelled) => {
            app.report(ClientError::Cancelled)?;
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_register(app: &App, username: Option<String>, email: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompts::prompt_required("Username", None)?,
    };
    let email = match email {
        Some(email) => email,
        None => prompts::prompt_required("Email", None)?,
    };
    let password = prompts::prompt_password("Password")?;
    let confirm = prompts::prompt_password("Confirm password")?;
    if password != confirm {
        return Err(color_eyre::eyre::eyre!("Passwords do not match"));
    }

    let session = app.session();
    let spinner = Spinner::start("Creating account...", &app.output);
    let result = until_interrupted(session.register(&username, &email, &password)).await;
    drop(spinner);

    match result {
        Ok(_) => Ok(()),
        // Already shown as a notification
        Err(ClientError::Remote(e)) => {
            tracing::debug!("Registration rejected: {}", e);
            Ok(())
        }
        Err(e) => app.report(e),
    }
}

pub fn run_logout(app: &App) -> Result<()> {
    if !app.credentials.is_logged_in() {
        app.output.info("Not logged in");
        return Ok(());
    }
    app.session().logout()?;
    Ok(())
}

pub async fn run_profile(app: &App, cmd: ProfileCommands) -> Result<()> {
    if !app.ensure_login().await? {
        return Ok(());
    }

    match cmd {
        ProfileCommands::Show => show_profile(app).await,
        ProfileCommands::Update { name, email, password, avatar } => {
            update_profile(app, name, email, password, avatar).await
        }
    }
}

async fn show_profile(app: &App) -> Result<()> {
    let session = app.session();
    let profile = match until_interrupted(session.profile()).await {
        Ok(profile) => profile,
        Err(e) => return app.report(e),
    };
    let avatar_url = profile.avatar_url.as_deref().map(|url| app.config.avatar_url(url));

    if !app.output.is_human() {
        app.output.json(&json!({
            "id": profile.id,
            "username": profile.username,
            "name": profile.name,
            "email": profile.email,
            "avatar_url": avatar_url,
        }));
        return Ok(());
    }

    let table = tables::details(
        "Profile",
        vec![
            ("Username", profile.username.clone()),
            ("Name", profile.name.clone()),
            ("Email", profile.email.clone()),
            ("Avatar", avatar_url),
        ],
    );
    println!("{}", table);
    Ok(())
}

async fn update_profile(
    app: &App,
    name: Option<String>,
    email: Option<String>,
    change_password: bool,
    avatar: Option<PathBuf>,
) -> Result<()> {
    let session = app.session();

    // The form is always sent whole; start from the current values
    let current = match until_interrupted(session.profile()).await {
        Ok(profile) => profile,
        Err(e) => return app.report(e),
    };

    let interactive = name.is_none() && email.is_none() && !change_password && avatar.is_none();
    let name = match name {
        Some(name) => name,
        None if interactive => prompts::prompt_string("Name", current.name.as_deref())?,
        None => current.name.unwrap_or_default(),
    };
    let email = match email {
        Some(email) => email,
        None if interactive => prompts::prompt_required("Email", current.email.as_deref())?,
        None => current.email.unwrap_or_default(),
    };
    let password = if change_password {
        Some(prompts::prompt_password("New password")?).filter(|p| !p.is_empty())
    } else {
        None
    };

    let update = ProfileUpdate { name, email, password, avatar };
    let spinner = Spinner::start("Updating profile...", &app.output);
    let result = until_interrupted(session.update_profile(&update)).await;
    drop(spinner);

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.requires_login() => app.report(e),
        Err(ClientError::Remote(e)) => {
            tracing::debug!("Profile update rejected: {}", e);
            Ok(())
        }
        Err(e) => app.report(e),
    }
}
