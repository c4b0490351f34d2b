//! `studyplan signup` and `studyplan login`.

use anyhow::{Result, bail};

use studyplan_store::CredentialStore;

/// Register a new user.
pub fn run_signup(store: &CredentialStore, username: &str, password: &str) -> Result<()> {
    store.sign_up(username, password)?;
    println!("Sign up successful. Welcome, {username}!");
    Ok(())
}

/// Check a username/password pair without starting a plan.
pub fn run_login(store: &CredentialStore, username: &str, password: &str) -> Result<()> {
    if !store.check_credentials(username, password)? {
        bail!("invalid username or password");
    }
    println!("Logged in successfully as {username}.");
    Ok(())
}
