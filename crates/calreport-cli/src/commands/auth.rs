//! Authentication commands.

use calreport_providers::google::{GoogleSession, TokenSource};
use tracing::info;

use crate::error::{ClientResult, ResultExt};

/// Runs the Google consent flow and caches the resulting token.
///
/// A cached token that is valid, or can be refreshed, is kept unless `force`
/// is set. An expired token without a refresh token, or a refresh token the
/// server rejects, leads to the consent flow.
pub async fn google(session: &GoogleSession, force: bool) -> ClientResult<()> {
    let token_path = session.config().token_path.display().to_string();

    if !force {
        let cached = session
            .cached_token()
            .await
            .context(|| "failed to authenticate".to_string())?;
        if let Some((_, source)) = cached {
            println!("{}", already_authenticated(source, &token_path));
            return Ok(());
        }
    }

    println!("Starting Google Calendar authentication...");
    println!();
    println!("A browser window will open for you to authorize read-only access.");
    println!("If the browser doesn't open, check the terminal for a URL to copy.");
    println!();

    session
        .reauthorize()
        .await
        .context(|| "failed to authenticate".to_string())?;

    info!("Google authentication successful");
    println!("Authentication successful!");
    println!("Tokens saved to {}", token_path);
    Ok(())
}

fn already_authenticated(source: TokenSource, token_path: &str) -> String {
    let mut out = String::new();
    if source == TokenSource::Refreshed {
        out.push_str("Access token refreshed.\n");
    }
    out.push_str("Already authenticated with Google Calendar.\n");
    out.push_str(&format!("Tokens: {}\n", token_path));
    out.push_str("Use --force to re-authenticate.");
    out
}

/// Deletes the cached Google token.
pub fn sign_out(session: &GoogleSession) -> ClientResult<()> {
    session
        .sign_out()
        .context(|| "failed to sign out".to_string())?;
    println!(
        "Signed out; removed {}",
        session.config().token_path.display()
    );
    Ok(())
}
