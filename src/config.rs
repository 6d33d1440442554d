//! API-key resolution and storage.
//!
//! The key is looked up through an ordered chain, first non-empty result
//! wins:
//!
//! 1. **Environment** (`MISTRAL_API_KEY`) — explicit per-invocation
//!    override; the natural choice for CI and scripts.
//! 2. **Platform keyring** — the stored copy from a previous run, under a
//!    fixed service/account pair.
//! 3. **Interactive prompt** — asked once without echo, then written to the
//!    keyring so the user never types it again.
//!
//! A keyring that is unavailable (headless box, locked store) degrades
//! silently to the next strategy; only an explicit *write* failure is
//! surfaced, because the user just typed a key expecting it to be kept.

use crate::error::OcrError;
use keyring::Entry;
use tracing::{debug, warn};

/// Keyring service name the API key is stored under.
pub const SERVICE_NAME: &str = "mistocr";
/// Keyring account name the API key is stored under.
pub const API_KEY_NAME: &str = "mistral_api_key";
/// Environment variable checked before the keyring.
pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";

/// First non-empty candidate wins.
///
/// The lookup chain is expressed as plain `Option<String>` candidates so
/// the precedence rule stays a pure, testable function, independent of the
/// environment and the keyring.
fn first_non_empty(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|key| !key.trim().is_empty())
}

/// Look up the API key: environment first, then the platform keyring.
///
/// Returns `None` if neither holds a non-empty key. Never prompts.
pub fn get_api_key() -> Option<String> {
    first_non_empty([
        std::env::var(API_KEY_ENV).ok(),
        read_from_keyring(),
    ])
}

/// Store the API key in the platform keyring.
pub fn store_api_key(api_key: &str) -> Result<(), OcrError> {
    let entry = Entry::new(SERVICE_NAME, API_KEY_NAME).map_err(|e| OcrError::CredentialStore {
        reason: e.to_string(),
    })?;
    entry
        .set_password(api_key)
        .map_err(|e| OcrError::CredentialStore {
            reason: e.to_string(),
        })?;
    debug!("API key stored in keyring ({SERVICE_NAME}/{API_KEY_NAME})");
    Ok(())
}

/// Prompt for the API key on the terminal (no echo) and store it.
///
/// Returns `None` if the user entered nothing or the prompt could not be
/// read (e.g. stdin is not a tty).
pub fn prompt_for_api_key() -> Option<String> {
    eprintln!("Mistral API key not found. You'll only need to enter this once.");
    let api_key = rpassword::prompt_password("Enter your Mistral API key: ").ok()?;
    if api_key.trim().is_empty() {
        return None;
    }

    match store_api_key(&api_key) {
        Ok(()) => eprintln!("API key stored securely."),
        Err(e) => warn!("Could not store API key: {e}"),
    }
    Some(api_key)
}

/// Resolve the API key, prompting interactively as a last resort.
pub fn ensure_api_key() -> Option<String> {
    get_api_key().or_else(prompt_for_api_key)
}

fn read_from_keyring() -> Option<String> {
    let entry = Entry::new(SERVICE_NAME, API_KEY_NAME).ok()?;
    match entry.get_password() {
        Ok(key) => Some(key),
        Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            debug!("Keyring lookup failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_empty_picks_earliest_set_candidate() {
        assert_eq!(
            first_non_empty([None, Some("from-keyring".into())]),
            Some("from-keyring".into())
        );
        assert_eq!(
            first_non_empty([Some("from-env".into()), Some("from-keyring".into())]),
            Some("from-env".into())
        );
    }

    #[test]
    fn blank_candidates_are_skipped() {
        assert_eq!(
            first_non_empty([Some(String::new()), Some("  ".into()), Some("key".into())]),
            Some("key".into())
        );
        assert_eq!(first_non_empty([None, Some("".into())]), None);
    }
}
