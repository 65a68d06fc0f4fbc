//! GitHub username lookup by commit email.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::placeholders;

pub const SEARCH_URL: &str = "https://api.github.com/search/users";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    login: String,
}

pub fn search_query(email: &str) -> String {
    format!("{email} in:email")
}

fn search(email: &str) -> reqwest::Result<Option<String>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("ts-starter/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .build()?;
    let response: SearchResponse = client
        .get(SEARCH_URL)
        .query(&[("q", search_query(email))])
        .send()?
        .error_for_status()?
        .json()?;
    Ok(response.items.into_iter().next().map(|item| item.login))
}

/// Username of the GitHub account that owns `email`, or the placeholder when
/// the email is unknown, the search finds nothing or the request fails.
pub fn lookup_username(email: &str) -> String {
    if email.is_empty() || email == placeholders::EMAIL {
        return placeholders::USERNAME.to_string();
    }
    match search(email) {
        Ok(Some(login)) => login,
        Ok(None) => {
            debug!(email, "no GitHub user found");
            placeholders::USERNAME.to_string()
        }
        Err(e) => {
            debug!(email, error = %e, "GitHub user search failed");
            placeholders::USERNAME.to_string()
        }
    }
}
