//! Builds the Nightscout entries query from the configured site URL.

use url::Url;

use crate::error::{GlucmonError, Result};

const ENTRIES_PATH: [&str; 3] = ["api", "v1", "entries.json"];

/// Only the newest entry is ever requested.
const ENTRY_COUNT: &str = "1";

/// Builder for the `entries.json` URL.
///
/// Query parameters already present on the site URL are preserved, `count`
/// is forced and `token` is replaced when an auth token is configured.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Url,
    token: Option<String>,
}

impl UrlBuilder {
    pub fn new(site_url: &str) -> Result<Self> {
        let trimmed = site_url.trim();
        if trimmed.is_empty() {
            return Err(GlucmonError::config("Nightscout URL is not set"));
        }

        let base = Url::parse(trimmed)?;
        if base.cannot_be_a_base() {
            return Err(GlucmonError::config(format!(
                "Nightscout URL cannot carry a path: {}",
                trimmed
            )));
        }

        Ok(Self {
            base,
            token: None,
        })
    }

    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        self
    }

    pub fn build(&self) -> Url {
        let mut url = self.base.clone();

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "count" && !(self.token.is_some() && key == "token"))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(ENTRIES_PATH);
        }

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (key, value) in &kept {
                query.append_pair(key, value);
            }
            query.append_pair("count", ENTRY_COUNT);
            if let Some(token) = &self.token {
                query.append_pair("token", token);
            }
        }

        url
    }
}
