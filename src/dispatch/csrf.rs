//! Anti-forgery token lookup.
//!
//! The token is taken from the hidden form field captured from the current
//! page first, then from the token cookie in the session jar.

use std::sync::{Arc, RwLock};

use regex::Regex;
use reqwest::cookie::{CookieStore, Jar};
use url::Url;

#[derive(Clone)]
pub struct CsrfSource {
    form_token: Arc<RwLock<Option<String>>>,
    jar: Arc<Jar>,
    cookie_pattern: Regex,
}

impl CsrfSource {
    pub fn new(cookie_name: &str, jar: Arc<Jar>) -> Result<Self, regex::Error> {
        let cookie_pattern = Regex::new(&format!(
            r"(?:^|;\s*){}=([^;]+)",
            regex::escape(cookie_name)
        ))?;
        Ok(Self {
            form_token: Arc::new(RwLock::new(None)),
            jar,
            cookie_pattern,
        })
    }

    /// Record the hidden form field value from a freshly loaded page
    pub fn set_form_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.form_token.write() {
            *slot = token.filter(|t| !t.is_empty());
        }
    }

    pub fn form_token(&self) -> Option<String> {
        self.form_token.read().ok().and_then(|t| t.clone())
    }

    /// Token from the cookie jar for the given URL
    pub fn cookie_token(&self, url: &Url) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let header = header.to_str().ok()?;
        token_from_cookie_header(&self.cookie_pattern, header)
    }

    /// Token to send with a mutating request to `url`, if any is known
    pub fn token(&self, url: &Url) -> Option<String> {
        self.form_token().or_else(|| self.cookie_token(url))
    }
}

fn token_from_cookie_header(pattern: &Regex, header: &str) -> Option<String> {
    let raw = pattern.captures(header)?.get(1)?.as_str();
    match urlencoding::decode(raw) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> (CsrfSource, Arc<Jar>, Url) {
        let jar = Arc::new(Jar::default());
        let url = Url::parse("http://motry.test/api/garage/add/1/").unwrap();
        (CsrfSource::new("csrftoken", Arc::clone(&jar)).unwrap(), jar, url)
    }

    #[test]
    fn test_no_token_anywhere() {
        let (csrf, _jar, url) = source();
        assert_eq!(csrf.token(&url), None);
    }

    #[test]
    fn test_cookie_token_is_decoded() {
        let (csrf, jar, url) = source();
        jar.add_cookie_str("csrftoken=abc%2Bdef; Path=/", &url);
        assert_eq!(csrf.token(&url).as_deref(), Some("abc+def"));
    }

    #[test]
    fn test_form_field_wins_over_cookie() {
        let (csrf, jar, url) = source();
        jar.add_cookie_str("csrftoken=from-cookie; Path=/", &url);
        csrf.set_form_token(Some("from-form".into()));
        assert_eq!(csrf.token(&url).as_deref(), Some("from-form"));
    }

    #[test]
    fn test_empty_form_field_falls_back_to_cookie() {
        let (csrf, jar, url) = source();
        jar.add_cookie_str("csrftoken=from-cookie; Path=/", &url);
        csrf.set_form_token(Some(String::new()));
        assert_eq!(csrf.token(&url).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        let pattern = Regex::new(r"(?:^|;\s*)csrftoken=([^;]+)").unwrap();
        assert_eq!(token_from_cookie_header(&pattern, "xcsrftoken=nope"), None);
        assert_eq!(
            token_from_cookie_header(&pattern, "sessionid=s; csrftoken=yes").as_deref(),
            Some("yes")
        );
    }
}
