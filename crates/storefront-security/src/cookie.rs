//! Session cookie construction and parsing
//!
//! Both the issued and the expired cookie carry the same name, path, domain,
//! secure and httponly attributes, so browsers treat the expired one as a
//! replacement for the live one.

use chrono::{DateTime, Duration, Utc};
use storefront_shared::config::SessionSettings;

const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub struct SessionCookie<'a> {
    settings: &'a SessionSettings,
}

impl<'a> SessionCookie<'a> {
    pub fn new(settings: &'a SessionSettings) -> Self {
        Self { settings }
    }

    pub fn name(&self) -> &str {
        &self.settings.cookie_name
    }

    /// `Set-Cookie` value carrying a live session token.
    pub fn issue(&self, token: &str) -> String {
        let mut cookie = format!("{}={}", self.settings.cookie_name, token);

        if self.settings.cookie_lifetime_seconds > 0 {
            let expires = Utc::now() + Duration::seconds(self.settings.cookie_lifetime_seconds);
            cookie.push_str(&format!(
                "; Max-Age={}; Expires={}",
                self.settings.cookie_lifetime_seconds,
                format_cookie_date(expires)
            ));
        }

        self.push_attributes(&mut cookie);
        cookie
    }

    /// `Set-Cookie` value that makes the browser drop the session cookie.
    pub fn expire(&self) -> String {
        let mut cookie = format!(
            "{}=; Max-Age=0; Expires={}",
            self.settings.cookie_name,
            format_cookie_date(DateTime::<Utc>::UNIX_EPOCH)
        );
        self.push_attributes(&mut cookie);
        cookie
    }

    fn push_attributes(&self, cookie: &mut String) {
        cookie.push_str("; Path=");
        cookie.push_str(&self.settings.cookie_path);

        if let Some(domain) = self.settings.cookie_domain.as_deref().filter(|d| !d.is_empty()) {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        if self.settings.cookie_secure {
            cookie.push_str("; Secure");
        }
        if self.settings.cookie_http_only {
            cookie.push_str("; HttpOnly");
        }
        cookie.push_str("; SameSite=");
        cookie.push_str(self.settings.cookie_same_site.as_str());
    }
}

fn format_cookie_date(at: DateTime<Utc>) -> String {
    at.format(COOKIE_DATE_FORMAT).to_string()
}

/// Finds `name` in a `Cookie` request header value.
///
/// The first occurrence wins, matching how browsers order path-specific
/// cookies before broader ones.
pub fn read_cookie<'h>(header: &'h str, name: &str) -> Option<&'h str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}
