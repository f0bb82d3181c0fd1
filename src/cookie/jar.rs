use chrono::{DateTime, TimeDelta, Utc};

use super::escape::escape;

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// One named value in the jar. `expires == None` is a session cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieEntry {
    pub name: String,
    /// Stored form, i.e. already escaped.
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
}

impl CookieEntry {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires, Some(expires) if expires <= now)
    }

    /// The `name=value;expires=...` assignment that writes this entry.
    pub fn to_assignment(&self) -> String {
        match self.expires {
            Some(expires) => format!(
                "{}={};expires={}",
                self.name,
                self.value,
                expires.format(EXPIRES_FORMAT)
            ),
            None => format!("{}={}", self.name, self.value),
        }
    }
}

/// An in-memory cookie jar with browser-like lookup semantics.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    entries: Vec<CookieEntry>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` request header (`a=b; c=d`). Values are taken as
    /// already escaped; parts without `=` are ignored.
    pub fn from_header(header: &str) -> Self {
        let entries = header
            .split(';')
            .filter_map(|part| part.split_once('='))
            .map(|(name, value)| CookieEntry {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
                expires: None,
            })
            .filter(|entry| !entry.name.is_empty())
            .collect();
        Self { entries }
    }

    /// The stored string of the cookie called `name`, or `None`.
    pub fn get_cookie(&self, name: &str) -> Option<String> {
        self.get_cookie_at(name, Utc::now())
    }

    /// Like [`CookieJar::get_cookie`] but `""` when the cookie is absent.
    pub fn read_cookie(&self, name: &str) -> String {
        self.get_cookie(name).unwrap_or_default()
    }

    fn get_cookie_at(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.name == name && !entry.is_expired_at(now))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` (escaped) under `name`, replacing any previous cookie of
    /// that name. `expiry_days == None` makes a session cookie; a day count
    /// that lands in the past deletes the cookie. Returns the assignment
    /// string that was applied.
    pub fn set_cookie(&mut self, name: &str, value: &str, expiry_days: Option<i64>) -> String {
        self.set_cookie_at(name, value, expiry_days, Utc::now())
    }

    fn set_cookie_at(
        &mut self,
        name: &str,
        value: &str,
        expiry_days: Option<i64>,
        now: DateTime<Utc>,
    ) -> String {
        let entry = CookieEntry {
            name: name.to_string(),
            value: escape(value),
            expires: expiry_days.map(|days| expiry_after(now, days)),
        };
        let assignment = entry.to_assignment();

        self.entries.retain(|existing| existing.name != name);
        if !entry.is_expired_at(now) {
            self.entries.push(entry);
        }
        assignment
    }

    /// Render the live entries as a `Cookie` header, oldest first.
    pub fn to_header(&self) -> String {
        let now = Utc::now();
        self.entries
            .iter()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| format!("{}={}", entry.name, entry.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn expiry_after(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    TimeDelta::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if days > 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
}
