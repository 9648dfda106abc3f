//! Static prefix routing.
//!
//! Prefixes match on path-segment boundaries: `/anime` matches `/anime` and
//! `/anime/my`, never `/animes`. When prefixes overlap, the first entry in
//! configuration order wins; longer prefixes get no implicit priority.
//!
//! Paths carrying `.` or `..` segments, raw or percent-encoded, resolve to
//! nothing. URL joining would collapse them and step outside the backend's
//! base path.

use std::collections::HashSet;

use reqwest::Url;

use crate::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    prefix: String,
    backend: Url,
    requires_auth: bool,
}

impl RouteEntry {
    pub fn new(prefix: &str, backend: Url, requires_auth: bool) -> Result<Self, AppError> {
        if !prefix.starts_with('/') {
            return Err(AppError::config(format!(
                "Route prefix '{prefix}' must start with '/'"
            )));
        }
        if !matches!(backend.scheme(), "http" | "https") || !backend.has_host() {
            return Err(AppError::config(format!(
                "Backend for '{prefix}' must be an absolute http(s) URL, got '{backend}'"
            )));
        }
        if backend.query().is_some() || backend.fragment().is_some() {
            return Err(AppError::config(format!(
                "Backend for '{prefix}' must not carry a query or fragment"
            )));
        }

        let trimmed = prefix.trim_end_matches('/');
        let prefix = if trimmed.is_empty() { "/" } else { trimmed };

        Ok(Self {
            prefix: prefix.to_string(),
            backend,
            requires_auth,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn backend(&self) -> &Url {
        &self.backend
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Path with the matched prefix removed; never empty.
    pub fn upstream_path(&self, path: &str) -> String {
        let rest = if self.prefix == "/" {
            path
        } else {
            path.strip_prefix(self.prefix.as_str()).unwrap_or(path)
        };

        if rest.is_empty() {
            "/".to_string()
        } else if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{rest}")
        }
    }

    /// Full backend URL for an inbound path and raw query string.
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> Url {
        let upstream_path = self.upstream_path(path);
        let mut url = self.backend.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}{upstream_path}"));
        url.set_query(query);
        url
    }
}

/// Immutable, ordered route table shared by all requests.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.prefix.as_str()) {
                return Err(AppError::config(format!(
                    "Duplicate route prefix '{}'",
                    entry.prefix
                )));
            }
        }
        Ok(Self { entries })
    }

    /// First entry, in configuration order, whose prefix matches `path`.
    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        if has_dot_segment(path) {
            return None;
        }
        self.entries.iter().find(|entry| entry.matches(path))
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}

/// True when any segment is `.` or `..`, including `%2e` spellings and
/// backslash separators, which `Url` treats like `/` for http(s).
fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}
