//! Session and locale collaborators
//!
//! The connector asks these for the bearer token of authorized endpoints
//! and for the language to use when a call does not name one.

use std::sync::{Arc, RwLock};

/// Source of the current session token
pub trait SessionProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Session with no token (anonymous)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionProvider for NoSession {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Session holding a token set by the application (login / logout)
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Arc<RwLock<Option<String>>>,
}

impl StaticSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(Some(token.into()));
        session
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }
}

impl SessionProvider for StaticSession {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }
}

/// Source of the active runtime locale
pub trait LocaleProvider: Send + Sync {
    fn current_locale(&self) -> Option<String>;
}

/// Fixed locale (or none)
#[derive(Debug, Clone, Default)]
pub struct FixedLocale(pub Option<String>);

impl FixedLocale {
    pub fn new(lang: impl Into<String>) -> Self {
        Self(Some(lang.into()))
    }
}

impl LocaleProvider for FixedLocale {
    fn current_locale(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Locale of the process, read from `LANG` (`en_US.UTF-8` → `en-US`)
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLocale;

impl LocaleProvider for EnvLocale {
    fn current_locale(&self) -> Option<String> {
        std::env::var("LANG").ok().and_then(|v| normalize_locale(&v))
    }
}

/// Turn a POSIX locale into a language tag; `C`/`POSIX` have none
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or_default();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}
