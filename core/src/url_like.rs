//! Coercion of URL-like inputs into a canonical `Url`.
//!
//! # Design
//! Three shapes are accepted: raw text, an already parsed `Url`, and loose
//! `UrlComponents`. They all meet at `UrlConvertible`, so request builders can
//! take `impl UrlConvertible` and callers never convert by hand. `UrlLike` is
//! the owned sum of the three, used where the target has to be stored.

use std::fmt;

use url::Url;

use crate::error::NetworkError;

/// Anything that can be resolved to a URL.
pub trait UrlConvertible {
    /// Resolve to a URL, or fail with `NetworkError::InvalidUrl` carrying the
    /// original input.
    fn as_url(&self) -> Result<Url, NetworkError>;
}

impl UrlConvertible for str {
    fn as_url(&self) -> Result<Url, NetworkError> {
        Url::parse(self).map_err(|_| NetworkError::invalid_url(self))
    }
}

impl UrlConvertible for String {
    fn as_url(&self) -> Result<Url, NetworkError> {
        self.as_str().as_url()
    }
}

impl UrlConvertible for Url {
    fn as_url(&self) -> Result<Url, NetworkError> {
        Ok(self.clone())
    }
}

impl<T: UrlConvertible + ?Sized> UrlConvertible for &T {
    fn as_url(&self) -> Result<Url, NetworkError> {
        (**self).as_url()
    }
}

/// URL parts assembled on demand. `scheme` is required, and so is `host` for
/// the special schemes listed in `SPECIAL_SCHEMES`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlComponents {
    pub scheme: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl UrlComponents {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            host: Some(host.into()),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: Option<String>) -> Self {
        self.user = Some(user.into());
        self.password = password;
        self
    }
}

impl fmt::Display for UrlComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if self.host.is_some() || self.user.is_some() {
            f.write_str("//")?;
            if let Some(user) = &self.user {
                f.write_str(user)?;
                if let Some(password) = &self.password {
                    write!(f, ":{password}")?;
                }
                f.write_str("@")?;
            }
            if let Some(host) = &self.host {
                f.write_str(host)?;
            }
            if let Some(port) = self.port {
                write!(f, ":{port}")?;
            }
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_str("/")?;
            }
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// Schemes whose URLs always have a host.
pub const SPECIAL_SCHEMES: [&str; 5] = ["http", "https", "ws", "wss", "ftp"];

impl UrlConvertible for UrlComponents {
    fn as_url(&self) -> Result<Url, NetworkError> {
        let rendered = self.to_string();
        let Some(scheme) = &self.scheme else {
            return Err(NetworkError::invalid_url(rendered));
        };
        let special = SPECIAL_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme));
        if special && self.host.is_none() {
            return Err(NetworkError::invalid_url(rendered));
        }
        Url::parse(&rendered).map_err(|_| NetworkError::invalid_url(rendered))
    }
}

/// Owned URL-like value, for targets that are stored before being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlLike {
    Text(String),
    Url(Url),
    Components(UrlComponents),
}

impl UrlConvertible for UrlLike {
    fn as_url(&self) -> Result<Url, NetworkError> {
        match self {
            UrlLike::Text(text) => text.as_url(),
            UrlLike::Url(url) => url.as_url(),
            UrlLike::Components(components) => components.as_url(),
        }
    }
}

impl fmt::Display for UrlLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlLike::Text(text) => f.write_str(text),
            UrlLike::Url(url) => f.write_str(url.as_str()),
            UrlLike::Components(components) => write!(f, "{components}"),
        }
    }
}

impl From<&str> for UrlLike {
    fn from(text: &str) -> Self {
        UrlLike::Text(text.to_string())
    }
}

impl From<String> for UrlLike {
    fn from(text: String) -> Self {
        UrlLike::Text(text)
    }
}

impl From<Url> for UrlLike {
    fn from(url: Url) -> Self {
        UrlLike::Url(url)
    }
}

impl From<UrlComponents> for UrlLike {
    fn from(components: UrlComponents) -> Self {
        UrlLike::Components(components)
    }
}
