//! HTTP header entries and the ordered, case-insensitive header collection.
//!
//! # Design
//! `HttpHeaders` is a plain `Vec<HttpHeader>` searched linearly by lowercased
//! name. Request header sets are small, and an association list keeps the
//! two properties a hash map would lose: insertion order, and updates that
//! replace an entry where it already sits instead of moving it to the end.
//!
//! The stored name keeps the caller's casing so requests go out with the
//! spelling the caller chose; only lookups fold case.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;

/// Well-known header names. Anything else goes through `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeaderName {
    AcceptCharset,
    AcceptLanguage,
    AcceptEncoding,
    ContentDisposition,
    ContentType,
    UserAgent,
    Authorization,
    Custom(String),
}

impl HeaderName {
    pub fn as_str(&self) -> &str {
        match self {
            HeaderName::AcceptCharset => "Accept-Charset",
            HeaderName::AcceptLanguage => "Accept-Language",
            HeaderName::AcceptEncoding => "Accept-Encoding",
            HeaderName::ContentDisposition => "Content-Disposition",
            HeaderName::ContentType => "Content-Type",
            HeaderName::UserAgent => "User-Agent",
            HeaderName::Authorization => "Authorization",
            HeaderName::Custom(name) => name,
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single header. Equality is exact on both strings; only `HttpHeaders`
/// compares names case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn named(name: HeaderName, value: impl Into<String>) -> Self {
        Self::new(name.as_str(), value)
    }

    /// `Authorization: Bearer <token>`.
    pub fn bearer(token: &str) -> Self {
        Self::named(HeaderName::Authorization, format!("Bearer {token}"))
    }

    /// `Authorization: Basic <base64(username:password)>`.
    pub fn basic(username: &str, password: &str) -> Self {
        let credential = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        Self::named(HeaderName::Authorization, format!("Basic {credential}"))
    }

    fn matches(&self, lowercased: &str) -> bool {
        self.name.to_lowercase() == lowercased
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for HttpHeader {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

impl fmt::Display for HttpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Ordered header collection holding at most one entry per case-insensitive
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HttpHeader>", into = "Vec<HttpHeader>")]
pub struct HttpHeaders {
    headers: Vec<HttpHeader>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept-Encoding, Accept-Language and User-Agent for the running
    /// process. Nothing attaches these automatically; pass them in (or merge
    /// them) when a request should carry them.
    pub fn defaults() -> Self {
        ClientConfig::detect().default_headers()
    }

    /// Insert a header, replacing any entry with the same case-insensitive
    /// name at its current position.
    pub fn add(&mut self, header: impl Into<HttpHeader>) {
        self.update(header);
    }

    /// Same as `add`.
    pub fn update(&mut self, header: impl Into<HttpHeader>) {
        let header = header.into();
        match self.position(&header.name) {
            Some(index) => self.headers[index] = header,
            None => self.headers.push(header),
        }
    }

    pub fn remove(&mut self, name: &str) {
        if let Some(index) = self.position(name) {
            self.headers.remove(index);
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.headers[index].value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Subscript-style assignment: `Some` updates, `None` removes.
    pub fn set(&mut self, name: &str, value: Option<impl Into<String>>) {
        match value {
            Some(value) => self.update(HttpHeader::new(name, value)),
            None => self.remove(name),
        }
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&HttpHeader, &HttpHeader) -> Ordering,
    {
        self.headers.sort_by(compare);
    }

    /// A sorted copy; `self` is left as it was.
    pub fn sorted_by<F>(&self, compare: F) -> Self
    where
        F: FnMut(&HttpHeader, &HttpHeader) -> Ordering,
    {
        let mut headers = self.headers.clone();
        headers.sort_by(compare);
        Self::from(headers)
    }

    /// Name to value map. Should two entries ever share a name, the later
    /// one wins.
    pub fn dictionary(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect()
    }

    pub fn get(&self, position: usize) -> Option<&HttpHeader> {
        self.headers.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HttpHeader> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let lowercased = name.to_lowercase();
        self.headers.iter().position(|h| h.matches(&lowercased))
    }
}

impl From<Vec<HttpHeader>> for HttpHeaders {
    fn from(headers: Vec<HttpHeader>) -> Self {
        headers.into_iter().collect()
    }
}

impl<H: Into<HttpHeader>, const N: usize> From<[H; N]> for HttpHeaders {
    fn from(headers: [H; N]) -> Self {
        headers.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for HttpHeaders {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<HttpHeaders> for Vec<HttpHeader> {
    fn from(headers: HttpHeaders) -> Self {
        headers.headers
    }
}

impl<H: Into<HttpHeader>> FromIterator<H> for HttpHeaders {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.add(header);
        }
        headers
    }
}

impl<H: Into<HttpHeader>> Extend<H> for HttpHeaders {
    fn extend<I: IntoIterator<Item = H>>(&mut self, iter: I) {
        for header in iter {
            self.add(header);
        }
    }
}

impl IntoIterator for HttpHeaders {
    type Item = HttpHeader;
    type IntoIter = std::vec::IntoIter<HttpHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.into_iter()
    }
}

impl<'a> IntoIterator for &'a HttpHeaders {
    type Item = &'a HttpHeader;
    type IntoIter = std::slice::Iter<'a, HttpHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}

impl Index<usize> for HttpHeaders {
    type Output = HttpHeader;

    fn index(&self, position: usize) -> &HttpHeader {
        &self.headers[position]
    }
}

impl fmt::Display for HttpHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, header) in self.headers.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{header}")?;
        }
        Ok(())
    }
}

/// Render `values` as a quality-weighted list: `a;q=1.0, b;q=0.9, ...`.
///
/// The i-th value gets weight `1.0 - 0.1 * i`. The weight is not clamped, so
/// past ten entries it reaches zero and then goes negative; servers in the
/// field expect this exact shape.
pub fn quality_encoded<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let quality = 1.0 - (index as f64 * 0.1);
            format!("{};q={quality:?}", value.as_ref())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
