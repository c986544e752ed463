//! Values used to compose the default header collection.
//!
//! # Design
//! Everything platform-specific (OS name, executable, preferred languages) is
//! decided once when a `ClientConfig` is created and then passed around as
//! data. `ClientConfig::detect()` fills the fields from the running process;
//! embedders that know better (a mobile host knows its bundle id and build
//! number) override them with the `with_*` methods.

use crate::header::{quality_encoded, HeaderName, HttpHeader, HttpHeaders};

/// Placeholder for any user-agent field that could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// Content codings advertised by default, highest preference first.
pub const DEFAULT_ENCODINGS: [&str; 3] = ["br", "gzip", "deflate"];

/// At most this many languages are advertised in `Accept-Language`.
pub const MAX_LANGUAGES: usize = 6;

/// Identity of the application embedding this library, rendered into the
/// `User-Agent` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentInfo {
    pub executable: Option<String>,
    pub app_version: Option<String>,
    pub bundle_id: Option<String>,
    pub build: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub library_version: Option<String>,
}

impl AgentInfo {
    /// Fill what the current process can tell about itself: executable name,
    /// OS name and this library's version. App version, bundle id, build and
    /// OS version stay unset.
    pub fn detect() -> Self {
        let executable = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()));
        Self {
            executable,
            os_name: Some(os_name(std::env::consts::OS).to_string()),
            library_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            ..Self::default()
        }
    }

    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = Some(version.into());
        self
    }

    pub fn with_bundle_id(mut self, bundle_id: impl Into<String>) -> Self {
        self.bundle_id = Some(bundle_id.into());
        self
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    pub fn with_os_name(mut self, os_name: impl Into<String>) -> Self {
        self.os_name = Some(os_name.into());
        self
    }

    pub fn with_os_version(mut self, os_version: impl Into<String>) -> Self {
        self.os_version = Some(os_version.into());
        self
    }

    /// Render the `User-Agent` value, e.g.
    /// `app/1.2 (com.example.app; build:42; iOS 17.0.1) NetKit/0.1.0`.
    pub fn user_agent(&self) -> String {
        fn or_unknown(field: &Option<String>) -> &str {
            field.as_deref().unwrap_or(UNKNOWN)
        }
        let library = match &self.library_version {
            Some(version) => format!("NetKit/{version}"),
            None => UNKNOWN.to_string(),
        };
        format!(
            "{}/{} ({}; build:{}; {} {}) {}",
            or_unknown(&self.executable),
            or_unknown(&self.app_version),
            or_unknown(&self.bundle_id),
            or_unknown(&self.build),
            or_unknown(&self.os_name),
            or_unknown(&self.os_version),
            library,
        )
    }
}

/// Map `std::env::consts::OS` to the display name used in `User-Agent`.
pub fn os_name(target_os: &str) -> &'static str {
    match target_os {
        "ios" => "iOS",
        "watchos" => "watchOS",
        "tvos" => "tvOS",
        "macos" => "macOS",
        "linux" => "Linux",
        "android" => "Android",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        _ => UNKNOWN,
    }
}

/// Configuration behind `HttpHeaders::defaults()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub agent: AgentInfo,
    /// Preferred languages, most preferred first. Only the first
    /// `MAX_LANGUAGES` are advertised.
    pub languages: Vec<String>,
    /// Supported content codings, most preferred first.
    pub encodings: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            agent: AgentInfo::default(),
            languages: Vec::new(),
            encodings: DEFAULT_ENCODINGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClientConfig {
    /// Configuration for the running process: detected agent info and the
    /// languages found in the locale environment variables.
    pub fn detect() -> Self {
        Self {
            agent: AgentInfo::detect(),
            languages: preferred_languages(|key| std::env::var(key).ok()),
            ..Self::default()
        }
    }

    pub fn with_agent(mut self, agent: AgentInfo) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_encodings<I, S>(mut self, encodings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encodings = encodings.into_iter().map(Into::into).collect();
        self
    }

    pub fn accept_encoding(&self) -> HttpHeader {
        HttpHeader::named(HeaderName::AcceptEncoding, quality_encoded(&self.encodings))
    }

    pub fn accept_language(&self) -> HttpHeader {
        let languages = self.languages.iter().take(MAX_LANGUAGES);
        HttpHeader::named(HeaderName::AcceptLanguage, quality_encoded(languages))
    }

    pub fn user_agent(&self) -> HttpHeader {
        HttpHeader::named(HeaderName::UserAgent, self.agent.user_agent())
    }

    /// Accept-Encoding, Accept-Language and User-Agent, in that order.
    pub fn default_headers(&self) -> HttpHeaders {
        HttpHeaders::from([self.accept_encoding(), self.accept_language(), self.user_agent()])
    }
}

/// Read preferred languages from POSIX locale variables.
///
/// `LANGUAGE` holds a colon-separated priority list and wins; otherwise the
/// first of `LC_ALL`, `LC_MESSAGES` and `LANG` that names a real locale is
/// used. Locale names such as `pt_BR.UTF-8` become BCP 47 tags (`pt-BR`).
pub fn preferred_languages(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    if let Some(list) = lookup("LANGUAGE") {
        let languages: Vec<String> = list.split(':').filter_map(locale_to_tag).collect();
        if !languages.is_empty() {
            return languages;
        }
    }
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find_map(|value| locale_to_tag(&value))
        .into_iter()
        .collect()
}

fn locale_to_tag(locale: &str) -> Option<String> {
    let name = locale.split(['.', '@']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "C" || name == "POSIX" {
        return None;
    }
    Some(name.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn user_agent_with_all_fields() {
        let agent = AgentInfo {
            executable: Some("Demo".into()),
            library_version: Some("0.1.0".into()),
            ..AgentInfo::default()
        }
        .with_app_version("1.2")
        .with_bundle_id("com.example.demo")
        .with_build("42")
        .with_os_name("iOS")
        .with_os_version("17.0.1");
        assert_eq!(
            agent.user_agent(),
            "Demo/1.2 (com.example.demo; build:42; iOS 17.0.1) NetKit/0.1.0"
        );
    }

    #[test]
    fn user_agent_missing_fields_are_unknown() {
        assert_eq!(
            AgentInfo::default().user_agent(),
            "Unknown/Unknown (Unknown; build:Unknown; Unknown Unknown) Unknown"
        );
    }

    #[test]
    fn detect_fills_os_and_library_version() {
        let agent = AgentInfo::detect();
        assert_eq!(agent.os_name.as_deref(), Some(os_name(std::env::consts::OS)));
        assert_eq!(agent.library_version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
        assert!(agent.bundle_id.is_none());
    }

    #[test]
    fn os_names() {
        assert_eq!(os_name("macos"), "macOS");
        assert_eq!(os_name("linux"), "Linux");
        assert_eq!(os_name("plan9"), "Unknown");
    }

    #[test]
    fn language_list_wins() {
        let langs = preferred_languages(env(&[("LANGUAGE", "fr_CA:fr:en"), ("LANG", "de_DE.UTF-8")]));
        assert_eq!(langs, vec!["fr-CA", "fr", "en"]);
    }

    #[test]
    fn lang_fallback_strips_codeset() {
        let langs = preferred_languages(env(&[("LANG", "pt_BR.UTF-8")]));
        assert_eq!(langs, vec!["pt-BR"]);
    }

    #[test]
    fn posix_locale_is_ignored() {
        let langs = preferred_languages(env(&[("LC_ALL", "C"), ("LANG", "en_US.UTF-8")]));
        assert_eq!(langs, vec!["en-US"]);
        assert!(preferred_languages(env(&[("LANG", "POSIX")])).is_empty());
    }

    #[test]
    fn accept_language_is_capped_at_six() {
        let config = ClientConfig::default().with_languages(["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(
            config.accept_language().value,
            "a;q=1.0, b;q=0.9, c;q=0.8, d;q=0.7, e;q=0.6, f;q=0.5"
        );
    }

    #[test]
    fn default_headers_order() {
        let headers = ClientConfig::default().with_languages(["en"]).default_headers();
        let names: Vec<&str> = headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Accept-Encoding", "Accept-Language", "User-Agent"]);
        assert_eq!(
            headers.value("accept-encoding"),
            Some("br;q=1.0, gzip;q=0.9, deflate;q=0.8")
        );
        assert_eq!(headers.value("Accept-Language"), Some("en;q=1.0"));
    }
}
