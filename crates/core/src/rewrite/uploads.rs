//! Uploads base URL parsing and candidate matching.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};

/// Characters that end a candidate URL.
const URL_TERMINATORS: &str = r#"\s"'"#;

/// The local site's uploads prefix and the pattern that finds it in content.
#[derive(Debug, Clone)]
pub struct UploadsBase {
    scheme: String,
    authority: String,
    uploads_path: String,
    pattern: Regex,
}

/// One matched upload URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Byte offset of the match start in the scanned content.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// Everything after `{uploads_path}/`, query string included.
    pub suffix: &'a str,
}

impl UploadsBase {
    /// Build the uploads base for a site served from `home_url`.
    ///
    /// Returns `None` when `home_url` does not parse or has no host.
    pub fn parse(home_url: &str, uploads_path: &str) -> Option<Self> {
        let parsed = url::Url::parse(home_url).ok()?;
        let host = parsed.host_str()?;
        let authority = match parsed.port().or_else(|| explicit_port(home_url)) {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let uploads_path = uploads_path.trim_matches('/').to_string();

        // Scheme is optional so protocol-relative references match too.
        let pattern = format!(
            r#"(?:(?i:https?):)?//(?i:{authority})/{path}/(?P<suffix>[^{URL_TERMINATORS}]*)"#,
            authority = regex::escape(&authority),
            path = regex::escape(&uploads_path),
        );
        let pattern = Regex::new(&pattern).ok()?;

        Some(Self { scheme: parsed.scheme().to_string(), authority, uploads_path, pattern })
    }

    /// `{scheme}://{host}[:port]/{uploads_path}/`
    pub fn base_url(&self) -> String {
        format!("{}://{}/{}/", self.scheme, self.authority, self.uploads_path)
    }

    pub fn uploads_path(&self) -> &str {
        &self.uploads_path
    }

    /// Every candidate upload URL in `content`, in order.
    pub fn candidates<'a>(&'a self, content: &'a str) -> impl Iterator<Item = Candidate<'a>> + 'a {
        self.pattern.captures_iter(content).filter_map(|caps: Captures<'a>| {
            let whole = caps.get(0)?;
            let suffix = caps.name("suffix")?;
            Some(Candidate { start: whole.start(), end: whole.end(), suffix: suffix.as_str() })
        })
    }
}

/// Port written in `home_url`, even when it is the scheme default.
///
/// `Url::port` hides `:443` on https, but the site still emits it in links.
fn explicit_port(home_url: &str) -> Option<u16> {
    let (_, rest) = home_url.trim().split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit('@').next()?;
    let (_, port) = host_port.rsplit_once(':')?;
    // `[::1]` has colons but no port.
    if port.contains(']') {
        return None;
    }
    port.parse().ok()
}

/// Map a URL suffix onto a path under `root`.
///
/// Query strings and fragments are dropped and percent-escapes decoded.
/// Returns `None` if the suffix tries to climb out of `root`.
pub fn local_path(root: &Path, suffix: &str) -> Option<PathBuf> {
    let path_part = suffix.split(['?', '#']).next().unwrap_or_default();
    let decoded = urlencoding::decode(path_part).unwrap_or(Cow::Borrowed(path_part));

    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            segment => path.push(segment),
        }
    }

    Some(path)
}
