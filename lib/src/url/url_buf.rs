use std::fmt;
use std::ops::Deref;
use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::url::is_scheme;

/// The path prefix used when none is configured.
pub const DEFAULT_PATH_PREFIX: &str = "/cookbook/";

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct UrlBuf(String);

impl UrlBuf {
    pub fn new() -> UrlBuf {
        UrlBuf(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The site path of a recipe page: `/recipes/<category>/<title>/`.
    ///
    /// ```rust
    /// use galley::url::UrlBuf;
    ///
    /// let url = UrlBuf::recipe_path("01-breakfast", "pancakes");
    /// assert_eq!(url.as_str(), "/recipes/01-breakfast/pancakes/");
    /// ```
    pub fn recipe_path(slug_category: &str, slug_title: &str) -> UrlBuf {
        let mut url = UrlBuf::from("/recipes/");
        url.append(slug_category).append(slug_title).append("/");
        url
    }

    /// Normalizes a deployment path prefix to `/<prefix>/`. `None` selects
    /// [`DEFAULT_PATH_PREFIX`]; a blank prefix is the site root.
    ///
    /// ```rust
    /// use galley::url::UrlBuf;
    ///
    /// assert_eq!(UrlBuf::path_prefix(None).as_str(), "/cookbook/");
    /// assert_eq!(UrlBuf::path_prefix(Some("recipes")).as_str(), "/recipes/");
    /// assert_eq!(UrlBuf::path_prefix(Some("/a/b/")).as_str(), "/a/b/");
    /// assert_eq!(UrlBuf::path_prefix(Some(" / ")).as_str(), "/");
    /// ```
    pub fn path_prefix(prefix: Option<&str>) -> UrlBuf {
        let Some(prefix) = prefix else {
            return UrlBuf::from(DEFAULT_PATH_PREFIX);
        };

        match prefix.trim().trim_matches('/') {
            "" => UrlBuf::from("/"),
            trimmed => UrlBuf(format!("/{trimmed}/")),
        }
    }

    /// The scheme of `self`, if it begins with one: a letter followed by
    /// letters, digits, `+`, `-` or `.`, ending at the first `:`.
    ///
    /// ```rust
    /// use galley::url::UrlBuf;
    ///
    /// let url = UrlBuf::from("http://rocket.rs");
    /// assert_eq!(url.scheme(), Some("http"));
    ///
    /// let url = UrlBuf::from("mailto:foo@bar.com");
    /// assert_eq!(url.scheme(), Some("mailto"));
    ///
    /// let url = UrlBuf::from("foo#bar:baz");
    /// assert_eq!(url.scheme(), None);
    ///
    /// let url = UrlBuf::from("/images/a:b.png");
    /// assert_eq!(url.scheme(), None);
    ///
    /// let url = UrlBuf::from("Mains: Beef/stew.jpg");
    /// assert_eq!(url.scheme(), Some("Mains"));
    ///
    /// let url = UrlBuf::from("01 - Mains: Beef/stew.jpg");
    /// assert_eq!(url.scheme(), None);
    /// ```
    pub fn scheme(&self) -> Option<&str> {
        let bytes = self.0.as_bytes();
        match memchr::memchr3(b':', b'?', b'/', bytes) {
            Some(i) if bytes[i] == b':' && is_scheme(&bytes[..i]) => Some(&self.0[..i]),
            _ => None,
        }
    }

    /// Whether `self` points at another host or carries its own data: an
    /// `http:`, `https:` or `data:` URL, or a protocol-relative `//host/...`.
    ///
    /// ```rust
    /// use galley::url::UrlBuf;
    ///
    /// assert!(UrlBuf::from("HTTPS://example.com/pie.jpg").is_external());
    /// assert!(UrlBuf::from("//cdn.example.com/pie.jpg").is_external());
    /// assert!(UrlBuf::from("data:image/png;base64,AAAA").is_external());
    /// assert!(!UrlBuf::from("a:b.png").is_external());
    /// assert!(!UrlBuf::from("/images/pie.jpg").is_external());
    /// ```
    pub fn is_external(&self) -> bool {
        if self.0.starts_with("//") {
            return true;
        }

        self.scheme().map_or(false, |scheme| {
            ["http", "https", "data"].iter().any(|s| s.eq_ignore_ascii_case(scheme))
        })
    }

    /// Appends `segment` as path text, adding or dropping a `/` between
    /// them as needed. The segment is never interpreted as a URL.
    ///
    /// ```rust
    /// use galley::url::UrlBuf;
    ///
    /// let mut url = UrlBuf::from("/recipes");
    /// url.append("soups");
    /// assert_eq!(url.as_str(), "/recipes/soups");
    ///
    /// url.append("/");
    /// assert_eq!(url.as_str(), "/recipes/soups/");
    ///
    /// url.append("/stew/");
    /// assert_eq!(url.as_str(), "/recipes/soups/stew/");
    ///
    /// let mut url = UrlBuf::from("/content");
    /// url.append("Mains: Beef").append("a:b.png");
    /// assert_eq!(url.as_str(), "/content/Mains: Beef/a:b.png");
    /// ```
    pub fn append<T: AsRef<str>>(&mut self, segment: T) -> &mut Self {
        let segment = segment.as_ref();
        match (self.0.ends_with('/'), segment.starts_with('/')) {
            (true, true) => self.0.push_str(&segment[1..]),
            (_, _) if self.0.is_empty() => self.0.push_str(segment),
            (true, false) | (false, true) => self.0.push_str(segment),
            (false, false) => {
                self.0.push('/');
                self.0.push_str(segment);
            }
        }

        self
    }

    pub fn extend<T: AsRef<str>, I: IntoIterator<Item = T>>(&mut self, iter: I) -> &mut Self {
        for url in iter.into_iter() {
            self.append(url);
        }

        self
    }
}

impl From<String> for UrlBuf {
    fn from(value: String) -> Self {
        UrlBuf(value)
    }
}

impl From<&str> for UrlBuf {
    fn from(value: &str) -> Self {
        UrlBuf(value.to_string())
    }
}

impl Deref for UrlBuf {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for UrlBuf {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for UrlBuf {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UrlBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<U: AsRef<str>> FromIterator<U> for UrlBuf {
    fn from_iter<T: IntoIterator<Item = U>>(iter: T) -> Self {
        let mut url = UrlBuf::new();
        url.extend(iter);
        url
    }
}

impl From<UrlBuf> for String {
    fn from(value: UrlBuf) -> Self {
        value.0
    }
}
