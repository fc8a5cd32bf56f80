//! Image reference resolution.
//!
//! Recipe files name their photo loosely: a bare file name in whatever case
//! the author remembered, sometimes without the extension. [`resolve()`] maps
//! such a reference onto a file that actually exists by searching an ordered
//! list of [`SearchDir`]s, each a snapshot of one directory's file names.
//! Resolution does no I/O.

use serde::Serialize;

use crate::fstree::{EntryId, FsTree};
use crate::url::{encode_uri, UrlBuf};
use crate::util::fold;

/// Extensions recognized when matching an image by its stem.
pub const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "svg"];

/// Where a search directory's files are published.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirKind {
    /// A directory under the content root, published under `/content/`.
    Content,
    /// A site asset directory, published under `/images/`.
    Assets,
}

#[derive(Debug, Clone)]
pub struct SearchDir {
    pub kind: DirKind,
    /// The public URL of the directory itself.
    pub public: UrlBuf,
    /// File names directly inside the directory, sorted.
    pub files: Vec<String>,
}

impl SearchDir {
    pub fn new(kind: DirKind, public: UrlBuf, files: Vec<String>) -> Self {
        SearchDir { kind, public, files }
    }

    /// Snapshots the files directly inside `dir` in `tree`.
    pub fn scan(tree: &FsTree, dir: EntryId, kind: DirKind, public: UrlBuf) -> Self {
        let files = tree.files(dir)
            .filter(|e| !e.file_name.starts_with('.'))
            .map(|e| e.file_name.clone())
            .collect();

        SearchDir::new(kind, public, files)
    }

    /// The exact case-insensitive match for `name`, else the first image
    /// whose stem matches the stem of `name`.
    pub fn find(&self, name: &str) -> Option<&str> {
        let exact = self.files.iter().find(|f| f.eq_ignore_ascii_case(name) || fold(f) == fold(name));
        if let Some(file) = exact {
            return Some(file.as_str());
        }

        let wanted = fold(stem(name));
        self.images().find(|f| fold(stem(f)) == wanted)
    }

    /// The first image whose stem, reduced to lowercase alphanumerics, equals
    /// `candidate` reduced the same way.
    pub fn find_loose(&self, candidate: &str) -> Option<&str> {
        let wanted = loose(candidate);
        if wanted.is_empty() {
            return None;
        }

        self.images().find(|f| loose(stem(f)) == wanted)
    }

    fn images(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.as_str()).filter(|f| is_image(f))
    }

    fn publish(&self, file: &str) -> String {
        let mut url = self.public.clone();
        url.append(file);
        encode_uri(&url)
    }
}

/// The outcome of resolving an image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A full URL, used as-is.
    External(String),
    /// Already a site path, used as-is.
    Rooted(String),
    /// Found on disk; the published site path.
    Found { url: String, kind: DirKind },
    /// Not found; a best guess at where it would be published.
    Fallback(String),
}

impl Resolution {
    pub fn url(&self) -> &str {
        match self {
            Resolution::External(url)
            | Resolution::Rooted(url)
            | Resolution::Found { url, .. }
            | Resolution::Fallback(url) => url,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback(_))
    }
}

/// Resolves `reference` for a recipe in `category`. See the module docs.
///
/// ```rust
/// use galley::image::{resolve, DirKind, Resolution, SearchDir};
///
/// let dirs = [SearchDir::new(DirKind::Assets, "/images".into(), vec!["Pie.JPG".into()])];
///
/// let found = resolve("pie.jpg", "Desserts", &dirs);
/// assert_eq!(found.url(), "/images/Pie.JPG");
///
/// let by_stem = resolve("pie", "Desserts", &dirs);
/// assert_eq!(by_stem.url(), "/images/Pie.JPG");
///
/// let missing = resolve("cake.png", "Desserts", &dirs);
/// assert_eq!(missing, Resolution::Fallback("/content/Desserts/cake.png".into()));
/// ```
pub fn resolve(reference: &str, category: &str, dirs: &[SearchDir]) -> Resolution {
    let reference = reference.trim().replace('\\', "/");
    if is_external(&reference) {
        return Resolution::External(reference);
    }

    if reference.starts_with('/') {
        return Resolution::Rooted(reference);
    }

    let name = reference.rsplit('/').next().unwrap_or(&reference);
    for dir in dirs {
        if let Some(file) = dir.find(name) {
            return Resolution::Found { url: dir.publish(file), kind: dir.kind };
        }
    }

    let mut fallback = UrlBuf::from("/content");
    fallback.append(category).append(&reference);
    Resolution::Fallback(encode_uri(&fallback))
}

/// Finds an image for a recipe that names none, trying each candidate name
/// in order against each directory in order.
pub fn discover<'a, I>(candidates: I, dirs: &[SearchDir]) -> Option<Resolution>
    where I: IntoIterator<Item = &'a str>
{
    candidates.into_iter().find_map(|candidate| dirs.iter().find_map(|dir| {
        dir.find_loose(candidate)
            .map(|file| Resolution::Found { url: dir.publish(file), kind: dir.kind })
    }))
}

pub fn is_external(reference: &str) -> bool {
    UrlBuf::from(reference.trim_start()).is_external()
}

pub fn is_image(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            IMAGE_EXTS.iter().any(|known| known.eq_ignore_ascii_case(ext))
        }
        _ => false,
    }
}

fn stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

fn loose(name: &str) -> String {
    fold(name).chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
