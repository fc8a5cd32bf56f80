use std::sync::Arc;
use std::path::Path;
use std::{fmt, fs};

use rustc_hash::FxHashMap;

use crate::error::Result;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) usize);

/// A sorted, depth-bounded snapshot of a directory tree.
///
/// Entries are stored in walk order: every directory precedes its contents
/// and siblings are sorted by file name. The root is always `EntryId(0)`.
#[derive(Debug)]
pub struct FsTree {
    entries: Vec<Entry>,
    map: FxHashMap<Arc<Path>, EntryId>,
}

#[derive(Debug)]
pub struct Entry {
    pub id: EntryId,
    pub path: Arc<Path>,
    pub file_name: String,
    pub file_type: fs::FileType,
    pub parent: Option<EntryId>,
    pub children: Vec<EntryId>,
    pub depth: usize,
}

impl FsTree {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            entries: vec![],
        }
    }

    /// Walks `root` down to `max_depth` levels below it. Symlinks are
    /// followed; unreadable entries are skipped.
    pub fn build<P: AsRef<Path>>(root: P, max_depth: usize) -> Result<Self> {
        let root = root.as_ref();
        let walker = jwalk::WalkDir::new(root)
            .sort(true)
            .skip_hidden(false)
            .follow_links(true)
            .max_depth(max_depth);

        let mut tree = FsTree::new();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            tree.insert(entry);
        }

        if tree.len() == 0 {
            return err! {
                "directory could not be read",
                "directory" => root.display(),
            }
        }

        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn root(&self) -> &Entry {
        &self[self.root_id()]
    }

    pub fn root_id(&self) -> EntryId {
        EntryId(0)
    }

    #[inline]
    pub fn get<R, P>(&self, root: R, path: P) -> Option<&Entry>
        where R: Into<Option<EntryId>>, P: AsRef<Path>
    {
        self.get_id(root.into(), path.as_ref()).map(|id| &self[id])
    }

    pub fn get_id<R, P>(&self, root: R, path: P) -> Option<EntryId>
        where R: Into<Option<EntryId>>, P: AsRef<Path>
    {
        let root = root.into().unwrap_or(self.root_id());
        let full_path = self[root].path.join(path.as_ref());
        self.map.get(&*full_path).cloned()
    }

    /// The directory named `name` directly inside `parent`, if any.
    pub fn subdir(&self, parent: EntryId, name: &str) -> Option<&Entry> {
        self.get(parent, name).filter(|e| e.file_type.is_dir())
    }

    /// Direct children of `id`, in file name order.
    pub fn children(&self, id: EntryId) -> impl Iterator<Item = &Entry> + '_ {
        self[id].children.iter().map(move |&child| &self[child])
    }

    pub fn files(&self, id: EntryId) -> impl Iterator<Item = &Entry> + '_ {
        self.children(id).filter(|e| e.file_type.is_file())
    }

    pub fn dirs(&self, id: EntryId) -> impl Iterator<Item = &Entry> + '_ {
        self.children(id).filter(|e| e.file_type.is_dir())
    }

    fn insert(&mut self, entry: jwalk::DirEntry<((), ())>) {
        let entry = Entry {
            id: EntryId(self.entries.len()),
            path: Arc::from(entry.path().into_boxed_path()),
            file_type: entry.file_type,
            file_name: entry.file_name.to_string_lossy().into_owned(),
            parent: self.map.get(&entry.parent_path).cloned(),
            children: vec![],
            depth: entry.depth,
        };

        self.map.insert(entry.path.clone(), entry.id);
        if let Some(parent) = entry.parent {
            self.entries[parent.0].children.push(entry.id);
        }

        self.entries.push(entry);
    }
}

impl Entry {
    /// File name without the extension.
    pub fn file_stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((left, _)) if !left.is_empty() => left,
            _ => &self.file_name,
        }
    }

    /// The last extension, if any.
    pub fn file_ext(&self) -> Option<&str> {
        match self.file_name.rsplit_once('.') {
            Some((left, right)) if !left.is_empty() => Some(right),
            _ => None,
        }
    }

    pub fn has_ext(&self, ext: &str) -> bool {
        self.file_ext().map_or(false, |e| e.eq_ignore_ascii_case(ext))
    }

    /// Dot- and underscore-prefixed entries are never content.
    pub fn is_hidden(&self) -> bool {
        self.file_name.starts_with('.') || self.file_name.starts_with('_')
    }
}

impl std::ops::Index<EntryId> for FsTree {
    type Output = Entry;

    fn index(&self, index: EntryId) -> &Self::Output {
        &self.entries[index.0]
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
