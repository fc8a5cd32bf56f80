use std::path::Path;

use galley::err;
use galley::error::Result;
use galley::fstree::{EntryId, FsTree};

#[track_caller]
pub fn dircheck<P: AsRef<Path>>(
    tree: &FsTree,
    root: Option<EntryId>,
    path: P,
    must_exist: bool,
) -> Result<Option<EntryId>> {
    let path = path.as_ref();
    match (tree.get(root, path), must_exist) {
        (Some(e), _) if e.file_type.is_dir() => Ok(Some(e.id)),
        (Some(_) | None, false) => Ok(None),
        (Some(e), true) => err! {
            format!("{} must be a directory", path.display()),
            "path is not a directory" => e.path.display(),
        },
        (None, true) => err! {
            format!("{} must point to an existing directory", path.display()),
            "path does not exist" => tree.root().path.join(path).display(),
        },
    }
}
