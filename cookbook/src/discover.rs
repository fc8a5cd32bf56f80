use std::path::{Path, PathBuf};

use galley::fstree::FsTree;
use galley::error::Result;
use galley::{LoadOptions, Loader};

use crate::{CONTENT_DIRS, DATA_DIR, IMAGE_DIRS};
use crate::config::Config;
use crate::util::dircheck;

/// Where a site's content, images and published data live.
#[derive(Debug, PartialEq)]
pub struct Layout {
    pub content_root: PathBuf,
    pub image_dirs: Vec<PathBuf>,
    pub output: PathBuf,
}

impl Layout {
    pub fn discover(tree: &FsTree, config: &Config) -> Result<Self> {
        let site = &tree.root().path;
        let content_root = match &config.settings.content {
            Some(path) => dircheck(tree, None, path, true)?.map(|id| tree[id].path.to_path_buf()),
            None => first_dir(tree, CONTENT_DIRS),
        };

        // A missing content root is reported by the loader.
        let content_root = content_root.unwrap_or_else(|| site.join(CONTENT_DIRS[0]));

        let image_dirs = IMAGE_DIRS.iter()
            .filter_map(|dir| tree.get(None, dir).filter(|e| e.file_type.is_dir()))
            .map(|entry| entry.path.to_path_buf())
            .collect();

        let output = match &config.settings.output {
            Some(output) => site.join(output),
            None => default_output(site, &content_root),
        };

        Ok(Layout { content_root, image_dirs, output })
    }

    pub fn loader(&self, options: LoadOptions) -> Loader {
        self.image_dirs.iter()
            .fold(Loader::new(&self.content_root), |loader, dir| loader.image_dir(dir, "/images"))
            .options(options)
    }
}

fn first_dir(tree: &FsTree, candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter()
        .find_map(|dir| dircheck(tree, None, dir, false).ok().flatten())
        .map(|id| tree[id].path.to_path_buf())
}

/// `_data` next to the content root when it sits in `src/`, else in the site.
fn default_output(site: &Path, content_root: &Path) -> PathBuf {
    match content_root.parent() {
        Some(parent) if parent != site && parent.starts_with(site) => parent.join(DATA_DIR),
        _ => site.join(DATA_DIR),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::config::Settings;
    use super::*;

    fn discover(site: &Path, settings: Settings) -> Result<Layout> {
        let tree = FsTree::build(site, 2).unwrap();
        Layout::discover(&tree, &Config::new(settings, None))
    }

    #[test]
    fn prefers_src_layout() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().canonicalize().unwrap();
        for path in ["src/content/Soups", "content", "src/images", "images"] {
            fs::create_dir_all(site.join(path)).unwrap();
        }

        let layout = discover(&site, Settings::default()).unwrap();
        assert_eq!(layout.content_root, site.join("src/content"));
        assert_eq!(layout.image_dirs, [site.join("src/images"), site.join("images")]);
        assert_eq!(layout.output, site.join("src/_data"));
    }

    #[test]
    fn flat_layout_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().canonicalize().unwrap();
        fs::create_dir_all(site.join("recipes")).unwrap();

        let layout = discover(&site, Settings::default()).unwrap();
        assert_eq!(layout.content_root, site.join("content"));
        assert!(layout.image_dirs.is_empty());
        assert_eq!(layout.output, site.join("_data"));

        let settings = Settings {
            content: Some("recipes".into()),
            output: Some("public/data".into()),
            ..Settings::default()
        };

        let layout = discover(&site, settings).unwrap();
        assert_eq!(layout.content_root, site.join("recipes"));
        assert_eq!(layout.output, site.join("public/data"));

        let missing = Settings { content: Some("nope".into()), ..Settings::default() };
        assert!(discover(&site, missing).is_err());
    }
}
