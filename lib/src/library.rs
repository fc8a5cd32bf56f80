//! Loading a content tree into a [`Library`].
//!
//! A content root holds one directory per category, each holding recipe
//! files:
//!
//! ```text
//! content/
//! ├── 01 - Breakfast/
//! │   ├── pancakes.json
//! │   └── images/pancakes.jpg
//! ├── 02 - Baking/
//! │   └── banana_bread.json
//! └── images/
//! ```
//!
//! Files are read and parsed in parallel. Everything after parsing happens in
//! load order on the calling thread, so slugs, logs and indexes are the same
//! on every run. The finished recipe list is sorted by category slug, then by
//! title.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use derive_more::Debug;
use log::{debug, warn};
use rayon::prelude::*;

use crate::error::{Chainable, Result};
use crate::fields::RawRecipe;
use crate::fstree::{Entry, EntryId, FsTree};
use crate::image::{DirKind, Resolution, SearchDir};
use crate::index::{cmp_recipes, search_index, CategoryIndex, SearchDoc, TagIndex};
use crate::recipe::{Normalized, Origin, Recipe};
use crate::report::{ParseFailure, Report, UnresolvedImage};
use crate::schema;
use crate::slug::SlugRegistry;
use crate::url::UrlBuf;
use crate::util::Memo;

/// The name of image directories, both per category and under the content
/// root. A content-root directory with this name is never a category.
pub const IMAGES_DIR: &str = "images";

/// Deepest entry read below the content root: `<category>/images/<file>`.
const MAX_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep recipes marked `"draft": true`.
    pub include_drafts: bool,
    /// Check every recipe with [`schema::check()`]; the first failure aborts
    /// the load.
    pub validate: bool,
}

/// A site image directory searched after the content directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDir {
    pub path: PathBuf,
    /// Where the directory's files are published.
    pub public: UrlBuf,
}

#[derive(Debug, Clone)]
pub struct Loader {
    content_root: PathBuf,
    image_dirs: Vec<ImageDir>,
    options: LoadOptions,
}

impl Loader {
    pub fn new<P: AsRef<Path>>(content_root: P) -> Self {
        Loader {
            content_root: content_root.as_ref().to_path_buf(),
            image_dirs: vec![],
            options: LoadOptions::default(),
        }
    }

    /// Adds a site image directory. Directories are searched in the order
    /// they are added.
    pub fn image_dir<P, U>(mut self, path: P, public: U) -> Self
        where P: AsRef<Path>, U: Into<UrlBuf>
    {
        let (path, public) = (path.as_ref().to_path_buf(), public.into());
        self.image_dirs.push(ImageDir { path, public });
        self
    }

    pub fn options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn include_drafts(mut self, include: bool) -> Self {
        self.options.include_drafts = include;
        self
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.options.validate = validate;
        self
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn load_options(&self) -> LoadOptions {
        self.options
    }

    /// Loads every recipe under the content root.
    ///
    /// A missing content root or an unreadable recipe is logged and recorded
    /// in the [`Report`]. Only a failed schema check is an error.
    pub fn load(&self) -> Result<Library> {
        let mut library = Library::default();
        if !self.content_root.is_dir() {
            warn!("content root {} does not exist", self.content_root.display());
            library.report.missing_content_root = Some(self.content_root.clone());
            library.report.log_summary();
            return Ok(library);
        }

        let tree = FsTree::build(&self.content_root, MAX_DEPTH)?;
        let shared = self.shared_dirs(&tree);
        let categories: Vec<_> = tree.dirs(tree.root_id())
            .filter(|dir| !dir.is_hidden() && dir.file_name != IMAGES_DIR)
            .map(|dir| Category::new(&tree, dir, &shared))
            .collect();

        let files: Vec<(&Category, &Entry)> = categories.iter()
            .flat_map(|category| tree.files(category.id)
                .filter(|file| !file.is_hidden() && file.has_ext("json"))
                .map(move |file| (category, file)))
            .collect();

        let parsed: Vec<Result<RawRecipe>> = files.par_iter()
            .map(|(_, file)| read_recipe(&file.path))
            .collect();

        let mut slugs = SlugRegistry::new();
        for ((category, file), raw) in files.into_iter().zip(parsed) {
            let origin = Origin { category: &category.label, filename: file.file_stem() };
            let raw = match raw {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("skipping {}: {}", file.path.display(), e.message());
                    library.report.parse_failures.push(ParseFailure {
                        path: file.path.to_path_buf(),
                        reason: e.message(),
                    });

                    continue;
                }
            };

            if raw.is_draft() && !self.options.include_drafts {
                debug!("skipping draft {}", file.path.display());
                let id = format!("{}/{}", origin.category, origin.filename);
                library.report.drafts_skipped.push(id);
                continue;
            }

            debug!("normalizing {}", file.path.display());
            let Normalized { recipe, image } = Recipe::normalize(raw, origin, &mut slugs, &category.dirs);
            if let Some(Resolution::Fallback(fallback)) = &image {
                let reference = recipe.image.clone().unwrap_or_default();
                warn!("image {reference:?} for {} not found; using {fallback}", recipe.id);
                library.report.unresolved_images.push(UnresolvedImage {
                    id: recipe.id.clone(),
                    reference,
                    fallback: fallback.clone(),
                });
            }

            if self.options.validate {
                schema::check(&recipe).chain_with(|| error! {
                    "recipe file is invalid",
                    "path" => file.path.display(),
                })?;
            }

            library.push(recipe);
        }

        // Slugs are claimed in load order; the published order is by category
        // slug, then title.
        library.recipes.sort_by(|a, b| {
            a.slug_category.cmp(&b.slug_category).then_with(|| cmp_recipes(a, b))
        });

        library.report.loaded = library.recipes.len();
        library.report.log_summary();
        Ok(library)
    }

    /// Content-root `images/`, then the configured site image directories.
    fn shared_dirs(&self, tree: &FsTree) -> Vec<SearchDir> {
        let mut dirs = vec![];
        if let Some(images) = tree.subdir(tree.root_id(), IMAGES_DIR) {
            let public = UrlBuf::from_iter(["/content", IMAGES_DIR]);
            dirs.push(SearchDir::scan(tree, images.id, DirKind::Content, public));
        }

        for dir in &self.image_dirs {
            if !dir.path.is_dir() {
                debug!("image directory {} does not exist", dir.path.display());
                continue;
            }

            match FsTree::build(&dir.path, 1) {
                Ok(images) => {
                    let root = images.root_id();
                    dirs.push(SearchDir::scan(&images, root, DirKind::Assets, dir.public.clone()));
                }
                Err(e) => warn!("image directory {} is unreadable: {}", dir.path.display(), e.message()),
            }
        }

        dirs
    }
}

fn read_recipe(path: &Path) -> Result<RawRecipe> {
    let json = fs::read_to_string(path)?;
    RawRecipe::parse(&json)
}

/// A category directory and the image directories its recipes search.
struct Category {
    id: EntryId,
    label: String,
    dirs: Vec<SearchDir>,
}

impl Category {
    fn new(tree: &FsTree, dir: &Entry, shared: &[SearchDir]) -> Self {
        let public = UrlBuf::from_iter(["/content", dir.file_name.as_str()]);
        let mut dirs = vec![SearchDir::scan(tree, dir.id, DirKind::Content, public.clone())];
        if let Some(images) = tree.subdir(dir.id, IMAGES_DIR) {
            let mut public = public;
            public.append(IMAGES_DIR);
            dirs.push(SearchDir::scan(tree, images.id, DirKind::Content, public));
        }

        dirs.extend_from_slice(shared);
        Category { id: dir.id, label: dir.file_name.clone(), dirs }
    }
}

/// Every loaded recipe, by category slug then title, and the indexes over
/// them.
#[derive(Debug, Default)]
pub struct Library {
    #[debug(ignore)]
    pub recipes: Vec<Arc<Recipe>>,
    #[debug(ignore)]
    pub tags: TagIndex,
    #[debug(ignore)]
    pub categories: CategoryIndex,
    pub report: Report,
}

impl Library {
    fn push(&mut self, recipe: Recipe) {
        let recipe = Arc::new(recipe);
        self.tags.insert(&recipe);
        self.categories.insert(&recipe);
        self.recipes.push(recipe);
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// The recipe with id `<category folder>/<file stem>`.
    pub fn get(&self, id: &str) -> Option<&Arc<Recipe>> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags.tag_list()
    }

    pub fn category_labels(&self) -> Vec<String> {
        self.categories.labels()
    }

    pub fn search_index(&self, prefix: &UrlBuf) -> Vec<SearchDoc> {
        search_index(&self.recipes, prefix)
    }
}

/// A [`Loader`] whose result is computed once and shared.
///
/// ```rust
/// use galley::Cookbook;
///
/// let cookbook = Cookbook::new(galley::Loader::new("does/not/exist"));
/// let first = cookbook.library().unwrap();
/// let second = cookbook.library().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert!(first.report.missing_content_root.is_some());
/// ```
#[derive(Debug)]
pub struct Cookbook {
    loader: Loader,
    library: Memo<Library>,
}

impl Cookbook {
    pub fn new(loader: Loader) -> Self {
        Cookbook { loader, library: Memo::new() }
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn library(&self) -> Result<Arc<Library>> {
        self.library.get_or_try_init(|| self.loader.load())
    }

    pub fn recipes(&self) -> Result<Vec<Arc<Recipe>>> {
        Ok(self.library()?.recipes.clone())
    }

    /// Discards the loaded library; the next access loads again.
    pub fn reload(&mut self) {
        self.library.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Library: Send, Sync);
    static_assertions::assert_impl_all!(Cookbook: Send, Sync);

    fn write(root: &Path, path: &str, contents: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn sorts_by_category_then_title() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "02 - Soups/a.JSON", r#"{ "title": "Zuppa" }"#);
        write(root, "02 - Soups/b.json", r#"{ "title": "Borscht" }"#);
        write(root, "02 - Soups/c.json", r#"{ "title": "borscht" }"#);
        write(root, "01 - Breakfast/z.json", r#"{ "title": "Zucchini Fritters" }"#);
        write(root, "01 - Breakfast/notes.txt", "not a recipe");
        write(root, "_drafts/x.json", r#"{ "title": "Hidden" }"#);
        write(root, "images/x.json", r#"{ "title": "Not a category" }"#);

        let library = Loader::new(root).load().unwrap();
        let ids: Vec<_> = library.recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["01 - Breakfast/z", "02 - Soups/b", "02 - Soups/c", "02 - Soups/a"]);
        assert_eq!(library.category_labels(), ["01 - Breakfast", "02 - Soups"]);
        assert!(library.report.is_clean());
        assert_eq!(library.report.loaded, 4);

        let slugs: Vec<_> = library.recipes.iter().map(|r| r.slug_title_unique.as_str()).collect();
        assert_eq!(slugs, ["zucchini-fritters", "borscht", "borscht-c", "zuppa"]);
    }

    #[test]
    fn category_images_win_over_shared_ones() {
        let dir = tempfile::tempdir().unwrap();
        let (content, assets) = (dir.path().join("content"), dir.path().join("images"));
        write(&content, "Pies/apple.json", r#"{ "title": "Apple Pie", "image": "apple.png" }"#);
        write(&content, "Pies/images/Apple.PNG", "");
        write(&content, "Pies/cherry.json", r#"{ "title": "Cherry Pie", "image": "cherry" }"#);
        write(&content, "Pies/plum.json", r#"{ "title": "Plum Pie", "image": "plum.png" }"#);
        write(&assets, "apple.png", "");
        write(&assets, "cherry.webp", "");

        let library = Loader::new(&content).image_dir(&assets, "/images").load().unwrap();
        let urls: Vec<_> = library.recipes.iter()
            .map(|r| r.image_url.as_deref().unwrap())
            .collect();

        assert_eq!(urls, ["/content/Pies/images/Apple.PNG", "/images/cherry.webp", "/content/Pies/plum.png"]);
        assert_eq!(library.report.unresolved_images.len(), 1);
        assert_eq!(library.report.unresolved_images[0].id, "Pies/plum");
    }

    #[test]
    fn memoized_until_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Soups/a.json", r#"{ "title": "A" }"#);

        let mut cookbook = Cookbook::new(Loader::new(dir.path()));
        assert_eq!(cookbook.recipes().unwrap().len(), 1);

        write(dir.path(), "Soups/b.json", r#"{ "title": "B" }"#);
        assert_eq!(cookbook.library().unwrap().len(), 1);

        cookbook.reload();
        assert_eq!(cookbook.library().unwrap().len(), 2);
    }
}
