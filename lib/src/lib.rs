//! Loads loosely structured recipe collections for static site generators.
//!
//! # Overview
//!
//! A cookbook's content lives in a directory tree: one directory per
//! category, each holding JSON recipe files written by hand over many years.
//! The files disagree about nearly everything: `title` or `Title` or `name`,
//! a list of steps or one string with numbered lines, an image called
//! `pie.jpg` that is really `Pie.JPG` on disk.
//!
//! galley turns such a tree into a [`Library`]:
//!
//!   * **Recipes**, each normalized into a [`Recipe`] with canonical fields,
//!     a slug that is unique within its category, a site path of the form
//!     `/recipes/<category>/<slug>/`, and a resolved image URL.
//!
//!   * **Indexes** over the recipes: by tag, case-insensitively, and by
//!     category, both sorted by title.
//!
//!   * A **report** of everything that went wrong but did not stop the load:
//!     files that could not be parsed, images that could not be found, drafts
//!     that were skipped.
//!
//! A library is handed to a [`Publisher`], which writes the documents a
//! templating layer consumes.
//!
//! ```rust,no_run
//! use galley::{Loader, JsonDir, Publisher};
//! use galley::url::UrlBuf;
//!
//! let library = Loader::new("site/content")
//!     .image_dir("site/images", "/images")
//!     .load()?;
//!
//! JsonDir::new("site/_data").publish(&library, &UrlBuf::path_prefix(None))?;
//! # Ok::<(), galley::error::Error>(())
//! ```

#[macro_use]
pub mod error;
pub mod util;
pub mod fstree;
pub mod fields;
pub mod remarks;
pub mod slug;
pub mod url;
pub mod image;
pub mod recipe;
pub mod index;
pub mod schema;
pub mod report;
pub mod library;
pub mod publish;

pub use library::*;
pub use recipe::Recipe;
pub use report::Report;
pub use publish::{publish_library, JsonDir, Memory, Publisher};

pub use rayon;
