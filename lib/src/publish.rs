use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Chainable, Result};
use crate::library::Library;
use crate::url::UrlBuf;

pub const RECIPES: &str = "recipes";
pub const TAGGED: &str = "tagged";
pub const CATEGORIES: &str = "categories";
pub const TAGS_LIST: &str = "tagslist";
pub const TAG_NAV: &str = "tagnav";
pub const CATEGORY_LIST: &str = "categorylist";
pub const SEARCH_INDEX: &str = "search-index";
pub const REPORT: &str = "report";

/// Every document [`publish_library()`] emits, in order.
pub const DOCUMENTS: &[&str] = &[
    RECIPES, TAGGED, CATEGORIES, TAGS_LIST, TAG_NAV, CATEGORY_LIST, SEARCH_INDEX, REPORT,
];

fn to_value<T: Serialize>(name: &str, document: &T) -> Result<Value> {
    serde_json::to_value(document).chain_with(|| error! {
        "failed to serialize document",
        "document" => name,
    })
}

/// Emits every document for `library`. Search index URLs are placed under
/// `prefix`.
pub fn publish_library<P>(publisher: &mut P, library: &Library, prefix: &UrlBuf) -> Result<()>
    where P: Publisher + ?Sized
{
    let documents = [
        (RECIPES, to_value(RECIPES, &library.recipes)?),
        (TAGGED, to_value(TAGGED, &library.tags)?),
        (CATEGORIES, to_value(CATEGORIES, &library.categories)?),
        (TAGS_LIST, to_value(TAGS_LIST, &library.tag_list())?),
        (TAG_NAV, to_value(TAG_NAV, &library.tags.links())?),
        (CATEGORY_LIST, to_value(CATEGORY_LIST, &library.category_labels())?),
        (SEARCH_INDEX, to_value(SEARCH_INDEX, &library.search_index(prefix))?),
        (REPORT, to_value(REPORT, &library.report)?),
    ];

    for (name, document) in documents {
        publisher.write_document(name, document)?;
    }

    Ok(())
}

/// A destination for the documents the templating layer reads.
pub trait Publisher {
    fn write_document(&mut self, name: &str, document: Value) -> Result<()>;

    #[inline(always)]
    fn publish(&mut self, library: &Library, prefix: &UrlBuf) -> Result<()> {
        publish_library(self, library, prefix)
    }
}

/// Writes each document to `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonDir {
    dir: PathBuf,
}

impl JsonDir {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        JsonDir { dir: dir.as_ref().to_path_buf() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl Publisher for JsonDir {
    fn write_document(&mut self, name: &str, document: Value) -> Result<()> {
        fs::create_dir_all(&self.dir).chain_with(|| error! {
            "failed to create output directory",
            "directory" => self.dir.display(),
        })?;

        let path = self.path(name);
        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');
        fs::write(&path, json).chain_with(|| error! {
            "failed to write document",
            "path" => path.display(),
        })?;

        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

/// Keeps documents in memory.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    pub documents: FxHashMap<String, Value>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.documents.get(name)
    }
}

impl Publisher for Memory {
    fn write_document(&mut self, name: &str, document: Value) -> Result<()> {
        self.documents.insert(name.to_string(), document);
        Ok(())
    }
}
