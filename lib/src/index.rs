//! Tag and category indexes over the loaded recipes.
//!
//! Both indexes are updated one recipe at a time as the load proceeds and
//! keep their recipe lists sorted by title, so they never need a final sort.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::recipe::Recipe;
use crate::slug::{tag_id, tag_label};
use crate::url::UrlBuf;
use crate::util::cmp_folded;

/// Title order: case- and accent-insensitive, ties broken by id.
pub fn cmp_recipes(a: &Recipe, b: &Recipe) -> Ordering {
    cmp_folded(&a.title, &b.title).then_with(|| a.id.cmp(&b.id))
}

fn insert_sorted(list: &mut Vec<Arc<Recipe>>, recipe: &Arc<Recipe>) {
    if list.iter().any(|r| r.id == recipe.id) {
        return;
    }

    let i = list.partition_point(|r| cmp_recipes(r, recipe) == Ordering::Less);
    list.insert(i, recipe.clone());
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagEntry {
    /// The casing the tag was first seen with.
    pub label: String,
    /// The tag as an HTML id, for in-page anchors.
    pub id: String,
    pub recipes: Vec<Arc<Recipe>>,
}

/// One tag as a navigation entry: display label, anchor id and use count.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagLink {
    pub label: String,
    pub id: String,
    pub count: usize,
}

/// Recipes by tag. Tags compare case-insensitively.
///
/// Serializes as `{ label: [recipe, ...] }` in lowercase-tag order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagIndex {
    entries: BTreeMap<String, TagEntry>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, recipe: &Arc<Recipe>) {
        for tag in &recipe.tags {
            let entry = self.entries.entry(tag.to_lowercase())
                .or_insert_with(|| TagEntry { label: tag.clone(), id: tag_id(tag), recipes: vec![] });

            insert_sorted(&mut entry.recipes, recipe);
        }
    }

    pub fn get(&self, tag: &str) -> Option<&TagEntry> {
        self.entries.get(&tag.trim().to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every tag label, each once, in lowercase-tag order.
    pub fn tag_list(&self) -> Vec<String> {
        self.iter().map(|entry| entry.label.clone()).collect()
    }

    /// A [`TagLink`] per tag, in lowercase-tag order. Labels lose their quotes.
    pub fn links(&self) -> Vec<TagLink> {
        self.iter()
            .map(|entry| TagLink {
                label: tag_label(&entry.label),
                id: entry.id.clone(),
                count: entry.recipes.len(),
            })
            .collect()
    }
}

impl Serialize for TagIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in self.entries.values() {
            map.serialize_entry(&entry.label, &entry.recipes)?;
        }

        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Category {
    pub slug: String,
    pub label: String,
    pub items: Vec<Arc<Recipe>>,
}

/// Recipes by category slug. Iterates in label order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryIndex {
    categories: BTreeMap<String, Category>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, recipe: &Arc<Recipe>) {
        let category = self.categories.entry(recipe.slug_category.clone())
            .or_insert_with(|| Category {
                slug: recipe.slug_category.clone(),
                label: recipe.category.clone(),
                items: vec![],
            });

        insert_sorted(&mut category.items, recipe);
    }

    pub fn get(&self, slug: &str) -> Option<&Category> {
        self.categories.get(slug)
    }

    /// Categories sorted by label, ignoring case.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        let mut categories: Vec<_> = self.categories.values().collect();
        categories.sort_by(|a, b| cmp_folded(&a.label, &b.label).then_with(|| a.slug.cmp(&b.slug)));
        categories.into_iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.iter().map(|category| category.label.clone()).collect()
    }
}

impl Serialize for CategoryIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in self.iter() {
            map.serialize_entry(&category.slug, category)?;
        }

        map.end()
    }
}

/// One entry of the client-side search index.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SearchDoc {
    pub title: String,
    pub url: UrlBuf,
    pub tags: Vec<String>,
    pub category: String,
}

/// Search documents for `recipes`, in order, with URLs under `prefix`.
pub fn search_index<'a, I>(recipes: I, prefix: &UrlBuf) -> Vec<SearchDoc>
    where I: IntoIterator<Item = &'a Arc<Recipe>>
{
    recipes.into_iter()
        .map(|recipe| {
            let mut url = prefix.clone();
            url.append(&recipe.url_path);
            SearchDoc {
                title: recipe.title.clone(),
                url,
                tags: recipe.tags.clone(),
                category: recipe.category.clone(),
            }
        })
        .collect()
}
