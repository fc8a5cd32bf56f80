//! Structural checks on normalized recipes.
//!
//! Validation is opt-in. Unlike every other problem found while loading, a
//! failed check stops the build.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Message, Result};
use crate::fields::kind;
use crate::recipe::Recipe;
use crate::url::is_slug;

static URL_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/recipes/[a-z0-9]+(-[a-z0-9]+)*/[a-z0-9]+(-[a-z0-9]+)*/$")
        .expect("url path pattern is valid")
});

/// One failed check: a JSON pointer into the record and what is wrong there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub pointer: String,
    pub message: String,
}

impl Violation {
    fn new(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Violation { pointer: pointer.into(), message: message.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pointer, self.message)
    }
}

fn blank_items(pointer: &str, items: &[String], violations: &mut Vec<Violation>) {
    for (i, item) in items.iter().enumerate() {
        if item.trim().is_empty() {
            violations.push(Violation::new(format!("{pointer}/{i}"), "must not be blank"));
        }
    }
}

/// Every violation in `recipe`. The source object in `recipe.data` is
/// consulted for the types of fields that normalization coerces away.
pub fn validate(recipe: &Recipe) -> Vec<Violation> {
    let mut violations = vec![];
    let mut require = |ok: bool, pointer: &str, message: &str| {
        if !ok {
            violations.push(Violation::new(pointer, message));
        }
    };

    require(!recipe.title.trim().is_empty(), "/title", "must not be blank");
    require(is_slug(&recipe.slug_category), "/slugCategory", "must match ^[a-z0-9]+(-[a-z0-9]+)*$");
    require(is_slug(&recipe.slug_title), "/slugTitle", "must match ^[a-z0-9]+(-[a-z0-9]+)*$");
    require(is_slug(&recipe.slug_title_unique), "/slugTitleUnique", "must match ^[a-z0-9]+(-[a-z0-9]+)*$");
    require(URL_PATH.is_match(&recipe.url_path), "/urlPath", "must have the form /recipes/<category>/<slug>/");
    require(recipe.id == format!("{}/{}", recipe.category, recipe.filename), "/id", "must be <category>/<filename>");
    require(!recipe.ingredients.is_empty(), "/ingredients", "must list at least one ingredient");
    require(recipe.image_url.as_ref().map_or(true, |url| !url.trim().is_empty()), "/imageUrl", "must not be blank");

    match recipe.data.get("draft") {
        Some(Value::Bool(_)) | None => {}
        Some(other) => require(false, "/draft", &format!("must be a boolean, found {}", kind(other))),
    }

    match recipe.data.get("tags") {
        Some(Value::Array(_) | Value::String(_)) | None => {}
        Some(other) => require(false, "/tags", &format!("must be an array or a string, found {}", kind(other))),
    }

    blank_items("/ingredients", &recipe.ingredients, &mut violations);
    blank_items("/instructions", &recipe.instructions, &mut violations);
    blank_items("/tags", &recipe.tags, &mut violations);
    violations
}

/// Validates `recipe`, turning any violations into a single error that names
/// the file and lists each one.
pub fn check(recipe: &Recipe) -> Result<()> {
    let violations = validate(recipe);
    if violations.is_empty() {
        return Ok(());
    }

    let mut parameters = vec![(Some("file".to_string()), recipe.id.clone())];
    parameters.extend(violations.iter().map(|v| (None, v.to_string())));
    Err(Error::from(Message {
        message: format!("recipe failed schema validation ({} violations)", violations.len()),
        parameters,
    }))
}
