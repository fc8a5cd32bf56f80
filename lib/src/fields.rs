//! Field aliasing for loosely structured recipe files.
//!
//! Recipe files in the wild spell the same field many ways: `title`, `Title`,
//! `name`, or a nested `meta.title`. Each canonical field is declared once
//! with [`define_fields!`](crate::define_fields!) alongside its aliases in
//! priority order; [`RawRecipe::pick()`] returns the value of the first
//! alias that is present.
//!
//! ```rust
//! use galley::fields::{RawRecipe, Title, Ingredients};
//!
//! let raw = RawRecipe::parse(r#"{
//!     "Title": "  ",
//!     "meta": { "title": "Pancakes" },
//!     "Ingredients": "flour\nmilk\n\neggs"
//! }"#).unwrap();
//!
//! assert_eq!(raw.text(Title).as_deref(), Some("Pancakes"));
//! assert_eq!(raw.list(Ingredients), ["flour", "milk", "eggs"]);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::Result;

pub trait Field: 'static {
    /// The canonical name.
    const NAME: &'static str;

    /// Keys to try, in order. A `.` descends into nested objects.
    const ALIASES: &'static [&'static str];
}

#[macro_export]
macro_rules! define_fields {
    ($($v:vis $T:ident : $name:literal => [$($alias:literal),+ $(,)?]),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            $v struct $T;

            impl $crate::fields::Field for $T {
                const NAME: &'static str = $name;
                const ALIASES: &'static [&'static str] = &[$($alias),+];
            }
        )+
    }
}

define_fields! {
    pub Title: "title" => [
        "title", "Title", "name", "Name", "recipeTitle", "meta.title", "meta.Title",
    ],
    pub Ingredients: "ingredients" => [
        "ingredients", "Ingredients", "ingredient", "Ingredient",
    ],
    pub Instructions: "instructions" => [
        "directions", "Directions", "instructions", "Instructions", "steps", "Steps",
    ],
    pub Tags: "tags" => ["tags", "Tags", "tag", "Tag"],
    pub Yield: "yield" => [
        "yield", "Yield", "servings", "Servings", "makes", "Makes", "qty", "Qty", "quantity",
    ],
    pub Source: "source" => [
        "source", "Source", "attribution", "Attribution", "author", "Author", "from",
        "credit", "Credit",
    ],
    pub Remarks: "remarks" => [
        "remarks", "Remarks", "notes", "Notes", "note", "Note", "description", "Description",
    ],
    pub Image: "image" => [
        "image", "Image", "photo", "Photo", "picture", "img", "image_url", "imageUrl", "images",
    ],
    pub ImageAlt: "imageAlt" => ["imageAlt", "alt", "caption", "Caption"],
    pub ImageCredit: "imageCredit" => [
        "imageCredit", "photoCredit", "credit", "Credit", "sourceImage",
    ],
    pub Slug: "slug" => ["slug", "slugFilename"],
}

/// Leading enumeration markers on instruction steps: `1.`, `2)`, `3 -`, and
/// bullets. Group 1 is the space after a numeric marker.
static STEP_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+\s*[.):\-]+(\s*)|[\u{2022}\u{2023}\u{25E6}*\-]\s*)")
        .expect("step marker pattern is valid")
});

/// One recipe file's top-level JSON object, untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecipe(Map<String, Value>);

impl RawRecipe {
    pub fn parse(json: &str) -> Result<Self> {
        match serde_json::from_str(json)? {
            Value::Object(map) => Ok(RawRecipe(map)),
            other => err! {
                "recipe file must contain a JSON object",
                "found" => kind(&other),
            },
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up `path`, descending through nested objects on `.`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(path) {
            return Some(value);
        }

        let (first, rest) = path.split_once('.')?;
        rest.split('.').try_fold(self.0.get(first)?, |value, key| value.as_object()?.get(key))
    }

    /// The value of the first present alias of `F`.
    pub fn pick<F: Field>(&self, _: F) -> Option<&Value> {
        F::ALIASES.iter()
            .filter_map(|alias| self.lookup(alias))
            .find(|value| is_present(value))
    }

    /// The first present alias of `F` as trimmed text. Arrays are joined
    /// with `", "`.
    pub fn text<F: Field>(&self, field: F) -> Option<String> {
        match self.pick(field)? {
            Value::Array(items) => {
                let parts: Vec<_> = items.iter().filter_map(scalar_text).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            value => scalar_text(value),
        }
    }

    /// Like [`RawRecipe::text()`] but an array yields its first non-blank
    /// element.
    pub fn first_text<F: Field>(&self, field: F) -> Option<String> {
        match self.pick(field)? {
            Value::Array(items) => items.iter().find_map(scalar_text),
            value => scalar_text(value),
        }
    }

    /// The first present alias of `F` coerced into a list of strings.
    pub fn list<F: Field>(&self, field: F) -> Vec<String> {
        self.pick(field).map(to_list).unwrap_or_default()
    }

    /// Like [`RawRecipe::list()`] with enumeration markers stripped.
    pub fn steps<F: Field>(&self, field: F) -> Vec<String> {
        self.list(field)
            .iter()
            .map(|step| strip_step_marker(step).trim().to_string())
            .filter(|step| !step.is_empty())
            .collect()
    }

    /// Only a literal boolean `true` marks a draft.
    pub fn is_draft(&self) -> bool {
        matches!(self.0.get("draft"), Some(Value::Bool(true)))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawRecipe {
    fn from(map: Map<String, Value>) -> Self {
        RawRecipe(map)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Scalars as trimmed, non-blank text. Containers have no text.
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    (!text.is_empty()).then_some(text)
}

/// Coerces an array or a delimited string into an ordered list of trimmed,
/// non-blank strings. Text containing a line break is split on lines;
/// otherwise it is split on commas.
pub fn to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(s) => split_delimited(s),
        value => scalar_text(value).into_iter().collect(),
    }
}

pub fn split_delimited(text: &str) -> Vec<String> {
    let parts: Box<dyn Iterator<Item = &str>> = match text.contains('\n') {
        true => Box::new(text.lines()),
        false => Box::new(text.split(',')),
    };

    parts.map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

pub fn strip_step_marker(step: &str) -> &str {
    let Some(captures) = STEP_MARKER.captures(step) else {
        return step;
    };

    let (marker, space) = (captures.get(0), captures.get(1));
    let rest = &step[marker.map_or(0, |m| m.end())..];

    // `1.5 cups` is a quantity, not step one.
    let decimal = space.map_or(false, |s| s.is_empty())
        && rest.starts_with(|c: char| c.is_ascii_digit());

    if decimal { step } else { rest }
}

pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
