use derive_more::Debug;
use rustc_hash::FxHashSet;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::fields::*;
use crate::image::{self, Resolution, SearchDir};
use crate::remarks;
use crate::slug::{slugify, SlugRegistry};
use crate::url::UrlBuf;

/// The category slug used when a folder name has no sluggable characters.
pub const UNCATEGORIZED: &str = "uncategorized";

/// The title slug used when neither the title nor the file name has any
/// sluggable characters.
pub const FALLBACK_SLUG: &str = "recipe";

/// One normalized recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// `<category folder>/<file stem>`.
    pub id: String,
    pub category: String,
    pub filename: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    #[serde(rename = "yield", skip_serializing_if = "Option::is_none")]
    pub yields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// The image reference as written in the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_credit: Option<String>,
    pub slug_category: String,
    pub slug_title: String,
    pub slug_title_unique: String,
    pub url_path: UrlBuf,
    pub draft: bool,
    /// The source object, untouched.
    #[debug(ignore)]
    pub data: Map<String, Value>,
}

/// Where a recipe was loaded from.
#[derive(Debug, Clone, Copy)]
pub struct Origin<'a> {
    /// The category folder's name.
    pub category: &'a str,
    /// The file name without its extension.
    pub filename: &'a str,
}

/// The result of [`Recipe::normalize()`].
#[derive(Debug)]
pub struct Normalized {
    pub recipe: Recipe,
    /// How the image was resolved, if the recipe has one.
    pub image: Option<Resolution>,
}

impl Recipe {
    /// Builds the normalized record for `raw`, claiming a unique title slug
    /// in `slugs` and resolving the image against `dirs`, in order.
    pub fn normalize(
        raw: RawRecipe,
        origin: Origin<'_>,
        slugs: &mut SlugRegistry,
        dirs: &[SearchDir],
    ) -> Normalized {
        let Origin { category, filename } = origin;
        let title = raw.text(Title).unwrap_or_else(|| filename.trim().to_string());

        let mut yields = raw.text(Yield);
        let mut source = raw.text(Source);
        let mut remarks = raw.text(Remarks);
        if let Some(text) = remarks.take() {
            let extracted = remarks::extract(&text, yields.is_none(), source.is_none());
            yields = yields.or(extracted.yields);
            source = source.or(extracted.source);
            remarks = extracted.remarks
                .and_then(|residual| remarks::trim_trailing_title(&residual, &title));
        }

        let slug_category = non_empty(slugify(category))
            .unwrap_or_else(|| UNCATEGORIZED.into());

        let slug_override = raw.text(Slug);
        let slug_title = slug_override.as_deref()
            .and_then(|s| non_empty(slugify(s)))
            .or_else(|| non_empty(slugify(&title)))
            .or_else(|| non_empty(slugify(filename)))
            .unwrap_or_else(|| FALLBACK_SLUG.into());

        let slug_title_unique = slugs.claim(&slug_category, &slug_title, filename);
        let url_path = UrlBuf::recipe_path(&slug_category, &slug_title_unique);

        let image_ref = raw.first_text(Image);
        let resolution = match &image_ref {
            Some(reference) => Some(image::resolve(reference, category, dirs)),
            None => {
                let title_slug = slugify(&title);
                let candidates = [Some(filename), slug_override.as_deref(), Some(&*title_slug)];
                image::discover(candidates.into_iter().flatten(), dirs)
            }
        };

        let image_alt = raw.text(ImageAlt).or_else(|| Some(title.clone()));
        let recipe = Recipe {
            id: format!("{category}/{filename}"),
            category: category.to_string(),
            filename: filename.to_string(),
            ingredients: raw.list(Ingredients),
            instructions: raw.steps(Instructions),
            tags: dedup_tags(raw.list(Tags)),
            yields,
            source,
            remarks,
            image: image_ref,
            image_url: resolution.as_ref().map(|r| r.url().to_string()),
            image_alt,
            image_credit: raw.text(ImageCredit),
            slug_category,
            slug_title,
            slug_title_unique,
            url_path,
            draft: raw.is_draft(),
            title,
            data: raw.into_map(),
        };

        Normalized { recipe, image: resolution }
    }
}

fn non_empty(string: String) -> Option<String> {
    (!string.is_empty()).then_some(string)
}

/// Trims tags, drops blanks, and keeps the first casing of each tag.
pub fn dedup_tags<I: IntoIterator<Item = String>>(tags: I) -> Vec<String> {
    let mut seen = FxHashSet::default();
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::image::DirKind;
    use super::*;

    fn normalize(value: Value, filename: &str, slugs: &mut SlugRegistry) -> Normalized {
        let raw = RawRecipe::from(value.as_object().unwrap().clone());
        let origin = Origin { category: "02 - Baking", filename };
        let dirs = [SearchDir::new(DirKind::Assets, "/images".into(), vec![
            "Pie.JPG".into(), "banana-bread.webp".into(),
        ])];

        Recipe::normalize(raw, origin, slugs, &dirs)
    }

    #[test]
    fn fields_are_normalized() {
        let mut slugs = SlugRegistry::new();
        let Normalized { recipe, image } = normalize(json!({
            "Title": " Apple Pie ",
            "Ingredients": "apples, sugar",
            "Directions": ["1. Peel.", "2) Bake."],
            "Tags": ["Dessert", "dessert", " Dessert ", "Fruit"],
            "Notes": "Serve warm. Yield: 8 slices Source: Mom",
            "photo": "pie.jpg",
            "draft": false,
        }), "apple_pie", &mut slugs);

        assert_eq!(recipe.id, "02 - Baking/apple_pie");
        assert_eq!(recipe.title, "Apple Pie");
        assert_eq!(recipe.ingredients, ["apples", "sugar"]);
        assert_eq!(recipe.instructions, ["Peel.", "Bake."]);
        assert_eq!(recipe.tags, ["Dessert", "Fruit"]);
        assert_eq!(recipe.yields.as_deref(), Some("8 slices"));
        assert_eq!(recipe.source.as_deref(), Some("Mom"));
        assert_eq!(recipe.remarks.as_deref(), Some("Serve warm."));
        assert_eq!(recipe.slug_category, "02-baking");
        assert_eq!(recipe.url_path.as_str(), "/recipes/02-baking/apple-pie/");
        assert_eq!(recipe.image.as_deref(), Some("pie.jpg"));
        assert_eq!(recipe.image_url.as_deref(), Some("/images/Pie.JPG"));
        assert_eq!(recipe.image_alt.as_deref(), Some("Apple Pie"));
        assert!(!image.unwrap().is_fallback());
        assert!(!recipe.draft);
    }

    #[test]
    fn explicit_fields_beat_remarks() {
        let mut slugs = SlugRegistry::new();
        let recipe = normalize(json!({
            "title": "Scones",
            "servings": 6,
            "remarks": "Yield: 12. Best fresh. Scones",
        }), "scones", &mut slugs).recipe;

        assert_eq!(recipe.yields.as_deref(), Some("6"));
        assert_eq!(recipe.remarks.as_deref(), Some("Yield: 12. Best fresh."));
    }

    #[test]
    fn title_and_slug_fallbacks() {
        let mut slugs = SlugRegistry::new();
        let recipe = normalize(json!({ "ingredients": ["x"] }), "plain_toast", &mut slugs).recipe;
        assert_eq!(recipe.title, "plain_toast");
        assert_eq!(recipe.slug_title, "plain-toast");

        let recipe = normalize(json!({ "title": "!!!" }), "???", &mut slugs).recipe;
        assert_eq!(recipe.slug_title, FALLBACK_SLUG);

        let recipe = normalize(json!({ "title": "Soup", "slug": "Best Soup" }), "s", &mut slugs).recipe;
        assert_eq!(recipe.slug_title_unique, "best-soup");

        let recipe = normalize(json!({ "title": "Soup", "slugFilename": "Other Soup" }), "t", &mut slugs).recipe;
        assert_eq!(recipe.slug_title_unique, "other-soup");
    }

    #[test]
    fn credits_fill_source_and_image_credit() {
        let mut slugs = SlugRegistry::new();
        let recipe = normalize(json!({ "title": "Pie", "Credit": "Aunt May" }), "pie", &mut slugs).recipe;
        assert_eq!(recipe.source.as_deref(), Some("Aunt May"));
        assert_eq!(recipe.image_credit.as_deref(), Some("Aunt May"));

        let recipe = normalize(json!({ "title": "Tart", "sourceImage": "Jo" }), "tart", &mut slugs).recipe;
        assert_eq!(recipe.source, None);
        assert_eq!(recipe.image_credit.as_deref(), Some("Jo"));
    }

    #[test]
    fn colliding_titles_get_distinct_slugs() {
        let mut slugs = SlugRegistry::new();
        let a = normalize(json!({ "title": "Banana Bread" }), "banana-bread", &mut slugs).recipe;
        let b = normalize(json!({ "title": "Banana Bread" }), "grandmas", &mut slugs).recipe;
        assert_eq!(a.slug_title_unique, "banana-bread");
        assert_eq!(b.slug_title_unique, "banana-bread-grandmas");
        assert_ne!(a.url_path, b.url_path);
    }

    #[test]
    fn images_are_discovered_without_a_reference() {
        let mut slugs = SlugRegistry::new();
        let found = normalize(json!({ "title": "Banana Bread" }), "bb", &mut slugs);
        assert_eq!(found.recipe.image, None);
        assert_eq!(found.recipe.image_url.as_deref(), Some("/images/banana-bread.webp"));

        let missing = normalize(json!({ "title": "Toast" }), "toast", &mut slugs);
        assert!(missing.image.is_none());
        assert_eq!(missing.recipe.image_url, None);
    }

    #[test]
    fn serialized_form() {
        let mut slugs = SlugRegistry::new();
        let recipe = normalize(json!({ "title": "Toast", "yield": "2", "extra": [1] }), "toast", &mut slugs).recipe;
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["yield"], "2");
        assert_eq!(value["slugTitleUnique"], "toast");
        assert_eq!(value["urlPath"], "/recipes/02-baking/toast/");
        assert_eq!(value["data"]["extra"], json!([1]));
        assert!(value.get("source").is_none());
        assert!(value.get("imageUrl").is_none());
    }
}
