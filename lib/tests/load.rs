use std::fs;
use std::path::Path;
use std::collections::HashSet;

use galley::{Loader, Memory, Publisher};
use galley::url::{is_slug, UrlBuf};

fn write<P: AsRef<Path>>(root: P, path: &str, contents: &str) {
    let path = root.as_ref().join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let content = dir.path().join("content");

    write(&content, "01 - Breakfast/pancakes.json", r#"{
        "Title": "Pancakes",
        "Ingredients": ["1 cup flour", "1 cup milk", "1 egg"],
        "Directions": "1. Whisk everything.\n2. Fry.",
        "Tags": "Breakfast, Quick",
        "Notes": "Some note. Yield: 12 muffins. Source: Grandma."
    }"#);

    write(&content, "02 - Baking/banana_bread.json", r#"{
        "title": "Banana Bread",
        "ingredients": "bananas, flour",
        "tags": ["Dessert", "dessert", " Dessert "],
        "photo": "pie.jpg"
    }"#);

    write(&content, "02 - Baking/grandmas.json", r#"{
        "name": "Banana Bread",
        "ingredients": ["bananas"],
        "tags": ["Baking"]
    }"#);

    write(&content, "02 - Baking/wip.json", r#"{ "title": "Sourdough", "draft": true }"#);
    write(&content, "02 - Baking/broken.json", r#"{ "title": "Oops", "#);
    write(&content, "03 - Desserts/list.json", r#"["not", "an", "object"]"#);
    write(&content, "03 - Desserts/tart.json", r#"{ "title": "Tart", "image": "tart.png" }"#);
    write(dir.path(), "images/Pie.JPG", "");
    dir
}

fn loader(site: &tempfile::TempDir) -> Loader {
    Loader::new(site.path().join("content")).image_dir(site.path().join("images"), "/images")
}

#[test]
fn slugs_are_unique_and_well_formed() {
    let site = site();
    let library = loader(&site).load().unwrap();

    let mut seen = HashSet::new();
    for recipe in &library.recipes {
        assert!(is_slug(&recipe.slug_category), "{}", recipe.slug_category);
        assert!(is_slug(&recipe.slug_title_unique), "{}", recipe.slug_title_unique);
        assert!(seen.insert((&recipe.slug_category, &recipe.slug_title_unique)));

        let expected = format!("/recipes/{}/{}/", recipe.slug_category, recipe.slug_title_unique);
        assert_eq!(recipe.url_path.as_str(), expected);
    }

    let baking: Vec<_> = library.categories.get("02-baking").unwrap()
        .items.iter()
        .map(|r| r.slug_title_unique.as_str())
        .collect();

    assert_eq!(baking, ["banana-bread", "banana-bread-grandmas"]);
}

#[test]
fn failures_are_reported_not_fatal() {
    let site = site();
    let library = loader(&site).load().unwrap();

    let ids: Vec<_> = library.recipes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, [
        "01 - Breakfast/pancakes",
        "02 - Baking/banana_bread",
        "02 - Baking/grandmas",
        "03 - Desserts/tart",
    ]);

    let report = &library.report;
    let failed: Vec<_> = report.parse_failures.iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap())
        .collect();

    assert_eq!(failed, ["broken.json", "list.json"]);
    assert_eq!(report.drafts_skipped, ["02 - Baking/wip"]);
    assert_eq!(report.unresolved_images.len(), 1);
    assert_eq!(report.unresolved_images[0].fallback, "/content/03%20-%20Desserts/tart.png");
    assert_eq!(library.get("03 - Desserts/tart").unwrap().image_url.as_deref(),
        Some("/content/03%20-%20Desserts/tart.png"));
}

#[test]
fn drafts_load_on_request() {
    let site = site();
    let library = loader(&site).include_drafts(true).load().unwrap();
    let draft = library.get("02 - Baking/wip").unwrap();
    assert!(draft.draft);
    assert!(library.report.drafts_skipped.is_empty());
}

#[test]
fn remarks_and_fields_are_normalized() {
    let site = site();
    let library = loader(&site).load().unwrap();

    let pancakes = library.get("01 - Breakfast/pancakes").unwrap();
    assert_eq!(pancakes.yields.as_deref(), Some("12 muffins."));
    assert_eq!(pancakes.source.as_deref(), Some("Grandma."));
    let remarks = pancakes.remarks.as_deref().unwrap();
    assert!(!remarks.contains("Yield:") && !remarks.contains("Source:"));
    assert_eq!(pancakes.instructions, ["Whisk everything.", "Fry."]);

    let bread = library.get("02 - Baking/banana_bread").unwrap();
    assert_eq!(bread.image_url.as_deref(), Some("/images/Pie.JPG"));
}

#[test]
fn duplicate_tags_collapse() {
    let site = site();
    let library = loader(&site).load().unwrap();

    let dessert = library.tags.get("dessert").unwrap();
    assert_eq!(dessert.label, "Dessert");
    assert_eq!(dessert.recipes.len(), 1);
    assert_eq!(library.tag_list(), ["Baking", "Breakfast", "Dessert", "Quick"]);
}

#[test]
fn reloading_is_byte_identical() {
    let site = site();
    let prefix = UrlBuf::path_prefix(None);

    let (mut first, mut second) = (Memory::new(), Memory::new());
    first.publish(&loader(&site).load().unwrap(), &prefix).unwrap();
    second.publish(&loader(&site).load().unwrap(), &prefix).unwrap();

    for (name, document) in &first.documents {
        let again = &second.documents[name];
        assert_eq!(serde_json::to_string(document).unwrap(), serde_json::to_string(again).unwrap());
    }
}

#[test]
fn missing_content_root_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let library = Loader::new(dir.path().join("nope")).load().unwrap();
    assert!(library.is_empty());
    assert!(library.report.missing_content_root.is_some());
}

#[test]
fn validation_failures_are_fatal() {
    let site = site();
    assert!(loader(&site).validate(false).load().is_ok());

    let error = loader(&site).validate(true).load().unwrap_err();
    let printed = error.to_string();
    assert!(printed.contains("tart.json"), "{printed}");
    assert!(printed.contains("/ingredients must list at least one ingredient"), "{printed}");
}

#[test]
fn colons_in_category_names_stay_in_paths() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Mains: Beef/stew.json", r#"{ "title": "Stew", "image": "stew.jpg" }"#);
    write(dir.path(), "Mains: Beef/stew.jpg", "");
    write(dir.path(), "Mains: Beef/chili.json", r#"{ "title": "Chili", "image": "a:b.png" }"#);

    let library = Loader::new(dir.path()).load().unwrap();
    let stew = library.get("Mains: Beef/stew").unwrap();
    assert_eq!(stew.image_url.as_deref(), Some("/content/Mains:%20Beef/stew.jpg"));
    assert_eq!(stew.url_path.as_str(), "/recipes/mains-beef/stew/");

    let unresolved = &library.report.unresolved_images;
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].fallback, "/content/Mains:%20Beef/a:b.png");
}

#[test]
fn published_recipes_sort_by_category_then_title() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "02 - Soups/a.json", r#"{ "title": "Zucchini" }"#);
    write(dir.path(), "02 - Soups/b.json", r#"{ "title": "apple" }"#);
    write(dir.path(), "01 - Salads/z.json", r#"{ "title": "Wedge" }"#);

    let library = Loader::new(dir.path()).load().unwrap();
    let mut memory = Memory::new();
    memory.publish(&library, &UrlBuf::path_prefix(None)).unwrap();

    let titles: Vec<_> = memory.get("recipes").unwrap().as_array().unwrap().iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();

    assert_eq!(titles, ["Wedge", "apple", "Zucchini"]);
}
