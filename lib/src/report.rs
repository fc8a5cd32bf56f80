use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

/// What went wrong, short of failing, while loading a library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub loaded: usize,
    pub parse_failures: Vec<ParseFailure>,
    pub unresolved_images: Vec<UnresolvedImage>,
    pub drafts_skipped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_content_root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedImage {
    pub id: String,
    pub reference: String,
    pub fallback: String,
}

impl Report {
    /// Whether nothing went wrong. Skipped drafts are not a problem.
    pub fn is_clean(&self) -> bool {
        self.parse_failures.is_empty()
            && self.unresolved_images.is_empty()
            && self.missing_content_root.is_none()
    }

    pub fn log_summary(&self) {
        info!("loaded {} recipes", self.loaded);
        if !self.drafts_skipped.is_empty() {
            info!("skipped {} drafts", self.drafts_skipped.len());
        }

        if !self.parse_failures.is_empty() {
            warn!("{} recipe files could not be parsed", self.parse_failures.len());
        }

        if !self.unresolved_images.is_empty() {
            warn!("{} images could not be found", self.unresolved_images.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_keys() {
        let mut report = Report::default();
        assert!(report.is_clean());

        report.drafts_skipped.push("Soups/wip".into());
        assert!(report.is_clean());

        report.unresolved_images.push(UnresolvedImage {
            id: "Soups/stew".into(),
            reference: "stew.png".into(),
            fallback: "/content/Soups/stew.png".into(),
        });

        assert!(!report.is_clean());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["draftsSkipped"][0], "Soups/wip");
        assert_eq!(value["unresolvedImages"][0]["reference"], "stew.png");
        assert!(value.get("missingContentRoot").is_none());
    }
}
