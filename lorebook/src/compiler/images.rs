//! Image map normalization for output.

use world_graph::{ImageUrls, Images};

/// Trim every URL, drop empty ones, always emit a sequence, and drop keys
/// that end up with no URLs.
pub fn clean_images(images: &Images) -> Images {
    images
        .iter()
        .filter_map(|(key, urls)| {
            let kept: Vec<String> = urls
                .iter()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
            (!kept.is_empty()).then(|| (key.clone(), ImageUrls::Many(kept)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_images() {
        let mut images = Images::new();
        images.insert("day".into(), ImageUrls::One("  day.png ".into()));
        images.insert("night".into(), ImageUrls::Many(vec![" ".into(), "night.png".into()]));
        images.insert("dusk".into(), ImageUrls::One("   ".into()));
        images.insert("dawn".into(), ImageUrls::Many(Vec::new()));

        let cleaned = clean_images(&images);

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned["day"], ImageUrls::Many(vec!["day.png".into()]));
        assert_eq!(cleaned["night"], ImageUrls::Many(vec!["night.png".into()]));
        assert_eq!(cleaned.keys().collect::<Vec<_>>(), ["day", "night"]);
    }
}
