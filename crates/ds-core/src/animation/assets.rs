//! Image acquisition for flying sprites.

use serde::Serialize;

use crate::constants::IMAGES_PER_RUN;
use crate::error::{CoreError, Result};

const PLACEHOLDER_IDS: [u32; IMAGES_PER_RUN] = [1, 10, 20, 28, 30, 40, 48, 50, 60, 70, 80, 100];

/// A decoded (or at least accepted) image the renderer can draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageHandle {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Where flying images come from. A failed load is reported as an error;
/// the engine logs it and skips the sprite.
pub trait ImageSource {
    fn load(&mut self, url: &str) -> Result<ImageHandle>;
}

/// Accepts any http(s) URL and leaves the actual fetch to the renderer.
#[derive(Debug, Clone, Default)]
pub struct RemoteImageSource;

impl ImageSource for RemoteImageSource {
    fn load(&mut self, url: &str) -> Result<ImageHandle> {
        if url.starts_with("https://") || url.starts_with("http://") {
            Ok(ImageHandle {
                url: url.to_string(),
                width: 400,
                height: 400,
            })
        } else {
            Err(CoreError::AssetLoad(url.to_string()))
        }
    }
}

/// Placeholder photo URLs for a run. The keywords only rotate the order of the
/// fixed id list, so the same query always yields the same sequence.
pub fn placeholder_image_urls(keywords: &[String]) -> Vec<String> {
    let offset = keywords
        .iter()
        .take(3)
        .flat_map(|k| k.bytes())
        .fold(0usize, |acc, b| acc.wrapping_add(b as usize))
        % PLACEHOLDER_IDS.len();

    PLACEHOLDER_IDS
        .iter()
        .cycle()
        .skip(offset)
        .take(PLACEHOLDER_IDS.len())
        .map(|id| format!("https://picsum.photos/400/400?random={id}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keywords_uses_declared_order() {
        let urls = placeholder_image_urls(&[]);
        assert_eq!(urls.len(), IMAGES_PER_RUN);
        assert_eq!(urls[0], "https://picsum.photos/400/400?random=1");
        assert_eq!(urls[11], "https://picsum.photos/400/400?random=100");
    }

    #[test]
    fn test_keywords_rotate_deterministically() {
        let kw = vec!["best".to_string(), "apple".to_string()];
        let a = placeholder_image_urls(&kw);
        let b = placeholder_image_urls(&kw);
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        let mut base = placeholder_image_urls(&[]);
        base.sort();
        assert_eq!(sorted, base);
    }

    #[test]
    fn test_remote_source_rejects_non_http() {
        let mut source = RemoteImageSource;
        assert!(source.load("https://picsum.photos/400/400?random=1").is_ok());
        assert_eq!(
            source.load("file:///etc/passwd"),
            Err(CoreError::AssetLoad("file:///etc/passwd".to_string()))
        );
    }
}
