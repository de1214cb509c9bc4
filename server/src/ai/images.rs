use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::slug::slugify;

const FEATURED_WIDTH: u32 = 1200;
const FEATURED_HEIGHT: u32 = 600;
const EXTRA_WIDTH: u32 = 800;
const EXTRA_HEIGHT: u32 = 600;

/// Reachability check for a single image URL. Any failure mode counts as
/// unreachable; probes never fail the surrounding request.
#[async_trait]
pub(crate) trait ImageProbe: Send + Sync {
    async fn is_reachable(&self, url: &str) -> bool;
}

pub(crate) struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub(crate) fn new(probe_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(probe_timeout)
            .build()
            .expect("failed to build reqwest client");
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn is_reachable(&self, url: &str) -> bool {
        if url.trim().is_empty() {
            return false;
        }
        match self.client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Replaces empty or unreachable image URLs with deterministic
/// placeholders keyed on the post topic and a positional index: the
/// featured image is index 0, extras count from 1.
pub(crate) struct ImageValidator<P: ImageProbe> {
    probe: P,
}

impl<P: ImageProbe> ImageValidator<P> {
    pub(crate) fn new(probe: P) -> Self {
        Self { probe }
    }

    pub(crate) async fn validate(
        &self,
        featured_image: Option<String>,
        images: Vec<String>,
        topic: &str,
    ) -> (String, Vec<String>) {
        let featured = match featured_image {
            Some(url) if self.probe.is_reachable(&url).await => url,
            _ => {
                debug!(topic, "featured image missing or unreachable; using placeholder");
                placeholder_url(topic, FEATURED_WIDTH, FEATURED_HEIGHT, 0)
            }
        };

        let mut validated = Vec::with_capacity(images.len());
        for (idx, url) in images.into_iter().enumerate() {
            if self.probe.is_reachable(&url).await {
                validated.push(url);
            } else {
                debug!(topic, index = idx + 1, "image unreachable; using placeholder");
                validated.push(placeholder_url(topic, EXTRA_WIDTH, EXTRA_HEIGHT, idx + 1));
            }
        }

        if validated.is_empty() {
            validated = vec![
                placeholder_url(topic, EXTRA_WIDTH, EXTRA_HEIGHT, 1),
                placeholder_url(topic, EXTRA_WIDTH, EXTRA_HEIGHT, 2),
            ];
        }

        (featured, validated)
    }
}

/// Seeded placeholder URL; stable per (topic, index) so repeated runs over
/// one topic produce the same set.
pub(crate) fn placeholder_url(topic: &str, width: u32, height: u32, index: usize) -> String {
    let mut seed = slugify(topic);
    let cut = seed
        .char_indices()
        .nth(50)
        .map(|(idx, _)| idx)
        .unwrap_or(seed.len());
    seed.truncate(cut);
    let seed = seed.trim_matches('-');
    let seed = if seed.is_empty() { "blog" } else { seed };
    format!("https://picsum.photos/seed/{seed}-{index}/{width}/{height}")
}
