use std::collections::HashSet;
use std::time::Duration;

use futures::future::join_all;
use minishop_core::Catalog;

/// Probe every distinct product image URL once and substitute the placeholder
/// for any that is unreachable.
///
/// Runs at startup only, never per request: one HEAD request per URL, all
/// concurrently, each bounded by `timeout`. A 2xx/3xx status counts as
/// reachable; anything else, a transport error, or a timeout does not.
///
/// # Errors
///
/// Fails only if the HTTP client cannot be constructed.
pub async fn verify_image_urls(catalog: Catalog, timeout: Duration) -> anyhow::Result<Catalog> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    let placeholder = catalog.placeholder_image().to_string();
    let urls: HashSet<String> = catalog
        .products()
        .iter()
        .map(|p| p.image_url.clone())
        .filter(|url| *url != placeholder)
        .collect();

    let checks = urls.into_iter().map(|url| {
        let client = client.clone();
        async move {
            let reachable = match client.head(&url).send().await {
                Ok(res) => res.status().is_success() || res.status().is_redirection(),
                Err(error) => {
                    tracing::warn!(%url, %error, "image probe failed");
                    false
                }
            };
            (url, reachable)
        }
    });

    let unreachable: HashSet<String> = join_all(checks)
        .await
        .into_iter()
        .filter(|(_, reachable)| !reachable)
        .map(|(url, _)| url)
        .collect();

    if !unreachable.is_empty() {
        tracing::warn!(
            count = unreachable.len(),
            "substituting placeholder for unreachable image urls"
        );
    }

    Ok(catalog.with_image_fallbacks(&unreachable))
}
