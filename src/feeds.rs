//! robots.txt, sitemap.xml and rss.xml generation.
//!
//! Posts come from the backend's published listing. The generators never
//! fail: when the listing is unavailable they render without posts.

use axum::http::Method;

use crate::config::SiteConfig;
use crate::domain::{BlogPost, PostListing};
use crate::error::{GatewayError, GatewayResult};
use crate::markup::escape;
use crate::relay::{Relay, RelayRequest};

const PUBLISHED_POSTS_PATH: &str = "/blog";
const PUBLISHED_POSTS_QUERY: &str = "status=published";

/// Fetch published posts, or an empty list if the backend cannot supply them.
pub async fn published_posts(relay: &Relay) -> Vec<BlogPost> {
    match fetch_published_posts(relay).await {
        Ok(posts) => posts,
        Err(e) => {
            tracing::warn!(error = %e, "Published posts unavailable, rendering feed without posts");
            Vec::new()
        }
    }
}

async fn fetch_published_posts(relay: &Relay) -> GatewayResult<Vec<BlogPost>> {
    let request = RelayRequest::new(Method::GET, PUBLISHED_POSTS_PATH)
        .with_query(Some(PUBLISHED_POSTS_QUERY));
    let response = relay.forward(request).await?;

    if !response.status.is_success() {
        return Err(GatewayError::Internal(format!(
            "post listing returned {}",
            response.status
        )));
    }

    let listing: PostListing = serde_json::from_slice(&response.body)?;
    Ok(listing.into_posts())
}

fn site_root(site: &SiteConfig) -> &str {
    site.url.trim_end_matches('/')
}

fn post_url(site: &SiteConfig, post: &BlogPost) -> String {
    format!("{}/blog/{}", site_root(site), post.slug)
}

pub fn render_robots(site: &SiteConfig) -> String {
    format!(
        "User-agent: *\n\
         Allow: /\n\
         Disallow: /api/\n\
         Disallow: /dashboard/\n\
         \n\
         Sitemap: {}/sitemap.xml\n",
        site_root(site)
    )
}

pub fn render_sitemap(site: &SiteConfig, posts: &[BlogPost]) -> String {
    let root = site_root(site);
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for page in &site.static_pages {
        let path = if page.starts_with('/') {
            page.clone()
        } else {
            format!("/{page}")
        };
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n  </url>\n",
            escape(&format!("{root}{path}"))
        ));
    }

    for post in posts {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(&post_url(site, post))));
        if let Some(modified) = post.last_modified() {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                modified.format("%Y-%m-%d")
            ));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn render_rss(site: &SiteConfig, posts: &[BlogPost]) -> String {
    let root = site_root(site);
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n\
         <channel>\n\
         <title>{}</title>\n\
         <link>{}</link>\n\
         <description>{}</description>\n\
         <language>en-us</language>\n\
         <atom:link href=\"{}/rss.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape(&site.title),
        escape(root),
        escape(&site.description),
        escape(root),
    );

    if let Some(latest) = posts.iter().filter_map(|p| p.published_at).max() {
        xml.push_str(&format!(
            "<lastBuildDate>{}</lastBuildDate>\n",
            latest.to_rfc2822()
        ));
    }

    for post in posts {
        let link = escape(&post_url(site, post));
        xml.push_str("<item>\n");
        xml.push_str(&format!("<title>{}</title>\n", escape(&post.title)));
        xml.push_str(&format!("<link>{link}</link>\n"));
        xml.push_str(&format!("<guid isPermaLink=\"true\">{link}</guid>\n"));
        if let Some(excerpt) = &post.excerpt {
            xml.push_str(&format!("<description>{}</description>\n", escape(excerpt)));
        }
        if let Some(author) = &post.author {
            xml.push_str(&format!("<dc:creator>{}</dc:creator>\n", escape(author)));
        }
        if let Some(published) = post.published_at {
            xml.push_str(&format!("<pubDate>{}</pubDate>\n", published.to_rfc2822()));
        }
        xml.push_str("</item>\n");
    }

    xml.push_str("</channel>\n</rss>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::test_support::{spawn_echo_backend, unreachable_backend};
    use chrono::{TimeZone, Utc};

    fn site() -> SiteConfig {
        SiteConfig {
            url: "https://compliance.test/".to_string(),
            title: "Compliance & Co".to_string(),
            description: "HIPAA guidance".to_string(),
            static_pages: vec!["/".to_string(), "pricing".to_string()],
        }
    }

    fn post() -> BlogPost {
        BlogPost {
            slug: "risk-analysis".to_string(),
            title: "Risk <Analysis> 101".to_string(),
            excerpt: Some("Start with an inventory".to_string()),
            author: None,
            published_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2026, 4, 2, 10, 30, 0).unwrap()),
        }
    }

    fn relay_to(base_url: String) -> Relay {
        Relay::new(
            reqwest::Client::new(),
            &BackendConfig {
                base_url,
                ..BackendConfig::default()
            },
        )
    }

    #[test]
    fn test_robots_points_at_sitemap() {
        let robots = render_robots(&site());
        assert!(robots.starts_with("User-agent: *\n"));
        assert!(robots.contains("Disallow: /api/\n"));
        assert!(robots.ends_with("Sitemap: https://compliance.test/sitemap.xml\n"));
    }

    #[test]
    fn test_sitemap_lists_pages_and_posts() {
        let xml = render_sitemap(&site(), &[post()]);
        assert!(xml.contains("<loc>https://compliance.test/</loc>"));
        assert!(xml.contains("<loc>https://compliance.test/pricing</loc>"));
        assert!(xml.contains("<loc>https://compliance.test/blog/risk-analysis</loc>"));
        assert!(xml.contains("<lastmod>2026-04-02</lastmod>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_rss_items_are_escaped() {
        let xml = render_rss(&site(), &[post()]);
        assert!(xml.contains("<title>Compliance &amp; Co</title>"));
        assert!(xml.contains("<title>Risk &lt;Analysis&gt; 101</title>"));
        assert!(xml.contains("<pubDate>Sun, "));
        assert!(xml.contains("1 Mar 2026 09:00:00 +0000</pubDate>"));
        assert!(xml.contains(
            "<guid isPermaLink=\"true\">https://compliance.test/blog/risk-analysis</guid>"
        ));
        assert!(!xml.contains("<dc:creator>"));
    }

    #[test]
    fn test_rss_without_posts_is_valid_channel() {
        let xml = render_rss(&site(), &[]);
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
        assert!(!xml.contains("<lastBuildDate>"));
    }

    #[tokio::test]
    async fn test_published_posts_from_backend() {
        let relay = relay_to(spawn_echo_backend().await);
        let posts = published_posts(&relay).await;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "encryption-at-rest");
        assert_eq!(posts[1].slug, "breach-notification");
        assert_eq!(
            posts[1].published_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_published_posts_degrade_when_backend_down() {
        let relay = relay_to(unreachable_backend().await);
        assert!(published_posts(&relay).await.is_empty());
    }
}
