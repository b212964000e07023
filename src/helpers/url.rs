//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters left alone by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Join a site path onto the root, always starting with `/`
///
/// # Examples
/// ```ignore
/// url_for("blog/hello") // -> "/blog/hello"
/// ```
pub fn url_for(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog") // -> "https://example.com/blog"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = url_for(path);
    if path == "/" {
        // The homepage keeps no trailing slash so it matches `url` as configured
        base.to_string()
    } else {
        format!("{}{}", base, path)
    }
}

/// Percent-encode a single path segment
pub fn encode_component(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// Reverse [`encode_component`]
pub fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Lookup key for a category: categories match case-insensitively
pub fn category_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// URL segment for a category page
pub fn category_segment(name: &str) -> String {
    encode_component(&category_key(name))
}

/// URL segment for a tag page; tags keep their case
pub fn tag_segment(name: &str) -> String {
    encode_component(name.trim())
}

/// Site path of a post
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    url_for(&format!("{}/{}", config.blog_dir.trim_matches('/'), slug))
}

/// Site path of a category page
pub fn category_path(config: &SiteConfig, name: &str) -> String {
    url_for(&format!(
        "{}/{}",
        config.category_dir.trim_matches('/'),
        category_segment(name)
    ))
}

/// Site path of a tag page
pub fn tag_path(config: &SiteConfig, name: &str) -> String {
    url_for(&format!(
        "{}/{}",
        config.tag_dir.trim_matches('/'),
        tag_segment(name)
    ))
}
