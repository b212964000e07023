//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::FeedConfig;
pub use site::HighlightConfig;
pub use site::RobotsConfig;
pub use site::SitemapConfig;
pub use site::StaticPage;
