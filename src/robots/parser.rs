//! Robots.txt directive extraction
//!
//! Only the two directives the crawler acts on are read, and every group is
//! treated alike regardless of its `User-agent` line:
//! - `Disallow: <path>` feeds the disallow follower
//! - `Crawl-Delay: <seconds>` feeds the rate limiter

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*Disallow[ \t]*:[ \t]*([^\s#]+)").expect("valid disallow pattern")
});

static CRAWL_DELAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*Crawl-Delay[ \t]*:[ \t]*([0-9]*\.?[0-9]+)")
        .expect("valid crawl-delay pattern")
});

/// The robots.txt directives that shape a crawl
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsDirectives {
    /// Every non-empty `Disallow` value, in file order
    pub disallow: Vec<String>,

    /// The first `Crawl-Delay` value, in seconds
    pub crawl_delay: Option<f64>,
}

impl RobotsDirectives {
    /// Extracts directives from a robots.txt body
    ///
    /// An empty `Disallow:` (which allows everything) contributes no rule.
    /// Unparseable content simply yields no directives.
    pub fn parse(content: &str) -> Self {
        let disallow = DISALLOW_RE
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect();

        let crawl_delay = CRAWL_DELAY_RE
            .captures(content)
            .and_then(|caps| caps[1].parse::<f64>().ok());

        Self {
            disallow,
            crawl_delay,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.disallow.is_empty() && self.crawl_delay.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_disallow_rules() {
        let content = "User-agent: *\nDisallow: /admin\nDisallow: /private/*\nAllow: /public";
        let robots = RobotsDirectives::parse(content);
        assert_eq!(robots.disallow, vec!["/admin", "/private/*"]);
        assert_eq!(robots.crawl_delay, None);
    }

    #[test]
    fn test_empty_disallow_is_skipped() {
        let content = "User-agent: *\nDisallow:\nDisallow: \nDisallow: /x";
        let robots = RobotsDirectives::parse(content);
        assert_eq!(robots.disallow, vec!["/x"]);
    }

    #[test]
    fn test_trailing_comment_ignored() {
        let robots = RobotsDirectives::parse("Disallow: /tmp # scratch space");
        assert_eq!(robots.disallow, vec!["/tmp"]);
    }

    #[test]
    fn test_case_insensitive() {
        let content = "user-agent: *\ndisallow: /a\ncrawl-delay: 7";
        let robots = RobotsDirectives::parse(content);
        assert_eq!(robots.disallow, vec!["/a"]);
        assert_eq!(robots.crawl_delay, Some(7.0));
    }

    #[test]
    fn test_crawl_delay_decimal() {
        let robots = RobotsDirectives::parse("User-agent: *\nCrawl-delay: 2.5");
        assert_eq!(robots.crawl_delay, Some(2.5));
    }

    #[test]
    fn test_first_crawl_delay_wins() {
        let content = "User-agent: a\nCrawl-delay: 5\n\nUser-agent: *\nCrawl-delay: 10";
        let robots = RobotsDirectives::parse(content);
        assert_eq!(robots.crawl_delay, Some(5.0));
    }

    #[test]
    fn test_windows_line_endings() {
        let content = "User-agent: *\r\nDisallow: /a\r\nCrawl-Delay: 1\r\n";
        let robots = RobotsDirectives::parse(content);
        assert_eq!(robots.disallow, vec!["/a"]);
        assert_eq!(robots.crawl_delay, Some(1.0));
    }

    #[test]
    fn test_garbage_yields_nothing() {
        let robots = RobotsDirectives::parse("This is not valid robots.txt {{{");
        assert!(robots.is_empty());
        assert!(RobotsDirectives::parse("").is_empty());
    }
}
