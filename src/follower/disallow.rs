use crate::follower::{Denial, Follower};
use crate::model::Link;
use regex::Regex;

/// Denies links whose path matches a robots.txt style disallow rule
///
/// # Rule Syntax
///
/// Each rule is a path prefix, optionally containing `*` wildcards:
/// - the match is anchored at the start of the path
/// - a leading `/` on the rule is optional on the path
/// - `*` matches any run of characters, greedily
/// - every other character is literal (`.` is a dot, not a wildcard)
///
/// `/private` therefore blocks `/private`, `/private/` and `/privateer`.
#[derive(Debug, Clone, Default)]
pub struct DisallowFollower {
    rules: Vec<Regex>,
}

impl DisallowFollower {
    /// Compiles disallow rules, skipping any that cannot be compiled
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .filter_map(|rule| {
                let rule = rule.as_ref();
                // An empty rule disallows nothing.
                if rule.trim().is_empty() {
                    return None;
                }
                match compile_rule(rule) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        tracing::warn!("Skipping disallow rule {:?}: {}", rule, e);
                        None
                    }
                }
            })
            .collect();

        Self { rules }
    }

    /// The compiled patterns, in the order the rules were given
    pub fn rules(&self) -> Vec<&str> {
        self.rules.iter().map(Regex::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Turns one rule into an anchored prefix pattern
fn compile_rule(rule: &str) -> Result<Regex, regex::Error> {
    let literal = regex::escape(rule.trim().trim_start_matches('/'));
    Regex::new(&format!("^/?{}", literal.replace(r"\*", ".*")))
}

impl Follower for DisallowFollower {
    fn follow(&self, link: &Link) -> Result<(), Denial> {
        let path = link.url.path();
        match self.rules.iter().find(|rule| rule.is_match(path)) {
            Some(rule) => Err(Denial::Disallowed {
                rule: rule.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }
}
