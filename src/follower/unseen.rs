use crate::follower::{Denial, Follower};
use crate::model::Link;
use crate::url::canonical_key;
use dashmap::DashSet;
use url::Url;

/// Follows each canonical URL at most once
///
/// The seen-set grows for the lifetime of one crawl. Checking and recording
/// a URL is a single `insert` on a concurrent set, so two tasks that find the
/// same new URL at the same moment cannot both be allowed to enqueue it.
#[derive(Debug, Default)]
pub struct UnseenFollower {
    seen: DashSet<String>,
}

impl UnseenFollower {
    /// Creates a follower that already considers `seen` URLs visited
    ///
    /// The seed URL belongs here so that links back to it are not crawled twice.
    pub fn new<I>(seen: I) -> Self
    where
        I: IntoIterator<Item = Url>,
    {
        let follower = Self::default();
        for url in seen {
            follower.seen.insert(canonical_key(&url));
        }
        follower
    }

    /// Number of distinct canonical URLs recorded so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn has_seen(&self, url: &Url) -> bool {
        self.seen.contains(&canonical_key(url))
    }
}

impl Follower for UnseenFollower {
    fn follow(&self, link: &Link) -> Result<(), Denial> {
        if self.seen.insert(canonical_key(&link.url)) {
            Ok(())
        } else {
            Err(Denial::Seen)
        }
    }
}
