//! Link-following policies
//!
//! Every anchor link found on a crawled page is put to a [`Follower`]. The
//! crawler's follower is normally a [`Unanimous`] chain of [`Policy`]
//! variants: the link becomes a new task only if every policy allows it.
//!
//! Denials are an expected outcome, not an error of the crawl. The reason is
//! carried in [`Denial`] so it can be logged.

mod disallow;
mod unseen;

pub use disallow::DisallowFollower;
pub use unseen::UnseenFollower;

use crate::model::Link;
use thiserror::Error;

/// Why a link will not be followed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("not an internal link")]
    External,

    #[error("link beyond depth {max_depth}")]
    TooDeep { max_depth: u32 },

    #[error("link disallowed by rule {rule}")]
    Disallowed { rule: String },

    #[error("link already seen")]
    Seen,
}

/// Decides whether a discovered link becomes future crawl work
///
/// Implementations are called concurrently from every in-flight task.
pub trait Follower: Send + Sync {
    fn follow(&self, link: &Link) -> Result<(), Denial>;
}

impl<F: Follower + ?Sized> Follower for std::sync::Arc<F> {
    fn follow(&self, link: &Link) -> Result<(), Denial> {
        (**self).follow(link)
    }
}

impl<F: Follower + ?Sized> Follower for Box<F> {
    fn follow(&self, link: &Link) -> Result<(), Denial> {
        (**self).follow(link)
    }
}

/// The standard follow policies
#[derive(Debug)]
pub enum Policy {
    /// Deny links leaving the seed's site
    Local,

    /// Deny links deeper than `max_depth` (a link at exactly `max_depth` is allowed)
    Shallow { max_depth: u32 },

    /// Deny links whose path matches a disallow rule
    Disallow(DisallowFollower),

    /// Deny links that were already seen
    Unseen(UnseenFollower),
}

impl Follower for Policy {
    fn follow(&self, link: &Link) -> Result<(), Denial> {
        match self {
            Self::Local => {
                if link.external {
                    Err(Denial::External)
                } else {
                    Ok(())
                }
            }
            Self::Shallow { max_depth } => {
                if link.depth > *max_depth {
                    Err(Denial::TooDeep {
                        max_depth: *max_depth,
                    })
                } else {
                    Ok(())
                }
            }
            Self::Disallow(rules) => rules.follow(link),
            Self::Unseen(seen) => seen.follow(link),
        }
    }
}

/// All-of combinator over member followers
///
/// Members are consulted in order and the first denial is returned without
/// consulting the rest. An empty chain allows everything.
///
/// Order matters for stateful members: put [`Policy::Unseen`] last so a link
/// is only recorded as seen once every other policy has allowed it.
#[derive(Debug)]
pub struct Unanimous<F = Policy>(pub Vec<F>);

impl<F> Unanimous<F> {
    pub fn new(members: Vec<F>) -> Self {
        Self(members)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F> Default for Unanimous<F> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<F: Follower> Follower for Unanimous<F> {
    fn follow(&self, link: &Link) -> Result<(), Denial> {
        self.0.iter().try_for_each(|member| member.follow(link))
    }
}
