//! Crawl coordinator
//!
//! The coordinator owns the task queue and dispatches each task to its own
//! crawl unit. A unit fetches its page, emits it, and offers every anchor link
//! to the follower chain; accepted links go back onto the queue. The crawl
//! ends when the [`WorkTracker`] reports that no task is queued or running.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::tracker::{WorkGuard, WorkTracker};
use crate::follower::Follower;
use crate::model::{Page, Task};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// Default capacity of the internal task queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default capacity of the page stream handed to the consumer
pub const DEFAULT_OUTPUT_CAPACITY: usize = 100;

/// A task on the queue, carrying its share of the outstanding-work count
struct Queued {
    task: Task,
    guard: WorkGuard,
}

/// State shared by every crawl unit
struct Shared {
    fetcher: Arc<dyn Fetcher>,
    follower: Arc<dyn Follower>,
    tracker: Arc<WorkTracker>,
    permits: Option<Semaphore>,
    emitted: AtomicUsize,
}

/// Crawl orchestrator
///
/// # Example
///
/// ```no_run
/// use gergle::crawler::{Crawler, MockFetcher};
/// use gergle::follower::{Policy, Unanimous};
/// use url::Url;
///
/// # async fn example() {
/// let seed = Url::parse("http://a/").unwrap();
/// let follower = Unanimous::new(vec![Policy::Local]);
/// let mut pages = Crawler::new(MockFetcher::default(), follower)
///     .with_max_concurrency(Some(4))
///     .crawl(seed);
///
/// while let Some(page) = pages.recv().await {
///     println!("{}", page.url());
/// }
/// # }
/// ```
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    follower: Arc<dyn Follower>,
    queue_capacity: usize,
    output_capacity: usize,
    max_concurrency: Option<usize>,
}

impl Crawler {
    pub fn new<F, L>(fetcher: F, follower: L) -> Self
    where
        F: Fetcher + 'static,
        L: Follower + 'static,
    {
        Self {
            fetcher: Arc::new(fetcher),
            follower: Arc::new(follower),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
            max_concurrency: None,
        }
    }

    /// Sets the task queue capacity (minimum 1)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Sets the output stream capacity (minimum 1)
    pub fn with_output_capacity(mut self, capacity: usize) -> Self {
        self.output_capacity = capacity.max(1);
        self
    }

    /// Caps how many fetches run at once
    ///
    /// `None` runs every dispatched task immediately. `Some(0)` is treated
    /// as `Some(1)`.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|n| n.max(1));
        self
    }

    /// Starts crawling from `seed` and returns the stream of pages
    ///
    /// Must be called inside a tokio runtime. Every task produces exactly
    /// one page. The stream closes once the crawl has run out of work.
    /// Dropping the receiver winds the crawl down: running units finish
    /// their fetch but no further links are followed.
    pub fn crawl(self, seed: Url) -> mpsc::Receiver<Page> {
        let (pages_tx, pages_rx) = mpsc::channel(self.output_capacity);
        tokio::spawn(self.run(seed, pages_tx));
        pages_rx
    }

    async fn run(self, seed: Url, pages_tx: mpsc::Sender<Page>) {
        let start = Instant::now();
        tracing::info!("Starting crawl from {}", seed);

        let tracker = Arc::new(WorkTracker::new(1));
        let shared = Arc::new(Shared {
            fetcher: self.fetcher,
            follower: self.follower,
            tracker: Arc::clone(&tracker),
            permits: self.max_concurrency.map(Semaphore::new),
            emitted: AtomicUsize::new(0),
        });

        let (tasks_tx, mut tasks_rx) = mpsc::channel::<Queued>(self.queue_capacity);
        let seed = Queued {
            task: Task::seed(seed),
            guard: WorkGuard::adopt(Arc::clone(&tracker)),
        };
        // The queue is empty and we hold the receiver.
        if tasks_tx.send(seed).await.is_err() {
            return;
        }

        let mut units = JoinSet::new();
        loop {
            tokio::select! {
                biased;

                _ = tracker.wait_idle() => break,

                Some(queued) = tasks_rx.recv() => {
                    if pages_tx.is_closed() {
                        tracing::debug!("Output closed, dropping {}", queued.task.url);
                        continue;
                    }
                    units.spawn(process_task(
                        Arc::clone(&shared),
                        queued,
                        tasks_tx.clone(),
                        pages_tx.clone(),
                    ));
                }

                else => break,
            }

            while let Some(result) = units.try_join_next() {
                report_unit(result);
            }
        }

        while let Some(result) = units.join_next().await {
            report_unit(result);
        }

        tracing::info!(
            "Crawl complete: {} pages in {:.2?}",
            shared.emitted.load(Ordering::Relaxed),
            start.elapsed()
        );
    }
}

/// Crawls from `seed` with default queue sizes and no concurrency cap
pub fn crawl<F, L>(fetcher: F, seed: Url, follower: L) -> mpsc::Receiver<Page>
where
    F: Fetcher + 'static,
    L: Follower + 'static,
{
    Crawler::new(fetcher, follower).crawl(seed)
}

/// Runs one crawl unit: fetch, emit, then evaluate the page's links
async fn process_task(
    shared: Arc<Shared>,
    queued: Queued,
    tasks_tx: mpsc::Sender<Queued>,
    pages_tx: mpsc::Sender<Page>,
) {
    let Queued { task, guard: _guard } = queued;
    tracing::debug!("Fetching {} (depth {})", task.url, task.depth);

    let page = {
        let _permit = match &shared.permits {
            Some(permits) => permits.acquire().await.ok(),
            None => None,
        };
        shared.fetcher.fetch(&task).await
    };

    let links = page.links().to_vec();
    if pages_tx.send(page).await.is_err() {
        tracing::debug!("Output closed, not following links from {}", task.url);
        return;
    }
    shared.emitted.fetch_add(1, Ordering::Relaxed);

    for link in links.iter().filter(|link| link.is_anchor()) {
        let guard = WorkGuard::new(Arc::clone(&shared.tracker));
        match shared.follower.follow(link) {
            Ok(()) => {
                let queued = Queued {
                    task: Task::from(link),
                    guard,
                };
                if tasks_tx.send(queued).await.is_err() {
                    tracing::debug!("Task queue closed, dropping {}", link.url);
                }
            }
            Err(denial) => {
                tracing::debug!("Not following {}: {}", link.url, denial);
            }
        }
    }
}

fn report_unit(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!("Crawl unit panicked: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::mock::MockFetcher;
    use crate::follower::{Denial, Policy, Unanimous, UnseenFollower};
    use crate::model::Link;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn page(s: &str, depth: u32, hrefs: &[&str]) -> Page {
        let base = url(s);
        let links = hrefs
            .iter()
            .map(|href| Link::anchor(href, &base, depth + 1).unwrap())
            .collect();
        Page::processed(base, depth, links, vec![])
    }

    async fn collect(mut pages: mpsc::Receiver<Page>) -> Vec<Page> {
        let mut out = Vec::new();
        while let Some(page) = pages.recv().await {
            out.push(page);
        }
        out
    }

    #[tokio::test]
    async fn test_single_page_crawl_closes_stream() {
        let fetcher = MockFetcher::new([page("http://a/", 0, &[])]);
        let pages = tokio::time::timeout(
            Duration::from_secs(5),
            collect(crawl(fetcher, url("http://a/"), Unanimous::<Policy>::default())),
        )
        .await
        .expect("crawl terminated");

        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_processed());
    }

    #[tokio::test]
    async fn test_failed_seed_still_emitted() {
        let pages = collect(crawl(
            MockFetcher::default(),
            url("http://a/"),
            Unanimous::<Policy>::default(),
        ))
        .await;

        assert_eq!(pages.len(), 1);
        assert!(!pages[0].is_processed());
        assert_eq!(pages[0].depth(), 0);
    }

    #[tokio::test]
    async fn test_cycle_terminates_with_unseen() {
        let fetcher = MockFetcher::new([
            page("http://a/", 0, &["/b"]),
            page("http://a/b", 1, &["/", "/b"]),
        ]);
        let follower = Unanimous::new(vec![Policy::Unseen(UnseenFollower::new([url(
            "http://a/",
        )]))]);

        let pages = collect(crawl(fetcher, url("http://a/"), follower)).await;
        assert_eq!(pages.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_tiny_queue_with_cap_does_not_deadlock() {
        // Root links to twenty children; the queue holds one task.
        let children: Vec<String> = (0..20).map(|i| format!("/c{}", i)).collect();
        let hrefs: Vec<&str> = children.iter().map(String::as_str).collect();
        let mut pages = vec![page("http://a/", 0, &hrefs)];
        pages.extend(children.iter().map(|c| page(&format!("http://a{}", c), 1, &[])));

        let crawler = Crawler::new(MockFetcher::new(pages), Unanimous::<Policy>::default())
            .with_queue_capacity(1)
            .with_output_capacity(1)
            .with_max_concurrency(Some(1));

        let pages = tokio::time::timeout(Duration::from_secs(10), collect(crawler.crawl(url("http://a/"))))
            .await
            .expect("crawl terminated");
        assert_eq!(pages.len(), 21);
    }

    struct PanicOn(&'static str);

    #[async_trait]
    impl Fetcher for PanicOn {
        async fn fetch(&self, task: &Task) -> Page {
            if task.url.path() == self.0 {
                panic!("fetcher exploded");
            }
            page(task.url.as_str(), task.depth, &["/boom", "/fine"])
        }
    }

    #[tokio::test]
    async fn test_panicking_unit_does_not_stall_crawl() {
        let follower = UnseenFollower::new([url("http://a/")]);
        let pages = tokio::time::timeout(
            Duration::from_secs(5),
            collect(crawl(PanicOn("/boom"), url("http://a/"), follower)),
        )
        .await
        .expect("crawl terminated");

        // The root and /fine are emitted; /boom's unit died without a page.
        assert_eq!(pages.len(), 2);
    }

    #[tokio::test]
    async fn test_dropped_receiver_winds_down() {
        struct Endless(Arc<AtomicUsize>);

        #[async_trait]
        impl Fetcher for Endless {
            async fn fetch(&self, task: &Task) -> Page {
                self.0.fetch_add(1, Ordering::SeqCst);
                let next = format!("/{}", task.depth + 1);
                page(task.url.as_str(), task.depth, &[next.as_str()])
            }
        }

        struct Everything;

        impl Follower for Everything {
            fn follow(&self, _link: &Link) -> Result<(), Denial> {
                Ok(())
            }
        }

        let fetches = Arc::new(AtomicUsize::new(0));
        let mut pages = crawl(Endless(Arc::clone(&fetches)), url("http://a/0"), Everything);
        assert!(pages.recv().await.is_some());
        drop(pages);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let settled = fetches.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), settled);
    }

    /// Records, whenever a link is offered, whether the page carrying it
    /// had already reached the consumer
    struct EmittedBeforeFollow {
        pages: Mutex<Option<mpsc::Receiver<Page>>>,
        received: Mutex<HashSet<Url>>,
        parents: HashMap<Url, Url>,
        checked: AtomicUsize,
        out_of_order: AtomicUsize,
    }

    impl Follower for EmittedBeforeFollow {
        fn follow(&self, link: &Link) -> Result<(), Denial> {
            let mut received = self.received.lock().unwrap();
            if let Some(pages) = self.pages.lock().unwrap().as_mut() {
                while let Ok(page) = pages.try_recv() {
                    received.insert(page.url().clone());
                }
            }

            if !received.contains(&self.parents[&link.url]) {
                self.out_of_order.fetch_add(1, Ordering::SeqCst);
            }
            self.checked.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_page_emitted_before_links_followed() {
        // Root with five children, each with three grandchildren.
        let mut pages = Vec::new();
        let children: Vec<String> = (0..5).map(|i| format!("/c{}", i)).collect();
        let hrefs: Vec<&str> = children.iter().map(String::as_str).collect();
        pages.push(page("http://a/", 0, &hrefs));
        for child in &children {
            let grandchildren: Vec<String> = (0..3).map(|j| format!("{}/g{}", child, j)).collect();
            let hrefs: Vec<&str> = grandchildren.iter().map(String::as_str).collect();
            pages.push(page(&format!("http://a{}", child), 1, &hrefs));
            pages.extend(grandchildren.iter().map(|g| page(&format!("http://a{}", g), 2, &[])));
        }
        let total = pages.len();

        let parents = pages
            .iter()
            .flat_map(|p| p.links().iter().map(move |l| (l.url.clone(), p.url().clone())))
            .collect();
        let follower = Arc::new(EmittedBeforeFollow {
            pages: Mutex::new(None),
            received: Mutex::new(HashSet::new()),
            parents,
            checked: AtomicUsize::new(0),
            out_of_order: AtomicUsize::new(0),
        });

        // Nothing runs before the first await, so the follower owns the
        // stream before any link is offered.
        let stream = crawl(MockFetcher::new(pages), url("http://a/"), Arc::clone(&follower));
        *follower.pages.lock().unwrap() = Some(stream);

        tokio::time::timeout(Duration::from_secs(5), async {
            while follower.checked.load(Ordering::SeqCst) < total - 1 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("every link offered");

        let rest = follower.pages.lock().unwrap().take().unwrap();
        let rest = tokio::time::timeout(Duration::from_secs(5), collect(rest))
            .await
            .expect("crawl terminated");

        assert_eq!(follower.received.lock().unwrap().len() + rest.len(), total);
        assert_eq!(follower.checked.load(Ordering::SeqCst), total - 1);
        assert_eq!(follower.out_of_order.load(Ordering::SeqCst), 0);
    }
}
