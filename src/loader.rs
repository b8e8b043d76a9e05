//! Background feed loading.
//!
//! Each request runs on its own thread and reports back over an [`mpsc`]
//! channel that the main loop drains every tick.  Results carry the
//! generation of the request that produced them so the app can ignore a
//! feed that arrives after the user has already switched podcasts.

use std::sync::mpsc;
use std::thread;

use crate::episode::Feed;
use crate::source::FeedSource;

/// Messages sent from a loader thread to the UI thread.
pub enum LoadMsg {
    Loaded { generation: u64, feed: Feed },
    Failed { generation: u64, error: String },
}

/// Sends load requests and collects their results.
pub struct Loader {
    tx: mpsc::Sender<LoadMsg>,
    rx: mpsc::Receiver<LoadMsg>,
}

impl Loader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Fetch `source` on a background thread.
    pub fn request(&self, source: Box<dyn FeedSource>, generation: u64) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let msg = match source.fetch() {
                Ok(feed) => LoadMsg::Loaded { generation, feed },
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "feed fetch failed");
                    LoadMsg::Failed {
                        generation,
                        error: format!("{}: {e:#}", source.name()),
                    }
                }
            };
            // The receiver is gone only once the main thread has exited.
            let _ = tx.send(msg);
        });
    }

    /// Next finished load, if any.  Never blocks.
    pub fn try_recv(&self) -> Option<LoadMsg> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Fixed(Option<Feed>);

    impl FeedSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self) -> anyhow::Result<Feed> {
            self.0.clone().ok_or_else(|| anyhow::anyhow!("offline"))
        }
    }

    fn wait(loader: &Loader) -> LoadMsg {
        loader
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("loader thread should report back")
    }

    #[test]
    fn reports_loaded_feed_with_generation() {
        let loader = Loader::new();
        let feed = Feed {
            title: "t".into(),
            ..Feed::default()
        };
        loader.request(Box::new(Fixed(Some(feed))), 7);

        match wait(&loader) {
            LoadMsg::Loaded { generation, feed } => {
                assert_eq!(generation, 7);
                assert_eq!(feed.title, "t");
            }
            LoadMsg::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    #[test]
    fn reports_failure_with_source_name() {
        let loader = Loader::new();
        loader.request(Box::new(Fixed(None)), 1);

        match wait(&loader) {
            LoadMsg::Failed { generation, error } => {
                assert_eq!(generation, 1);
                assert_eq!(error, "fixed: offline");
            }
            LoadMsg::Loaded { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn try_recv_is_empty_without_requests() {
        assert!(Loader::new().try_recv().is_none());
    }
}
