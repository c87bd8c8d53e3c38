use std::collections::HashSet;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use egui::ColorImage;
use tracing::{debug, warn};
use crate::core::image_loader_factory::{ImageLoaderFactory, LoadError};
use crate::error::Result;

/// A finished background load, handed back to the UI thread.
pub struct LoadOutcome<T> {
    pub tag: T,
    pub source: String,
    pub result: std::result::Result<ColorImage, LoadError>,
}

/// Runs image loads off the UI thread. Each request carries a caller-defined
/// tag that comes back with its outcome; the manager never interprets it.
pub struct PreloadManager<T> {
    receiver: mpsc::Receiver<LoadOutcome<T>>,
    sender: mpsc::Sender<LoadOutcome<T>>,
    loading_sources: Arc<Mutex<HashSet<(String, (u32, u32))>>>,
    pool: Arc<ThreadPool>,
    loader_factory: ImageLoaderFactory,
    notify: Notifier,
}

type Notifier = Arc<dyn Fn() + Send + Sync>;

impl<T: Send + 'static> PreloadManager<T> {
    pub fn new(max_threads: usize) -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let threads = num_cpus::get().clamp(1, max_threads.max(1));
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("image-loader-{i}"))
            .build()?;
        debug!(threads, "image loader pool started");

        Ok(Self {
            receiver,
            sender,
            loading_sources: Arc::new(Mutex::new(HashSet::new())),
            pool: Arc::new(pool),
            loader_factory: ImageLoaderFactory::new(),
            notify: Arc::new(|| {}),
        })
    }

    /// Called from a worker thread after each outcome is queued, e.g. to wake
    /// the UI.
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Arc::new(notify);
        self
    }

    /// Loads `source` and always reports the outcome, even if the same source
    /// is already in flight for another request.
    pub fn request(&self, tag: T, source: &str, max_size: (u32, u32)) {
        let sender = self.sender.clone();
        let factory = self.loader_factory.clone();
        let notify = Arc::clone(&self.notify);
        let source = source.to_string();

        self.pool.spawn(move || {
            let result = factory.load_image(&source, max_size);
            // The receiver is gone once the viewer shuts down.
            if sender.send(LoadOutcome { tag, source, result }).is_ok() {
                notify();
            }
        });
    }

    /// Best-effort warm-up of `source`. Skipped while an earlier preload of the
    /// same source is still running.
    pub fn preload(&self, tag: T, source: &str, max_size: (u32, u32)) {
        self.preload_batch(vec![(tag, source.to_string())], max_size);
    }

    pub fn preload_batch(&self, requests: Vec<(T, String)>, max_size: (u32, u32)) {
        let requests: Vec<_> = {
            let mut loading = self.loading_sources.lock().unwrap_or_else(PoisonError::into_inner);
            requests
                .into_iter()
                .filter(|(_, source)| loading.insert((source.clone(), max_size)))
                .collect()
        };
        if requests.is_empty() {
            return;
        }

        let sender = self.sender.clone();
        let loading_sources = Arc::clone(&self.loading_sources);
        let factory = self.loader_factory.clone();
        let notify = Arc::clone(&self.notify);

        self.pool.spawn(move || {
            requests.into_par_iter().for_each(|(tag, source)| {
                let result = factory.load_image(&source, max_size);
                if let Err(e) = &result {
                    warn!(%source, error = %e, "preload failed");
                }
                let key = (source, max_size);
                loading_sources
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&key);
                let (source, _) = key;
                if sender.send(LoadOutcome { tag, source, result }).is_ok() {
                    notify();
                }
            });
        });
    }

    pub fn is_loading(&self, source: &str, max_size: (u32, u32)) -> bool {
        self.loading_sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(source.to_string(), max_size))
    }

    /// Every outcome that has arrived since the last call, without blocking.
    pub fn drain(&self) -> Vec<LoadOutcome<T>> {
        self.receiver.try_iter().collect()
    }

    #[cfg(test)]
    fn wait(&self, timeout: std::time::Duration) -> Option<LoadOutcome<T>> {
        self.receiver.recv_timeout(timeout).ok()
    }
}
