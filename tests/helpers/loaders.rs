//! Instrumented loaders.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use parking_lot::Mutex;
use reflect::host::{Loader, Profile, TypeHandle, TypeRegistry};

/// Counts every `load_type` call before delegating.
#[derive(Debug)]
pub struct CountingLoader {
    inner: Arc<TypeRegistry>,
    calls: AtomicUsize,
}

impl CountingLoader {
    pub fn new(inner: Arc<TypeRegistry>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Loader for CountingLoader {
    fn load_type(&self, name: &str) -> Option<TypeHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.load_type(name)
    }

    fn profile(&self) -> Profile {
        self.inner.profile()
    }
}

/// Blocks inside `load_type` until released, so a test can act while a
/// resolution is in flight.
#[derive(Debug)]
pub struct GatedLoader {
    inner: Arc<TypeRegistry>,
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

/// The test's side of a [`GatedLoader`].
pub struct Gate {
    entered: Receiver<()>,
    release: Sender<()>,
}

impl Gate {
    /// Wait until a resolution is blocked inside the loader.
    pub fn wait_entered(&self) {
        self.entered.recv().unwrap();
    }

    /// Let one blocked resolution continue.
    pub fn release(&self) {
        self.release.send(()).unwrap();
    }
}

impl GatedLoader {
    pub fn new(inner: Arc<TypeRegistry>) -> (Arc<Self>, Gate) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let loader = Arc::new(Self {
            inner,
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        let gate = Gate {
            entered: entered_rx,
            release: release_tx,
        };
        (loader, gate)
    }
}

impl Loader for GatedLoader {
    fn load_type(&self, name: &str) -> Option<TypeHandle> {
        self.entered.lock().send(()).unwrap();
        self.release.lock().recv().unwrap();
        self.inner.load_type(name)
    }
}
