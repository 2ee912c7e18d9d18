//! Retained engine sessions.
//!
//! Starting a session and loading an asset library is expensive, so
//! opens that ask to keep the engine open hand their session back to a
//! process-wide cache. Entries are keyed by library path, asset name and
//! the library's modification time, so editing the file on disk misses
//! the cache. The cache is capped, and a watcher thread empties it after
//! a period of inactivity.
//!
//! Sessions are popped for the duration of a cook, so two concurrent
//! opens never share one session.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use super::{Engine, EngineFactory};
use crate::util::Result;

/// Environment variable overriding the cache capacity.
pub const SESSION_CACHE_SIZE_ENV: &str = "HOUDINI_HDADYNAMICPAYLOAD_CACHESIZE";
pub const DEFAULT_CACHE_CAPACITY: usize = 8;
/// Inactivity after which every retained session is released.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Identity of a retained session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub path: PathBuf,
    pub asset_name: String,
    /// `None` when the file's modification time is unavailable.
    pub modified: Option<SystemTime>,
}

impl SessionKey {
    /// Key for `path`, stamped with its current modification time.
    pub fn new(path: impl AsRef<Path>, asset_name: Option<&str>) -> Self {
        let path = path.as_ref();
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        Self {
            path: path.to_path_buf(),
            asset_name: asset_name.unwrap_or_default().to_string(),
            modified,
        }
    }
}

/// Session cache settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionCacheConfig {
    /// Maximum retained sessions; the least recently returned is evicted.
    pub capacity: usize,
    pub idle_timeout: Duration,
}

impl SessionCacheConfig {
    /// Defaults, with the capacity overridable from the environment.
    pub fn from_env() -> Self {
        let capacity = std::env::var(SESSION_CACHE_SIZE_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_CACHE_CAPACITY);
        Self {
            capacity,
            ..Self::default()
        }
    }
}

impl Default for SessionCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

struct CacheState {
    /// Oldest first.
    entries: VecDeque<(SessionKey, Arc<dyn Engine>)>,
    last_access: Instant,
    /// An idle watcher thread is running.
    watching: bool,
    /// Set when the cache is dropped; the watcher exits.
    closed: bool,
}

struct Shared {
    config: SessionCacheConfig,
    state: Mutex<CacheState>,
    wake: Condvar,
}

/// Process-wide store of retained engine sessions.
///
/// While sessions are retained a watcher thread releases them once the
/// cache has gone unused for the idle timeout.
pub struct SessionCache {
    factory: Arc<dyn EngineFactory>,
    shared: Arc<Shared>,
}

impl SessionCache {
    /// Create a cache with settings from the environment.
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self::with_config(factory, SessionCacheConfig::from_env())
    }

    pub fn with_config(factory: Arc<dyn EngineFactory>, config: SessionCacheConfig) -> Self {
        Self {
            factory,
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(CacheState {
                    entries: VecDeque::new(),
                    last_access: Instant::now(),
                    watching: false,
                    closed: false,
                }),
                wake: Condvar::new(),
            }),
        }
    }

    pub fn config(&self) -> &SessionCacheConfig {
        &self.shared.config
    }

    /// Whether sessions for `keep_open` requests are actually retained.
    pub fn retains(&self, keep_open: bool) -> bool {
        keep_open && self.config().capacity > 0 && self.factory.supports_session_retention()
    }

    /// Get a session for `key`: a retained one when allowed and
    /// available, otherwise a freshly started one.
    pub fn acquire(&self, key: &SessionKey, keep_open: bool) -> Result<Arc<dyn Engine>> {
        if self.retains(keep_open) {
            if let Some(session) = self.pop(key) {
                debug!("Reusing engine session for {}", key.path.display());
                return Ok(session);
            }
        }
        let asset_name = (!key.asset_name.is_empty()).then_some(key.asset_name.as_str());
        debug!("Starting engine session for {}", key.path.display());
        self.factory.start_session(&key.path, asset_name)
    }

    /// Return a session after use. It is kept only when retention was
    /// requested and the session is still alive; otherwise it is dropped.
    pub fn release(&self, key: SessionKey, session: Arc<dyn Engine>, keep_open: bool) {
        if self.retains(keep_open) && session.is_alive() {
            self.push(key, session);
        }
    }

    /// Remove and return the retained session for `key`.
    pub fn pop(&self, key: &SessionKey) -> Option<Arc<dyn Engine>> {
        let mut state = self.shared.state.lock();
        self.touch(&mut state);

        let pos = state.entries.iter().position(|(k, _)| k == key)?;
        let (_, session) = state.entries.remove(pos)?;
        session.is_alive().then_some(session)
    }

    /// Retain a session, replacing any entry with the same key.
    pub fn push(&self, key: SessionKey, session: Arc<dyn Engine>) {
        let mut state = self.shared.state.lock();
        self.touch(&mut state);

        state.entries.retain(|(k, _)| k != &key);
        state.entries.push_back((key, session));
        while state.entries.len() > self.config().capacity {
            if let Some((evicted, _)) = state.entries.pop_front() {
                debug!("Evicting engine session for {}", evicted.path.display());
            }
        }
        self.watch(&mut state);
    }

    /// Release everything if the cache has been idle too long.
    /// Returns true when sessions were released.
    pub fn evict_idle(&self) -> bool {
        let mut state = self.shared.state.lock();
        expire(&self.shared.config, &mut state)
    }

    /// Release every retained session, e.g. at process shutdown.
    /// Documents still referencing a session fail their next cook.
    pub fn clear(&self) {
        let released = {
            let mut state = self.shared.state.lock();
            let released = std::mem::take(&mut state.entries);
            self.shared.wake.notify_all();
            released
        };
        drop(released);
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn touch(&self, state: &mut CacheState) {
        expire(&self.shared.config, state);
        state.last_access = Instant::now();
    }

    /// Start the idle watcher unless one is already running.
    fn watch(&self, state: &mut CacheState) {
        if state.watching || state.closed || state.entries.is_empty() {
            return;
        }
        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("hda-session-idle".into())
            .spawn(move || watch_idle(shared));
        match spawned {
            Ok(_) => state.watching = true,
            // Expiry still happens lazily on the next access.
            Err(e) => warn!("Failed to start session idle watcher: {e}"),
        }
    }
}

impl Drop for SessionCache {
    fn drop(&mut self) {
        let released = {
            let mut state = self.shared.state.lock();
            state.closed = true;
            let released = std::mem::take(&mut state.entries);
            self.shared.wake.notify_all();
            released
        };
        drop(released);
    }
}

fn expire(config: &SessionCacheConfig, state: &mut CacheState) -> bool {
    if state.entries.is_empty() || state.last_access.elapsed() < config.idle_timeout {
        return false;
    }
    debug!("Engine session cache idle, releasing {} sessions", state.entries.len());
    state.entries.clear();
    true
}

/// Watcher loop: sleep until the idle deadline, re-reading the last
/// access time on every wake, and release the sessions once it passes.
fn watch_idle(shared: Arc<Shared>) {
    let mut state = shared.state.lock();
    loop {
        if state.closed || state.entries.is_empty() {
            break;
        }
        let idle = state.last_access.elapsed();
        if idle >= shared.config.idle_timeout {
            let released = std::mem::take(&mut state.entries);
            debug!("Engine session cache idle, releasing {} sessions", released.len());
            state.watching = false;
            drop(state);
            drop(released);
            return;
        }
        let remaining = shared.config.idle_timeout - idle;
        shared.wake.wait_for(&mut state, remaining);
    }
    state.watching = false;
}
