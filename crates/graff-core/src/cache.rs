//! Keep rasterized glyphs around so repeated letters feel instant
//!
//! Rasterizing a glyph is the expensive step of a generation request, and
//! the same handful of letters comes back on every keystroke. The cache
//! keys each [`ProcessedGlyph`] by character and variant and lets entries
//! expire lazily: an entry older than the TTL is dropped the next time
//! someone reads it. There is no background sweep.
//!
//! Time comes from an injected [`Clock`], so expiry is testable without
//! sleeping.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::types::{AssetKey, ProcessedGlyph};

/// Default time-to-live for cached glyphs (30 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Millisecond time source for cache expiry
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since the Unix epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Cache tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

/// A cached glyph plus the moment it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub glyph: Arc<ProcessedGlyph>,
    pub inserted_at: u64,
}

/// Everything you need to know about cache performance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub total_requests: u64,
    pub hits: u64,
    pub misses: u64,
    /// Misses caused by an entry that outlived its TTL
    pub expired: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64
        }
    }
}

/// Process-wide TTL cache of rasterized glyphs
///
/// Writes replace whole entries, last write wins. Reads that race with a
/// write see either the old or the new entry, never a torn one.
pub struct GlyphCache {
    entries: RwLock<HashMap<AssetKey, CacheEntry>>,
    metrics: RwLock<CacheMetrics>,
    ttl_ms: u64,
    clock: Arc<dyn Clock>,
}

impl GlyphCache {
    /// A cache with the default 30 minute TTL on the system clock
    pub fn new() -> Self {
        Self::with_clock(CacheConfig::default(), Arc::new(SystemClock))
    }

    /// A cache with explicit configuration and time source
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            metrics: RwLock::new(CacheMetrics::default()),
            ttl_ms: config.ttl.as_millis() as u64,
            clock,
        }
    }

    /// Look up a glyph; expired entries are evicted and reported as misses
    pub fn get(&self, key: &AssetKey) -> Option<Arc<ProcessedGlyph>> {
        let now = self.clock.now_ms();
        let mut metrics = self.metrics.write();
        metrics.total_requests += 1;

        let mut entries = self.entries.write();
        let expired = match entries.get(key) {
            Some(entry) if now.saturating_sub(entry.inserted_at) < self.ttl_ms => {
                metrics.hits += 1;
                log::trace!("Glyph cache hit for {}", key);
                return Some(Arc::clone(&entry.glyph));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
            metrics.expired += 1;
            log::trace!("Glyph cache entry for {} expired", key);
        }
        metrics.misses += 1;
        None
    }

    /// Store a glyph, replacing any previous entry for the key
    pub fn insert(&self, key: AssetKey, glyph: Arc<ProcessedGlyph>) {
        let entry = CacheEntry {
            glyph,
            inserted_at: self.clock.now_ms(),
        };
        self.entries.write().insert(key, entry);
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        log::info!("Clearing glyph cache ({} entries)", entries.len());
        entries.clear();
    }

    /// Number of stored entries, including ones that expired but were not read yet
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn metrics(&self) -> CacheMetrics {
        *self.metrics.read()
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GlyphCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("entries", &self.len())
            .field("ttl_ms", &self.ttl_ms)
            .finish()
    }
}

/// Thread-safe shared glyph cache
pub type SharedGlyphCache = Arc<GlyphCache>;
