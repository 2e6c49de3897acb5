//! Waveform cache
//!
//! Maps asset identifier to an immutable in-memory sample buffer. Each
//! identifier is read from the store at most once; later requests hand out
//! the same buffer. The map only grows: the asset set is small and fixed.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::AssetError;
use crate::hal::storage::AssetStore;

/// Immutable unsigned 8-bit mono PCM buffer.
///
/// Clones share the buffer.
#[derive(Debug, Clone)]
pub struct Waveform {
    id: Rc<str>,
    data: Rc<[u8]>,
}

impl Waveform {
    /// Wrap loaded bytes.
    pub fn new(id: &str, data: Vec<u8>) -> Self {
        Self {
            id: Rc::from(id),
            data: Rc::from(data),
        }
    }

    /// Source identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Length in frames (one byte per frame).
    #[inline]
    pub fn frames(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    /// Nominal playback duration at `sample_rate`.
    pub fn duration_us(&self, sample_rate: u32) -> u64 {
        if sample_rate == 0 {
            return 0;
        }
        self.data.len() as u64 * 1_000_000 / sample_rate as u64
    }

    /// True if both handles point at the same loaded buffer.
    #[inline]
    pub fn shares_buffer_with(&self, other: &Waveform) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

/// Lazily filled identifier → waveform map in front of an [`AssetStore`].
pub struct WaveformCache<S: AssetStore> {
    store: S,
    entries: BTreeMap<String, Waveform>,
}

impl<S: AssetStore> WaveformCache<S> {
    /// Create an empty cache over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: BTreeMap::new(),
        }
    }

    /// Return the cached waveform for `id`, loading it on first request.
    ///
    /// A failed load inserts nothing; the next request retries the store.
    pub fn preload(&mut self, id: &str) -> Result<Waveform, AssetError> {
        if let Some(waveform) = self.entries.get(id) {
            return Ok(waveform.clone());
        }

        let data = self.store.read_all(id)?;
        let waveform = Waveform::new(id, data);
        self.entries.insert(String::from(id), waveform.clone());
        Ok(waveform)
    }

    /// Whether `id` is already loaded.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of loaded waveforms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes held by loaded waveforms.
    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(Waveform::frames).sum()
    }

    /// Backing store, for streaming playback that bypasses the cache.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
