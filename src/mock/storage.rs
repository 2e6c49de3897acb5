//! In-memory asset store

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

use crate::error::AssetError;
use crate::hal::storage::{AssetReader, AssetStore};

#[derive(Debug, Default)]
struct StoreInner {
    assets: BTreeMap<String, Rc<[u8]>>,
    opens: BTreeMap<String, usize>,
    /// Asset id → byte offset at which reads start failing
    fail_at: BTreeMap<String, usize>,
}

/// Asset store backed by a map, counting every open.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an asset.
    pub fn insert(&self, id: &str, data: &[u8]) {
        self.inner
            .borrow_mut()
            .assets
            .insert(String::from(id), Rc::from(data));
    }

    /// Reads of `id` fail once `offset` bytes were delivered.
    pub fn fail_reads_after(&self, id: &str, offset: usize) {
        self.inner.borrow_mut().fail_at.insert(String::from(id), offset);
    }

    /// How many times `id` was opened.
    pub fn opens(&self, id: &str) -> usize {
        self.inner.borrow().opens.get(id).copied().unwrap_or(0)
    }

    /// Opens across all assets.
    pub fn total_opens(&self) -> usize {
        self.inner.borrow().opens.values().sum()
    }
}

impl AssetStore for MemStore {
    type Reader = MemReader;

    fn open(&mut self, id: &str) -> Result<MemReader, AssetError> {
        let mut inner = self.inner.borrow_mut();
        *inner.opens.entry(String::from(id)).or_insert(0) += 1;

        let data = inner.assets.get(id).cloned().ok_or(AssetError::NotFound)?;
        let fail_at = inner.fail_at.get(id).copied();
        Ok(MemReader { data, pos: 0, fail_at })
    }
}

/// Sequential reader over a [`MemStore`] asset.
#[derive(Debug)]
pub struct MemReader {
    data: Rc<[u8]>,
    pos: usize,
    fail_at: Option<usize>,
}

impl AssetReader for MemReader {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, AssetError> {
        let mut end = self.data.len();
        if let Some(fail_at) = self.fail_at {
            if self.pos >= fail_at && self.pos < end {
                return Err(AssetError::ReadFailed);
            }
            end = end.min(fail_at);
        }

        let n = buf.len().min(end - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_all_and_open_count() {
        let mut store = MemStore::new();
        store.insert("a", &[1, 2, 3]);

        assert_eq!(store.read_all("a").unwrap(), vec![1, 2, 3]);
        assert_eq!(store.opens("a"), 1);
        assert_eq!(store.read_all("missing"), Err(AssetError::NotFound));
        assert_eq!(store.total_opens(), 2);
    }

    #[test]
    fn test_fail_after_offset() {
        let mut store = MemStore::new();
        store.insert("a", &[0u8; 10]);
        store.fail_reads_after("a", 4);

        let mut reader = store.open("a").unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(reader.read_into(&mut buf), Ok(3));
        assert_eq!(reader.read_into(&mut buf), Ok(1));
        assert_eq!(reader.read_into(&mut buf), Err(AssetError::ReadFailed));
    }
}
