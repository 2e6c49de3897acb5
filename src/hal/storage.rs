//! Read-only asset store for raw PCM waveforms.
//!
//! Assets are headerless unsigned 8-bit mono PCM; the sample rate is supplied
//! by whoever plays them.

use alloc::vec::Vec;

use crate::error::AssetError;

/// Largest asset [`AssetStore::read_all`] will hold in RAM.
pub const MAX_ASSET_BYTES: usize = 256 * 1024;

/// Sequential reader over one asset.
pub trait AssetReader {
    /// Fill `buf` from the current position.
    ///
    /// Returns the number of bytes read; 0 means end of asset.
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, AssetError>;
}

/// Byte-stream access to assets by identifier (path).
pub trait AssetStore {
    type Reader: AssetReader;

    /// Open an asset for sequential reading.
    fn open(&mut self, id: &str) -> Result<Self::Reader, AssetError>;

    /// Read a whole asset into memory.
    fn read_all(&mut self, id: &str) -> Result<Vec<u8>, AssetError> {
        let mut reader = self.open(id)?;
        let mut data = Vec::new();
        let mut chunk = [0u8; 512];

        loop {
            let n = reader.read_into(&mut chunk)?;
            if n == 0 {
                break;
            }
            if data.len() + n > MAX_ASSET_BYTES {
                return Err(AssetError::TooLarge);
            }
            data.extend_from_slice(&chunk[..n]);
        }

        Ok(data)
    }
}
