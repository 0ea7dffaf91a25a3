use parking_lot::Mutex;
use std::sync::Arc;

/// Fill byte for new blocks. Non-zero so the pages are written and stay resident.
const FILL_BYTE: u8 = 0xA5;

/// Process-wide growable buffer used to simulate memory pressure.
///
/// Cloning shares the same storage. The lock is held only for a single
/// append, clear or read, so a reset racing an in-flight memory stress
/// clears what is there and later appends land in the emptied bucket.
#[derive(Debug, Clone, Default)]
pub struct LeakyBucket {
    blocks: Arc<Mutex<Vec<Box<[u8]>>>>,
}

impl LeakyBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a block of `size` bytes and append it, returning the new length
    pub fn push_block(&self, size: usize) -> usize {
        self.push_block_with(size, |_| {})
    }

    /// Like [`push_block`](Self::push_block), calling `on_len` with the new
    /// length before the lock is released.
    pub fn push_block_with(&self, size: usize, on_len: impl FnOnce(usize)) -> usize {
        let block = vec![FILL_BYTE; size].into_boxed_slice();
        let mut blocks = self.blocks.lock();
        blocks.push(block);
        let len = blocks.len();
        on_len(len);
        len
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes currently held
    pub fn allocated_bytes(&self) -> usize {
        self.blocks.lock().iter().map(|block| block.len()).sum()
    }

    /// Drop every block and release the backing capacity, returning how many were dropped
    pub fn clear(&self) -> usize {
        self.clear_with(|| {})
    }

    /// Like [`clear`](Self::clear), calling `on_empty` before the lock is released
    pub fn clear_with(&self, on_empty: impl FnOnce()) -> usize {
        let drained = {
            let mut blocks = self.blocks.lock();
            let drained = std::mem::take(&mut *blocks);
            on_empty();
            drained
        };
        // Freed outside the lock
        drained.len()
    }
}
