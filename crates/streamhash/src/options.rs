/// Default size of the read-ahead chunk used by single-byte reads.
pub const BUFFER_SIZE: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashingOptions {
    /// Upper bound on bytes requested from the source per read-ahead refill.
    pub buffer_size: usize,
}

impl Default for HashingOptions {
    fn default() -> Self { Self { buffer_size: BUFFER_SIZE } }
}

impl HashingOptions {
    /// Zero is clamped to one: an empty request can't be told apart from end-of-stream.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    pub(crate) fn effective_buffer_size(&self) -> usize { self.buffer_size.max(1) }
}
