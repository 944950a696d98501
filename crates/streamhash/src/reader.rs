use std::fmt;
use std::io::{self, Read};

use tracing::{trace, warn};

use crate::{DigestEngine, HashAlgorithm, HashError, HashOutput, HashingOptions, Result};

/// Bytes fetched from the source for single-byte reads but not yet handed out.
#[derive(Default)]
struct ReadAhead {
    buf: Vec<u8>,
    cursor: usize,
}

impl ReadAhead {
    fn is_exhausted(&self) -> bool { self.cursor >= self.buf.len() }

    fn pending(&self) -> usize { self.buf.len().saturating_sub(self.cursor) }

    /// Issue exactly one read of up to `capacity` bytes. The buffer is cut down
    /// to what the source actually produced so no stale tail is ever hashed.
    fn refill<R: Read>(&mut self, source: &mut R, capacity: usize) -> io::Result<&[u8]> {
        self.cursor = 0;
        self.buf.resize(capacity, 0);
        match source.read(&mut self.buf) {
            Ok(n) => {
                self.buf.truncate(n);
                Ok(&self.buf)
            }
            Err(err) => {
                self.buf.clear();
                Err(err)
            }
        }
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.buf.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(byte)
    }

    fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let n = self.pending().min(out.len());
        out[..n].copy_from_slice(&self.buf[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }
}

/// Reader that computes a digest over every byte that passes through it.
///
/// Two read paths are offered. [`read_chunk`](Self::read_chunk) (and the
/// [`Read`] impl) hands the caller's buffer straight to the source and hashes
/// what came back. [`read_one`](Self::read_one) batches single-byte reads into
/// refills of up to `buffer_size` bytes and hashes each refill once, as a whole.
/// Both produce the same digest as hashing the source in one shot.
///
/// The hash reflects bytes *fetched from the source* up to the moment it is
/// taken. After a partial run of `read_one` calls the digest already covers
/// the rest of the current read-ahead chunk, even though those bytes have not
/// been returned yet.
///
/// The source is never closed by this type; drop it or call
/// [`into_inner`](Self::into_inner) when done. Reads take `&mut self`, so a
/// reader can't be driven from two threads at once.
pub struct HashingReader<R> {
    source: R,
    algorithm: HashAlgorithm,
    engine: Option<DigestEngine>,
    read_ahead: ReadAhead,
    buffer_size: usize,
}

impl<R> HashingReader<R> {
    /// Wrap `source`, hashing with `algorithm`.
    ///
    /// If no primitive exists for `algorithm` a warning is logged and the reader
    /// degrades to a plain pass-through; [`hash`](Self::hash) then yields `None`.
    pub fn new(source: R, algorithm: HashAlgorithm) -> Self {
        Self::with_options(source, algorithm, HashingOptions::default())
    }

    pub fn with_options(source: R, algorithm: HashAlgorithm, options: HashingOptions) -> Self {
        let engine = match DigestEngine::new(algorithm) {
            Ok(engine) => Some(engine),
            Err(err) => {
                warn!(%algorithm, error = %err, "hashing disabled for this reader");
                None
            }
        };
        Self::from_parts(source, algorithm, engine, options)
    }

    /// Wrap `source` around an engine the caller already built, so construction
    /// failures surface to the caller instead of degrading.
    pub fn with_engine(source: R, engine: DigestEngine, options: HashingOptions) -> Self {
        Self::from_parts(source, engine.algorithm(), Some(engine), options)
    }

    pub(crate) fn from_parts(
        source: R,
        algorithm: HashAlgorithm,
        engine: Option<DigestEngine>,
        options: HashingOptions,
    ) -> Self {
        Self {
            source,
            algorithm,
            engine,
            read_ahead: ReadAhead::default(),
            buffer_size: options.effective_buffer_size(),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm { self.algorithm }

    /// Whether a digest is being computed. False when the primitive was
    /// unavailable or the hash has already been taken.
    pub fn is_hashing(&self) -> bool { self.engine.as_ref().is_some_and(|e| !e.is_finalized()) }

    /// Bytes fed to the digest so far.
    pub fn bytes_hashed(&self) -> u64 { self.engine.as_ref().map_or(0, DigestEngine::bytes_hashed) }

    pub fn get_ref(&self) -> &R { &self.source }

    /// Reading from the source directly bypasses hashing.
    pub fn get_mut(&mut self) -> &mut R { &mut self.source }

    /// Unwrap the source. Bytes still sitting in the read-ahead buffer are lost.
    pub fn into_inner(self) -> R { self.source }

    /// Finalize the digest over everything fetched so far.
    ///
    /// Returns `Ok(None)` when hashing is disabled for this reader and
    /// [`HashError::InvalidState`] when called a second time. Reads keep
    /// working afterwards but are no longer hashed.
    pub fn digest(&mut self) -> Result<Option<HashOutput>> {
        self.engine.as_mut().map(DigestEngine::finalize).transpose()
    }

    /// [`digest`](Self::digest) as a lowercase hex string.
    pub fn hash(&mut self) -> Result<Option<String>> {
        Ok(self.digest()?.map(|output| output.to_hex()))
    }

    /// Finalize and compare against `expected` hex, ignoring case.
    pub fn verify(&mut self, expected: &str) -> Result<()> {
        let actual = self
            .hash()?
            .ok_or(HashError::UnsupportedAlgorithm(self.algorithm))?;
        if actual.eq_ignore_ascii_case(expected.trim()) {
            Ok(())
        } else {
            Err(HashError::Mismatch { expected: expected.trim().to_ascii_lowercase(), actual })
        }
    }
}

impl<R: Read> HashingReader<R> {
    /// Read a single byte, or `None` at end-of-stream.
    ///
    /// When the read-ahead buffer runs dry one read of up to `buffer_size`
    /// bytes is issued and the whole chunk is hashed in a single update.
    /// Further calls are served from the buffer without touching the digest.
    pub fn read_one(&mut self) -> io::Result<Option<u8>> {
        if self.read_ahead.is_exhausted() {
            let chunk = self.read_ahead.refill(&mut self.source, self.buffer_size)?;
            if chunk.is_empty() {
                return Ok(None);
            }
            trace!(bytes = chunk.len(), "read-ahead refilled");
            if let Some(engine) = self.engine.as_mut() {
                engine.absorb(chunk);
            }
        }
        Ok(self.read_ahead.next())
    }

    /// Read up to `buf.len()` bytes, returning 0 at end-of-stream.
    ///
    /// Bytes already fetched by [`read_one`](Self::read_one) are handed out
    /// first (they were hashed when fetched). Otherwise the read goes straight
    /// to the source and exactly the bytes it produced are hashed.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.read_ahead.is_exhausted() {
            return Ok(self.read_ahead.drain_into(buf));
        }
        let n = self.source.read(buf)?;
        if n > 0 {
            if let Some(engine) = self.engine.as_mut() {
                engine.absorb(&buf[..n]);
            }
        }
        Ok(n)
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.read_chunk(buf) }
}

impl<R: fmt::Debug> fmt::Debug for HashingReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashingReader")
            .field("source", &self.source)
            .field("algorithm", &self.algorithm)
            .field("engine", &self.engine)
            .field("pending", &self.read_ahead.pending())
            .field("buffer_size", &self.buffer_size)
            .finish()
    }
}
