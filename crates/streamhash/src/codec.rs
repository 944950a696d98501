use std::io::{self, Read, Write};

use crate::{DigestEngine, HashAlgorithm, HashError, HashingOptions, HashingReader, Result};

/// Lowercase hex, two digits per byte, no separators. Empty input gives `""`.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String { hex::encode(bytes) }

/// Hash a whole buffer in one call and hex-encode the result.
///
/// Empty input returns `""` without touching any primitive. That is *not* the
/// digest of zero bytes; use [`DigestEngine::digest`] for that.
pub fn hash_once(bytes: &[u8], algorithm: HashAlgorithm) -> Result<String> {
    if bytes.is_empty() {
        return Ok(String::new());
    }
    Ok(DigestEngine::digest(algorithm, bytes)?.to_hex())
}

/// Drain `reader` and return the hex digest of everything it produced.
///
/// Unlike [`hash_once`], an empty reader yields the real digest of zero bytes.
pub fn hash_reader<R: Read>(reader: R, algorithm: HashAlgorithm) -> Result<String> {
    let mut reader = hashing(reader, algorithm)?;
    io::copy(&mut reader, &mut io::sink())?;
    finish(&mut reader)
}

/// Copy `reader` into `writer`, hashing in the same pass.
///
/// Returns the number of bytes copied and the hex digest. Neither side is closed.
pub fn copy_hashed<R: Read, W: Write + ?Sized>(
    reader: R,
    writer: &mut W,
    algorithm: HashAlgorithm,
) -> Result<(u64, String)> {
    let mut reader = hashing(reader, algorithm)?;
    let copied = io::copy(&mut reader, writer)?;
    writer.flush()?;
    Ok((copied, finish(&mut reader)?))
}

fn hashing<R: Read>(reader: R, algorithm: HashAlgorithm) -> Result<HashingReader<R>> {
    let engine = DigestEngine::new(algorithm)?;
    Ok(HashingReader::with_engine(reader, engine, HashingOptions::default()))
}

fn finish<R>(reader: &mut HashingReader<R>) -> Result<String> {
    reader.hash()?.ok_or(HashError::UnsupportedAlgorithm(reader.algorithm()))
}
