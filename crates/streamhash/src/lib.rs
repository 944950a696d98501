//! Streaming MD5/SHA digests.
//!
//! [`HashingReader`] wraps any [`std::io::Read`] source and computes a digest
//! over the bytes as they are read, without buffering the payload. The result
//! is byte-identical to hashing the fully materialized input, whatever the
//! read pattern, down to one byte at a time.
//!
//! # Key Features
//!
//! - **Two read paths**: bulk reads hash exactly what the source produced;
//!   single-byte reads are batched into fixed-size refills hashed once each
//! - **Degrades, never blocks**: a missing primitive disables hashing for a
//!   reader but leaves reading intact
//! - **Typed failures**: state misuse and source errors surface as [`HashError`]
//!
//! Primitives are selected by cargo feature: `md5`, `sha1` and `sha2` (SHA-256
//! and SHA-512), all on by default.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use streamhash::{HashAlgorithm, HashingReader, hash_once};
//!
//! let data = b"abc";
//! let mut reader = HashingReader::new(&data[..], HashAlgorithm::Md5);
//! let mut buffer = Vec::new();
//! reader.read_to_end(&mut buffer).unwrap();
//!
//! let streamed = reader.hash().unwrap().unwrap();
//! assert_eq!(streamed, "900150983cd24fb0d6963f7d28e17f72");
//! assert_eq!(streamed, hash_once(data, HashAlgorithm::Md5).unwrap());
//! ```

pub use self::algorithm::HashAlgorithm;
pub use self::codec::{copy_hashed, hash_once, hash_reader, to_hex};
pub use self::engine::{DigestEngine, HashOutput};
pub use self::error::{HashError, Result};
pub use self::options::{BUFFER_SIZE, HashingOptions};
pub use self::reader::HashingReader;

mod algorithm;
mod codec;
mod engine;
mod error;
mod options;
mod reader;
