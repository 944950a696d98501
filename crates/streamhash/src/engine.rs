use std::fmt;

use digest::DynDigest;
use tracing::debug;

use crate::{HashAlgorithm, HashError, Result};

type Primitive = Box<dyn DynDigest + Send>;

fn primitive(algorithm: HashAlgorithm) -> Result<Primitive> {
    match algorithm {
        #[cfg(feature = "md5")]
        HashAlgorithm::Md5 => Ok(Box::new(md5::Md5::default())),
        #[cfg(feature = "sha1")]
        HashAlgorithm::Sha1 => Ok(Box::new(sha1::Sha1::default())),
        #[cfg(feature = "sha2")]
        HashAlgorithm::Sha256 => Ok(Box::new(sha2::Sha256::default())),
        #[cfg(feature = "sha2")]
        HashAlgorithm::Sha512 => Ok(Box::new(sha2::Sha512::default())),
        #[allow(unreachable_patterns)]
        _ => Err(HashError::UnsupportedAlgorithm(algorithm)),
    }
}

/// Incremental digest computation bound to one [`HashAlgorithm`].
///
/// An engine produces exactly one digest. After [`finalize`](Self::finalize)
/// both `update` and `finalize` fail with [`HashError::InvalidState`]; start a
/// new engine for the next computation.
///
/// The engine carries no internal synchronization. Moving it between threads
/// is fine, sharing it is not.
pub struct DigestEngine {
    algorithm: HashAlgorithm,
    state: Option<Primitive>,
    bytes_hashed: u64,
}

impl DigestEngine {
    /// Bind a new engine to `algorithm`.
    ///
    /// Fails with [`HashError::UnsupportedAlgorithm`] when the crate was built
    /// without the primitive for it.
    pub fn new(algorithm: HashAlgorithm) -> Result<Self> {
        Ok(Self { algorithm, state: Some(primitive(algorithm)?), bytes_hashed: 0 })
    }

    /// Hash `data` in one call. No short-circuit: empty input yields the
    /// algorithm's digest of zero bytes.
    pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Result<HashOutput> {
        let mut engine = Self::new(algorithm)?;
        engine.update(data)?;
        engine.finalize()
    }

    pub fn algorithm(&self) -> HashAlgorithm { self.algorithm }

    pub fn bytes_hashed(&self) -> u64 { self.bytes_hashed }

    pub fn is_finalized(&self) -> bool { self.state.is_none() }

    /// Feed `data` into the running computation. Order of calls matters.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if self.absorb(data) {
            Ok(())
        } else {
            Err(HashError::InvalidState("update called on a finalized digest"))
        }
    }

    /// Like `update`, but a finalized engine silently ignores the data.
    pub(crate) fn absorb(&mut self, data: &[u8]) -> bool {
        match self.state.as_mut() {
            Some(state) => {
                state.update(data);
                self.bytes_hashed += data.len() as u64;
                true
            }
            None => false,
        }
    }

    /// Produce the digest and retire the engine.
    pub fn finalize(&mut self) -> Result<HashOutput> {
        let state = self
            .state
            .take()
            .ok_or(HashError::InvalidState("digest already finalized"))?;
        debug!(algorithm = %self.algorithm, bytes = self.bytes_hashed, "digest finalized");
        Ok(HashOutput { algorithm: self.algorithm, bytes: state.finalize() })
    }
}

impl fmt::Debug for DigestEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestEngine")
            .field("algorithm", &self.algorithm)
            .field("bytes_hashed", &self.bytes_hashed)
            .field("finalized", &self.is_finalized())
            .finish()
    }
}

/// A finished digest. Displays as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashOutput {
    algorithm: HashAlgorithm,
    bytes: Box<[u8]>,
}

impl HashOutput {
    pub fn algorithm(&self) -> HashAlgorithm { self.algorithm }

    pub fn as_bytes(&self) -> &[u8] { &self.bytes }

    pub fn into_bytes(self) -> Vec<u8> { self.bytes.into_vec() }

    pub fn len(&self) -> usize { self.bytes.len() }

    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    pub fn to_hex(&self) -> String { crate::to_hex(&self.bytes) }
}

impl AsRef<[u8]> for HashOutput {
    fn as_ref(&self) -> &[u8] { &self.bytes }
}

impl fmt::Display for HashOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

#[cfg(all(test, feature = "md5", feature = "sha1", feature = "sha2"))]
mod tests {
    use super::*;

    #[test]
    fn test_md5_abc() {
        let mut engine = DigestEngine::new(HashAlgorithm::Md5).unwrap();
        engine.update(b"abc").unwrap();
        let hash = engine.finalize().unwrap();
        assert_eq!(hash.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_digest_lengths_match_algorithm() {
        for algorithm in HashAlgorithm::ALL {
            let hash = DigestEngine::digest(algorithm, b"hello world").unwrap();
            assert_eq!(hash.len(), algorithm.digest_length());
            assert_eq!(hash.algorithm(), algorithm);
        }
    }

    #[test]
    fn test_split_updates_equal_single_update() {
        let mut engine = DigestEngine::new(HashAlgorithm::Sha256).unwrap();
        engine.update(b"hello").unwrap();
        engine.update(b"").unwrap();
        engine.update(b" world").unwrap();
        assert_eq!(engine.bytes_hashed(), 11);

        let expected =
            hex::decode("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
                .unwrap();
        assert_eq!(engine.finalize().unwrap().as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_update_order_matters() {
        let mut ab = DigestEngine::new(HashAlgorithm::Sha1).unwrap();
        ab.update(b"a").unwrap();
        ab.update(b"b").unwrap();

        let mut ba = DigestEngine::new(HashAlgorithm::Sha1).unwrap();
        ba.update(b"b").unwrap();
        ba.update(b"a").unwrap();

        assert_ne!(ab.finalize().unwrap(), ba.finalize().unwrap());
    }

    #[test]
    fn test_update_after_finalize_is_invalid_state() {
        let mut engine = DigestEngine::new(HashAlgorithm::Md5).unwrap();
        engine.update(b"abc").unwrap();
        let first = engine.finalize().unwrap();
        let snapshot = first.clone();

        let err = engine.update(b"more").unwrap_err();
        assert!(matches!(err, HashError::InvalidState(_)));
        assert!(engine.is_finalized());
        assert_eq!(first, snapshot);
        assert_eq!(engine.bytes_hashed(), 3);
    }

    #[test]
    fn test_finalize_twice_is_invalid_state() {
        let mut engine = DigestEngine::new(HashAlgorithm::Sha512).unwrap();
        engine.finalize().unwrap();
        assert!(matches!(engine.finalize(), Err(HashError::InvalidState(_))));
    }

    #[test]
    fn test_digest_of_empty_input_is_not_short_circuited() {
        let hash = DigestEngine::digest(HashAlgorithm::Sha256, b"").unwrap();
        assert_eq!(
            hash.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
