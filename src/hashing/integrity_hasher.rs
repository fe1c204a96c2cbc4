use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use md5::{Digest, Md5};
use serde::Serialize;
use sha1::Sha1;

use crate::error_handling::types::CaptureError;

/// MD5 and SHA-1 digests of one artifact, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestPair {
    pub md5: String,
    pub sha1: String,
}

impl DigestPair {
    /// The `.hash` file record: exactly two lines, no trailing newline.
    pub fn render(&self) -> String {
        format!("MD5: {}\nSHA1: {}", self.md5, self.sha1)
    }
}

impl fmt::Display for DigestPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Returns `<artifact>.hash`.
pub fn hash_file_path(artifact: &Path) -> PathBuf {
    let mut name = OsString::from(artifact.as_os_str());
    name.push(".hash");
    PathBuf::from(name)
}

/// Computes both digests over one sequential read pass.
#[derive(Debug, Clone, Copy)]
pub struct IntegrityHasher {
    block_size: usize,
}

impl Default for IntegrityHasher {
    fn default() -> Self {
        Self::new(super::DEFAULT_BLOCK_SIZE)
    }
}

impl IntegrityHasher {
    /// `block_size` is validated by the configuration layer; see
    /// [`Config::validate`](crate::configuration::Config::validate).
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<DigestPair> {
        let mut md5 = Md5::new();
        let mut sha1 = Sha1::new();
        let mut buffer = vec![0u8; self.block_size];
        let mut total: u64 = 0;

        loop {
            let n = fill_block(&mut reader, &mut buffer)?;
            if n == 0 {
                break;
            }
            md5.update(&buffer[..n]);
            sha1.update(&buffer[..n]);
            total += n as u64;
            if n < buffer.len() {
                break;
            }
        }

        debug!("Hashed {} byte(s) in blocks of {}", total, self.block_size);
        Ok(DigestPair {
            md5: format!("{:x}", md5.finalize()),
            sha1: format!("{:x}", sha1.finalize()),
        })
    }

    pub fn hash_file(&self, path: &Path) -> io::Result<DigestPair> {
        let file = File::open(path)?;
        self.hash_reader(file)
    }

    /// Writes the digest record beside the artifact and returns its path.
    ///
    /// The record is written to `<artifact>.hash.tmp` and renamed into place,
    /// so a failed write never leaves a truncated `.hash` behind.
    pub fn write_hash_file(&self, artifact: &Path, digests: &DigestPair) -> io::Result<PathBuf> {
        let path = hash_file_path(artifact);
        let mut partial = OsString::from(path.as_os_str());
        partial.push(".tmp");
        let partial = PathBuf::from(partial);

        let written = File::create(&partial)
            .and_then(|mut file| {
                file.write_all(digests.render().as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| std::fs::rename(&partial, &path));

        if let Err(e) = written {
            if let Err(cleanup) = std::fs::remove_file(&partial) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!("Could not remove partial hash record {}: {}", partial.display(), cleanup);
                }
            }
            return Err(e);
        }
        Ok(path)
    }

    /// Hashes a finished artifact on the blocking pool and persists the record.
    ///
    /// Both the read pass and the `.hash` write surface as
    /// [`CaptureError::HashComputeFailure`].
    pub async fn hash_artifact(&self, artifact: PathBuf) -> Result<DigestPair, CaptureError> {
        let hasher = *self;
        let path = artifact.clone();
        let outcome = tokio::task::spawn_blocking(move || -> io::Result<DigestPair> {
            let digests = hasher.hash_file(&path)?;
            hasher.write_hash_file(&path, &digests)?;
            Ok(digests)
        })
        .await
        .map_err(|e| io::Error::other(format!("hashing task aborted: {}", e)))
        .and_then(|res| res);

        match outcome {
            Ok(digests) => {
                info!("Hashes of {}: {}", artifact.display(), digests.render().replace('\n', ", "));
                Ok(digests)
            }
            Err(source) => Err(CaptureError::HashComputeFailure {
                path: artifact,
                source,
            }),
        }
    }
}

/// Reads until `buffer` is full or the reader is exhausted, so every block
/// handed to the digests except the last is exactly `buffer.len()` bytes.
fn fill_block<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
