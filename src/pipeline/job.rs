use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x6c79_7269_635f_6a6f;

static JOB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Job-unique key used to name intermediate files.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobKey(String);

impl JobKey {
    /// Derive a fresh key from the job inputs, the clock, the process id and a process counter.
    pub fn new(inputs: &[&Path]) -> Self {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        h.update(&nanos.to_le_bytes());
        h.update(&std::process::id().to_le_bytes());
        h.update(&JOB_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
        for p in inputs {
            h.update(p.as_os_str().as_encoded_bytes());
            h.update(&[0]);
        }
        Self(format!("{:016x}", h.digest()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paths of one job's intermediate files.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Intermediates {
    /// Silent animated background.
    pub raw_video: PathBuf,
    /// Background with text composited.
    pub text_video: PathBuf,
    /// Trimmed audio as interleaved `f32le` PCM.
    pub clip_audio: PathBuf,
}

impl Intermediates {
    pub fn new(work_dir: &Path, key: &JobKey) -> Self {
        Self {
            raw_video: work_dir.join(format!("raw_{key}.mp4")),
            text_video: work_dir.join(format!("text_{key}.mp4")),
            clip_audio: work_dir.join(format!("clip_{key}.f32le")),
        }
    }

    fn paths(&self) -> [&Path; 3] {
        [&self.raw_video, &self.text_video, &self.clip_audio]
    }
}

/// Deletes a job's intermediates on drop unless [`ArtifactGuard::keep`] was called.
///
/// The final output never needs cleanup: every writer stages its file and renames it into place
/// only on success.
pub(crate) struct ArtifactGuard {
    files: Intermediates,
    keep_intermediates: bool,
}

impl ArtifactGuard {
    pub(crate) fn new(files: Intermediates) -> Self {
        Self {
            files,
            keep_intermediates: false,
        }
    }

    pub(crate) fn files(&self) -> &Intermediates {
        &self.files
    }

    pub(crate) fn keep(&mut self) {
        self.keep_intermediates = true;
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if self.keep_intermediates {
            return;
        }
        for p in self.files.paths() {
            if p.exists() {
                tracing::debug!(path = %p.display(), "removing intermediate");
                let _ = std::fs::remove_file(p);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/job.rs"]
mod tests;
