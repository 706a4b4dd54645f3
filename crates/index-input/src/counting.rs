use crate::source::RawSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;


/// Counters collected by [CountingSource].
#[derive(Default, Debug)]
pub struct SourceStats {
    fills: AtomicU64,
    repositions: AtomicU64,
    bytes: AtomicU64
}


impl SourceStats {
    pub fn fills(&self) -> u64 {
        self.fills.load(Ordering::Relaxed)
    }

    pub fn repositions(&self) -> u64 {
        self.repositions.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}


/// Wraps another source and counts the calls made to it.
pub struct CountingSource<S> {
    inner: S,
    stats: Arc<SourceStats>
}


impl <S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: Arc::new(SourceStats::default())
        }
    }

    pub fn stats(&self) -> Arc<SourceStats> {
        self.stats.clone()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}


impl <S: RawSource> RawSource for CountingSource<S> {
    fn fill(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        self.stats.fills.fetch_add(1, Ordering::Relaxed);
        let n = self.inner.fill(dst)?;
        self.stats.bytes.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }

    fn reposition(&mut self, offset: u64) -> std::io::Result<()> {
        self.stats.repositions.fetch_add(1, Ordering::Relaxed);
        self.inner.reposition(offset)
    }
}
