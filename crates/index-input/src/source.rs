use parking_lot::Mutex;
use std::sync::Arc;


/// Minimal capability a storage backend exposes to be read through [crate::BufferedReader].
pub trait RawSource {
    /// Writes up to `dst.len()` bytes starting at the internal cursor and advances it
    /// by the number of bytes written.
    ///
    /// Fewer bytes than requested are allowed only at the physical end of the resource.
    fn fill(&mut self, dst: &mut [u8]) -> std::io::Result<usize>;

    /// Moves the internal cursor without reading.
    fn reposition(&mut self, offset: u64) -> std::io::Result<()>;
}


impl <S: RawSource + ?Sized> RawSource for Box<S> {
    fn fill(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        self.as_mut().fill(dst)
    }

    fn reposition(&mut self, offset: u64) -> std::io::Result<()> {
        self.as_mut().reposition(offset)
    }
}


/// Handle to a [RawSource] shared by a reader and all of its clones.
pub struct SharedSource<S> {
    inner: Arc<Mutex<TrackedSource<S>>>
}


impl <S> Clone for SharedSource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone()
        }
    }
}


impl <S: RawSource> SharedSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TrackedSource::new(source)))
        }
    }

    /// Fills `buf` with the bytes at `offset`, returning how many were written.
    ///
    /// The result is short only when the source ran out of bytes.
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.lock().read_at(offset, buf)
    }
}


impl <S> SharedSource<S> {
    /// Number of live handles, this one included.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    pub fn into_inner(self) -> Result<S, Self> {
        Arc::try_unwrap(self.inner)
            .map(|m| m.into_inner().into_inner())
            .map_err(|inner| Self { inner })
    }
}


struct TrackedSource<S> {
    inner: S,
    pos: Option<u64>
}


impl <S: RawSource> TrackedSource<S> {
    fn new(source: S) -> Self {
        Self {
            inner: source,
            pos: None
        }
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        // cursor is unknown until the calls below succeed
        let pos = std::mem::take(&mut self.pos);
        if pos != Some(offset) {
            self.inner.reposition(offset)?;
        }
        let mut written = 0;
        while written < buf.len() {
            let n = self.inner.fill(&mut buf[written..])?;
            if n == 0 {
                break
            }
            written += n;
        }
        self.pos = Some(offset + written as u64);
        Ok(written)
    }
}


impl <S> TrackedSource<S> {
    fn into_inner(self) -> S {
        self.inner
    }
}
