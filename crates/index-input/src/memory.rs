use crate::source::RawSource;
use bytes::Bytes;


/// In-memory resource, mostly for tests and small files that were read upfront.
pub struct MemorySource {
    data: Bytes,
    pos: usize
}


impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0
        }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }
}


impl RawSource for MemorySource {
    fn fill(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let n = std::cmp::min(dst.len(), available);
        if n == 0 {
            return Ok(0)
        }
        dst[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn reposition(&mut self, offset: u64) -> std::io::Result<()> {
        // positions past the end are fine, the next fill just returns nothing
        self.pos = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(())
    }
}
