use crate::buffered::BufferedReader;
use crate::error::Result;
use crate::file::FileSource;
use crate::source::RawSource;
use std::fs::File;
use std::path::Path;


/// Default buffer size in bytes.
pub const BUFFER_SIZE: usize = 1024;

/// Buffer size used for merge reads.
pub const MERGE_BUFFER_SIZE: usize = 4096;

/// Smallest buffer a reader accepts. Fits every fixed-width value.
pub const MIN_BUFFER_SIZE: usize = 8;

pub const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;


/// What a reader is going to be used for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ReadContext {
    #[default]
    Default,
    /// Large sequential scans over a whole segment
    Merge,
    ReadOnce
}


impl ReadContext {
    pub fn buffer_size(&self) -> usize {
        match self {
            ReadContext::Merge => MERGE_BUFFER_SIZE,
            ReadContext::Default | ReadContext::ReadOnce => BUFFER_SIZE
        }
    }
}


#[derive(Clone, Debug)]
pub struct ReaderSettings {
    buffer_size: usize
}


impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            buffer_size: BUFFER_SIZE
        }
    }
}


impl ReaderSettings {
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn with_context(mut self, context: ReadContext) -> Self {
        self.buffer_size = context.buffer_size();
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn open<S: RawSource>(
        &self,
        name: impl Into<String>,
        source: S,
        len: u64
    ) -> Result<BufferedReader<S>>
    {
        BufferedReader::new(name, source, len, self.buffer_size)
    }

    pub fn open_file(&self, path: impl AsRef<Path>) -> Result<BufferedReader<FileSource>> {
        let path = path.as_ref();
        let source = FileSource::new(File::open(path)?);
        let len = source.len()?;
        self.open(path.display().to_string(), source, len)
    }
}


/// Clamps a requested buffer size into the supported range.
///
/// Returns `None` for zero.
pub(crate) fn clamp_buffer_size(size: usize) -> Option<usize> {
    if size == 0 {
        None
    } else {
        Some(size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE))
    }
}
