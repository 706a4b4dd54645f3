use crate::error::{invalid_argument, Error, Result};
use crate::input::{ensure_remaining, IndexInput, RandomAccessInput};
use crate::settings::clamp_buffer_size;
use crate::source::{RawSource, SharedSource};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, trace};


/// Buffered [IndexInput] over a [RawSource].
///
/// The buffer is a window `[buffer_start, buffer_start + buffer_len)` of the resource,
/// with the forward cursor at `buffer_start + buffer_pos`.
/// Sequential reads consume the window and refill it right after the last consumed byte.
/// Positional reads use the same window as a cache. When they miss behind the window,
/// the previous page is loaded rather than just the requested bytes, which makes
/// backward scans cost one fill per page.
///
/// A reader is meant to be used by one thread at a time. Concurrent access goes through
/// clones, which share the source but not the buffer.
pub struct BufferedReader<S> {
    name: Arc<str>,
    source: SharedSource<S>,
    len: u64,
    buffer: Box<[u8]>,
    buffer_size: usize,
    buffer_start: u64,
    buffer_len: usize,
    buffer_pos: usize,
    /// Forward cursor, when a positional read moved the window away from it.
    /// `buffer_pos == buffer_len` holds while this is set.
    detached: Option<u64>,
    is_clone: bool
}


impl <S: RawSource> BufferedReader<S> {
    /// Creates a reader over the first `len` bytes of `source`.
    ///
    /// `buffer_size` is clamped into `[MIN_BUFFER_SIZE, MAX_BUFFER_SIZE]`, zero is rejected.
    pub fn new(name: impl Into<String>, source: S, len: u64, buffer_size: usize) -> Result<Self> {
        let buffer_size = clamp_buffer_size(buffer_size).ok_or_else(|| {
            invalid_argument!("buffer size must be positive")
        })?;
        Ok(Self {
            name: Arc::from(name.into()),
            source: SharedSource::new(source),
            len,
            buffer: Box::default(),
            buffer_size,
            buffer_start: 0,
            buffer_len: 0,
            buffer_pos: 0,
            detached: None,
            is_clone: false
        })
    }

    /// Releases the source. Only the reader that created it may do so,
    /// and only once all clones and slices are gone.
    pub fn into_source(self) -> Result<S> {
        if self.is_clone {
            return Err(invalid_argument!("{} is a clone and does not own its source", self.name))
        }
        let name = self.name;
        self.source.into_inner().map_err(|source| {
            invalid_argument!(
                "{} is still shared by {} other readers",
                name,
                source.handle_count() - 1
            )
        })
    }

    #[inline(never)]
    fn refill(&mut self) -> Result<()> {
        let start = self.cursor();
        let len = std::cmp::min(self.buffer_size as u64, self.len - start) as usize;
        if len == 0 {
            return Err(Error::eof(&self.name, start, 1, self.len))
        }
        self.load_window(start, len, start)
    }

    /// Loads `len` bytes at `start` into the buffer and puts the forward cursor back to `cursor`.
    fn load_window(&mut self, start: u64, len: usize, cursor: u64) -> Result<()> {
        self.invalidate(cursor);

        if self.buffer.is_empty() {
            self.buffer = vec![0; self.buffer_size].into_boxed_slice();
        }

        trace!(resource = %self.name, start, len, "filling buffer");
        let n = self.source.read_at(start, &mut self.buffer[..len])?;
        if n < len {
            return Err(Error::eof(&self.name, start + n as u64, (len - n) as u64, self.len))
        }

        self.buffer_start = start;
        self.buffer_len = len;
        self.attach(cursor);
        Ok(())
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = *self.buffer.get(self.buffer_pos..self.buffer_len)?.first_chunk::<N>()?;
        self.buffer_pos += N;
        Some(bytes)
    }

    #[inline(never)]
    fn read_array_slow<const N: usize>(&mut self) -> Result<[u8; N]> {
        ensure_remaining(&*self, N as u64)?;
        let saved = self.cursor();
        let mut bytes = [0; N];
        for b in bytes.iter_mut() {
            *b = self.read_u8().map_err(|err| {
                self.invalidate(saved);
                err
            })?;
        }
        Ok(bytes)
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        match self.take::<N>() {
            Some(bytes) => Ok(bytes),
            None => self.read_array_slow()
        }
    }

    #[inline(never)]
    fn read_bytes_slow(&mut self, dst: &mut [u8], available: usize) -> Result<()> {
        let (head, rest) = dst.split_at_mut(available);
        head.copy_from_slice(&self.buffer[self.buffer_pos..self.buffer_len]);
        self.buffer_pos = self.buffer_len;

        if rest.len() < self.buffer_size {
            // the window is at least as long as `rest`, remaining bytes were checked above
            self.refill()?;
            rest.copy_from_slice(&self.buffer[..rest.len()]);
            self.buffer_pos = rest.len();
        } else {
            let start = self.cursor();
            debug!(resource = %self.name, start, len = rest.len(), "reading past the buffer");
            self.invalidate(start);
            let n = self.source.read_at(start, rest)?;
            if n < rest.len() {
                return Err(Error::eof(&self.name, start + n as u64, (rest.len() - n) as u64, self.len))
            }
            self.invalidate(start + n as u64);
        }
        Ok(())
    }

    #[inline]
    fn read_array_at<const N: usize>(&mut self, pos: u64) -> Result<[u8; N]> {
        let index = self.resolve_position(pos, N)?;
        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.buffer[index..index + N]);
        Ok(bytes)
    }

    /// Returns the buffer index of `[pos, pos + width)`, moving the window if needed.
    #[inline]
    fn resolve_position(&mut self, pos: u64, width: usize) -> Result<usize> {
        if pos > self.len || self.len - pos < width as u64 {
            return Err(Error::eof(&self.name, pos, width as u64, self.len))
        }
        if pos >= self.buffer_start {
            let index = pos - self.buffer_start;
            if index + width as u64 <= self.buffer_len as u64 {
                return Ok(index as usize)
            }
        }
        self.relocate(pos, width)
    }

    #[inline(never)]
    fn relocate(&mut self, pos: u64, width: usize) -> Result<usize> {
        let size = self.buffer_size as u64;
        let start = if pos < self.buffer_start {
            // load the previous page, pulled back far enough to hold the whole value
            let prev_page = self.buffer_start.saturating_sub(size);
            let value_fits = (pos + width as u64).saturating_sub(size);
            std::cmp::min(std::cmp::max(prev_page, value_fits), pos)
        } else {
            pos
        };
        let len = std::cmp::min(size, self.len - start) as usize;
        let cursor = self.cursor();
        self.load_window(start, len, cursor)?;
        Ok((pos - start) as usize)
    }
}


impl <S> BufferedReader<S> {
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn is_clone(&self) -> bool {
        self.is_clone
    }

    #[inline]
    fn cursor(&self) -> u64 {
        self.detached.unwrap_or(self.buffer_start + self.buffer_pos as u64)
    }

    /// Drops buffered bytes, the next read refills at `pos`.
    fn invalidate(&mut self, pos: u64) {
        self.buffer_start = pos;
        self.buffer_len = 0;
        self.buffer_pos = 0;
        self.detached = None;
    }

    fn attach(&mut self, cursor: u64) {
        let in_window = cursor >= self.buffer_start
            && cursor - self.buffer_start <= self.buffer_len as u64;
        if in_window {
            self.buffer_pos = (cursor - self.buffer_start) as usize;
            self.detached = None;
        } else {
            self.buffer_pos = self.buffer_len;
            self.detached = Some(cursor);
        }
    }
}


impl <S: RawSource> IndexInput for BufferedReader<S> {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn position(&self) -> u64 {
        self.cursor()
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        if pos > self.len {
            return Err(invalid_argument!(
                "seek position {} is past EOF of {} (length={})",
                pos,
                self.name,
                self.len
            ))
        }
        if pos >= self.buffer_start && pos - self.buffer_start <= self.buffer_len as u64 {
            self.buffer_pos = (pos - self.buffer_start) as usize;
            self.detached = None;
        } else {
            self.invalidate(pos);
        }
        Ok(())
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        if self.buffer_pos >= self.buffer_len {
            self.refill()?;
        }
        let b = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Ok(b)
    }

    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        ensure_remaining(&*self, dst.len() as u64)?;

        let available = self.buffer_len - self.buffer_pos;
        if dst.len() <= available {
            dst.copy_from_slice(&self.buffer[self.buffer_pos..self.buffer_pos + dst.len()]);
            self.buffer_pos += dst.len();
            return Ok(())
        }

        // a failed read leaves the cursor where it was
        let saved = self.cursor();
        self.read_bytes_slow(dst, available).map_err(|err| {
            self.invalidate(saved);
            err
        })
    }

    #[inline]
    fn read_i16(&mut self) -> Result<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    #[inline]
    fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    #[inline]
    fn read_i64(&mut self) -> Result<i64> {
        self.read_array().map(i64::from_le_bytes)
    }
}


impl <S: RawSource> RandomAccessInput for BufferedReader<S> {
    #[inline]
    fn read_u8_at(&mut self, pos: u64) -> Result<u8> {
        let index = self.resolve_position(pos, 1)?;
        Ok(self.buffer[index])
    }

    #[inline]
    fn read_i16_at(&mut self, pos: u64) -> Result<i16> {
        self.read_array_at(pos).map(i16::from_le_bytes)
    }

    #[inline]
    fn read_i32_at(&mut self, pos: u64) -> Result<i32> {
        self.read_array_at(pos).map(i32::from_le_bytes)
    }

    #[inline]
    fn read_i64_at(&mut self, pos: u64) -> Result<i64> {
        self.read_array_at(pos).map(i64::from_le_bytes)
    }
}


impl <S> Clone for BufferedReader<S> {
    /// Creates a reader at the current position with its own, initially empty, buffer.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            source: self.source.clone(),
            len: self.len,
            buffer: Box::default(),
            buffer_size: self.buffer_size,
            buffer_start: self.cursor(),
            buffer_len: 0,
            buffer_pos: 0,
            detached: None,
            is_clone: true
        }
    }
}


impl <S> Debug for BufferedReader<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedReader")
            .field("name", &self.name)
            .field("len", &self.len)
            .field("position", &self.cursor())
            .field("buffer_start", &self.buffer_start)
            .field("buffer_len", &self.buffer_len)
            .field("buffer_size", &self.buffer_size)
            .finish()
    }
}
