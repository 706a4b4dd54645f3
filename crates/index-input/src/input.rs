use crate::error::{Error, Result};


/// Read-only, seekable view of an immutable resource with a fixed logical length.
///
/// All multi-byte values are little-endian.
pub trait IndexInput {
    /// Diagnostic name, used in error messages only.
    fn name(&self) -> &str;

    /// Logical length in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute offset of the next byte a sequential read returns.
    fn position(&self) -> u64;

    /// Moves the forward cursor. Targets past [IndexInput::len] are rejected.
    fn seek(&mut self, pos: u64) -> Result<()>;

    fn read_u8(&mut self) -> Result<u8>;

    /// Fills `dst` completely.
    ///
    /// A request running past [IndexInput::len] fails with [Error::EndOfData]
    /// before anything is consumed.
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()>;

    fn read_i16(&mut self) -> Result<i16> {
        let mut buf = [0; 2];
        self.read_bytes(&mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0; 4];
        self.read_bytes(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0; 8];
        self.read_bytes(&mut buf)?;
        Ok(i64::from_le_bytes(buf))
    }

    /// Reads an int stored in 1 to 5 bytes, 7 bits per byte, low-order groups first.
    /// The high bit of each byte tells whether more bytes follow.
    fn read_vint(&mut self) -> Result<i32> {
        let mut b = self.read_u8()?;
        let mut value = (b & 0x7f) as u32;
        let mut shift = 7;
        while b & 0x80 != 0 {
            b = self.read_u8()?;
            if shift == 28 && b & 0xf0 != 0 {
                return Err(Error::corrupt(self.name(), "invalid vInt detected (too many bits)"))
            }
            value |= ((b & 0x7f) as u32) << shift;
            shift += 7;
        }
        Ok(value as i32)
    }

    /// Reads a non-negative long stored in 1 to 9 bytes, see [IndexInput::read_vint].
    fn read_vlong(&mut self) -> Result<i64> {
        let mut b = self.read_u8()?;
        let mut value = (b & 0x7f) as u64;
        let mut shift = 7;
        while b & 0x80 != 0 {
            if shift == 63 {
                return Err(Error::corrupt(self.name(), "invalid vLong detected (negative values disallowed)"))
            }
            b = self.read_u8()?;
            value |= ((b & 0x7f) as u64) << shift;
            shift += 7;
        }
        Ok(value as i64)
    }

    fn skip_bytes(&mut self, n: u64) -> Result<()> {
        ensure_remaining(&*self, n)?;
        let pos = self.position() + n;
        self.seek(pos)
    }

    fn read_i32s(&mut self, dst: &mut [i32]) -> Result<()> {
        ensure_remaining(&*self, 4 * dst.len() as u64)?;
        let mut buf = [0u8; 512];
        for chunk in dst.chunks_mut(buf.len() / 4) {
            let bytes = &mut buf[..chunk.len() * 4];
            self.read_bytes(bytes)?;
            for (v, b) in chunk.iter_mut().zip(bytes.chunks_exact(4)) {
                *v = i32::from_le_bytes([b[0], b[1], b[2], b[3]]);
            }
        }
        Ok(())
    }

    fn read_i64s(&mut self, dst: &mut [i64]) -> Result<()> {
        ensure_remaining(&*self, 8 * dst.len() as u64)?;
        let mut buf = [0u8; 512];
        for chunk in dst.chunks_mut(buf.len() / 8) {
            let bytes = &mut buf[..chunk.len() * 8];
            self.read_bytes(bytes)?;
            for (v, b) in chunk.iter_mut().zip(bytes.chunks_exact(8)) {
                let mut le = [0; 8];
                le.copy_from_slice(b);
                *v = i64::from_le_bytes(le);
            }
        }
        Ok(())
    }
}


/// Reads of values at absolute offsets, leaving the forward cursor of the input alone.
pub trait RandomAccessInput {
    fn read_u8_at(&mut self, pos: u64) -> Result<u8>;

    fn read_i16_at(&mut self, pos: u64) -> Result<i16>;

    fn read_i32_at(&mut self, pos: u64) -> Result<i32>;

    fn read_i64_at(&mut self, pos: u64) -> Result<i64>;
}


/// Fails with [Error::EndOfData] unless `n` more bytes can be read sequentially.
pub fn ensure_remaining<I: IndexInput + ?Sized>(input: &I, n: u64) -> Result<()> {
    let pos = input.position();
    let len = input.len();
    if n > len - pos {
        Err(Error::eof(input.name(), pos, n, len))
    } else {
        Ok(())
    }
}
