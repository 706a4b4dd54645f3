use crate::buffered::BufferedReader;
use crate::error::{invalid_argument, Result};
use crate::input::IndexInput;
use crate::source::RawSource;
use tracing::debug;


/// Source of a slice: reads a sub-range of the parent through a private clone of it.
pub struct SliceSource<S> {
    parent: BufferedReader<S>,
    offset: u64,
    pos: u64
}


impl <S: RawSource> RawSource for SliceSource<S> {
    fn fill(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        let start = self.offset + self.pos;
        let available = self.parent.len().saturating_sub(start);
        let n = std::cmp::min(dst.len() as u64, available) as usize;
        if n == 0 {
            return Ok(0)
        }
        self.parent.seek(start)?;
        self.parent.read_bytes(&mut dst[..n])?;
        self.pos += n as u64;
        Ok(n)
    }

    fn reposition(&mut self, offset: u64) -> std::io::Result<()> {
        self.pos = offset;
        Ok(())
    }
}


impl <S: RawSource> BufferedReader<S> {
    /// Returns a zero-based view of `[offset, offset + length)`.
    ///
    /// The slice has its own cursor and buffer and may outlive `self`.
    pub fn slice(
        &self,
        description: &str,
        offset: u64,
        length: u64
    ) -> Result<BufferedReader<SliceSource<S>>>
    {
        let in_bounds = offset.checked_add(length).is_some_and(|end| end <= self.len());
        if !in_bounds {
            return Err(invalid_argument!(
                "slice() {} out of bounds: offset={}, length={}, fileLength={}: {}",
                description,
                offset,
                length,
                self.len(),
                self.name()
            ))
        }

        debug!(resource = self.name(), description, offset, length, "slicing");

        let source = SliceSource {
            parent: self.clone(),
            offset,
            pos: 0
        };
        let name = format!("{} [slice of {}]", description, self.name());
        BufferedReader::new(name, source, length, self.buffer_size())
    }
}


#[cfg(test)]
mod test {
    use crate::buffered::BufferedReader;
    use crate::input::{IndexInput, RandomAccessInput};
    use crate::memory::MemorySource;


    fn input(len: usize) -> BufferedReader<MemorySource> {
        let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        BufferedReader::new("memory", MemorySource::new(data), len as u64, 64).unwrap()
    }

    #[test]
    fn slice_maps_offsets() {
        let parent = input(1000);
        let mut slice = parent.slice("tail", 300, 500).unwrap();
        assert_eq!(slice.len(), 500);
        assert_eq!(slice.position(), 0);
        assert_eq!(slice.name(), "tail [slice of memory]");

        for i in 0..500u64 {
            assert_eq!(slice.read_u8().unwrap(), ((300 + i) % 251) as u8);
        }
        assert!(slice.read_u8().unwrap_err().is_end_of_data());

        assert_eq!(slice.read_u8_at(0).unwrap(), (300 % 251) as u8);
        assert_eq!(
            slice.read_i32_at(496).unwrap(),
            i32::from_le_bytes(std::array::from_fn(|i| ((796 + i) % 251) as u8))
        );
        assert!(slice.read_i32_at(497).unwrap_err().is_end_of_data());
        assert!(slice.read_u8_at(500).unwrap_err().is_end_of_data());
    }

    #[test]
    fn slice_length_wins_over_parent_extent() {
        let parent = input(1000);
        let mut slice = parent.slice("head", 0, 10).unwrap();
        let mut buf = [0; 11];
        assert!(slice.read_bytes(&mut buf).unwrap_err().is_end_of_data());
        slice.read_bytes(&mut buf[..10]).unwrap();
        assert_eq!(&buf[..10], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn slice_of_a_slice() {
        let parent = input(1000);
        let outer = parent.slice("outer", 100, 800).unwrap();
        let mut inner = outer.slice("inner", 50, 100).unwrap();
        inner.seek(99).unwrap();
        assert_eq!(inner.read_u8().unwrap(), 249);
        drop(outer);
        inner.seek(0).unwrap();
        assert_eq!(inner.read_u8().unwrap(), 150);
    }

    #[test]
    fn out_of_range_slices_are_rejected() {
        let parent = input(1000);
        assert!(parent.slice("a", 1001, 0).unwrap_err().is_invalid_argument());
        assert!(parent.slice("b", 500, 501).unwrap_err().is_invalid_argument());
        assert!(parent.slice("c", u64::MAX, 2).unwrap_err().is_invalid_argument());
        assert!(parent.slice("d", 1000, 0).is_ok());
    }

    #[test]
    fn slice_does_not_move_the_parent() {
        let mut parent = input(1000);
        parent.seek(10).unwrap();
        let mut slice = parent.slice("mid", 400, 100).unwrap();
        slice.read_i64().unwrap();
        assert_eq!(parent.position(), 10);
        assert_eq!(parent.read_u8().unwrap(), 10);
    }
}
