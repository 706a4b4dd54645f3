use crate::source::RawSource;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};


pub struct FileSource {
    file: File
}


impl FileSource {
    pub fn new(file: File) -> Self {
        Self {
            file
        }
    }

    pub fn len(&self) -> std::io::Result<u64> {
        self.file.metadata().map(|m| m.len())
    }

    pub fn into_file(self) -> File {
        self.file
    }
}


impl RawSource for FileSource {
    fn fill(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        let mut written = 0;
        while written < dst.len() {
            match self.file.read(&mut dst[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {},
                Err(err) => return Err(err)
            }
        }
        Ok(written)
    }

    fn reposition(&mut self, offset: u64) -> std::io::Result<()> {
        let new_pos = self.file.seek(SeekFrom::Start(offset))?;
        debug_assert_eq!(new_pos, offset);
        Ok(())
    }
}
