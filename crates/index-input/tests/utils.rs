#![allow(dead_code)]

use sqd_index_input::{BufferedReader, CountingSource, RawSource, SourceStats};
use std::sync::Arc;


/// Byte `n` of the generated resource
pub fn byten(n: u64) -> u8 {
    (n.wrapping_mul(n) % 256) as u8
}


pub fn expected(pos: u64, len: usize) -> Vec<u8> {
    (0..len as u64).map(|i| byten(pos + i)).collect()
}


/// Endless resource with `byten(n)` at offset `n`
pub struct Generated {
    pos: u64
}


impl RawSource for Generated {
    fn fill(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        for b in dst.iter_mut() {
            *b = byten(self.pos);
            self.pos += 1;
        }
        Ok(dst.len())
    }

    fn reposition(&mut self, offset: u64) -> std::io::Result<()> {
        self.pos = offset;
        Ok(())
    }
}


pub type GeneratedReader = BufferedReader<CountingSource<Generated>>;


pub fn generated(len: u64, buffer_size: usize) -> (GeneratedReader, Arc<SourceStats>) {
    let source = CountingSource::new(Generated { pos: 0 });
    let stats = source.stats();
    let name = format!("generated(len={})", len);
    let input = BufferedReader::new(name, source, len, buffer_size).unwrap();
    (input, stats)
}
