use anyhow::{ensure, Context};
use clap::{Parser, ValueEnum};
use sqd_index_input::{
    BufferedReader, CountingSource, FileSource, ReadContext, ReaderSettings, SourceStats
};
use std::fs::File;
use std::sync::Arc;


#[derive(Parser, Debug)]
#[command(version, about = "Inspect a segment file through a buffered index input", long_about = None)]
pub struct CLI {
    /// File to read
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Start of the range to read
    #[arg(long, default_value = "0")]
    pub offset: u64,

    /// Length of the range to read, defaults to the rest of the file
    #[arg(long)]
    pub len: Option<u64>,

    /// Buffer size in bytes
    #[arg(long, value_name = "BYTES")]
    pub buffer_size: Option<usize>,

    /// Use the buffer size for merge reads
    #[arg(long)]
    pub merge: bool,

    /// Read values positionally from the end of the range towards its start
    #[arg(long)]
    pub backward: bool,

    /// Value width for backward reads
    #[arg(long, value_enum, default_value_t = Width::Byte)]
    pub width: Width
}


#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    #[value(name = "1")]
    Byte,
    #[value(name = "2")]
    Short,
    #[value(name = "4")]
    Int,
    #[value(name = "8")]
    Long
}


impl Width {
    pub fn bytes(self) -> u64 {
        match self {
            Width::Byte => 1,
            Width::Short => 2,
            Width::Int => 4,
            Width::Long => 8
        }
    }
}


pub type FileReader = BufferedReader<CountingSource<FileSource>>;


impl CLI {
    pub fn settings(&self) -> ReaderSettings {
        let mut settings = ReaderSettings::default();
        if self.merge {
            settings = settings.with_context(ReadContext::Merge);
        }
        if let Some(size) = self.buffer_size {
            settings = settings.with_buffer_size(size);
        }
        settings
    }

    pub fn open(&self) -> anyhow::Result<(FileReader, Arc<SourceStats>)> {
        let file = File::open(&self.file)
            .with_context(|| format!("failed to open {}", self.file))?;
        let source = FileSource::new(file);
        let len = source.len()
            .with_context(|| format!("failed to get the length of {}", self.file))?;
        let source = CountingSource::new(source);
        let stats = source.stats();
        let reader = self.settings().open(self.file.as_str(), source, len)?;
        Ok((reader, stats))
    }

    /// Range to read as `(offset, len)`
    pub fn range(&self, file_len: u64) -> anyhow::Result<(u64, u64)> {
        ensure!(
            self.offset <= file_len,
            "offset {} is past the end of the file ({} bytes)",
            self.offset,
            file_len
        );
        let len = self.len.unwrap_or(file_len - self.offset);
        Ok((self.offset, len))
    }
}
