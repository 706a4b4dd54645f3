mod cli;


use crate::cli::{Width, CLI};
use anyhow::Context;
use clap::Parser;
use sqd_index_input::{IndexInput, RandomAccessInput};
use std::io::Write;
use tracing::info;


fn main() -> anyhow::Result<()> {
    let args = CLI::parse();

    let env_filter = tracing_subscriber::EnvFilter::builder().parse_lossy(
        std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV)
            .unwrap_or("info".to_string()),
    );

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let (reader, stats) = args.open()?;
    let (offset, len) = args.range(reader.len())?;
    let mut input = reader.slice("range", offset, len)
        .context("requested range does not fit into the file")?;

    let mut out = std::io::stdout().lock();
    if args.backward {
        dump_backward(&mut input, offset, args.width, &mut out)?;
    } else {
        dump(&mut input, offset, &mut out)?;
    }
    out.flush()?;

    info!(
        file = %args.file,
        buffer_size = input.buffer_size(),
        fills = stats.fills(),
        repositions = stats.repositions(),
        bytes = stats.bytes(),
        "done"
    );
    Ok(())
}


fn dump(input: &mut impl IndexInput, offset: u64, out: &mut impl Write) -> anyhow::Result<()> {
    let mut line = [0u8; 16];
    while input.position() < input.len() {
        let pos = input.position();
        let n = std::cmp::min(line.len() as u64, input.len() - pos) as usize;
        input.read_bytes(&mut line[..n])?;
        write!(out, "{:08x} ", offset + pos)?;
        for b in &line[..n] {
            write!(out, " {:02x}", b)?;
        }
        writeln!(out)?;
    }
    Ok(())
}


fn dump_backward(
    input: &mut (impl IndexInput + RandomAccessInput),
    offset: u64,
    width: Width,
    out: &mut impl Write
) -> anyhow::Result<()>
{
    let width_bytes = width.bytes();
    if input.len() < width_bytes {
        return Ok(())
    }
    let mut pos = input.len() - width_bytes;
    loop {
        let at = offset + pos;
        match width {
            Width::Byte => writeln!(out, "{:08x} {:#04x}", at, input.read_u8_at(pos)?)?,
            Width::Short => writeln!(out, "{:08x} {}", at, input.read_i16_at(pos)?)?,
            Width::Int => writeln!(out, "{:08x} {}", at, input.read_i32_at(pos)?)?,
            Width::Long => writeln!(out, "{:08x} {}", at, input.read_i64_at(pos)?)?
        }
        if pos < width_bytes {
            break
        }
        pos -= width_bytes;
    }
    Ok(())
}
