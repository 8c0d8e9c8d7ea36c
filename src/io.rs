use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use needletail::parse_fastx_file;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::pool::{CandidatePool, UtrOption};
use crate::sequence::validate_nucleotides;

/// Header line of a pool snapshot.
pub const SNAPSHOT_HEADER: &str = "gene_name\tfirst_six_aas\tutr\tcds";

fn is_gz(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "gz")
}

/// Open `path` for line reading, transparently decompressing `.gz` files.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    if is_gz(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn write_rows<W: Write>(pool: &CandidatePool, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "{}", SNAPSHOT_HEADER)?;
    for option in pool {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            option.gene_name(),
            option.first_six_aas(),
            option.utr(),
            option.cds()
        )?;
    }
    Ok(())
}

/// Persist `pool` as a tab-separated snapshot, one option per line in pool order.
///
/// A `.gz` path is gzip-compressed. Any failure while writing, including the gzip
/// trailer and the final buffer flush, is returned rather than lost on drop.
pub fn write_pool_snapshot(pool: &CandidatePool, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let written = if is_gz(path) {
        let mut gz = GzEncoder::new(out, Compression::default());
        write_rows(pool, &mut gz).and_then(|_| gz.finish())
    } else {
        write_rows(pool, &mut out).map(|_| out)
    };

    written
        .and_then(|w| w.into_inner().map(drop).map_err(|e| e.into_error()))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Load a pool written by [`write_pool_snapshot`], preserving its order.
///
/// Cached amino-acid prefixes are taken as stored. Blank lines are ignored.
pub fn read_pool_snapshot(path: &Path) -> Result<CandidatePool> {
    let reader = open_reader(path)?;
    let mut lines = reader.lines().enumerate();

    let Some((_, header)) = lines.next() else {
        return Ok(CandidatePool::default());
    };
    if header?.trim_end() != SNAPSHOT_HEADER {
        bail!("{}: missing pool snapshot header", path.display());
    }

    let mut options = Vec::new();
    for (idx, line) in lines {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let &[gene_name, first_six_aas, utr, cds] = fields.as_slice() else {
            bail!(
                "{}:{}: expected 4 tab-separated fields, found {}",
                path.display(),
                idx + 1,
                fields.len()
            );
        };
        validate_nucleotides(utr)
            .and_then(|_| validate_nucleotides(cds))
            .with_context(|| format!("{}:{}: bad sequence", path.display(), idx + 1))?;
        options.push(UtrOption::new(utr, cds, gene_name, first_six_aas));
    }

    Ok(CandidatePool::new(options))
}

/// Read query coding sequences from a FASTA or FASTQ file (optionally gzipped).
///
/// Returns `(id, sequence)` pairs in file order with sequences upper-cased.
pub fn read_cds_queries(path: &Path) -> Result<Vec<(String, String)>> {
    // needletail rejects a zero-length file, but here it just means no queries.
    if fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len()
        == 0
    {
        return Ok(Vec::new());
    }

    let mut reader = match parse_fastx_file(path) {
        Ok(r) => r,
        Err(e) if e.kind == needletail::errors::ParseErrorKind::EmptyFile => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e).context("Failed to parse FASTX file"),
    };

    let mut queries = Vec::new();
    while let Some(record) = reader.next() {
        let r = record.context("Malformed FASTX record")?;
        let id = String::from_utf8_lossy(r.id()).into_owned();
        let seq = String::from_utf8_lossy(&r.seq()).to_ascii_uppercase();
        queries.push((id, seq));
    }
    Ok(queries)
}
