//! The htslib-backed aligned-read source.
//!
//! Wraps a sorted, indexed BAM file behind the [ReadSource]/[RegionReads]
//! abstraction of the coverage module. Every worker thread opens its own
//! [bam::IndexedReader] handle, the file itself is only ever read.

use std::path::{Path, PathBuf};
use rust_htslib::{bam, bam::Read};
use log::debug;

use crate::lib::common::RegionError;
use crate::lib::coverage::{ReadSource, RegionReads, ReadSpan};


/// Basic read QC shared by all consumers: secondary, supplementary,
/// unmapped, QC-fail and duplicate-flagged alignments are never counted.
/// Mapping-quality thresholds are applied later in the calculator.
///
/// Unittest: TRUE
///
pub fn read_qc_basic(
    entry: &bam::Record
) -> bool {
    !(entry.is_secondary()
        || entry.is_supplementary()
        || entry.is_unmapped()
        || entry.is_quality_check_failed()
        || entry.is_duplicate())
}


/// A BAM file on disk from which per-worker indexed readers are opened.
#[derive(Debug,Clone)]
pub struct BamSource {
    path: PathBuf,
}

impl BamSource {
    /// Validates the path and that an indexed reader can actually be
    /// opened (missing .bai/.csi index surfaces here, not mid-compute).
    ///
    /// Unittest: FALSE
    ///
    pub fn new(
        my_path: &str
    ) -> Result<BamSource, RegionError> {
        if !Path::new(my_path).exists() {
            return Err(RegionError::Parse {
                file: my_path.to_string(),
                line: 0,
                msg: String::from("BAM file does not exist"),
            });
        }
        // probe once so a broken index fails fast
        bam::IndexedReader::from_path(my_path)?;
        Ok(BamSource { path: PathBuf::from(my_path) })
    }
}

impl ReadSource for BamSource {
    type Reader = BamRegionReader;

    fn open(&self) -> Result<BamRegionReader, RegionError> {
        let reader = bam::IndexedReader::from_path(&self.path)?;
        Ok(BamRegionReader { bam: reader })
    }
}


/// One indexed reader handle, owned by exactly one worker.
pub struct BamRegionReader {
    bam: bam::IndexedReader,
}

impl RegionReads for BamRegionReader {
    /// Fetches every QC-passing alignment overlapping the inclusive
    /// 1-based region and reduces it to its reference span + mapq.
    /// A contig the BAM header does not know yields an empty result,
    /// never an error.
    fn spans_in_region(
        &mut self,
        contig: &str,
        start: u64,
        end: u64
    ) -> Result<Vec<ReadSpan>, RegionError> {
        let tid = match self.bam.header().tid(contig.as_bytes()) {
            Some(t) => t,
            None => {
                debug!("Contig {} not in BAM header, empty fetch", contig);
                return Ok(Vec::new());
            }
        };
        // internal 1-based inclusive -> htslib 0-based half-open
        let fetch_start = start.saturating_sub(1) as i64;
        let fetch_end   = end as i64;
        self.bam.fetch((tid, fetch_start, fetch_end))?;
        let mut spans: Vec<ReadSpan> = Vec::new();
        for result in self.bam.records() {
            let record = result?;
            if !read_qc_basic(&record) {
                continue;
            }
            let (span_start, span_end) = alignment_span(record.pos(), record.cigar().end_pos());
            spans.push(ReadSpan {
                start: span_start,
                end: span_end,
                mapq: record.mapq(),
            });
        }
        Ok(spans)
    }

    fn contig_length(&self, contig: &str) -> Option<u64> {
        let header = self.bam.header();
        let tid = header.tid(contig.as_bytes())?;
        header.target_len(tid)
    }
}


/// Converts the htslib 0-based alignment coordinates (pos and exclusive
/// end_pos from the cigar) into the internal 1-based inclusive span.
///
/// Unittest: TRUE
///
/// ```
/// use regioncov::lib::hts_lib_based::alignment_span;
/// // a read at 0-based pos 99 ending before 199 is [100,199] inclusive
/// assert_eq!(alignment_span(99,199),(100,199));
/// ```
pub fn alignment_span(
    pos0: i64,
    end_pos0: i64
) -> (u64, u64) {
    let start = (pos0 + 1).max(1) as u64;
    // exclusive 0-based end equals inclusive 1-based end
    let end = end_pos0.max(pos0 + 1) as u64;
    (start, end)
}
