//! Per-base coverage depth over arbitrary genomic targets.
//!
//! The calculator is generic over a [ReadSource] so the same depth logic
//! runs against an indexed BAM file (see hts_lib_based) or an in-memory
//! span collection in tests. Work is partitioned by target onto a rayon
//! pool with a configurable worker count; every worker holds its own
//! independent reader handle and per-base counts are pure summations, so
//! the result is numerically identical for any thread count.

use std::sync::atomic::{AtomicBool, Ordering};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use statistical::standard_deviation;
use log::debug;

use crate::lib::common::{Interval, RegionError, RegionTarget};


/// One aligned read reduced to the three things coverage needs:
/// the inclusive 1-based span of its alignment on the reference and its
/// mapping quality.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct ReadSpan {
    /// 1-based inclusive alignment start on the reference
    pub start: u64,
    /// 1-based inclusive alignment end on the reference
    pub end: u64,
    /// mapping quality as reported by the aligner
    pub mapq: u8,
}

/// A single reader handle over an aligned-read source.
/// Handles are *not* shared between workers, each worker opens its own
/// through [ReadSource::open].
pub trait RegionReads {
    /// all read spans overlapping the inclusive region, mapping quality
    /// not yet filtered
    fn spans_in_region(
        &mut self,
        contig: &str,
        start: u64,
        end: u64
    ) -> Result<Vec<ReadSpan>, RegionError>;

    /// reference length of the contig, None when the source does not
    /// know it
    fn contig_length(&self, contig: &str) -> Option<u64>;
}

/// An aligned-read source from which independent reader handles can be
/// opened, one per worker thread. Handles move to their worker, hence
/// the Send bound.
pub trait ReadSource: Sync {
    type Reader: RegionReads + Send;

    fn open(&self) -> Result<Self::Reader, RegionError>;
}


/// Per-base depth over a set of targets, one dense array per target in
/// target order.
#[derive(Debug,Clone,PartialEq)]
pub struct CoverageResult {
    /// one depth array per queried target, same order as the query
    pub per_target: Vec<Vec<u32>>,
}

impl CoverageResult {
    /// the depth arrays of all targets concatenated in target order;
    /// its length equals the summed sizes of all queried intervals
    pub fn flattened(&self) -> Vec<u32> {
        self.per_target.iter().flatten().copied().collect()
    }

    /// total number of bases covered by the queried targets
    pub fn total_bases(&self) -> usize {
        self.per_target.iter().map(|d| d.len()).sum()
    }

    /// arithmetic mean depth over all bases, 0.0 for an empty result
    pub fn mean(&self) -> f64 {
        get_mean(&self.flattened())
    }

    /// standard deviation of the depth, 0.0 below two observations
    pub fn stdev(&self) -> f64 {
        let flat: Vec<f64> = self.flattened().into_iter().map(f64::from).collect();
        if flat.len() < 2 {
            return 0.0;
        }
        let mean = get_mean(&self.flattened());
        standard_deviation(&flat, Some(mean))
    }

    /// percentage of bases at or above each depth threshold, see
    /// [convert_counts_to_proportions]
    pub fn proportions(&self) -> Vec<f64> {
        convert_counts_to_proportions(&self.flattened())
    }
}


/// Arithmetic mean over a depth histogram.
/// A zero-length histogram yields 0.0, never NaN - downstream JSON
/// consumers choke on NaN.
///
/// Unittest: TRUE
///
/// ```
/// use regioncov::lib::coverage::get_mean;
/// assert_eq!(get_mean(&[]),0.0);
/// assert_eq!(get_mean(&[2,4,6]),4.0);
/// ```
pub fn get_mean(
    depths: &[u32]
) -> f64 {
    if depths.is_empty() {
        return 0.0;
    }
    let total: u64 = depths.iter().map(|&d| u64::from(d)).sum();
    total as f64 / depths.len() as f64
}

/// For every depth threshold `d` from 0 up to the maximum observed
/// depth, the percentage of bases with depth `>= d`.
/// The resulting sequence is monotonically non-increasing and starts at
/// 100.0 for any non-empty histogram. An empty histogram yields an
/// empty sequence.
///
/// Unittest: TRUE
///
pub fn convert_counts_to_proportions(
    depths: &[u32]
) -> Vec<f64> {
    if depths.is_empty() {
        return Vec::new();
    }
    let max_depth = *depths.iter().max().expect("ERROR: non-empty histogram must have a maximum");
    let total = depths.len() as f64;
    let mut proportions: Vec<f64> = Vec::with_capacity(max_depth as usize + 1);
    for threshold in 0..=max_depth {
        let at_or_above = depths.iter().filter(|&&d| d >= threshold).count();
        proportions.push(100.0 * at_or_above as f64 / total);
    }
    proportions
}


/// Computes per-base depth over target intervals from an aligned-read
/// source, excluding reads below a minimum mapping quality entirely.
#[derive(Debug,Clone,Copy)]
pub struct CoverageCalculator {
    /// reads with mapq strictly below this are not counted at all
    pub min_mapq: u8,
    /// worker thread count for multi-target computation
    pub threads: usize,
}

impl Default for CoverageCalculator {
    fn default() -> Self {
        CoverageCalculator { min_mapq: 0, threads: 1 }
    }
}

impl CoverageCalculator {
    pub fn new(
        min_mapq: u8,
        threads: usize
    ) -> Self {
        CoverageCalculator { min_mapq, threads: threads.max(1) }
    }

    /// Depth at every base of one interval: for each read overlapping
    /// the region and passing the mapq threshold, every base its
    /// alignment spans gets +1.
    ///
    /// Unittest: TRUE
    ///
    pub fn depth_for_interval<R: RegionReads>(
        &self,
        reader: &mut R,
        contig: &str,
        interval: &Interval
    ) -> Result<Vec<u32>, RegionError> {
        let mut depths = vec![0_u32; interval.len() as usize];
        for span in reader.spans_in_region(contig, interval.begin, interval.end)? {
            if span.mapq < self.min_mapq {
                continue;
            }
            let lo = span.start.max(interval.begin);
            let hi = span.end.min(interval.end);
            if lo > hi {
                continue;
            }
            for pos in lo..=hi {
                depths[(pos - interval.begin) as usize] += 1;
            }
        }
        Ok(depths)
    }

    /// Depth over a whole target set, partitioned by target onto the
    /// configured worker pool. Each worker opens its own reader handle
    /// from the source, the underlying file is never shared mutably.
    ///
    /// The cancellation flag is checked before every target; once it is
    /// set the call returns [RegionError::Interrupted] - cancellation is
    /// never conflated with a valid zero-coverage result.
    ///
    /// Unittest: TRUE
    ///
    pub fn depth_for_targets<S: ReadSource>(
        &self,
        source: &S,
        targets: &[RegionTarget],
        cancel: &AtomicBool
    ) -> Result<CoverageResult, RegionError> {
        debug!("Computing depth for {} targets on {} workers", targets.len(), self.threads);
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| RegionError::ThreadPool(e.to_string()))?;
        let per_target: Result<Vec<Vec<u32>>, RegionError> = pool.install(|| {
            targets
                .par_iter()
                .map_init(
                    || None::<S::Reader>,
                    |cache, target| {
                        if cancel.load(Ordering::Relaxed) {
                            return Err(RegionError::Interrupted);
                        }
                        if cache.is_none() {
                            *cache = Some(source.open()?);
                        }
                        let reader = cache.as_mut().expect("ERROR: reader cache must be filled");
                        self.depth_for_interval(reader, &target.contig, &target.interval)
                    },
                )
                .collect()
        });
        Ok(CoverageResult { per_target: per_target? })
    }

    /// Mean depth over a single inclusive region, the common case for
    /// annotating one SV record. 0.0 when nothing aligns there.
    ///
    /// Unittest: TRUE
    ///
    pub fn mean_depth_for_region<R: RegionReads>(
        &self,
        reader: &mut R,
        contig: &str,
        interval: &Interval
    ) -> Result<f64, RegionError> {
        let depths = self.depth_for_interval(reader, contig, interval)?;
        Ok(get_mean(&depths))
    }
}
