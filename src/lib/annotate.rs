//! Annotation of consolidated structural-variant calls.
//!
//! Joins every call against the gene/exon interval index to attach the
//! overlapping exon descriptors and against the sample's aligned-read
//! source to attach a mean coverage depth. Calls are independent of one
//! another, so annotation parallelizes across calls with one reader
//! handle per worker.

use std::sync::atomic::{AtomicBool, Ordering};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use log::debug;

use crate::lib::common::{Interval, IntervalIndex, RegionError};
use crate::lib::coverage::{CoverageCalculator, ReadSource};
use crate::lib::svmerge::ConsolidatedSv;


/// Strips the literal `Coding` and every stray `;` from a feature
/// descriptor before it is attached to a call.
///
/// Unittest: TRUE
///
/// ```
/// use regioncov::lib::annotate::clean_feature;
/// assert_eq!(clean_feature("Exon #3 Coding;"),"Exon #3 ");
/// ```
pub fn clean_feature(
    raw: &str
) -> String {
    raw.replace("Coding", "").replace(';', "")
}

/// All exon feature descriptors overlapping the inclusive range,
/// cleaned for output. Descriptors without `Exon` in them (introns,
/// bare gene hits) are not attached at all.
///
/// Unittest: TRUE
///
pub fn exon_features_for_range(
    features: &IntervalIndex,
    contig: &str,
    start: u64,
    end: u64
) -> Vec<String> {
    features
        .get_intervals_for_range(contig, start, end)
        .into_iter()
        .filter_map(|iv| iv.info.as_deref())
        .filter(|info| info.contains("Exon"))
        .map(clean_feature)
        .collect()
}


/// Joins consolidated calls against the feature index and the coverage
/// calculator. The index is read-only and shared, the read source hands
/// out one reader per worker.
pub struct ResultAnnotator<'a, S: ReadSource> {
    /// the frozen gene/exon index
    pub features: &'a IntervalIndex,
    /// the sample's aligned reads
    pub source: &'a S,
    /// depth settings (mapq threshold, worker count)
    pub calculator: CoverageCalculator,
}

impl<'a, S: ReadSource> ResultAnnotator<'a, S> {
    pub fn new(
        features: &'a IntervalIndex,
        source: &'a S,
        calculator: CoverageCalculator
    ) -> Self {
        ResultAnnotator { features, source, calculator }
    }

    /// Annotates a single call in place: cleaned exon descriptors plus
    /// the mean depth over its range (0.0 when nothing aligns there,
    /// NaN never escapes).
    ///
    /// Unittest: TRUE
    ///
    pub fn annotate_record(
        &self,
        reader: &mut S::Reader,
        record: &mut ConsolidatedSv
    ) -> Result<(), RegionError> {
        record.features = exon_features_for_range(
            self.features,
            &record.contig,
            record.range_start,
            record.range_end
        );
        let region = Interval::new(record.range_start, record.range_end, None)?;
        record.mean_depth = self.calculator.mean_depth_for_region(
            reader,
            &record.contig,
            &region
        )?;
        Ok(())
    }

    /// Annotates the whole set on the calculator's worker pool; every
    /// worker opens its own reader handle and each call only touches
    /// its own state. The cancellation flag is honored per call and
    /// surfaces as [RegionError::Interrupted].
    ///
    /// Unittest: TRUE
    ///
    pub fn annotate_all(
        &self,
        records: &mut [ConsolidatedSv],
        cancel: &AtomicBool
    ) -> Result<(), RegionError> {
        debug!("Annotating {} consolidated calls", records.len());
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.calculator.threads)
            .build()
            .map_err(|e| RegionError::ThreadPool(e.to_string()))?;
        pool.install(|| {
            records
                .par_iter_mut()
                .map_init(
                    || None::<S::Reader>,
                    |cache, record| {
                        if cancel.load(Ordering::Relaxed) {
                            return Err(RegionError::Interrupted);
                        }
                        if cache.is_none() {
                            *cache = Some(self.source.open()?);
                        }
                        let reader = cache.as_mut().expect("ERROR: reader cache must be filled");
                        self.annotate_record(reader, record)
                    },
                )
                .collect::<Result<(), RegionError>>()
        })
    }
}
