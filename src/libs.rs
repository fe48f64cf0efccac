
//! # Genomic interval, coverage and SV-consolidation libraries
//!
//! This library is a collection of functions and structures to
//! index large collections of genomic intervals (exon/gene annotations,
//! BED regions), to compute per-base coverage depth from aligned reads
//! and to consolidate + annotate structural-variant caller output.
//! It is used by the CoverR suite which provides small dedicated binaries
//! on top of it.
//!
//! The library is split into:
//!  - common: interval + index structures, BED parsing, errors, shared enums
//!  - annotation: gene/exon feature table parsing into an interval index
//!  - coverage: per-base depth computation with worker threads
//!  - hts_lib_based: the htslib-backed aligned-read source
//!  - svmerge: structural-variant record parsing and merging
//!  - annotate: joining merged calls against features and coverage
//!

pub mod lib {
    /// interval + index structures, BED parsing, errors, shared enums
    pub mod common;
    /// gene/exon feature table parsing into an interval index
    pub mod annotation;
    /// per-base depth computation with worker threads
    pub mod coverage;
    /// the htslib-backed aligned-read source
    pub mod hts_lib_based;
    /// structural-variant record parsing and merging
    pub mod svmerge;
    /// joining merged calls against features and coverage
    pub mod annotate;
}
