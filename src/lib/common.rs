use rustc_hash::FxHashMap;
use std::io::{BufRead, BufReader};
use std::io::Write;
use std::io;
use std::fs::File;
use std::path::Path;
use std::cmp::Ordering;
use bio::data_structures::interval_tree::IntervalTree;
use thiserror::Error;
use log::debug;


/// The error taxonomy of the whole library.
/// Low-level parse and I/O failures propagate up to whoever called the
/// component, empty regions and unknown contigs are never errors and an
/// interrupted coverage computation is its own variant so it can never
/// be mistaken for a real zero-coverage result.
#[derive(Error, Debug)]
pub enum RegionError {
    /// an interval was constructed upside-down
    #[error("ERROR: invalid interval, begin {begin} is larger than end {end}")]
    InvalidRange {
        begin: u64,
        end: u64,
    },
    /// a malformed line in a tab/space separated input file,
    /// reported with file and 1-based line number
    #[error("ERROR: could not parse {file} line {line}: {msg}")]
    Parse {
        file: String,
        line: usize,
        msg: String,
    },
    /// a malformed block in a structural-variant caller output stream
    #[error("ERROR: could not parse SV record {record}: {msg}")]
    SvParse {
        record: String,
        msg: String,
    },
    /// a coverage computation was cancelled before finishing
    #[error("ERROR: computation was interrupted")]
    Interrupted,
    /// the worker pool could not be brought up
    #[error("ERROR: could not build worker pool: {0}")]
    ThreadPool(String),
    #[error("ERROR: I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("ERROR: htslib failed: {0}")]
    Hts(#[from] rust_htslib::errors::Error),
}


/// The closed set of annotation keys a consolidated call exposes to
/// serializers. Writers iterate this enum instead of passing free-form
/// string keys around, so a misspelled key cannot silently drop a
/// column.
#[derive(Debug,Clone,Copy,Hash,Eq,PartialEq)]
pub enum AnnotKey {
    Chrom,
    Start,
    End,
    SupportingReads,
    MeanDepth,
    Features,
}

impl AnnotKey {
    /// stable field name used by downstream serializers
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotKey::Chrom           => "chr",
            AnnotKey::Start           => "start",
            AnnotKey::End             => "end",
            AnnotKey::SupportingReads => "supportingReads",
            AnnotKey::MeanDepth       => "meanDepth",
            AnnotKey::Features        => "features",
        }
    }

    /// fixed column order for tabular writers
    pub fn all() -> [AnnotKey; 6] {
        [
            AnnotKey::Chrom,
            AnnotKey::Start,
            AnnotKey::End,
            AnnotKey::SupportingReads,
            AnnotKey::MeanDepth,
            AnnotKey::Features,
        ]
    }
}


/// A genomic interval with 1-based *inclusive* coordinates on both ends
/// and an optional annotation payload.
/// This is the atomic unit of every index and every coverage target in
/// this library. BED-style 0-based half-open input is converted on parse
/// by adding +1 to both start and end, so a BED row `chr1 100 200`
/// becomes the interval [101,201] spanning 101 bases.
///
/// Unittest: TRUE
///
/// ```
/// use regioncov::lib::common::Interval;
/// let iv = Interval::new(101,201,None).unwrap();
/// assert_eq!(iv.len(),101);
/// assert!(iv.intersects(201,300));
/// assert!(!iv.intersects(202,300));
/// ```
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Interval {
    /// 1-based inclusive start
    pub begin: u64,
    /// 1-based inclusive end
    pub end: u64,
    /// optional payload, e.g. a feature descriptor
    pub info: Option<String>,
}

impl Interval {
    /// Constructs an interval, refusing `begin > end` at the door so a
    /// broken range can never travel through an index.
    ///
    /// Unittest: TRUE
    ///
    pub fn new(
        begin: u64,
        end: u64,
        info: Option<String>
    ) -> Result<Interval, RegionError> {
        if begin > end {
            return Err(RegionError::InvalidRange { begin, end });
        }
        Ok(Interval { begin, end, info })
    }

    /// Inclusive overlap test against an inclusive query range.
    /// True iff the two ranges share at least one base. The test is
    /// symmetric, it does not matter which range is the query.
    ///
    /// Unittest: TRUE
    ///
    pub fn intersects(
        &self,
        start: u64,
        end: u64
    ) -> bool {
        self.begin <= end && self.end >= start
    }

    /// Number of bases covered by the interval, both ends included.
    ///
    /// Unittest: TRUE
    ///
    pub fn len(&self) -> u64 {
        self.end - self.begin + 1
    }

    /// an inclusive interval always spans at least one base
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Ord for Interval {
    // strictly by start position, ties are arbitrary
    fn cmp(&self, other: &Self) -> Ordering {
        self.begin.cmp(&other.begin)
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}


/// Incremental builder for an [IntervalIndex].
/// Contig entries are created lazily on first insert, duplicate and
/// overlapping intervals are permitted and all of them come back on
/// query. Once everything is added, [freeze](IntervalIndexBuilder::freeze)
/// turns the builder into the immutable query-phase value - this replaces
/// the usual "null until first insert" lazy map with an explicit
/// build/query separation.
#[derive(Debug,Default)]
pub struct IntervalIndexBuilder {
    per_contig: FxHashMap<String, Vec<Interval>>,
}

impl IntervalIndexBuilder {
    pub fn new() -> Self {
        IntervalIndexBuilder::default()
    }

    /// Appends a new interval to the contig's collection.
    /// Coordinates are the library-internal 1-based inclusive ones,
    /// conversion from BED-style input happens in the parsers.
    ///
    /// Unittest: TRUE
    ///
    pub fn add_interval(
        &mut self,
        contig: &str,
        begin: u64,
        end: u64,
        info: Option<String>
    ) -> Result<(), RegionError> {
        let interval = Interval::new(begin, end, info)?;
        self.per_contig
            .entry(contig.to_string())
            .or_default()
            .push(interval);
        Ok(())
    }

    /// number of intervals added so far, over all contigs
    pub fn len(&self) -> usize {
        self.per_contig.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.per_contig.is_empty()
    }

    /// Sorts every contig's intervals ascending by start and builds the
    /// per-contig interval trees which serve the range queries.
    /// The tree is purely a lookup accelerator, the set of intervals a
    /// query returns is identical to a linear scan over the sorted list.
    ///
    /// Unittest: TRUE
    ///
    pub fn freeze(self) -> IntervalIndex {
        let mut per_contig = self.per_contig;
        let mut trees: FxHashMap<String, IntervalTree<u64, usize>> = FxHashMap::default();
        for (contig, intervals) in per_contig.iter_mut() {
            intervals.sort();
            let mut tree = IntervalTree::new();
            for (idx, iv) in intervals.iter().enumerate() {
                // the tree API is half-open, our coordinates inclusive
                tree.insert(iv.begin..iv.end + 1, idx);
            }
            trees.insert(contig.clone(), tree);
        }
        debug!("Frozen interval index with {} contigs", per_contig.len());
        IntervalIndex { per_contig, trees }
    }
}


/// The frozen, read-only per-contig interval collection.
/// Safe to share across threads without locking - queries never mutate.
/// Lookups for contigs that were never seen return an empty result,
/// never an error.
#[derive(Debug)]
pub struct IntervalIndex {
    // intervals per contig, sorted ascending by start
    per_contig: FxHashMap<String, Vec<Interval>>,
    // lookup accelerator, values are indices into the sorted lists
    trees: FxHashMap<String, IntervalTree<u64, usize>>,
}

impl IntervalIndex {
    /// Returns every interval of the contig which shares at least one
    /// base with the inclusive query range, ordered by start position.
    ///
    /// Unittest: TRUE
    ///
    pub fn get_intervals_for_range(
        &self,
        contig: &str,
        start: u64,
        end: u64
    ) -> Vec<&Interval> {
        if start > end {
            return Vec::new();
        }
        let (intervals, tree) = match (self.per_contig.get(contig), self.trees.get(contig)) {
            (Some(i), Some(t)) => (i, t),
            _ => return Vec::new(),
        };
        let mut hits: Vec<usize> = tree
            .find(start..end + 1)
            .map(|entry| *entry.data())
            .collect();
        // the tree returns entries in arbitrary order, the sorted list
        // indices restore start-position order
        hits.sort_unstable();
        hits.into_iter().map(|idx| &intervals[idx]).collect()
    }

    /// Convenience wrapper querying a single base.
    ///
    /// Unittest: TRUE
    ///
    pub fn get_intervals_for_site(
        &self,
        contig: &str,
        pos: u64
    ) -> Vec<&Interval> {
        self.get_intervals_for_range(contig, pos, pos)
    }

    /// all contigs with at least one interval, human-sorted for
    /// reproducible iteration
    pub fn get_contigs(&self) -> Vec<&str> {
        let mut contigs: Vec<&str> = self.per_contig.keys().map(|k| k.as_str()).collect();
        contigs.sort_by(|a, b| human_sort::compare(a, b));
        contigs
    }

    /// total number of indexed intervals
    pub fn len(&self) -> usize {
        self.per_contig.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.per_contig.is_empty()
    }
}


/// One coverage target: a contig together with an interval on it.
/// Targets keep the order of the file they came from, the coverage
/// results are reported in the same order.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct RegionTarget {
    /// contig/chromosome name
    pub contig: String,
    /// the 1-based inclusive interval on it
    pub interval: Interval,
}


/// Parses a BED-style region file into coverage targets.
/// Expected are tab-separated lines of `contig  0-based-start  0-based-end`
/// with optional extra columns which are ignored. `track`, `browser` and
/// `#` comment lines are skipped. The 0-based half-open coordinates are
/// converted into the internal 1-based inclusive system by adding +1 to
/// both start and end.
/// A line with fewer than 3 columns or unparseable coordinates is a hard
/// parse error naming the file and line, nothing is skipped silently.
///
/// Unittest: TRUE
///
pub fn read_bed_regions(
    my_path: &str
) -> Result<Vec<RegionTarget>, RegionError> {
    if !Path::new(my_path).exists() {
        return Err(RegionError::Parse {
            file: my_path.to_string(),
            line: 0,
            msg: String::from("file does not exist"),
        });
    }
    let input  = File::open(my_path)?;
    let reader = BufReader::new(input);
    let mut targets: Vec<RegionTarget> = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let l = line?;
        if l.is_empty() || l.starts_with('#') || l.starts_with("track") || l.starts_with("browser") {
            continue;
        }
        let fields: Vec<&str> = l.split('\t').collect();
        if fields.len() < 3 {
            return Err(RegionError::Parse {
                file: my_path.to_string(),
                line: line_idx + 1,
                msg: format!("expected at least 3 tab-separated columns, got {}", fields.len()),
            });
        }
        let start = parse_coord(fields[1], my_path, line_idx + 1)?;
        let end   = parse_coord(fields[2], my_path, line_idx + 1)?;
        // 0-based half-open -> 1-based inclusive
        let interval = Interval::new(start + 1, end + 1, None)?;
        targets.push(RegionTarget {
            contig: fields[0].to_string(),
            interval,
        });
    }
    debug!("Read {} targets from BED file {}", targets.len(), my_path);
    Ok(targets)
}

/// Builds a frozen index straight from a BED file, for callers which
/// only ever query and never need the file order.
///
/// Unittest: TRUE
///
pub fn index_from_bed(
    my_path: &str
) -> Result<IntervalIndex, RegionError> {
    let mut builder = IntervalIndexBuilder::new();
    for target in read_bed_regions(my_path)? {
        builder.add_interval(
            &target.contig,
            target.interval.begin,
            target.interval.end,
            None
        )?;
    }
    Ok(builder.freeze())
}

// coordinate column -> u64 with file/line context on failure
fn parse_coord(
    field: &str,
    file: &str,
    line: usize
) -> Result<u64, RegionError> {
    field.parse::<u64>().map_err(|_| RegionError::Parse {
        file: file.to_string(),
        line,
        msg: format!("unparseable coordinate {:?}", field),
    })
}


/// Opens either the given path or stdout as the output sink.
/// Shamelessly kept from https://stackoverflow.com/a/42216134/11255396
///
/// Unittest: FALSE
///
pub fn out_writer(
    out_file: Option<&str>
) -> Box<dyn Write> {
    match out_file {
        Some(x) => {
            let path = Path::new(x);
            Box::new(File::create(path).expect("ERROR: could not create output file!")) as Box<dyn Write>
        }
        None => Box::new(io::stdout()) as Box<dyn Write>,
    }
}
