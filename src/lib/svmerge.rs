//! Parsing and consolidation of structural-variant caller output.
//!
//! The raw stream is line-oriented: every record is announced by a
//! `#`-prefixed separator line, followed by one whitespace-tokenized
//! summary line and any number of per-read evidence lines which are kept
//! verbatim for traceability. Adjacent records believed to describe the
//! same underlying event are merged into consolidated records.

use std::io::BufRead;
use std::io::Write;
use std::io;
use rustc_hash::FxHashMap;
use regex::Regex;
use itertools::Itertools;
use log::debug;

use crate::lib::common::{AnnotKey, RegionError};


/// The closed set of structural-variant categories the parser knows.
/// Categories have stable serialization names, downstream writers key
/// their output by them.
#[derive(Debug,Clone,Copy,Hash,Eq,PartialEq)]
pub enum SvCategory {
    Deletion,
    Insertion,
    TandemDuplication,
    LongInsertion,
    Inversion,
}

impl SvCategory {
    /// caller type code -> category
    pub fn from_code(code: &str) -> Option<SvCategory> {
        match code {
            "D"   => Some(SvCategory::Deletion),
            "I"   => Some(SvCategory::Insertion),
            "TD"  => Some(SvCategory::TandemDuplication),
            "LI"  => Some(SvCategory::LongInsertion),
            "INV" => Some(SvCategory::Inversion),
            _     => None,
        }
    }

    /// stable name used as output key
    pub fn as_str(&self) -> &'static str {
        match self {
            SvCategory::Deletion          => "deletion",
            SvCategory::Insertion         => "insertion",
            SvCategory::TandemDuplication => "tandemDuplication",
            SvCategory::LongInsertion     => "longInsertion",
            SvCategory::Inversion         => "inversion",
        }
    }

    /// fixed emission order for writers
    pub fn all() -> [SvCategory; 5] {
        [
            SvCategory::Deletion,
            SvCategory::Insertion,
            SvCategory::TandemDuplication,
            SvCategory::LongInsertion,
            SvCategory::Inversion,
        ]
    }
}


/// One raw caller record, straight from a single text block.
/// Positions are reference coordinates as reported by the caller, the
/// breakpoint range is the caller's uncertainty window around the
/// breakpoints. Support counts are unsigned by type, a negative count
/// can never be represented.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct RawSvRecord {
    /// ordinal position in the raw caller output, the adjacency key
    /// for merging
    pub index: u64,
    /// variant category
    pub category: SvCategory,
    /// length of the called variant
    pub sv_length: u64,
    /// length of non-template inserted sequence at the breakpoint
    pub nt_length: u64,
    /// the non-template sequence itself
    pub nt_sequence: String,
    /// contig/chromosome of the call
    pub contig: String,
    /// breakpoint start
    pub bp_start: u64,
    /// breakpoint end
    pub bp_end: u64,
    /// start of the breakpoint uncertainty range
    pub range_start: u64,
    /// end of the breakpoint uncertainty range
    pub range_end: u64,
    /// total supporting reads
    pub support_reads: u64,
    /// unique supporting reads
    pub unique_support_reads: u64,
    /// supporting reads on the plus strand
    pub plus_support: u64,
    /// supporting reads on the minus strand
    pub minus_support: u64,
    /// per-sample support breakdown: (sample, total, unique)
    pub sample_support: Vec<(String, u64, u64)>,
    /// the raw per-read evidence lines, kept verbatim
    pub evidence: Vec<String>,
}


/// A consolidated call formed from one or more adjacent raw records.
/// The range start is fixed by the first member and never shrinks, the
/// end only ever grows, supports accumulate by summation. Annotation
/// fields (features, mean depth) are attached after merging.
#[derive(Debug,Clone,PartialEq)]
pub struct ConsolidatedSv {
    /// variant category, taken from the first member
    pub category: SvCategory,
    /// contig of all members
    pub contig: String,
    /// envelope start, the first member's range start
    pub range_start: u64,
    /// envelope end, max over all members
    pub range_end: u64,
    /// summed total support over all members
    pub support_reads: u64,
    /// summed unique support over all members
    pub unique_support_reads: u64,
    /// raw index of the first member
    pub first_index: u64,
    /// raw index of the last merged member, the adjacency anchor
    pub final_index: u64,
    /// overlapping feature descriptors, attached by the annotator
    pub features: Vec<String>,
    /// mean coverage depth over the range, attached by the annotator
    pub mean_depth: f64,
}

impl ConsolidatedSv {
    fn from_raw(record: &RawSvRecord) -> ConsolidatedSv {
        ConsolidatedSv {
            category: record.category,
            contig: record.contig.clone(),
            range_start: record.range_start,
            range_end: record.range_end,
            support_reads: record.support_reads,
            unique_support_reads: record.unique_support_reads,
            first_index: record.index,
            final_index: record.index,
            features: Vec::new(),
            mean_depth: 0.0,
        }
    }

    /// Typed accessor for serializers, keyed by the closed enum -
    /// features come back joined with `,`, the mean depth with two
    /// decimals.
    pub fn field(&self, key: AnnotKey) -> String {
        match key {
            AnnotKey::Chrom           => self.contig.clone(),
            AnnotKey::Start           => self.range_start.to_string(),
            AnnotKey::End             => self.range_end.to_string(),
            AnnotKey::SupportingReads => self.support_reads.to_string(),
            AnnotKey::MeanDepth       => format!("{:.2}", self.mean_depth),
            AnnotKey::Features        => self.features.iter().join(","),
        }
    }

    /// folds another raw record into this call: the end grows to the
    /// envelope maximum, the start is deliberately left alone and the
    /// supports accumulate
    fn absorb(&mut self, record: &RawSvRecord) {
        self.range_end = self.range_end.max(record.range_end);
        self.support_reads += record.support_reads;
        self.unique_support_reads += record.unique_support_reads;
        self.final_index = record.index;
    }
}


// summary line anchors: index, type code + length, NT block, ChrID,
// BP pair, BP_range pair, Supports pair, directional pairs, tail
const SUMMARY_PATTERN: &str = concat!(
    r#"^(\d+)\s+(\S+)\s+(\d+)\s+NT\s+(\d+)\s+"([^"]*)"\s+"#,
    r#"ChrID\s+(\S+)\s+BP\s+(\d+)\s+(\d+)\s+BP_range\s+(\d+)\s+(\d+)\s+"#,
    r#"Supports\s+(\d+)\s+(\d+)\s+\+\s+(\d+)\s+(\d+)\s+-\s+(\d+)\s+(\d+)(.*)$"#
);


/// Parses a raw caller output stream into records.
///
/// Blocks are delimited by a leading `#`-prefixed line. The first line
/// of each block is the summary, everything after it until the next
/// separator is opaque per-read evidence retained verbatim. The
/// per-sample breakdown is taken from the summary tail after the
/// `NumSupSamples` anchor as triples of `sample total unique`.
///
/// Any block whose summary does not tokenize is a hard error naming the
/// record, nothing is silently skipped.
///
/// Unittest: TRUE
///
pub fn parse_sv_records<R: BufRead>(
    reader: R,
    source_name: &str
) -> Result<Vec<RawSvRecord>, RegionError> {
    let summary_re = Regex::new(SUMMARY_PATTERN).expect("ERROR: summary pattern must compile");
    let mut records: Vec<RawSvRecord> = Vec::new();
    let mut expect_summary = false;
    for line in reader.lines() {
        let l = line?;
        if l.starts_with('#') {
            expect_summary = true;
            continue;
        }
        if l.trim().is_empty() {
            continue;
        }
        if expect_summary {
            let record = parse_summary_line(&summary_re, &l, source_name, records.len())?;
            records.push(record);
            expect_summary = false;
        } else if let Some(current) = records.last_mut() {
            current.evidence.push(l);
        }
        // evidence before any separator is ignored, there is no record
        // to attach it to
    }
    debug!("Parsed {} raw SV records from {}", records.len(), source_name);
    Ok(records)
}

fn parse_summary_line(
    summary_re: &Regex,
    line: &str,
    source_name: &str,
    ordinal: usize
) -> Result<RawSvRecord, RegionError> {
    let caps = summary_re.captures(line).ok_or_else(|| RegionError::SvParse {
        record: format!("{}#{}", source_name, ordinal + 1),
        msg: format!("summary line does not tokenize: {:?}", line),
    })?;
    let parse_field = |i: usize| -> Result<u64, RegionError> {
        caps[i].parse::<u64>().map_err(|_| RegionError::SvParse {
            record: format!("{}#{}", source_name, ordinal + 1),
            msg: format!("unparseable number {:?}", &caps[i]),
        })
    };
    let category = SvCategory::from_code(&caps[2]).ok_or_else(|| RegionError::SvParse {
        record: format!("{}#{}", source_name, ordinal + 1),
        msg: format!("unknown variant type code {:?}", &caps[2]),
    })?;
    let range_start = parse_field(9)?;
    let range_end   = parse_field(10)?;
    if range_start > range_end {
        return Err(RegionError::SvParse {
            record: format!("{}#{}", source_name, ordinal + 1),
            msg: format!("breakpoint range inverted: {} > {}", range_start, range_end),
        });
    }
    let sample_support = parse_sample_tail(&caps[17]);
    Ok(RawSvRecord {
        index: parse_field(1)?,
        category,
        sv_length: parse_field(3)?,
        nt_length: parse_field(4)?,
        nt_sequence: caps[5].to_string(),
        contig: caps[6].to_string(),
        bp_start: parse_field(7)?,
        bp_end: parse_field(8)?,
        range_start,
        range_end,
        support_reads: parse_field(11)?,
        unique_support_reads: parse_field(12)?,
        plus_support: parse_field(13)?,
        minus_support: parse_field(15)?,
        sample_support,
        evidence: Vec::new(),
    })
}

// the per-sample breakdown sits after the NumSupSamples anchor as
// triples of sample/total/unique; a tail without the anchor or with a
// ragged triple yields what could be read, the summary totals are the
// authoritative numbers
fn parse_sample_tail(
    tail: &str
) -> Vec<(String, u64, u64)> {
    let tokens: Vec<&str> = tail.split_whitespace().collect();
    let anchor = match tokens.iter().position(|&t| t == "NumSupSamples") {
        Some(p) => p,
        None => return Vec::new(),
    };
    let mut samples: Vec<(String, u64, u64)> = Vec::new();
    let mut cursor = anchor + 2; // skip the anchor and its count
    while cursor + 2 < tokens.len() {
        let total  = tokens[cursor + 1].parse::<u64>();
        let unique = tokens[cursor + 2].parse::<u64>();
        match (total, unique) {
            (Ok(t), Ok(u)) => samples.push((tokens[cursor].to_string(), t, u)),
            _ => break,
        }
        cursor += 3;
    }
    samples
}


/// Drops records below the minimum structural-variant length before
/// any merging happens.
///
/// Unittest: TRUE
///
pub fn filter_by_length(
    records: Vec<RawSvRecord>,
    min_sv_length: u64
) -> Vec<RawSvRecord> {
    records
        .into_iter()
        .filter(|r| r.sv_length >= min_sv_length)
        .collect()
}


/// Consolidates raw records by the index-adjacency rule.
///
/// A record joins the previous consolidated call iff all of
///  - its raw index is exactly the call's final index + 1,
///  - it sits on the same contig,
///  - the absolute difference of its range start to the call's range
///    start is below `merge_distance`.
///
/// On merge the call's end grows to the envelope maximum while the
/// start stays at the first member's value, and the support counts sum
/// up.
///
/// Note that adjacency is defined over *parse order*, not genomic
/// position: the rule assumes the upstream caller emits records in
/// approximately positional order. If the upstream output were ever
/// re-sorted this clustering would silently fall apart, which is why
/// input order is a hard sequential dependency here and the merge is
/// never parallelized.
///
/// Unittest: TRUE
///
pub fn merge_records(
    records: &[RawSvRecord],
    merge_distance: u64
) -> Vec<ConsolidatedSv> {
    let mut consolidated: Vec<ConsolidatedSv> = Vec::new();
    for record in records {
        let same_hit = match consolidated.last() {
            Some(last) => {
                record.index == last.final_index + 1
                    && record.contig == last.contig
                    && record.range_start.abs_diff(last.range_start) < merge_distance
            }
            None => false,
        };
        if same_hit {
            consolidated
                .last_mut()
                .expect("ERROR: same_hit implies a previous record")
                .absorb(record);
        } else {
            consolidated.push(ConsolidatedSv::from_raw(record));
        }
    }
    debug!("Merged {} raw records into {} consolidated calls", records.len(), consolidated.len());
    consolidated
}


/// Drops consolidated calls whose summed support is at or below the
/// composite-support threshold; strictly greater survives.
///
/// Unittest: TRUE
///
pub fn filter_by_support(
    records: Vec<ConsolidatedSv>,
    min_support: u64
) -> Vec<ConsolidatedSv> {
    records
        .into_iter()
        .filter(|r| r.support_reads > min_support)
        .collect()
}


/// The final, serializable result set: consolidated calls grouped by
/// category. The external JSON writer turns this 1:1 into an object
/// keyed by category name.
#[derive(Debug,Default)]
pub struct SvResultSet {
    pub by_category: FxHashMap<SvCategory, Vec<ConsolidatedSv>>,
}

impl SvResultSet {
    pub fn from_records(
        records: Vec<ConsolidatedSv>
    ) -> SvResultSet {
        let mut by_category: FxHashMap<SvCategory, Vec<ConsolidatedSv>> = FxHashMap::default();
        for record in records {
            by_category.entry(record.category).or_default().push(record);
        }
        SvResultSet { by_category }
    }

    /// total number of calls over all categories
    pub fn len(&self) -> usize {
        self.by_category.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the result set as a tab-separated table, categories in
    /// their fixed order, within a category contigs human-sorted and
    /// then by start. Features are joined with `,`.
    ///
    /// Unittest: TRUE
    ///
    pub fn write_tsv(
        &self,
        out: &mut dyn Write
    ) -> io::Result<()> {
        let columns = AnnotKey::all().iter().map(|k| k.as_str()).join("\t");
        writeln!(out, "category\t{}", columns)?;
        for category in SvCategory::all().iter() {
            let mut calls: Vec<&ConsolidatedSv> = match self.by_category.get(category) {
                Some(c) => c.iter().collect(),
                None => continue,
            };
            calls.sort_by(|a, b| {
                human_sort::compare(&a.contig, &b.contig)
                    .then(a.range_start.cmp(&b.range_start))
            });
            for call in calls {
                let row = AnnotKey::all().iter().map(|k| call.field(*k)).join("\t");
                writeln!(out, "{}\t{}", category.as_str(), row)?;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn block(
        index: u64,
        code: &str,
        length: u64,
        contig: &str,
        range_start: u64,
        range_end: u64,
        support: u64,
        unique: u64,
        evidence: &[&str]
    ) -> String {
        let mut text = String::from("####################################################\n");
        text.push_str(&format!(
            "{}\t{} {}\tNT 0 \"\"\tChrID {}\tBP {}\t{}\tBP_range {}\t{}\tSupports {}\t{}\t+ {}\t{}\t- {}\t{}\tS1 12\tSUM_MS 600\t1\tNumSupSamples 1\tsample1 {} {}\n",
            index, code, length, contig,
            range_start + 2, range_end - 2,
            range_start, range_end,
            support, unique,
            support / 2, unique / 2,
            support - support / 2, unique - unique / 2,
            support, unique
        ));
        for line in evidence {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    fn raw(
        index: u64,
        contig: &str,
        range_start: u64,
        support: u64
    ) -> RawSvRecord {
        RawSvRecord {
            index,
            category: SvCategory::Deletion,
            sv_length: 500,
            nt_length: 0,
            nt_sequence: String::new(),
            contig: contig.to_string(),
            bp_start: range_start + 2,
            bp_end: range_start + 100,
            range_start,
            range_end: range_start + 110,
            support_reads: support,
            unique_support_reads: support,
            plus_support: support / 2,
            minus_support: support - support / 2,
            sample_support: vec![],
            evidence: vec![],
        }
    }

    /////////////////////////////////////////
    ///       BLOCK PARSING        //////////
    /////////////////////////////////////////

    #[test]
    fn parse_single_block(){
        let text = block(0,"D",1671,"chr1",95,215,10,8,&["read_evidence_a","read_evidence_b"]);
        let records = parse_sv_records(Cursor::new(text),"pindel_D").unwrap();
        assert_eq!(records.len(),1);
        let r = &records[0];
        assert_eq!(r.index,0);
        assert_eq!(r.category,SvCategory::Deletion);
        assert_eq!(r.sv_length,1671);
        assert_eq!(r.contig,"chr1");
        assert_eq!(r.bp_start,97);
        assert_eq!(r.bp_end,213);
        assert_eq!(r.range_start,95);
        assert_eq!(r.range_end,215);
        assert_eq!(r.support_reads,10);
        assert_eq!(r.unique_support_reads,8);
        assert_eq!(r.plus_support,5);
        assert_eq!(r.minus_support,5);
        // evidence retained verbatim, in order
        assert_eq!(r.evidence,vec!["read_evidence_a","read_evidence_b"]);
        // per-sample breakdown behind the NumSupSamples anchor
        assert_eq!(r.sample_support,vec![(String::from("sample1"),10,8)]);
    }
    #[test]
    fn parse_multiple_blocks_in_order(){
        let mut text = block(0,"TD",300,"chr2",1000,1100,4,4,&[]);
        text.push_str(&block(1,"TD",310,"chr2",1050,1150,6,5,&["ev"]));
        let records = parse_sv_records(Cursor::new(text),"pindel_TD").unwrap();
        assert_eq!(records.len(),2);
        assert_eq!(records[0].index,0);
        assert_eq!(records[1].index,1);
        assert_eq!(records[1].category,SvCategory::TandemDuplication);
        assert_eq!(records[1].evidence,vec!["ev"]);
    }
    #[test]
    fn parse_nt_sequence(){
        let text = "###\n3\tI 4\tNT 4 \"ACGT\"\tChrID chr5\tBP 10\t11\tBP_range 8\t13\tSupports 3\t3\t+ 2\t2\t- 1\t1\n";
        let records = parse_sv_records(Cursor::new(text),"pindel_SI").unwrap();
        assert_eq!(records[0].nt_length,4);
        assert_eq!(records[0].nt_sequence,"ACGT");
        assert_eq!(records[0].category,SvCategory::Insertion);
        assert!(records[0].sample_support.is_empty());
    }
    #[test]
    fn parse_malformed_summary_is_error(){
        let text = "###\nthis is not a summary line\n";
        let result = parse_sv_records(Cursor::new(text),"broken");
        match result {
            Err(RegionError::SvParse { record, .. }) => assert_eq!(record,"broken#1"),
            other => panic!("expected SV parse error, got {:?}", other),
        }
    }
    #[test]
    fn parse_unknown_type_code_is_error(){
        let text = block(0,"XX",100,"chr1",10,20,3,3,&[]);
        assert!(parse_sv_records(Cursor::new(text),"odd").is_err());
    }
    #[test]
    fn parse_inverted_range_is_error(){
        let text = "###\n0\tD 100\tNT 0 \"\"\tChrID chr1\tBP 50\t60\tBP_range 70\t40\tSupports 3\t3\t+ 2\t2\t- 1\t1\n";
        assert!(parse_sv_records(Cursor::new(text),"inv").is_err());
    }

    /////////////////////////////////////////
    ///       FILTERS              //////////
    /////////////////////////////////////////

    #[test]
    fn length_filter_drops_short_calls(){
        let mut records = vec![raw(0,"chr1",100,5), raw(1,"chr1",300,5)];
        records[0].sv_length = 10;
        records[1].sv_length = 50;
        let kept = filter_by_length(records,50);
        assert_eq!(kept.len(),1);
        assert_eq!(kept[0].index,1);
    }
    #[test]
    fn support_filter_is_strictly_greater(){
        let at_threshold = ConsolidatedSv::from_raw(&raw(0,"chr1",100,5));
        let above        = ConsolidatedSv::from_raw(&raw(1,"chr1",500,6));
        let kept = filter_by_support(vec![at_threshold,above],5);
        assert_eq!(kept.len(),1);
        assert_eq!(kept[0].support_reads,6);
    }

    /////////////////////////////////////////
    ///       MERGING              //////////
    /////////////////////////////////////////

    #[test]
    fn merge_three_adjacent_records(){
        // indices 1,2,3 at 100/105/110 within distance 100 -> one call
        let records = vec![
            raw(1,"chr1",100,3),
            raw(2,"chr1",105,4),
            raw(3,"chr1",110,5),
        ];
        let merged = merge_records(&records,100);
        assert_eq!(merged.len(),1);
        assert_eq!(merged[0].support_reads,12);
        assert_eq!(merged[0].first_index,1);
        assert_eq!(merged[0].final_index,3);
        // start fixed by the first member, end is the envelope max
        assert_eq!(merged[0].range_start,100);
        assert_eq!(merged[0].range_end,220);
    }
    #[test]
    fn merge_broken_adjacency_splits_groups(){
        // indices 1,5,6: record 1 stands alone, 5 and 6 merge
        let records = vec![
            raw(1,"chr1",100,3),
            raw(5,"chr1",105,4),
            raw(6,"chr1",110,5),
        ];
        let merged = merge_records(&records,100);
        assert_eq!(merged.len(),2);
        assert_eq!(merged[0].support_reads,3);
        assert_eq!(merged[1].support_reads,9);
        assert_eq!(merged[1].first_index,5);
        assert_eq!(merged[1].final_index,6);
    }
    #[test]
    fn merge_requires_same_contig(){
        let records = vec![
            raw(1,"chr1",100,3),
            raw(2,"chr2",105,4),
        ];
        let merged = merge_records(&records,100);
        assert_eq!(merged.len(),2);
    }
    #[test]
    fn merge_respects_distance_threshold(){
        let records = vec![
            raw(1,"chr1",100,3),
            raw(2,"chr1",199,4),   // |199-100| = 99 < 100, merges
            raw(3,"chr1",300,5),   // |300-100| = 200 >= 100, does not
        ];
        let merged = merge_records(&records,100);
        assert_eq!(merged.len(),2);
        assert_eq!(merged[0].support_reads,7);
        assert_eq!(merged[1].support_reads,5);
    }
    #[test]
    fn merge_distance_measured_from_first_member(){
        // the consolidated start never moves, so the third record is
        // measured against 100 even though its neighbor sits at 180
        let records = vec![
            raw(1,"chr1",100,1),
            raw(2,"chr1",180,1),
            raw(3,"chr1",210,1),
        ];
        // |210-100| = 110 < 200 -> all three merge
        let merged = merge_records(&records,200);
        assert_eq!(merged.len(),1);
        // 180 joins (80 < 110) but 210 is exactly 110 from 100, not < 110
        let merged_tight = merge_records(&records,110);
        assert_eq!(merged_tight.len(),2);
    }
    #[test]
    fn merge_end_never_shrinks(){
        let mut records = vec![raw(1,"chr1",100,1), raw(2,"chr1",105,1)];
        records[0].range_end = 500;
        records[1].range_end = 300;
        let merged = merge_records(&records,100);
        assert_eq!(merged.len(),1);
        assert_eq!(merged[0].range_end,500);
    }

    /////////////////////////////////////////
    ///       RESULT SET           //////////
    /////////////////////////////////////////

    #[test]
    fn result_set_groups_by_category(){
        let mut a = ConsolidatedSv::from_raw(&raw(0,"chr1",100,3));
        a.category = SvCategory::Deletion;
        let mut b = ConsolidatedSv::from_raw(&raw(1,"chr2",100,3));
        b.category = SvCategory::Insertion;
        let set = SvResultSet::from_records(vec![a,b]);
        assert_eq!(set.len(),2);
        assert_eq!(set.by_category.get(&SvCategory::Deletion).unwrap().len(),1);
        assert_eq!(set.by_category.get(&SvCategory::Insertion).unwrap().len(),1);
    }
    #[test]
    fn tsv_output_sorted_and_complete(){
        let mut early = ConsolidatedSv::from_raw(&raw(0,"chr2",100,3));
        early.features = vec![String::from("BRCA1(NM_0001) Exon #3 ")];
        early.mean_depth = 12.5;
        let late = ConsolidatedSv::from_raw(&raw(1,"chr10",50,4));
        let set = SvResultSet::from_records(vec![late,early]);
        let mut out: Vec<u8> = Vec::new();
        set.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(),3);
        assert!(lines[0].starts_with("category\tchr\tstart"));
        // human sort puts chr2 before chr10
        assert!(lines[1].contains("chr2"));
        assert!(lines[2].contains("chr10"));
        assert!(lines[1].contains("BRCA1(NM_0001) Exon #3 "));
        assert!(lines[1].contains("12.50"));
    }
}
