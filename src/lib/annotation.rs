//! Parsing of tab-delimited gene/exon definition tables into a frozen
//! [IntervalIndex](crate::lib::common::IntervalIndex) whose payloads are
//! human-readable location descriptors like `BRCA1(NM_007294) Exon #3 Coding`.

use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use log::debug;

use crate::lib::common::{IntervalIndex, IntervalIndexBuilder, RegionError};

/// expected number of tab-separated columns in the feature table
const FEATURE_COLUMNS: usize = 7;


/// Maps one raw region-type token onto its display form.
/// Unknown tokens are kept verbatim so odd annotation sources stay
/// traceable in the output instead of vanishing.
fn substitute_region_token(
    token: &str
) -> &str {
    match token {
        "unk"  => "",
        "cds"  => "Coding",
        "5utr" => "5'UTR",
        "3utr" => "3'UTR",
        other  => other,
    }
}

/// Builds the descriptor part of a feature string from the raw
/// region-type code and the exon number.
/// The code may be slash-combined (e.g. `5utr/cds`), every component is
/// substituted through the fixed lexical table and re-joined with `/`.
/// A code containing `intron` switches the base from `Exon #{n}` to
/// `Intron #{n}`.
///
/// Unittest: TRUE
///
/// ```
/// use regioncov::lib::annotation::region_descriptor;
/// assert_eq!(region_descriptor("cds",3),"Exon #3 Coding");
/// assert_eq!(region_descriptor("unk",7),"Exon #7");
/// assert_eq!(region_descriptor("5utr/cds",1),"Exon #1 5'UTR/Coding");
/// assert_eq!(region_descriptor("intron",2),"Intron #2");
/// ```
pub fn region_descriptor(
    region_code: &str,
    exon_number: u32
) -> String {
    let mut is_intron = false;
    let mut parts: Vec<&str> = Vec::new();
    for token in region_code.split('/') {
        if token == "intron" {
            is_intron = true;
            continue;
        }
        let substituted = substitute_region_token(token);
        if !substituted.is_empty() {
            parts.push(substituted);
        }
    }
    let base = match is_intron {
        true  => format!("Intron #{}", exon_number),
        false => format!("Exon #{}", exon_number),
    };
    if parts.is_empty() {
        base
    } else {
        format!("{} {}", base, parts.join("/"))
    }
}


/// Parses a gene/exon feature table into a frozen interval index.
///
/// The expected format is tab-separated with 7 columns:
/// contig, 0-based start, 0-based end, transcript id, gene name,
/// exon number, region-type code. The first line is always a header and
/// skipped. Coordinates are converted into the internal 1-based
/// inclusive system by adding +1 to both start and end, identical to
/// the BED conversion in common.
///
/// Every indexed interval carries the payload
/// `"{gene}({transcript}) {descriptor}"` with the descriptor derived by
/// [region_descriptor].
///
/// When `preferred_transcripts` is non-empty only rows whose transcript
/// id is in the set are indexed, everything else is silently dropped
/// during parse. With `None` everything is indexed.
///
/// A line with the wrong column count or unparseable numbers is a hard
/// parse error naming the file and 1-based line, never a silent skip.
///
/// Unittest: TRUE
///
pub fn parse_feature_table(
    my_path: &str,
    preferred_transcripts: Option<&FxHashSet<String>>
) -> Result<IntervalIndex, RegionError> {
    if !Path::new(my_path).exists() {
        return Err(RegionError::Parse {
            file: my_path.to_string(),
            line: 0,
            msg: String::from("file does not exist"),
        });
    }
    let input  = File::open(my_path)?;
    let reader = BufReader::new(input);
    let mut builder = IntervalIndexBuilder::new();
    let mut dropped: usize = 0;
    for (line_idx, line) in reader.lines().enumerate() {
        let l = line?;
        // first data line is a header, always skipped
        if line_idx == 0 {
            continue;
        }
        if l.is_empty() {
            continue;
        }
        let fields: Vec<&str> = l.split('\t').collect();
        if fields.len() != FEATURE_COLUMNS {
            return Err(RegionError::Parse {
                file: my_path.to_string(),
                line: line_idx + 1,
                msg: format!(
                    "expected {} tab-separated columns, got {}",
                    FEATURE_COLUMNS,
                    fields.len()
                ),
            });
        }
        let transcript = fields[3];
        if let Some(wanted) = preferred_transcripts {
            if !wanted.is_empty() && !wanted.contains(transcript) {
                dropped += 1;
                continue;
            }
        }
        let start = parse_table_number(fields[1], my_path, line_idx + 1)?;
        let end   = parse_table_number(fields[2], my_path, line_idx + 1)?;
        let exon_number = parse_table_number(fields[5], my_path, line_idx + 1)? as u32;
        let gene        = fields[4];
        let descriptor  = region_descriptor(fields[6], exon_number);
        let payload     = format!("{}({}) {}", gene, transcript, descriptor);
        // 0-based half-open -> 1-based inclusive
        builder.add_interval(fields[0], start + 1, end + 1, Some(payload))?;
    }
    debug!(
        "Feature table {}: indexed {} intervals, dropped {} off-preference rows",
        my_path,
        builder.len(),
        dropped
    );
    Ok(builder.freeze())
}

fn parse_table_number(
    field: &str,
    file: &str,
    line: usize
) -> Result<u64, RegionError> {
    field.parse::<u64>().map_err(|_| RegionError::Parse {
        file: file.to_string(),
        line,
        msg: format!("unparseable number {:?}", field),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "chrom\tstart\tend\ttranscript\tgene\texon\ttype";

    fn table_file(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("ERROR: could not create temp file!");
        writeln!(file,"{}",HEADER).unwrap();
        for row in rows {
            writeln!(file,"{}",row).unwrap();
        }
        file
    }

    /////////////////////////////////////////
    ///     DESCRIPTOR BUILDING    //////////
    /////////////////////////////////////////

    #[test]
    fn descriptor_lexical_table(){
        assert_eq!(region_descriptor("unk",1),"Exon #1");
        assert_eq!(region_descriptor("cds",4),"Exon #4 Coding");
        assert_eq!(region_descriptor("5utr",1),"Exon #1 5'UTR");
        assert_eq!(region_descriptor("3utr",12),"Exon #12 3'UTR");
    }
    #[test]
    fn descriptor_slash_combined(){
        assert_eq!(region_descriptor("5utr/cds",2),"Exon #2 5'UTR/Coding");
        assert_eq!(region_descriptor("cds/3utr",9),"Exon #9 Coding/3'UTR");
        // unk component disappears from the suffix
        assert_eq!(region_descriptor("unk/cds",3),"Exon #3 Coding");
    }
    #[test]
    fn descriptor_intron_base(){
        assert_eq!(region_descriptor("intron",5),"Intron #5");
        assert_eq!(region_descriptor("intron/unk",5),"Intron #5");
    }
    #[test]
    fn descriptor_unknown_token_kept_verbatim(){
        assert_eq!(region_descriptor("weird",1),"Exon #1 weird");
    }

    /////////////////////////////////////////
    ///     TABLE PARSING          //////////
    /////////////////////////////////////////

    #[test]
    fn table_header_skipped_and_coordinates_converted(){
        let file = table_file(&["chr1\t100\t200\tNM_0001\tBRCA1\t3\tcds"]);
        let index = parse_feature_table(file.path().to_str().unwrap(),None).unwrap();
        assert_eq!(index.len(),1);
        let hits = index.get_intervals_for_range("chr1",101,201);
        assert_eq!(hits.len(),1);
        assert_eq!(hits[0].begin,101);
        assert_eq!(hits[0].end,201);
        assert_eq!(hits[0].info.as_deref(),Some("BRCA1(NM_0001) Exon #3 Coding"));
        // outside the converted coordinates nothing comes back
        assert!(index.get_intervals_for_site("chr1",100).is_empty());
    }
    #[test]
    fn table_preferred_transcript_filter(){
        let file = table_file(&[
            "chr1\t100\t200\tNM_0001\tBRCA1\t1\tcds",
            "chr1\t300\t400\tNM_0002\tBRCA1\t2\tcds",
            "chr1\t500\t600\tNM_0003\tTP53\t1\t5utr",
        ]);
        let mut wanted = FxHashSet::default();
        wanted.insert(String::from("NM_0002"));
        wanted.insert(String::from("NM_0003"));
        let index = parse_feature_table(file.path().to_str().unwrap(),Some(&wanted)).unwrap();
        assert_eq!(index.len(),2);
        assert!(index.get_intervals_for_range("chr1",101,201).is_empty());
        assert_eq!(index.get_intervals_for_range("chr1",301,401).len(),1);
    }
    #[test]
    fn table_empty_filter_set_indexes_everything(){
        let file = table_file(&[
            "chr1\t100\t200\tNM_0001\tBRCA1\t1\tcds",
            "chr1\t300\t400\tNM_0002\tBRCA1\t2\tcds",
        ]);
        let wanted = FxHashSet::default();
        let index = parse_feature_table(file.path().to_str().unwrap(),Some(&wanted)).unwrap();
        assert_eq!(index.len(),2);
    }
    #[test]
    fn table_sorted_within_contig_after_parse(){
        let file = table_file(&[
            "chr7\t5000\t6000\tNM_0001\tEGFR\t2\tcds",
            "chr7\t100\t200\tNM_0001\tEGFR\t1\t5utr",
        ]);
        let index = parse_feature_table(file.path().to_str().unwrap(),None).unwrap();
        let hits = index.get_intervals_for_range("chr7",1,10000);
        assert_eq!(hits.len(),2);
        assert!(hits[0].begin < hits[1].begin);
    }
    #[test]
    fn table_wrong_column_count_is_error(){
        let file = table_file(&["chr1\t100\t200\tNM_0001\tBRCA1\t1"]);
        let result = parse_feature_table(file.path().to_str().unwrap(),None);
        match result {
            Err(RegionError::Parse { line, .. }) => assert_eq!(line,2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
    #[test]
    fn table_unparseable_exon_number_is_error(){
        let file = table_file(&["chr1\t100\t200\tNM_0001\tBRCA1\tthree\tcds"]);
        assert!(parse_feature_table(file.path().to_str().unwrap(),None).is_err());
    }
}
