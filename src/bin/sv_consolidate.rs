//! ## sv_consolidate ##
//! ---------------------
//! This tool reads raw structural-variant caller output (pindel-style
//! `#`-delimited blocks), drops calls below a minimum SV length, merges
//! adjacent calls that describe the same hit, drops consolidated calls
//! with insufficient read support and finally annotates the survivors
//! with overlapping exon descriptors and mean coverage depth.
//! The result is a category-grouped table on stdout (or a file).

use clap::{app_from_crate,crate_name,crate_description,crate_authors,crate_version,Arg};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use rustc_hash::FxHashSet;
use chrono::Local;

extern crate pretty_env_logger;
#[macro_use] extern crate log;

extern crate regioncov;
use regioncov::lib::common::{IntervalIndexBuilder, IntervalIndex, out_writer};
use regioncov::lib::annotation::parse_feature_table;
use regioncov::lib::annotate::{exon_features_for_range, ResultAnnotator};
use regioncov::lib::coverage::CoverageCalculator;
use regioncov::lib::hts_lib_based::BamSource;
use regioncov::lib::svmerge::{filter_by_length, filter_by_support, merge_records, parse_sv_records, SvResultSet};


/// one transcript id per line, no separators accepted within a line
fn read_transcript_list(
    my_file: &str
) -> FxHashSet<String> {
    assert!(
        Path::new(my_file).exists(),
        "ERROR: transcript list {:?} does not exist!",
        my_file
    );
    let input  = File::open(my_file).expect("ERROR: could not open transcript list!");
    let reader = BufReader::new(input);
    let mut wanted = FxHashSet::default();
    for line in reader.lines() {
        let l = line.expect("ERROR: could not read line!");
        let e: Vec<&str> = l.split(' ').collect();
        if e.len() != 1 {
            panic!("ERROR: your transcript list contains space delimited entries!");
        }
        if !e[0].is_empty() {
            wanted.insert(e[0].to_string());
        }
    }
    wanted
}

fn main() {
    pretty_env_logger::init();

    let matches = app_from_crate!()
    .about("Consolidates structural-variant caller output: length filter, \
        adjacency-based merging of calls describing the same hit, support filter, \
        then annotation with overlapping exon features and mean coverage depth. \n\
        The raw input is the #-delimited block format; gene/exon annotation comes from a \
        7-column tab-separated feature table and depth from a sorted+indexed BAM file.")
    .arg(Arg::with_name("SV")
            .short("i")
            .long("sv-input")
            .value_name("FILE")
            .help("raw structural-variant caller output, #-delimited blocks")
            .takes_value(true)
            .required(true))
    .arg(Arg::with_name("FEATURES")
            .short("g")
            .long("gene-table")
            .value_name("FILE")
            .help("7-column gene/exon feature table with header line")
            .takes_value(true)
            .required(false))
    .arg(Arg::with_name("BAM")
            .short("b")
            .long("bam")
            .value_name("FILE")
            .help("sorted and indexed BAM file for mean depth annotation")
            .takes_value(true)
            .required(false))
    .arg(Arg::with_name("TRANSCRIPTS")
            .short("x")
            .long("transcripts")
            .value_name("FILE")
            .help("preferred transcript ids, one per line; rows of the gene table with other transcripts are dropped")
            .takes_value(true)
            .required(false))
    .arg(Arg::with_name("MINLEN")
            .short("l")
            .long("min-length")
            .value_name("int")
            .help("discard raw calls shorter than this before merging")
            .takes_value(true)
            .default_value("0")
            .required(false))
    .arg(Arg::with_name("DIST")
            .short("d")
            .long("merge-distance")
            .value_name("int")
            .help("maximum breakpoint-range start distance for merging adjacent calls")
            .takes_value(true)
            .default_value("100")
            .required(false))
    .arg(Arg::with_name("SUPPORT")
            .short("s")
            .long("min-support")
            .value_name("int")
            .help("consolidated calls need strictly more summed supporting reads than this")
            .takes_value(true)
            .default_value("0")
            .required(false))
    .arg(Arg::with_name("MAPQ")
            .short("q")
            .long("mapq")
            .value_name("int")
            .help("minimum mapping quality for reads counted in the depth annotation")
            .takes_value(true)
            .default_value("0")
            .required(false))
    .arg(Arg::with_name("THREADS")
            .short("t")
            .long("threads")
            .value_name("int")
            .help("worker threads for the depth annotation")
            .takes_value(true)
            .default_value("1")
            .required(false))
    .arg(Arg::with_name("OUTFILE")
            .short("o")
            .long("out")
            .value_name("FILE")
            .help("write to outfile instead stdout")
            .takes_value(true)
            .required(false))
    .get_matches();

    let sv_file     = matches.value_of("SV").unwrap();
    let min_length  = matches.value_of("MINLEN").unwrap().parse::<u64>().expect("ERROR: could not parse min-length!");
    let merge_dist  = matches.value_of("DIST").unwrap().parse::<u64>().expect("ERROR: could not parse merge-distance!");
    let min_support = matches.value_of("SUPPORT").unwrap().parse::<u64>().expect("ERROR: could not parse min-support!");
    let min_mapq    = matches.value_of("MAPQ").unwrap().parse::<u8>().expect("ERROR: could not parse mapq!");
    let threads     = matches.value_of("THREADS").unwrap().parse::<usize>().expect("ERROR: could not parse threads!");
    let file_out    = matches.value_of("OUTFILE");

    eprintln!("INFO: {} v{} started at {}", crate_name!(), crate_version!(), Local::now().format("%Y-%m-%d %H:%M:%S"));

    assert!(
        Path::new(sv_file).exists(),
        "ERROR: SV input file {:?} does not exist!",
        sv_file
    );
    let input  = File::open(sv_file).expect("ERROR: could not open SV input!");
    let reader = BufReader::new(input);
    let raw = parse_sv_records(reader, sv_file).expect("ERROR: could not parse SV input!");
    eprintln!("INFO: parsed {} raw records", raw.len());

    let sized = filter_by_length(raw, min_length);
    debug!("{} records after length filter", sized.len());
    let merged = merge_records(&sized, merge_dist);
    let mut kept = filter_by_support(merged, min_support);
    eprintln!("INFO: {} consolidated calls after merging and support filter", kept.len());

    // gene/exon annotation, with or without a preferred transcript set
    let features: IntervalIndex = match matches.value_of("FEATURES") {
        Some(table) => {
            let wanted = matches.value_of("TRANSCRIPTS").map(read_transcript_list);
            parse_feature_table(table, wanted.as_ref())
                .expect("ERROR: could not parse the gene table!")
        }
        None => IntervalIndexBuilder::new().freeze(),
    };

    let cancel = AtomicBool::new(false);
    match matches.value_of("BAM") {
        Some(bam_file) => {
            let source = BamSource::new(bam_file).expect("ERROR: could not open BAM file!");
            let calculator = CoverageCalculator::new(min_mapq, threads);
            let annotator = ResultAnnotator::new(&features, &source, calculator);
            annotator
                .annotate_all(&mut kept, &cancel)
                .expect("ERROR: annotation failed!");
        }
        None => {
            // no read source: features only, depth stays at 0
            for record in kept.iter_mut() {
                record.features = exon_features_for_range(
                    &features,
                    &record.contig,
                    record.range_start,
                    record.range_end
                );
            }
        }
    }

    let result = SvResultSet::from_records(kept);
    let mut out = out_writer(file_out);
    result.write_tsv(&mut out).expect("ERROR: could not write results!");
}
