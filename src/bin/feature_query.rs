//! ## feature_query ##
//! ---------------------
//! Small utility that loads a gene/exon feature table and prints the
//! location descriptors overlapping a region given as `chr:start-end`
//! (1-based inclusive) or a single site `chr:pos`.

use clap::{app_from_crate,crate_name,crate_description,crate_authors,crate_version,Arg};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

extern crate pretty_env_logger;

extern crate regioncov;
use regioncov::lib::annotation::parse_feature_table;

/// `chr:start-end` or `chr:pos`, 1-based inclusive
fn parse_region(
    region: &str
) -> (String, u64, u64) {
    let re = Regex::new(r"^([^:]+):(\d+)(?:-(\d+))?$").expect("ERROR: region pattern must compile");
    let caps = match re.captures(region) {
        Some(c) => c,
        None => panic!("ERROR: region {:?} is not of the form chr:start-end or chr:pos!", region),
    };
    let contig = caps[1].to_string();
    let start  = caps[2].parse::<u64>().expect("ERROR: could not parse region start!");
    let end    = match caps.get(3) {
        Some(m) => m.as_str().parse::<u64>().expect("ERROR: could not parse region end!"),
        None => start,
    };
    if start > end {
        panic!("ERROR: region start {} is larger than end {}!", start, end);
    }
    (contig, start, end)
}

fn main() {
    pretty_env_logger::init();

    let matches = app_from_crate!()
    .about("Looks up gene/exon location descriptors overlapping a region. \
        The feature table is the 7-column tab-separated format with a header line; \
        regions are 1-based inclusive, e.g. chr17:43045629-43125483 or chr17:43057051.")
    .arg(Arg::with_name("FEATURES")
            .short("g")
            .long("gene-table")
            .value_name("FILE")
            .help("7-column gene/exon feature table with header line")
            .takes_value(true)
            .required(true))
    .arg(Arg::with_name("REGION")
            .short("r")
            .long("region")
            .value_name("STR")
            .help("region as chr:start-end or a single site chr:pos")
            .takes_value(true)
            .required(true))
    .arg(Arg::with_name("TRANSCRIPTS")
            .short("x")
            .long("transcripts")
            .value_name("FILE")
            .help("preferred transcript ids, one per line")
            .takes_value(true)
            .required(false))
    .get_matches();

    let table  = matches.value_of("FEATURES").unwrap();
    let (contig, start, end) = parse_region(matches.value_of("REGION").unwrap());

    let wanted: Option<FxHashSet<String>> = matches.value_of("TRANSCRIPTS").map(|my_file| {
        assert!(
            Path::new(my_file).exists(),
            "ERROR: transcript list {:?} does not exist!",
            my_file
        );
        let input  = File::open(my_file).expect("ERROR: could not open transcript list!");
        BufReader::new(input)
            .lines()
            .map(|l| l.expect("ERROR: could not read line!"))
            .filter(|l| !l.is_empty())
            .collect()
    });

    let index = parse_feature_table(table, wanted.as_ref()).expect("ERROR: could not parse the gene table!");
    eprintln!("INFO: {} features indexed on {} contigs", index.len(), index.get_contigs().len());

    let hits = index.get_intervals_for_range(&contig, start, end);
    if hits.is_empty() {
        eprintln!("INFO: no features overlap {}:{}-{}", contig, start, end);
    }
    for hit in hits {
        if let Some(info) = &hit.info {
            println!("{}\t{}\t{}\t{}", contig, hit.begin, hit.end, info);
        }
    }
}
