//! ## region_depth ##
//! ---------------------
//! Computes per-base coverage depth from a sorted+indexed BAM file over
//! the regions of a BED file. Reads below a mapping-quality threshold
//! are excluded entirely. Output is either the per-base depth table or,
//! with --proportions, the percentage of bases at or above each depth
//! threshold. Summary statistics go to stderr.

use clap::{app_from_crate,crate_name,crate_description,crate_authors,crate_version,Arg};
use std::io::Write;
use std::sync::atomic::AtomicBool;
use chrono::Local;

extern crate pretty_env_logger;
#[macro_use] extern crate log;

extern crate regioncov;
use regioncov::lib::common::{read_bed_regions, out_writer};
use regioncov::lib::coverage::CoverageCalculator;
use regioncov::lib::hts_lib_based::BamSource;

fn main() {
    pretty_env_logger::init();

    let matches = app_from_crate!()
    .about("Per-base coverage depth over BED regions from a sorted+indexed BAM file. \
        Reads with mapping quality below the threshold are not counted at all. \n\
        Default output is contig/pos/depth per covered base; with --proportions the \
        percentage of bases at or above each depth threshold is printed instead.")
    .arg(Arg::with_name("BAM")
            .short("b")
            .long("bam")
            .value_name("FILE")
            .help("sorted and indexed BAM file")
            .takes_value(true)
            .required(true))
    .arg(Arg::with_name("BED")
            .short("r")
            .long("regions")
            .value_name("FILE")
            .help("BED file with the target regions (0-based half-open)")
            .takes_value(true)
            .required(true))
    .arg(Arg::with_name("MAPQ")
            .short("q")
            .long("mapq")
            .value_name("int")
            .help("minimum mapping quality for a read to be counted")
            .takes_value(true)
            .default_value("0")
            .required(false))
    .arg(Arg::with_name("THREADS")
            .short("t")
            .long("threads")
            .value_name("int")
            .help("worker threads, regions are distributed across them")
            .takes_value(true)
            .default_value("1")
            .required(false))
    .arg(Arg::with_name("PROPORTIONS")
            .short("p")
            .long("proportions")
            .help("print the proportion-covered curve instead of per-base depth")
            .takes_value(false)
            .required(false))
    .arg(Arg::with_name("OUTFILE")
            .short("o")
            .long("out")
            .value_name("FILE")
            .help("write to outfile instead stdout")
            .takes_value(true)
            .required(false))
    .get_matches();

    let bam_file = matches.value_of("BAM").unwrap();
    let bed_file = matches.value_of("BED").unwrap();
    let min_mapq = matches.value_of("MAPQ").unwrap().parse::<u8>().expect("ERROR: could not parse mapq!");
    let threads  = matches.value_of("THREADS").unwrap().parse::<usize>().expect("ERROR: could not parse threads!");
    let file_out = matches.value_of("OUTFILE");

    eprintln!("INFO: {} v{} started at {}", crate_name!(), crate_version!(), Local::now().format("%Y-%m-%d %H:%M:%S"));

    let targets = read_bed_regions(bed_file).expect("ERROR: could not parse BED file!");
    eprintln!("INFO: {} target regions", targets.len());
    debug!("Targets: {:?}", targets);

    let source = BamSource::new(bam_file).expect("ERROR: could not open BAM file!");
    let calculator = CoverageCalculator::new(min_mapq, threads);
    let cancel = AtomicBool::new(false);
    let result = calculator
        .depth_for_targets(&source, &targets, &cancel)
        .expect("ERROR: depth computation failed!");

    eprintln!(
        "INFO: {} bases, mean depth {:.2}, stdev {:.2}",
        result.total_bases(),
        result.mean(),
        result.stdev()
    );

    let mut out = out_writer(file_out);
    if matches.is_present("PROPORTIONS") {
        writeln!(out, "depth\tpercentBasesAtOrAbove").expect("ERROR: could not write results!");
        for (threshold, pct) in result.proportions().iter().enumerate() {
            writeln!(out, "{}\t{:.2}", threshold, pct).expect("ERROR: could not write results!");
        }
    } else {
        writeln!(out, "contig\tpos\tdepth").expect("ERROR: could not write results!");
        for (target, depths) in targets.iter().zip(result.per_target.iter()) {
            for (offset, depth) in depths.iter().enumerate() {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    target.contig,
                    target.interval.begin + offset as u64,
                    depth
                ).expect("ERROR: could not write results!");
            }
        }
    }
}
