//! Integration tests: sieve-derived maximal gaps against the known record
//! table and the b-file fixtures in tests/fixtures/.

use gapscale_kernel::records::records_from_bfiles;
use gapscale_kernel::{
    AnalysisConfig, GapError, KNOWN_MAXIMAL_GAPS, RecordSource, RecordsConfig, RmtConfig,
    is_prime, maximal_gaps, run_analysis, sieve_primes,
};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn sieve_reproduces_known_maximal_gaps() {
    let primes = sieve_primes(1_400_000).expect("valid bound");
    let records = maximal_gaps(&primes);
    assert_eq!(records, KNOWN_MAXIMAL_GAPS.to_vec());
    for record in &records {
        assert!(is_prime(record.p));
        assert!(is_prime(record.p + record.gap));
        assert!((record.p + 1..record.p + record.gap).all(|n| !is_prime(n)));
    }
}

#[test]
fn bfiles_match_known_table() {
    let records = records_from_bfiles(fixture("b002386.txt"), fixture("b005250.txt"))
        .expect("fixtures should parse");
    assert_eq!(records, KNOWN_MAXIMAL_GAPS.to_vec());
}

#[test]
fn bfiles_of_different_length_are_rejected() {
    let err = records_from_bfiles(fixture("b002386.txt"), fixture("b005250_short.txt"))
        .expect_err("lengths differ");
    match err {
        GapError::BFile { path, message } => {
            assert!(path.ends_with("b005250_short.txt"));
            assert!(message.contains("12 gaps do not match 20 starting primes"));
        }
        other => panic!("expected b-file error, got {other:?}"),
    }
}

#[test]
fn bfile_source_drives_the_global_fit() {
    let config = AnalysisConfig {
        bound: 20_000,
        moduli: vec![3, 4],
        min_records: 3,
        records: RecordsConfig {
            source: RecordSource::BFile,
            starts_bfile: Some(fixture("b002386.txt")),
            gaps_bfile: Some(fixture("b005250.txt")),
        },
        rmt: RmtConfig {
            matrix_sizes: vec![8, 12],
            samples: 2,
            seed: 1,
        },
        ..AnalysisConfig::default()
    };
    let report = run_analysis(&config).expect("analysis should succeed");
    assert_eq!(report.global_fit.n, 20);
    assert_eq!(report.records[5].p, 113);
    assert!(report.input_digest.starts_with("in1_"));
}

#[test]
fn bfile_gaps_must_set_new_records() {
    let err = records_from_bfiles(fixture("b002386_short.txt"), fixture("b005250_repeat.txt"))
        .expect_err("repeated gap is not a record");
    match err {
        GapError::BFile { path, message } => {
            assert!(path.ends_with("b005250_repeat.txt"));
            assert_eq!(message, "term 4 does not set a new record");
        }
        other => panic!("expected b-file error, got {other:?}"),
    }
}
