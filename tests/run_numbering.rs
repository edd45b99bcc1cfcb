//! Run numbering against tables in various states

use qlog::{
    RunNumber,
    table::{max_recorded_run, next_run_number},
};
use tempfile::tempdir;

mod common;

use common::write_file;

#[test]
fn absent_table_starts_at_one() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("missing.csv");
    assert_eq!(max_recorded_run(&path).unwrap(), None);
    assert_eq!(next_run_number(&path).unwrap(), RunNumber::FIRST);
}

#[test]
fn empty_and_header_only_tables_start_at_one() {
    let tmp = tempdir().unwrap();
    let empty = tmp.path().join("empty.csv");
    let header = tmp.path().join("header.csv");
    write_file(&empty, "");
    write_file(&header, "RunNumber,EpisodeNumber,MaxQValueForState0\n");

    assert_eq!(next_run_number(&empty).unwrap().value(), 1);
    assert_eq!(next_run_number(&header).unwrap().value(), 1);
}

#[test]
fn malformed_rows_are_ignored() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("table.csv");
    write_file(&path, "Run\n1\nbad\n3\n");
    assert_eq!(max_recorded_run(&path).unwrap(), Some(3));
    assert_eq!(next_run_number(&path).unwrap().value(), 4);
}

#[test]
fn maximum_wins_over_last_row() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("table.csv");
    write_file(&path, "Run,Episode\n7,1\n2,1\n\n -3 ,1\n 5 ,2,extra\n");
    assert_eq!(next_run_number(&path).unwrap().value(), 8);
}

#[test]
fn signed_and_fractional_runs_do_not_count() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("table.csv");
    write_file(&path, "+9,1\n10.5,1\n2,1\n");
    assert_eq!(max_recorded_run(&path).unwrap(), Some(2));
}

#[test]
fn run_too_large_to_parse_is_an_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("table.csv");
    write_file(&path, "RunNumber\n99999999999999999999999\n6\n");
    assert!(max_recorded_run(&path).is_err());
    assert!(next_run_number(&path).is_err());
}

#[test]
fn largest_representable_run_is_not_reused() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("table.csv");
    write_file(&path, "18446744073709551615\n");
    assert_eq!(max_recorded_run(&path).unwrap(), Some(u64::MAX));
    assert!(next_run_number(&path).is_err());
}
