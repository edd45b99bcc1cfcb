//! Header-once appends and float formatting of table rows

use qlog::{
    Error, RunNumber,
    parser::{EpisodeDelta, EpisodeMaxQ},
    table::{DeltaRow, MaxQRow, TableWriter, read_max_q_table},
};
use tempfile::tempdir;

mod common;

use common::{assert_approx_eq, read_lines};

fn row(run: u64, episode: u32, max_q: Option<f64>) -> MaxQRow {
    MaxQRow::new(RunNumber::new(run).unwrap(), &EpisodeMaxQ { episode, max_q })
}

#[test]
fn header_is_written_once_across_appends() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("out.csv");

    let first = TableWriter::append(&path, &[row(1, 1, Some(1.0))]).unwrap();
    let second = TableWriter::append(&path, &[row(2, 1, Some(2.0))]).unwrap();
    assert!(first.header_written);
    assert!(!second.header_written);

    assert_eq!(
        read_lines(&path),
        vec![
            "RunNumber,EpisodeNumber,MaxQValueForState0",
            "1,1,1.000000",
            "2,1,2.000000",
        ]
    );
}

#[test]
fn rows_keep_call_order() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("out.csv");
    TableWriter::append(&path, &[row(1, 3, None), row(1, 1, Some(0.5)), row(1, 2, None)]).unwrap();

    let episodes: Vec<_> = read_max_q_table(&path)
        .unwrap()
        .iter()
        .map(|r| r.episode)
        .collect();
    assert_eq!(episodes, vec![3, 1, 2]);
}

#[test]
fn floats_round_trip_to_six_places() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("out.csv");
    TableWriter::append(&path, &[row(1, 1, Some(-5.627220814338541)), row(1, 2, None)]).unwrap();

    let lines = read_lines(&path);
    assert_eq!(lines[1], "1,1,-5.627221");
    assert_eq!(lines[2], "1,2,");

    let records = read_max_q_table(&path).unwrap();
    assert_approx_eq(records[0].max_q.unwrap(), -5.627220814338541, 1e-6);
    assert_eq!(records[1].max_q, None);
}

#[test]
fn empty_existing_file_gets_header() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("out.csv");
    std::fs::write(&path, "").unwrap();

    let outcome = TableWriter::append::<MaxQRow>(&path, &[]).unwrap();
    assert!(outcome.header_written);
    assert_eq!(outcome.rows_written, 0);
    assert_eq!(read_lines(&path).len(), 1);
}

#[test]
fn parent_directories_are_created() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested/deeper/out.csv");
    TableWriter::append(&path, &[row(1, 1, Some(1.0))]).unwrap();
    assert!(path.exists());
}

#[test]
fn rows_with_another_header_are_rejected() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("out.csv");
    TableWriter::append(&path, &[row(1, 1, Some(1.0))]).unwrap();

    let delta = DeltaRow::new(
        RunNumber::new(2).unwrap(),
        &EpisodeDelta {
            episode: 1,
            max_q: Some(2.0),
            delta: None,
        },
    );
    let err = TableWriter::append(&path, &[delta]).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));

    assert_eq!(read_lines(&path).len(), 2);
    assert_eq!(read_max_q_table(&path).unwrap().len(), 1);
}

#[test]
fn header_check_tolerates_padding() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("out.csv");
    std::fs::write(&path, "RunNumber, EpisodeNumber ,MaxQValueForState0\n").unwrap();

    let outcome = TableWriter::append(&path, &[row(1, 1, Some(1.0))]).unwrap();
    assert!(!outcome.header_written);
}
