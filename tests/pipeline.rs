//! End-to-end pipeline tests: file -> loader -> validate -> enrich -> group
//! -> export, the same path the GUI shell drives.

use std::io::Write;

use polars::prelude::*;
use trafoscope::data::{read_table, SchemaValidator, COL_CAPACITY_KVA, REQUIRED_COLUMNS};
use trafoscope::engine::{self, AnalysisError, Status};
use trafoscope::export::CsvExporter;
use trafoscope::logging;

fn write_csv(lines: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readings.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    (dir, path)
}

const HEADER: &str = "Transformador,Horário,Carga (kW),Geração (kW),Capacidade (kVA)";

#[test]
fn csv_file_to_enriched_export() {
    logging::init_test();

    let (_dir, path) = write_csv(&[
        HEADER,
        "T1,01:00,100.0,20.0,100.0",
        "T2,01:00,30.0,25.0,50.0",
        "T1,02:00,130.0,0.0,100.0",
        "T2,02:00,5.0,10.0,50.0",
    ]);

    let df = read_table(&path).unwrap();
    let analysis = engine::analyze(&df).unwrap();

    // Grouping: first-appearance order, input order inside each group.
    let ids: Vec<&str> = analysis.groups.transformer_ids().collect();
    assert_eq!(ids, ["T1", "T2"]);
    let t1 = analysis.groups.get("T1").unwrap();
    assert_eq!(t1.len(), 2);
    assert_eq!(t1[0].status, Status::Alert);
    assert_eq!(t1[1].status, Status::Critical);

    // Negative net demand stays well below the first band.
    let t2 = analysis.groups.get("T2").unwrap();
    assert!(t2[1].net_demand_kw < 0.0);
    assert_eq!(t2[1].status, Status::Underutilization);

    // Export carries original plus derived columns, in order.
    let enriched = CsvExporter::enriched_frame(&df, &analysis.rows).unwrap();
    let bytes = CsvExporter::to_csv_bytes(&enriched).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(
        header,
        "Transformador,Horário,Carga (kW),Geração (kW),Capacidade (kVA),\
         Capacity(kW),Net Demand (kW),% of Capacity,Status"
    );
    assert!(text.contains("Critical risk - immediate intervention"));
}

#[test]
fn missing_column_aborts_before_computation() {
    let (_dir, path) = write_csv(&[
        "Transformador,Horário,Carga (kW),Geração (kW)",
        "T1,01:00,100.0,20.0",
    ]);

    let df = read_table(&path).unwrap();
    let err = engine::analyze(&df).unwrap_err();
    match err {
        AnalysisError::Schema(schema) => {
            assert_eq!(schema.missing, vec![COL_CAPACITY_KVA.to_string()]);
            for required in REQUIRED_COLUMNS {
                assert!(schema.to_string().contains(required));
            }
        }
        other => panic!("expected schema error, got {other}"),
    }
}

#[test]
fn extra_columns_pass_validation_and_survive_export() {
    let (_dir, path) = write_csv(&[
        "Transformador,Horário,Carga (kW),Geração (kW),Capacidade (kVA),Região",
        "T1,01:00,50.0,0.0,100.0,Sul",
    ]);

    let df = read_table(&path).unwrap();
    SchemaValidator::validate(&df).unwrap();

    let analysis = engine::analyze(&df).unwrap();
    let enriched = CsvExporter::enriched_frame(&df, &analysis.rows).unwrap();
    let names: Vec<String> = enriched
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert!(names.contains(&"Região".to_string()));
    // Extra columns stay ahead of the derived ones.
    assert_eq!(names.last().unwrap(), "Status");
}

#[test]
fn zero_capacity_row_fails_the_whole_batch() {
    let (_dir, path) = write_csv(&[
        HEADER,
        "T1,01:00,50.0,0.0,100.0",
        "T1,02:00,50.0,0.0,0.0",
    ]);

    let df = read_table(&path).unwrap();
    let err = engine::analyze(&df).unwrap_err();
    assert!(matches!(err, AnalysisError::Computation(_)));
    assert!(err.to_string().contains("02:00"));
}

#[test]
fn analysis_is_deterministic() {
    let rows: Vec<String> = (0..48)
        .map(|i| format!("T{},{:02}:00,{}.0,0.0,100.0", i % 4, i / 4, 40 + i))
        .collect();
    let mut lines = vec![HEADER.to_string()];
    lines.extend(rows);
    let line_refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    let (_dir, path) = write_csv(&line_refs);

    let df = read_table(&path).unwrap();
    let first = engine::analyze(&df).unwrap();
    let second = engine::analyze(&df).unwrap();
    assert_eq!(first.rows, second.rows);

    let first_ids: Vec<&str> = first.groups.transformer_ids().collect();
    let second_ids: Vec<&str> = second.groups.transformer_ids().collect();
    assert_eq!(first_ids, second_ids);
}
