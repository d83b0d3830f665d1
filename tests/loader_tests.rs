use chrono::NaiveDate;
use ridership::{ChartStyle, LoadError, SchemaConfig, Selection, chart, load_dataset};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn serial(d: NaiveDate) -> f64 {
    (d - date(1899, 12, 30)).num_days() as f64
}

/// Workbook with a date-formatted `Tarih` column and three series
fn write_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("ulasim.xlsx");
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();

    for (col, header) in ["Tarih", "Kurum", "Toplam", "Tam", "Öğrenci", "Öğretmen"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    let rows = [
        (date(2021, 1, 1), "ESHOT", [100.0, 60.0, 30.0, 10.0]),
        (date(2021, 1, 1), "Metro", [50.0, 20.0, 25.0, 5.0]),
        (date(2021, 1, 2), "ESHOT", [90.0, 50.0, 30.0, 10.0]),
        (date(2021, 1, 2), "Metro", [40.0, 20.0, 15.0, 5.0]),
    ];
    for (i, (d, institution, values)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet
            .write_number_with_format(row, 0, serial(*d), &date_format)
            .unwrap();
        sheet.write_string(row, 1, *institution).unwrap();
        for (j, value) in values.iter().enumerate() {
            sheet.write_number(row, 2 + j as u16, *value).unwrap();
        }
    }

    workbook.save(&path).unwrap();
    path
}

#[test]
fn loads_workbook_with_discovered_series() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(dir.path());

    let ds = load_dataset(&path, &SchemaConfig::default()).unwrap();

    assert_eq!(ds.len(), 4);
    assert_eq!(ds.institutions(), ["ESHOT", "Metro"]);
    // "Toplam" is the third leading column and is not plotted
    assert_eq!(ds.schema().series, ["Tam", "Öğrenci", "Öğretmen"]);
    assert_eq!(ds.records()[0].date, date(2021, 1, 1));
    assert_eq!(ds.records()[2].date, date(2021, 1, 2));
    assert_eq!(ds.records()[1].counts, [Some(20.0), Some(25.0), Some(5.0)]);
}

#[test]
fn declared_series_are_validated_against_the_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(dir.path());

    let schema = SchemaConfig {
        series: vec!["Toplam".to_string(), "Tam".to_string()],
        ..SchemaConfig::default()
    };
    let ds = load_dataset(&path, &schema).unwrap();
    assert_eq!(ds.schema().series, ["Toplam", "Tam"]);

    let schema = SchemaConfig {
        series: vec!["Tam".to_string(), "Engelli".to_string()],
        ..SchemaConfig::default()
    };
    let err = load_dataset(&path, &schema).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn(ref name) if name == "Engelli"));
    assert_eq!(err.to_string(), "column 'Engelli' not found in header row");
}

#[test]
fn every_offered_selection_charts_every_series() {
    let dir = tempfile::tempdir().unwrap();
    let ds = load_dataset(write_workbook(dir.path()), &SchemaConfig::default()).unwrap();
    let style = ChartStyle::default();

    for institution in ds.institutions() {
        let selection = Selection::choose(&ds, institution).unwrap();
        let spec = chart::build(&ds, selection.as_str(), &style);
        assert_eq!(spec.series_count(), ds.schema().series.len());
        for trace in &spec.data {
            assert_eq!(trace.x.len(), ds.rows_for(institution).count());
        }
    }
}

#[test]
fn missing_file_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_dataset(dir.path().join("ulasim.xlsx"), &SchemaConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
    assert!(err.to_string().starts_with("file not found"));
}

#[test]
fn corrupt_workbook_is_a_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ulasim.xlsx");
    std::fs::write(&path, b"this is not a zip archive").unwrap();

    let err = load_dataset(&path, &SchemaConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Workbook(_)));
}

#[test]
fn errors_report_spreadsheet_rows_below_blank_leading_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ulasim.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    // header on row 3, rows 1-2 left empty
    for (col, header) in ["Tarih", "Kurum", "Toplam", "Tam"].iter().enumerate() {
        sheet.write_string(2, col as u16, *header).unwrap();
    }
    let cells = [("2021-01-01", "ESHOT", 10.0), ("someday", "ESHOT", 20.0)];
    for (i, (d, institution, value)) in cells.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_string(row, 0, *d).unwrap();
        sheet.write_string(row, 1, *institution).unwrap();
        sheet.write_number(row, 2, *value).unwrap();
        sheet.write_number(row, 3, *value).unwrap();
    }
    workbook.save(&path).unwrap();

    let err = load_dataset(&path, &SchemaConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::InvalidDate { row: 5, ref value } if value == "someday"));
    assert_eq!(err.to_string(), "row 5: cannot read 'someday' as a date");
}
