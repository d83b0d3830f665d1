#![cfg(not(tarpaulin_include))]

//! Writes a demo workbook in the layout the dashboard expects:
//! `Tarih | Kurum | Toplam | <one column per passenger type>`.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use clap::Parser;
use log::info;
use rust_xlsxwriter::{Format, Workbook};
use std::path::PathBuf;

const INSTITUTIONS: &[(&str, f64)] = &[
    ("ESHOT", 420_000.0),
    ("Metro", 180_000.0),
    ("İzban", 150_000.0),
    ("İzdeniz", 22_000.0),
];

/// Passenger type and its share of the daily total
const PASSENGER_TYPES: &[(&str, f64)] = &[
    ("Tam", 0.46),
    ("Öğrenci", 0.27),
    ("Öğretmen", 0.06),
    ("65 Yaş Üstü", 0.15),
    ("Engelli", 0.06),
];

#[derive(Parser, Debug)]
#[command(name = "sample_data")]
#[command(about = "Write a sample ridership workbook")]
struct Args {
    /// Output .xlsx path
    #[arg(default_value = "ulasim.xlsx")]
    output: PathBuf,

    /// First date (YYYY-MM-DD)
    #[arg(long, default_value = "2021-01-01")]
    start: NaiveDate,

    /// Number of days per institution
    #[arg(long, default_value_t = 90)]
    days: u64,
}

/// Daily ridership with a weekly rhythm and a slow drift
fn daily_total(base: f64, date: NaiveDate, day_index: u64) -> f64 {
    let weekly = match date.weekday() {
        Weekday::Sat => 0.72,
        Weekday::Sun => 0.55,
        _ => 1.0,
    };
    let drift = 1.0 + 0.08 * (day_index as f64 / 14.0).sin();
    (base * weekly * drift).round()
}

/// Excel serial day number, counted from 1899-12-30
fn excel_serial(date: NaiveDate, epoch: NaiveDate) -> f64 {
    (date - epoch).num_days() as f64
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).ok_or("invalid epoch")?;

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("dd.mm.yyyy");

    let worksheet = workbook.add_worksheet();
    let headers = ["Tarih", "Kurum", "Toplam"]
        .into_iter()
        .chain(PASSENGER_TYPES.iter().map(|(name, _)| *name));
    for (col, header) in headers.enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        worksheet.set_column_width(col as u16, 14.0)?;
    }

    let mut row: u32 = 1;
    for day in 0..args.days {
        let date = args
            .start
            .checked_add_days(Days::new(day))
            .ok_or("date out of range")?;

        for (institution, base) in INSTITUTIONS {
            let total = daily_total(*base, date, day);

            worksheet.write_number_with_format(row, 0, excel_serial(date, epoch), &date_format)?;
            worksheet.write_string(row, 1, *institution)?;
            worksheet.write_number(row, 2, total)?;
            for (i, (_, share)) in PASSENGER_TYPES.iter().enumerate() {
                worksheet.write_number(row, 3 + i as u16, (total * share).round())?;
            }
            row += 1;
        }
    }

    workbook.save(&args.output)?;
    info!(
        "wrote {} rows for {} institutions to {}",
        row - 1,
        INSTITUTIONS.len(),
        args.output.display()
    );

    Ok(())
}
