//! CSV export for result tables.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::Technology;
use crate::results::ResultTable;

/// Column header for result export.
///
/// Available power columns carry the bare technology name, dispatch columns a
/// `_dispatch` suffix.
pub const HEADER: &str = "time,pv,wind_on,wind_off,biomass,hydro,\
                          pv_dispatch,wind_on_dispatch,wind_off_dispatch,biomass_dispatch,hydro_dispatch,\
                          batteries,battery_soc,residual_dispatch,load,curtailed_re,residual_load";

/// Exports a result table to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(table: &ResultTable, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(table, buf)
}

/// Writes a result table as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(table: &ResultTable, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in &table.rows {
        let mut record = Vec::with_capacity(17);
        record.push(r.time.format("%Y-%m-%d %H:%M:%S").to_string());
        record.extend(Technology::ALL.iter().map(|&t| format!("{:.4}", r.available(t))));
        record.extend(Technology::ALL.iter().map(|&t| format!("{:.4}", r.dispatched(t))));
        record.push(format!("{:.4}", r.battery_mw));
        record.push(format!("{:.4}", r.battery_soc_mwh));
        record.push(format!("{:.4}", r.residual_dispatch_mw));
        record.push(format!("{:.4}", r.load_mw));
        record.push(format!("{:.4}", r.curtailed_re_mw));
        record.push(format!("{:.4}", r.residual_load_mw));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::results::ResultRow;

    fn make_row(t: i64) -> ResultRow {
        ResultRow {
            time: NaiveDate::from_ymd_opt(2030, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid timestamp")
                + Duration::hours(t),
            available_mw: [120.0, 40.0, 10.0, 5.0, 2.0],
            dispatched_mw: [100.0, 40.0, 10.0, 5.0, 2.0],
            battery_mw: -7.0,
            battery_soc_mwh: 12.5,
            residual_dispatch_mw: 0.0,
            load_mw: 150.0,
            curtailed_re_mw: 20.0,
            residual_load_mw: 0.0,
        }
    }

    fn make_table(n: i64) -> ResultTable {
        ResultTable {
            rows: (0..n).map(make_row).collect(),
            step_hours: 1.0,
            residual_capacity_mw: 0.0,
            total_cost: 0.0,
        }
    }

    #[test]
    fn header_lists_every_column() {
        let mut buf = Vec::new();
        write_csv(&make_table(1), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert!(first_line.starts_with("time,pv,wind_on,wind_off,biomass,hydro,pv_dispatch"));
        assert!(first_line.ends_with("load,curtailed_re,residual_load"));
        assert_eq!(first_line.split(',').count(), 17);
    }

    #[test]
    fn row_count_matches_step_count() {
        let mut buf = Vec::new();
        write_csv(&make_table(24), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 24 data rows
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn deterministic_output() {
        let table = make_table(5);
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&table, &mut buf1).ok();
        write_csv(&table, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn values_are_readable_back() {
        let mut buf = Vec::new();
        write_csv(&make_table(3), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(17));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.expect("every row should parse");
            assert_eq!(&rec[0][..10], "2030-01-01");
            for i in 1..17 {
                assert!(rec[i].parse::<f64>().is_ok(), "column {i} should parse as f64");
            }
            assert_eq!(&rec[12], "12.5000");
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }
}
