use crate::error::EngineError;
use crate::services::data_sources::csv::{SAMPLE_HEADERS, SAMPLE_ROWS};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;

const SHEET_NAME: &str = "Branches";

/// Writes the data template as a workbook. Codes and quantities are numeric
/// cells and installation dates are date cells, as operators' own sheets
/// usually have them.
pub fn write_sample_xlsx(path: &Path) -> Result<(), EngineError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    let title_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col, title) in SAMPLE_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &title_format)?;
    }
    for (i, row) in SAMPLE_ROWS.iter().enumerate() {
        let line = i as u32 + 1;
        for (col, (title, value)) in SAMPLE_HEADERS.iter().zip(row.iter()).enumerate() {
            let col = col as u16;
            if value.is_empty() {
                continue;
            }
            if *title == "installation_date" {
                if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                    let cell = ExcelDateTime::from_ymd(
                        date.year() as u16,
                        date.month() as u8,
                        date.day() as u8,
                    )?;
                    sheet.write_datetime_with_format(line, col, &cell, &date_format)?;
                    continue;
                }
            }
            match value.parse::<f64>() {
                Ok(number) if is_numeric_column(title) => {
                    sheet.write_number(line, col, number)?;
                }
                _ => {
                    sheet.write_string(line, col, *value)?;
                }
            }
        }
    }
    sheet.autofit();
    workbook.save(path)?;
    Ok(())
}

fn is_numeric_column(title: &str) -> bool {
    title == "branch_code"
        || title == "power_supply_watt"
        || title.ends_with("_qty")
        || title.ends_with("_sqft")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::certificates::branch::BranchRow;
    use crate::services::data_sources::xlsx::XlsxRowSource;
    use crate::services::data_sources::RowSource;
    use common::model::row::CellValue;

    #[test]
    fn sample_workbook_loads_with_typed_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warranty_data_template.xlsx");
        write_sample_xlsx(&path).unwrap();

        let rows = XlsxRowSource::new(&path).load_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("branch_code"), Some(&CellValue::Number(101.0)));
        assert_eq!(
            rows[1].get("installation_date"),
            Some(&CellValue::Date(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()))
        );
        assert_eq!(rows[0].text("ifsc_code").as_deref(), Some("RBGB0000101"));
        assert!(!rows[1].is_present("complete_board_size"));

        let branch = BranchRow::parse(&rows[0]).unwrap();
        assert_eq!(branch.output_file_name(), "Certificate_101_Jaipur Main.pdf");
    }

    #[test]
    fn only_codes_and_quantities_are_numeric() {
        assert!(is_numeric_column("branch_code"));
        assert!(is_numeric_column("fascia_+_led_replacement_sqft"));
        assert!(!is_numeric_column("contact_number"));
        assert!(!is_numeric_column("ifsc_code"));
    }
}
