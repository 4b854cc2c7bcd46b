use crate::export::service::SPREADSHEET_HEADERS;
use crate::report::model::TestCaseRecord;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

pub const SHEET_NAME: &str = "Test Cases";

const COLUMN_WIDTHS: [f64; 9] = [12.0, 35.0, 10.0, 15.0, 30.0, 40.0, 35.0, 20.0, 30.0];

const PRIORITY_COLUMN: u16 = 2;

const HEADER_FILL: u32 = 0x00897B;

fn priority_fill(priority: &str) -> Option<u32> {
    match priority.to_lowercase().as_str() {
        "high" => Some(0xFFCDD2),
        "medium" => Some(0xFFF9C4),
        "low" => Some(0xC8E6C9),
        _ => None,
    }
}

/// One sheet, frozen header row, one row per record.
pub fn write_workbook(test_cases: &[TestCaseRecord]) -> Result<Vec<u8>, XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap()
        .set_border(FormatBorder::Thin);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, (header, width)) in SPREADSHEET_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, width)?;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
    }

    for (index, case) in test_cases.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, value) in case.columns().iter().enumerate() {
            let col = col as u16;
            match priority_fill(value).filter(|_| col == PRIORITY_COLUMN) {
                Some(fill) => {
                    let format = cell_format.clone().set_background_color(Color::RGB(fill));
                    worksheet.write_string_with_format(row, col, *value, &format)?;
                }
                None => {
                    worksheet.write_string_with_format(row, col, *value, &cell_format)?;
                }
            }
        }
    }
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save_to_buffer()
}
