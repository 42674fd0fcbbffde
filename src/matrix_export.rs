use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};

use crate::table::MatrixTable;

pub struct ExportReport {
    pub path: PathBuf,
    pub players: usize,
    pub cells: usize,
}

pub fn default_export_path(dir: &Path, label: &str) -> PathBuf {
    let slug: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let slug = slug.trim_matches('_');
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("player_matrix_{slug}_{stamp}.xlsx"))
}

/// Writes the table to a "Matrix" sheet plus a "Tooltips" sheet of pairs.
pub fn export_matrix_xlsx(path: &Path, title: &str, table: &MatrixTable) -> Result<ExportReport> {
    let mut workbook = Workbook::new();

    let matrix_sheet = workbook.add_worksheet();
    matrix_sheet.set_name("Matrix").context("name matrix sheet")?;
    write_matrix_sheet(matrix_sheet, title, table)?;

    let tooltip_sheet = workbook.add_worksheet();
    tooltip_sheet
        .set_name("Tooltips")
        .context("name tooltips sheet")?;
    let mut rows = vec![vec![
        "Player".to_string(),
        "With".to_string(),
        "Matches".to_string(),
        "Tooltip".to_string(),
    ]];
    for row in &table.rows {
        for cell in &row.cells {
            rows.push(vec![
                row.header.clone(),
                table.header.get(cell.col).cloned().unwrap_or_default(),
                cell.content.clone(),
                cell.tooltip.clone(),
            ]);
        }
    }
    write_rows(tooltip_sheet, &rows)?;

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        players: table.size(),
        cells: table.rows.iter().map(|r| r.cells.len()).sum(),
    })
}

fn write_matrix_sheet(sheet: &mut Worksheet, title: &str, table: &MatrixTable) -> Result<()> {
    let bold = Format::new().set_bold();
    sheet
        .write_string_with_format(0, 0, title, &bold)
        .context("write title")?;

    let header_row = 2u32;
    for (idx, name) in table.header.iter().enumerate() {
        sheet
            .write_string_with_format(header_row, (idx + 1) as u16, name, &bold)
            .with_context(|| format!("write header {idx}"))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = header_row + 1 + row_idx as u32;
        sheet
            .write_string_with_format(r, 0, &row.header, &bold)
            .with_context(|| format!("write row header {row_idx}"))?;
        for cell in &row.cells {
            let rgb = cell.intensity.rgb();
            let font = if rgb.is_dark() {
                Color::White
            } else {
                Color::Black
            };
            let format = Format::new()
                .set_background_color(Color::RGB(rgb.as_u32()))
                .set_font_color(font)
                .set_align(FormatAlign::Center);
            sheet
                .write_number_with_format(r, (cell.col + 1) as u16, f64::from(cell.value), &format)
                .with_context(|| format!("write cell ({row_idx},{})", cell.col))?;
        }
    }
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
