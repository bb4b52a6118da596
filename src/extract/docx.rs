// DOCX text extraction via docx-rs
//
// Body paragraphs come first (blank ones skipped), then every table row as
// its non-empty cells joined by " | ". Parts are separated by a blank line.

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCell,
    TableCellContent, TableChild, TableRowChild,
};

use crate::types::{AppError, AppResult};

const PART_SEPARATOR: &str = "\n\n";
const CELL_SEPARATOR: &str = " | ";

pub fn extract_text(bytes: &[u8]) -> AppResult<String> {
    let docx = read_docx(bytes)
        .map_err(|e| AppError::Extraction(format!("Unreadable DOCX: {}", e)))?;

    let mut paragraphs: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                let text = paragraph_text(paragraph);
                if !text.trim().is_empty() {
                    paragraphs.push(text);
                }
            }
            DocumentChild::Table(table) => collect_rows(table, &mut rows),
            _ => {}
        }
    }

    paragraphs.extend(rows);
    Ok(paragraphs.join(PART_SEPARATOR))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn collect_rows(table: &Table, rows: &mut Vec<String>) {
    for row_child in &table.rows {
        let TableChild::TableRow(row) = row_child else {
            continue;
        };
        let cells: Vec<String> = row
            .cells
            .iter()
            .filter_map(|cell| {
                if let TableRowChild::TableCell(cell) = cell {
                    Some(cell_text(cell))
                } else {
                    None
                }
            })
            .filter(|text| !text.is_empty())
            .collect();

        if !cells.is_empty() {
            rows.push(cells.join(CELL_SEPARATOR));
        }
    }
}

/// Trimmed cell text, cell paragraphs joined by newlines.
fn cell_text(cell: &TableCell) -> String {
    cell.children
        .iter()
        .filter_map(|content| match content {
            TableCellContent::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
