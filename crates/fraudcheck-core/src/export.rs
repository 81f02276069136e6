//! Export artifacts: formats, file naming, and client-side rendering of the
//! process table.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::column::{ColumnId, cell_value};
use crate::error::CoreError;
use crate::record::ProcessRecord;

/// File-name prefix of assessment exports produced by the backend.
pub const ASSESSMENT_PREFIX: &str = "avaliacoes_fraude";
/// File-name prefix of process-table exports rendered locally.
pub const PROCESS_PREFIX: &str = "processos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Spreadsheet,
    Delimited,
    Document,
}

impl ExportFormat {
    /// Path segment of the backend export endpoint.
    pub fn path_segment(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "excel",
            ExportFormat::Delimited => "csv",
            ExportFormat::Document => "word",
        }
    }

    /// Extension of backend-produced artifacts.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Delimited => "csv",
            ExportFormat::Document => "docx",
        }
    }

    /// Extension of locally rendered artifacts, which are HTML markup for the
    /// spreadsheet and document formats.
    pub fn client_extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xls",
            ExportFormat::Delimited => "csv",
            ExportFormat::Document => "doc",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excel" | "xlsx" | "xls" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            "csv" | "delimited" => Ok(ExportFormat::Delimited),
            "word" | "docx" | "doc" | "document" => Ok(ExportFormat::Document),
            other => Err(CoreError::Validation(format!("Formato inválido: {other}"))),
        }
    }
}

/// `<prefix>_<YYYY-MM-DD>.<ext>`
pub fn artifact_filename(prefix: &str, extension: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.{extension}", date.format("%Y-%m-%d"))
}

/// Render the process table for a locally saved export.
///
/// Rows are written in the order given; exporting nothing is an error.
pub fn render_process_table(
    records: &[&ProcessRecord],
    format: ExportFormat,
) -> Result<Vec<u8>, CoreError> {
    if records.is_empty() {
        return Err(CoreError::NothingToExport);
    }
    match format {
        ExportFormat::Delimited => render_csv(records),
        ExportFormat::Spreadsheet => Ok(html_table(records).into_bytes()),
        ExportFormat::Document => Ok(word_document(records).into_bytes()),
    }
}

fn export_row(record: &ProcessRecord) -> Vec<String> {
    ColumnId::EXPORTED
        .iter()
        .map(|c| cell_value(record, *c))
        .collect()
}

fn render_csv(records: &[&ProcessRecord]) -> Result<Vec<u8>, CoreError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(ColumnId::EXPORTED.iter().map(|c| c.header()))?;
    for record in records {
        wtr.write_record(export_row(record))?;
    }
    wtr.into_inner().map_err(|e| CoreError::Io(e.into_error()))
}

fn html_table(records: &[&ProcessRecord]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for column in ColumnId::EXPORTED {
        html.push_str(&format!("<th>{}</th>", escape_html(column.header())));
    }
    html.push_str("</tr></thead><tbody>");
    for record in records {
        html.push_str("<tr>");
        for cell in export_row(record) {
            html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn word_document(records: &[&ProcessRecord]) -> String {
    format!(
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
         xmlns:w='urn:schemas-microsoft-com:office:word'>\
         <head><meta charset=\"utf-8\"><title>Relatório de Processos</title>\
         <style>table {{ border-collapse: collapse; width: 100%; }} \
         th, td {{ border: 1px solid black; padding: 8px; }} \
         th {{ background-color: #f2f2f2; }}</style></head>\
         <body><h1>Relatório de Processos</h1>{}</body></html>",
        html_table(records)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, parte: &str) -> ProcessRecord {
        ProcessRecord {
            id: id.into(),
            numero: Some("0001".into()),
            parte_adversa: Some(parte.into()),
            ..Default::default()
        }
    }

    #[test]
    fn filename_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            artifact_filename(ASSESSMENT_PREFIX, ExportFormat::Spreadsheet.extension(), date),
            "avaliacoes_fraude_2026-10-19.xlsx"
        );
        assert_eq!(
            artifact_filename(PROCESS_PREFIX, ExportFormat::Document.client_extension(), date),
            "processos_2026-10-19.doc"
        );
    }

    #[test]
    fn format_parsing() {
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Spreadsheet);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Delimited);
        assert_eq!("word".parse::<ExportFormat>().unwrap(), ExportFormat::Document);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn csv_has_header_and_quoted_cells() {
        let a = record("1", "Silva, João");
        let b = record("2", "Ana");
        let bytes = render_process_table(&[&a, &b], ExportFormat::Delimited).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Processo,Parte Adversa,CPF/CNPJ,Comarca,Estado,Escritório,Status,Fase,Acordo,Suspeita Fraude"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,0001,\"Silva, João\",N/A,N/A,N/A,N/A,N/A,N/A,Não,Não"
        );
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn html_exports_escape_cells() {
        let a = record("1", "<Empresa & Cia>");
        let table = String::from_utf8(
            render_process_table(&[&a], ExportFormat::Spreadsheet).unwrap(),
        )
        .unwrap();
        assert!(table.contains("<td>&lt;Empresa &amp; Cia&gt;</td>"));

        let doc = String::from_utf8(render_process_table(&[&a], ExportFormat::Document).unwrap())
            .unwrap();
        assert!(doc.contains("<h1>Relatório de Processos</h1>"));
        assert!(doc.contains("<th>Suspeita Fraude</th>"));
    }

    #[test]
    fn nothing_to_export() {
        assert!(matches!(
            render_process_table(&[], ExportFormat::Delimited),
            Err(CoreError::NothingToExport)
        ));
    }
}
