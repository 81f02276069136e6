//! Terminal rendering of the process table, detail views and the assessment
//! board.

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use fraudcheck_core::detail::DetailPanels;
use fraudcheck_core::{AssessmentRecord, ColumnId, DetailCard, TabularViewEngine};
use fraudcheck_sync::{Notice, NoticeLevel};

const MAX_LIST_ITEMS: usize = 10;

// ── Process table ──

/// Print the visible rows in display order, preceded by the sort and filter
/// captions.
pub fn print_table(engine: &TabularViewEngine) {
    if let Some(caption) = engine.sort_caption() {
        println!("{caption}");
    }
    if let Some(caption) = engine.filter_caption() {
        println!("{caption}");
    }
    let table = process_table(engine);
    println!("{table}");
    println!(
        "{} of {} processes shown",
        table.row_iter().count(),
        engine.snapshot().len()
    );
}

fn process_table(engine: &TabularViewEngine) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ColumnId::ALL
            .iter()
            .map(|c| Cell::new(c.header()).add_attribute(Attribute::Bold)),
    );
    for row in engine.visible_rows() {
        table.add_row(ColumnId::ALL.iter().map(|c| row.cell(*c)));
    }
    table
}

pub fn print_unique_values(column: ColumnId, values: &[&str]) {
    println!("{} ({}):", column.header(), values.len());
    for value in values {
        println!("  {value}");
    }
}

// ── Detail views ──

pub fn print_detail_card(card: &DetailCard) {
    println!("=== Processo {} ===", card.numero);
    println!();
    println!("Partes");
    println!("  {:<26} {}", "ID", card.id);
    println!("  {:<26} {}", "Parte Adversa", card.parte_adversa);
    println!("  {:<26} {}", "CPF/CNPJ", card.cpf_cnpj_parte_adversa);
    if !card.advogados_adversos.is_empty() {
        println!("  Advogados Adversos ({}):", card.advogados_adversos.len());
        for name in card.advogados_adversos.iter().take(MAX_LIST_ITEMS) {
            println!("    {name}");
        }
        if card.advogados_adversos.len() > MAX_LIST_ITEMS {
            println!(
                "    ... and {} more",
                card.advogados_adversos.len() - MAX_LIST_ITEMS
            );
        }
    }
    println!();

    if let Some(agreement) = &card.agreement {
        println!("Acordo");
        println!("  {:<26} {}", "Titular", agreement.nome_titular);
        println!("  {:<26} {}", "CPF/CNPJ Titular", agreement.documento_titular);
        println!("  {:<26} {}", "Valor", agreement.valor);
        println!("  {:<26} {}", "Data Pagamento", agreement.data_pagamento);
        println!();
    }

    if !card.grid.is_empty() {
        println!("Grid");
        println!("  {}", card.grid.join(" | "));
        println!();
    }
}

/// Print open raw-detail panels, newest on top.
pub fn print_panels(panels: &DetailPanels) {
    for panel in panels.newest_first() {
        println!("── {} ──", panel.title());
        println!("{}", panel.pretty_payload());
        println!();
    }
}

// ── Assessment board ──

pub fn print_assessments(rows: &[AssessmentRecord]) {
    if rows.is_empty() {
        println!("(no assessments)");
        return;
    }
    println!("{}", assessment_table(rows));
    println!("{} assessment(s)", rows.len());
}

fn assessment_table(rows: &[AssessmentRecord]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["ID", "Processo", "Data", "Resultado", "Motivo"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    for r in rows {
        table.add_row(vec![
            r.external_id.clone(),
            r.processo.clone(),
            r.assessment_date.clone().unwrap_or_else(|| "-".into()),
            r.assessment_result.to_string(),
            r.reason_conclusion
                .map_or_else(|| "-".into(), |reason| reason.label().to_string()),
        ]);
    }
    table
}

// ── Notices ──

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{tag}] {}", notice.message);
    }
}
