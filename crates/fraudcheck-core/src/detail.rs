//! Detail views: the formatted card of a record and the bounded list of
//! opened raw-detail panels.

use std::collections::VecDeque;

use serde_json::Value;

use crate::column::{NOT_AVAILABLE, display_text};
use crate::record::ProcessRecord;

/// Number of raw-detail panels kept open at once.
pub const MAX_OPEN_PANELS: usize = 5;

/// An opened raw-detail panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub id: String,
    pub numero: String,
    pub payload: Value,
}

impl DetailPanel {
    pub fn title(&self) -> String {
        format!("Processo {} (ID: {})", self.numero, self.id)
    }

    /// Payload as indented JSON, the form the panel shows and copies.
    pub fn pretty_payload(&self) -> String {
        serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| self.payload.to_string())
    }
}

/// Opened panels in open order. Holds at most [`MAX_OPEN_PANELS`]; opening
/// one more evicts the oldest.
#[derive(Debug, Clone, Default)]
pub struct DetailPanels {
    panels: VecDeque<DetailPanel>,
}

impl DetailPanels {
    pub fn open(&mut self, panel: DetailPanel) {
        self.panels.push_back(panel);
        while self.panels.len() > MAX_OPEN_PANELS {
            self.panels.pop_front();
        }
    }

    /// Panel ids, oldest first.
    pub fn ids(&self) -> Vec<&str> {
        self.panels.iter().map(|p| p.id.as_str()).collect()
    }

    /// Panels newest first, the order they are stacked on screen.
    pub fn newest_first(&self) -> impl Iterator<Item = &DetailPanel> {
        self.panels.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn clear(&mut self) {
        self.panels.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementSummary {
    pub nome_titular: String,
    pub documento_titular: String,
    pub valor: String,
    pub data_pagamento: String,
}

/// Formatted detail of one record: parties and the first agreement's payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailCard {
    pub id: String,
    pub numero: String,
    pub parte_adversa: String,
    pub cpf_cnpj_parte_adversa: String,
    pub advogados_adversos: Vec<String>,
    pub agreement: Option<AgreementSummary>,
    pub grid: Vec<String>,
}

impl DetailCard {
    pub fn from_record(record: &ProcessRecord) -> Self {
        let agreement = record.first_agreement().map(|a| AgreementSummary {
            nome_titular: display_text(&a.nome_titular).to_string(),
            documento_titular: a.holder_document().unwrap_or(NOT_AVAILABLE).to_string(),
            valor: display_text(&a.valor).to_string(),
            data_pagamento: display_text(&a.data_pagamento).to_string(),
        });
        Self {
            id: record.id.clone(),
            numero: display_text(&record.numero).to_string(),
            parte_adversa: display_text(&record.parte_adversa).to_string(),
            cpf_cnpj_parte_adversa: display_text(&record.cpf_cnpj_parte_adversa).to_string(),
            advogados_adversos: record.advogados_adversos.clone(),
            agreement,
            grid: record.grid.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AgreementEntry;

    fn panel(id: &str) -> DetailPanel {
        DetailPanel {
            id: id.into(),
            numero: format!("N-{id}"),
            payload: Value::Null,
        }
    }

    #[test]
    fn keeps_five_most_recent_in_open_order() {
        let mut panels = DetailPanels::default();
        for id in ["A", "B", "C", "D", "E", "F"] {
            panels.open(panel(id));
        }
        assert_eq!(panels.ids(), vec!["B", "C", "D", "E", "F"]);
        let stacked: Vec<&str> = panels.newest_first().map(|p| p.id.as_str()).collect();
        assert_eq!(stacked, vec!["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn reopening_adds_another_panel() {
        let mut panels = DetailPanels::default();
        panels.open(panel("A"));
        panels.open(panel("A"));
        assert_eq!(panels.ids(), vec!["A", "A"]);
    }

    #[test]
    fn panel_title_and_payload() {
        let p = DetailPanel {
            id: "42".into(),
            numero: "0001".into(),
            payload: serde_json::json!({"k": 1}),
        };
        assert_eq!(p.title(), "Processo 0001 (ID: 42)");
        assert!(p.pretty_payload().contains("\"k\": 1"));
    }

    #[test]
    fn card_uses_first_agreement() {
        let record = ProcessRecord {
            id: "9".into(),
            parte_adversa: Some("Ana".into()),
            advogados_adversos: vec!["Dr. X".into()],
            acordo: vec![
                AgreementEntry {
                    nome_titular: Some("Ana".into()),
                    cpf_cnpj_titular: Some("111".into()),
                    valor: Some("R$ 10,00".into()),
                    ..Default::default()
                },
                AgreementEntry {
                    nome_titular: Some("Outro".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let card = DetailCard::from_record(&record);
        let agreement = card.agreement.unwrap();
        assert_eq!(agreement.nome_titular, "Ana");
        assert_eq!(agreement.documento_titular, "111");
        assert_eq!(agreement.data_pagamento, "N/A");
        assert_eq!(card.cpf_cnpj_parte_adversa, "N/A");
    }
}
