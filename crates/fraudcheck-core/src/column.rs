//! Table columns and their display values.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::flags::derive_flags;
use crate::record::{ProcessRecord, non_empty};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnId {
    Id,
    Numero,
    ParteAdversa,
    CpfCnpj,
    Comarca,
    Estado,
    Escritorio,
    Status,
    Fase,
    /// Virtual: derived from agreement entries and the ledger.
    Acordo,
    /// Virtual: derived from agreement entries.
    SuspeitaFraude,
    Valor,
    Data,
}

/// How a column's displayed text is compared when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Monetary,
    Date,
}

impl ColumnId {
    /// All columns in display order.
    pub const ALL: [ColumnId; 13] = [
        ColumnId::Id,
        ColumnId::Numero,
        ColumnId::ParteAdversa,
        ColumnId::CpfCnpj,
        ColumnId::Comarca,
        ColumnId::Estado,
        ColumnId::Escritorio,
        ColumnId::Status,
        ColumnId::Fase,
        ColumnId::Acordo,
        ColumnId::SuspeitaFraude,
        ColumnId::Valor,
        ColumnId::Data,
    ];

    /// Columns written by the client-side exports.
    pub const EXPORTED: [ColumnId; 11] = [
        ColumnId::Id,
        ColumnId::Numero,
        ColumnId::ParteAdversa,
        ColumnId::CpfCnpj,
        ColumnId::Comarca,
        ColumnId::Estado,
        ColumnId::Escritorio,
        ColumnId::Status,
        ColumnId::Fase,
        ColumnId::Acordo,
        ColumnId::SuspeitaFraude,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ColumnId::Id => "id",
            ColumnId::Numero => "numero",
            ColumnId::ParteAdversa => "parte_adversa",
            ColumnId::CpfCnpj => "cpf_cnpj",
            ColumnId::Comarca => "comarca",
            ColumnId::Estado => "estado",
            ColumnId::Escritorio => "escritorio",
            ColumnId::Status => "status",
            ColumnId::Fase => "fase",
            ColumnId::Acordo => "acordo",
            ColumnId::SuspeitaFraude => "suspeita_fraude",
            ColumnId::Valor => "valor",
            ColumnId::Data => "data",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            ColumnId::Id => "ID",
            ColumnId::Numero => "Processo",
            ColumnId::ParteAdversa => "Parte Adversa",
            ColumnId::CpfCnpj => "CPF/CNPJ",
            ColumnId::Comarca => "Comarca",
            ColumnId::Estado => "Estado",
            ColumnId::Escritorio => "Escritório",
            ColumnId::Status => "Status",
            ColumnId::Fase => "Fase",
            ColumnId::Acordo => "Acordo",
            ColumnId::SuspeitaFraude => "Suspeita Fraude",
            ColumnId::Valor => "Valor",
            ColumnId::Data => "Data",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            ColumnId::Valor => ColumnKind::Monetary,
            ColumnId::Data => ColumnKind::Date,
            _ => ColumnKind::Text,
        }
    }

    pub fn is_virtual(self) -> bool {
        matches!(self, ColumnId::Acordo | ColumnId::SuspeitaFraude)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ColumnId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ColumnId::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| CoreError::UnknownColumn(s.to_string()))
    }
}

/// Render an optional field, substituting `"N/A"` for absent or blank text.
pub fn display_text(field: &Option<String>) -> &str {
    non_empty(field).unwrap_or(NOT_AVAILABLE)
}

/// The text a column shows for a record.
///
/// Virtual columns are derived on every call and never read from a stored field.
pub fn cell_value(record: &ProcessRecord, column: ColumnId) -> String {
    let text = match column {
        ColumnId::Id => record.id.as_str(),
        ColumnId::Numero => display_text(&record.numero),
        ColumnId::ParteAdversa => display_text(&record.parte_adversa),
        ColumnId::CpfCnpj => display_text(&record.cpf_cnpj_parte_adversa),
        ColumnId::Comarca => display_text(&record.comarca),
        ColumnId::Estado => display_text(&record.estado),
        ColumnId::Escritorio => display_text(&record.escritorio),
        ColumnId::Status => display_text(&record.status),
        ColumnId::Fase => display_text(&record.fase),
        ColumnId::Acordo => derive_flags(record).agreement_label(),
        ColumnId::SuspeitaFraude => derive_flags(record).fraud_label(),
        ColumnId::Valor => record
            .first_agreement()
            .map_or(NOT_AVAILABLE, |a| display_text(&a.valor)),
        ColumnId::Data => record
            .first_agreement()
            .map_or(NOT_AVAILABLE, |a| display_text(&a.data_pagamento)),
    };
    text.to_string()
}
