//! Process records as the review tool sees them.
//!
//! The backend payload is loosely typed: agreement markers arrive as `"Sim"`,
//! `"Não"`, booleans or null, and fraud flags as booleans or `"Sim"`. Everything
//! is normalised here, at ingestion, so the rest of the crate works on plain
//! Rust types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Agreement marker that may be explicitly set, explicitly unset, or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl From<Value> for TriState {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(true) => TriState::Yes,
            Value::Bool(false) => TriState::No,
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "sim" | "s" | "true" | "yes" => TriState::Yes,
                "não" | "nao" | "n" | "false" | "no" => TriState::No,
                _ => TriState::Unknown,
            },
            _ => TriState::Unknown,
        }
    }
}

/// A settlement ("acordo") attached to a process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgreementEntry {
    #[serde(rename = "is_acordo", default)]
    pub is_agreement: TriState,
    #[serde(
        rename = "suspeita_fraude",
        default,
        deserialize_with = "fraud_flag"
    )]
    pub fraud_suspected: bool,
    #[serde(default, deserialize_with = "loose_string")]
    pub valor: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub data_pagamento: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub nome_titular: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub cpf_titular: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub cpf_cnpj_titular: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub status: Option<String>,
}

impl AgreementEntry {
    /// Holder document, preferring the CPF field over the combined CPF/CNPJ one.
    pub fn holder_document(&self) -> Option<&str> {
        non_empty(&self.cpf_titular).or_else(|| non_empty(&self.cpf_cnpj_titular))
    }
}

/// One line of the financial ledger ("lançamento").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "is_acordo", default)]
    pub is_agreement: TriState,
    #[serde(default, deserialize_with = "loose_string")]
    pub tipo: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub valor: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub data_pagamento: Option<String>,
}

impl LedgerEntry {
    /// A ledger line is an agreement when flagged as one or when its type
    /// mentions "ACORDO" in any case.
    pub fn counts_as_agreement(&self) -> bool {
        self.is_agreement == TriState::Yes
            || self
                .tipo
                .as_deref()
                .is_some_and(|t| t.to_uppercase().contains("ACORDO"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLedger")]
pub struct FinancialLedger {
    pub lancamentos: Vec<LedgerEntry>,
}

#[derive(Deserialize)]
struct RawLedger {
    #[serde(default)]
    lancamentos: Option<Vec<Option<LedgerEntry>>>,
}

impl From<RawLedger> for FinancialLedger {
    fn from(raw: RawLedger) -> Self {
        Self {
            lancamentos: raw.lancamentos.unwrap_or_default().into_iter().flatten().collect(),
        }
    }
}

/// One case under review.
///
/// Text fields stay `None` when the backend omitted them; the `"N/A"`
/// placeholder is a display concern (see [`crate::column::display_text`]).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawProcess")]
pub struct ProcessRecord {
    pub id: String,
    pub numero: Option<String>,
    pub parte_adversa: Option<String>,
    pub cpf_cnpj_parte_adversa: Option<String>,
    pub comarca: Option<String>,
    pub estado: Option<String>,
    pub escritorio: Option<String>,
    pub status: Option<String>,
    pub fase: Option<String>,
    pub advogados_adversos: Vec<String>,
    pub acordo: Vec<AgreementEntry>,
    pub financeiro: Option<FinancialLedger>,
    /// Presentation-only grid fields, joined by position at ingestion.
    pub grid: Vec<String>,
}

impl ProcessRecord {
    /// First agreement entry, which carries the displayed value and payment date.
    pub fn first_agreement(&self) -> Option<&AgreementEntry> {
        self.acordo.first()
    }
}

// ── Wire shapes ──

#[derive(Deserialize)]
struct RawProcess {
    processo: RawProcesso,
    #[serde(default)]
    partes: Option<RawPartes>,
    #[serde(default)]
    acordo: Option<Vec<AgreementEntry>>,
    #[serde(default)]
    financeiro: Option<FinancialLedger>,
}

#[derive(Deserialize)]
struct RawProcesso {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default, deserialize_with = "loose_string")]
    numero: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    comarca: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    estado: Option<String>,
    #[serde(default, deserialize_with = "loose_string", alias = "escritorio_celula")]
    escritorio: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    fase: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawPartes {
    #[serde(default, deserialize_with = "loose_string")]
    parte_adversa: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    cpf_cnpj_parte_adverso: Option<String>,
    #[serde(default)]
    advogados_adversos: Option<Vec<RawLawyer>>,
}

#[derive(Deserialize)]
struct RawLawyer {
    #[serde(default, deserialize_with = "loose_string")]
    nome: Option<String>,
}

impl From<RawProcess> for ProcessRecord {
    fn from(raw: RawProcess) -> Self {
        let partes = raw.partes.unwrap_or_default();
        Self {
            id: raw.processo.id,
            numero: raw.processo.numero,
            parte_adversa: partes.parte_adversa,
            cpf_cnpj_parte_adversa: partes.cpf_cnpj_parte_adverso,
            comarca: raw.processo.comarca,
            estado: raw.processo.estado,
            escritorio: raw.processo.escritorio,
            status: raw.processo.status,
            fase: raw.processo.fase,
            advogados_adversos: partes
                .advogados_adversos
                .unwrap_or_default()
                .into_iter()
                .map(|l| l.nome.unwrap_or_else(|| "N/A".to_string()))
                .collect(),
            acordo: raw.acordo.unwrap_or_default(),
            financeiro: raw.financeiro,
            grid: Vec::new(),
        }
    }
}

// ── Loose field decoding ──

/// Treat an empty string as absent, so the caller only sees meaningful text.
pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

fn fraud_flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim() == "Sim",
        _ => false,
    })
}

fn loose_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    })
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
