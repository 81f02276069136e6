//! Fraud assessments: the review board's rows and the reason rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssessmentResult {
    #[default]
    Pendente,
    Positiva,
    Negativa,
    #[serde(rename = "Falso Positivo")]
    FalsoPositivo,
}

impl AssessmentResult {
    pub const ALL: [AssessmentResult; 4] = [
        AssessmentResult::Pendente,
        AssessmentResult::Positiva,
        AssessmentResult::Negativa,
        AssessmentResult::FalsoPositivo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AssessmentResult::Pendente => "Pendente",
            AssessmentResult::Positiva => "Positiva",
            AssessmentResult::Negativa => "Negativa",
            AssessmentResult::FalsoPositivo => "Falso Positivo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "Individuo não Consta nos Autos")]
    IndividuoNaoConsta,
    #[serde(rename = "Falha na Extração")]
    FalhaNaExtracao,
    #[serde(rename = "Dados Divergentes")]
    DadosDivergentes,
    #[serde(rename = "Individuo Consta nos Autos")]
    IndividuoConsta,
}

impl Reason {
    pub const ALL: [Reason; 4] = [
        Reason::IndividuoNaoConsta,
        Reason::FalhaNaExtracao,
        Reason::DadosDivergentes,
        Reason::IndividuoConsta,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Reason::IndividuoNaoConsta => "Individuo não Consta nos Autos",
            Reason::FalhaNaExtracao => "Falha na Extração",
            Reason::DadosDivergentes => "Dados Divergentes",
            Reason::IndividuoConsta => "Individuo Consta nos Autos",
        }
    }
}

macro_rules! labelled {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.label().to_lowercase() == wanted)
                    .ok_or_else(|| CoreError::Validation(format!("{} inválido: {s}", $what)))
            }
        }
    };
}

labelled!(AssessmentResult, "resultado");
labelled!(Reason, "motivo");

/// Resolve the reason that accompanies a result: none while pending, and the
/// first reason when a concluded assessment was saved without one.
pub fn resolve_reason(result: AssessmentResult, reason: Option<Reason>) -> Option<Reason> {
    match result {
        AssessmentResult::Pendente => None,
        _ => Some(reason.unwrap_or(Reason::ALL[0])),
    }
}

/// One row of the fraud assessment board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub external_id: String,
    pub processo: String,
    #[serde(default)]
    pub assessment_date: Option<String>,
    #[serde(default)]
    pub assessment_result: AssessmentResult,
    #[serde(default)]
    pub reason_conclusion: Option<Reason>,
}

/// Search criteria for the board. `None` stands for "Todos".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilters {
    pub start_date: String,
    pub end_date: String,
    pub external_id: String,
    pub processo: String,
    pub assessment_result: Option<AssessmentResult>,
    pub reason_conclusion: Option<Reason>,
}

/// Body of an assessment save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentUpdate {
    pub process_number: String,
    pub assessment_result: AssessmentResult,
    pub reason_conclusion: Option<Reason>,
    pub username: Option<String>,
}

impl AssessmentUpdate {
    pub fn new(
        process_number: impl Into<String>,
        result: AssessmentResult,
        reason: Option<Reason>,
        username: Option<String>,
    ) -> Self {
        Self {
            process_number: process_number.into(),
            assessment_result: result,
            reason_conclusion: resolve_reason(result, reason),
            username,
        }
    }
}

/// Normalised fields echoed back by the backend after a save.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedAssessment {
    pub assessment_result: AssessmentResult,
    #[serde(default)]
    pub reason_conclusion: Option<Reason>,
    #[serde(default)]
    pub assessment_date: Option<String>,
}

/// The board's current rows, replaced on every search.
#[derive(Debug, Clone, Default)]
pub struct AssessmentBoard {
    rows: Vec<AssessmentRecord>,
}

impl AssessmentBoard {
    pub fn replace(&mut self, rows: Vec<AssessmentRecord>) {
        self.rows = rows;
    }

    pub fn rows(&self) -> &[AssessmentRecord] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, external_id: &str) -> Option<&AssessmentRecord> {
        self.rows.iter().find(|r| r.external_id == external_id)
    }

    /// Merge the echoed fields of a save into the matching row.
    pub fn apply_saved(
        &mut self,
        external_id: &str,
        saved: SavedAssessment,
    ) -> Result<&AssessmentRecord, CoreError> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.external_id == external_id)
            .ok_or_else(|| CoreError::NotFound(external_id.to_string()))?;
        row.assessment_result = saved.assessment_result;
        row.reason_conclusion = resolve_reason(saved.assessment_result, saved.reason_conclusion);
        if saved.assessment_date.is_some() {
            row.assessment_date = saved.assessment_date;
        }
        debug!(external_id, result = %row.assessment_result, "assessment row updated");
        Ok(row)
    }
}
