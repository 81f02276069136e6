//! Extraction criteria sent to the backend and their client-side validation.

use serde::Serialize;

use crate::error::CoreError;

pub const ALL: &str = "Todos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionCriteria {
    pub process_numbers: Vec<String>,
    #[serde(rename = "data_inicial")]
    pub start_date: String,
    #[serde(rename = "data_final")]
    pub end_date: String,
    pub status: String,
    pub acordo: String,
    pub suspeita_fraude: String,
}

impl Default for ExtractionCriteria {
    fn default() -> Self {
        Self {
            process_numbers: Vec::new(),
            start_date: String::new(),
            end_date: String::new(),
            status: ALL.to_string(),
            acordo: ALL.to_string(),
            suspeita_fraude: ALL.to_string(),
        }
    }
}

impl ExtractionCriteria {
    /// Reject criteria that would make the backend scan everything: without a
    /// process number, both ends of the date range are required.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.process_numbers.is_empty()
            && (self.start_date.trim().is_empty() || self.end_date.trim().is_empty())
        {
            return Err(CoreError::Validation(
                "Quando não houver número de processo, é obrigatório informar data inicial e final"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Split free text into process numbers on any run of characters other than
/// digits, dots and dashes.
pub fn parse_process_numbers(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_separator() {
        let text = "0001234-56.2024.8.26.0100, 0009999-11.2023.8.26.0001\n42;  7";
        assert_eq!(
            parse_process_numbers(text),
            vec![
                "0001234-56.2024.8.26.0100",
                "0009999-11.2023.8.26.0001",
                "42",
                "7"
            ]
        );
        assert!(parse_process_numbers("   ").is_empty());
    }

    #[test]
    fn dates_required_without_process_number() {
        let mut criteria = ExtractionCriteria {
            start_date: "01/01/2024".into(),
            ..Default::default()
        };
        assert!(matches!(criteria.validate(), Err(CoreError::Validation(_))));

        criteria.end_date = "31/01/2024".into();
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn process_number_alone_is_enough() {
        let criteria = ExtractionCriteria {
            process_numbers: vec!["123".into()],
            ..Default::default()
        };
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn serialises_with_backend_field_names() {
        let json = serde_json::to_value(ExtractionCriteria::default()).unwrap();
        assert_eq!(json["data_inicial"], "");
        assert_eq!(json["suspeita_fraude"], "Todos");
    }
}
