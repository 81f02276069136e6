use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fraudcheck_core::{
    AssessmentResult, ColumnId, ExportFormat, ExtractionCriteria, FraudFilter, Reason,
    SearchFilters, parse_process_numbers,
};

#[derive(Parser)]
#[command(name = "fraudcheck")]
#[command(about = "Extract, review and assess legal processes for fraud", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the review backend.
    #[arg(
        long,
        env = "FRAUDCHECK_URL",
        default_value = "http://localhost:5000",
        global = true
    )]
    pub base_url: String,

    /// Seconds between backend session checks in `watch`.
    #[arg(
        long,
        env = "FRAUDCHECK_LIVENESS_SECS",
        default_value_t = 300,
        global = true
    )]
    pub liveness_secs: u64,

    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run an extraction and show the resulting table.
    Extract(ExtractArgs),

    /// Search the fraud assessment board.
    Search(SearchArgs),

    /// Record a fraud assessment.
    Assess {
        external_id: String,

        #[arg(long)]
        result: AssessmentResult,

        #[arg(long)]
        reason: Option<Reason>,
    },

    /// Download the assessment table rendered by the backend.
    Export {
        #[arg(long, default_value = "excel")]
        format: ExportFormat,

        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Re-run the fraud assessment over every stored record.
    Recertify,

    /// Initialise the backend session and keep it alive until interrupted.
    Watch,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Process numbers, separated by spaces, commas or new lines.
    #[arg(long, short)]
    pub processes: Option<String>,

    #[arg(long, default_value = "")]
    pub start: String,

    #[arg(long, default_value = "")]
    pub end: String,

    #[arg(long, default_value = "Todos")]
    pub status: String,

    #[arg(long, default_value = "Todos")]
    pub acordo: String,

    #[arg(long, default_value = "Todos")]
    pub suspeita: String,

    /// Click a column header; repeat to toggle direction or change column.
    #[arg(long = "sort")]
    pub sort: Vec<ColumnId>,

    /// Column filter as `column=value1,value2`; repeatable.
    #[arg(long = "filter", value_parser = parse_column_filter)]
    pub filters: Vec<(ColumnId, Vec<String>)>,

    #[arg(long)]
    pub fraud: Option<FraudFilter>,

    /// List the distinct values of a column.
    #[arg(long)]
    pub values: Option<ColumnId>,

    /// Narrow `--values` to entries containing this text.
    #[arg(long, requires = "values")]
    pub search: Option<String>,

    /// Open the raw-detail panel of a record; repeatable.
    #[arg(long = "detail")]
    pub details: Vec<String>,

    /// Show the formatted detail card of a record.
    #[arg(long)]
    pub card: Option<String>,

    /// Save the table in this format.
    #[arg(long)]
    pub export: Option<ExportFormat>,

    #[arg(long, default_value = ".")]
    pub out: PathBuf,
}

impl ExtractArgs {
    pub fn criteria(&self) -> ExtractionCriteria {
        ExtractionCriteria {
            process_numbers: self
                .processes
                .as_deref()
                .map(parse_process_numbers)
                .unwrap_or_default(),
            start_date: self.start.clone(),
            end_date: self.end.clone(),
            status: self.status.clone(),
            acordo: self.acordo.clone(),
            suspeita_fraude: self.suspeita.clone(),
        }
    }
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(long, default_value = "")]
    pub start: String,

    #[arg(long, default_value = "")]
    pub end: String,

    #[arg(long, default_value = "")]
    pub external_id: String,

    #[arg(long, default_value = "")]
    pub processo: String,

    #[arg(long)]
    pub result: Option<AssessmentResult>,

    #[arg(long)]
    pub reason: Option<Reason>,
}

impl SearchArgs {
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            start_date: self.start.clone(),
            end_date: self.end.clone(),
            external_id: self.external_id.clone(),
            processo: self.processo.clone(),
            assessment_result: self.result,
            reason_conclusion: self.reason,
        }
    }
}

/// Parse `column=value1,value2`.
fn parse_column_filter(s: &str) -> Result<(ColumnId, Vec<String>), String> {
    let (column, values) = s
        .split_once('=')
        .ok_or_else(|| format!("expected column=values, got '{s}'"))?;
    let column: ColumnId = column.parse().map_err(|e| format!("{e}"))?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((column, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_filter_parses() {
        let (column, values) = parse_column_filter("estado=SP, RJ").unwrap();
        assert_eq!(column, ColumnId::Estado);
        assert_eq!(values, vec!["SP", "RJ"]);
        assert!(parse_column_filter("estado").is_err());
        assert!(parse_column_filter("cor=azul").is_err());
    }

    #[test]
    fn extract_args_build_criteria() {
        let cli = Cli::try_parse_from([
            "fraudcheck",
            "extract",
            "-p",
            "0001-22.2020, 0002-33.2021",
            "--sort",
            "valor",
            "--sort",
            "valor",
            "--filter",
            "acordo=Sim",
        ])
        .unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        let criteria = args.criteria();
        assert_eq!(criteria.process_numbers, vec!["0001-22.2020", "0002-33.2021"]);
        assert_eq!(criteria.status, "Todos");
        assert!(criteria.validate().is_ok());
        assert_eq!(args.sort, vec![ColumnId::Valor, ColumnId::Valor]);
        assert_eq!(args.filters, vec![(ColumnId::Acordo, vec!["Sim".to_string()])]);
    }

    #[test]
    fn assess_parses_labels() {
        let cli = Cli::try_parse_from([
            "fraudcheck",
            "assess",
            "42",
            "--result",
            "Falso Positivo",
            "--reason",
            "falha na extração",
        ])
        .unwrap();
        let Command::Assess { result, reason, .. } = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(result, AssessmentResult::FalsoPositivo);
        assert_eq!(reason, Some(Reason::FalhaNaExtracao));
    }
}
