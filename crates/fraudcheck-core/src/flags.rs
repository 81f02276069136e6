//! Per-record flags derived from nested agreement and ledger data.
//!
//! Flags are never stored. Rendering and filtering both call [`derive_flags`]
//! so the two can never disagree about a record.

use crate::record::ProcessRecord;

pub const SIM: &str = "Sim";
pub const NAO: &str = "Não";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedFlags {
    pub has_agreement: bool,
    pub fraud_suspected: bool,
}

impl DerivedFlags {
    pub fn agreement_label(&self) -> &'static str {
        yes_no(self.has_agreement)
    }

    pub fn fraud_label(&self) -> &'static str {
        yes_no(self.fraud_suspected)
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { SIM } else { NAO }
}

/// Compute the agreement and fraud flags of a single record.
///
/// `has_agreement` holds when the record has any agreement entry or any
/// ledger line that counts as an agreement. The ledger is only walked when
/// the agreement list is empty; the result is the same either way.
/// `fraud_suspected` holds when any agreement entry is flagged.
pub fn derive_flags(record: &ProcessRecord) -> DerivedFlags {
    let has_agreement = !record.acordo.is_empty()
        || record
            .financeiro
            .as_ref()
            .is_some_and(|ledger| ledger.lancamentos.iter().any(|l| l.counts_as_agreement()));
    let fraud_suspected = record.acordo.iter().any(|a| a.fraud_suspected);

    DerivedFlags {
        has_agreement,
        fraud_suspected,
    }
}
