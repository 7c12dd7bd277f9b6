//! Demographic enrichment.
//!
//! `EnrichmentSource` is an enum over data sources that can supply
//! demographic/contact fields for a table row. Today there is one variant,
//! [`SyntheticDemographics`], which derives values purely from row position
//! and performs no I/O. Adding a real provider = new variant + new arm in
//! [`EnrichmentSource::fields`]; prompt construction never sees the difference.

use tracing::debug;

use crate::data::{RecordTable, Value};
use crate::error::AppError;

pub const MEDIAN_INCOME: &str = "MedianIncome";
pub const OWNER_OCCUPIED_PERCENT: &str = "OwnerOccupiedPercent";
pub const EMAIL_CONTACTS: &str = "EmailContacts";

/// Index-only synthetic generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticDemographics;

impl SyntheticDemographics {
    pub fn median_income(i: usize) -> i64 {
        65_000 + ((i as i64) * 1_000) % 20_000
    }

    pub fn owner_occupied_percent(i: usize) -> i64 {
        60 + ((i as i64) * 3) % 40
    }

    pub fn email_contacts(i: usize) -> i64 {
        2 + (i as i64) % 4
    }
}

#[derive(Debug, Clone, Default)]
pub enum EnrichmentSource {
    #[default]
    Synthetic,
}

impl EnrichmentSource {
    /// Human-readable note on where the data comes from, shown next to
    /// enriched output.
    pub fn notice(&self) -> &'static str {
        match self {
            EnrichmentSource::Synthetic => {
                "Enrichment values are simulated: demographics, income and ownership \
                 profiles are generated from row position, not pulled from a third party."
            }
        }
    }

    /// Enrichment columns for the row at zero-based position `i`.
    pub fn fields(&self, i: usize) -> [(&'static str, Value); 3] {
        match self {
            EnrichmentSource::Synthetic => [
                (MEDIAN_INCOME, Value::Int(SyntheticDemographics::median_income(i))),
                (OWNER_OCCUPIED_PERCENT, Value::Int(SyntheticDemographics::owner_occupied_percent(i))),
                (EMAIL_CONTACTS, Value::Int(SyntheticDemographics::email_contacts(i))),
            ],
        }
    }

    /// Return `table` with the enrichment columns added, or unchanged when
    /// `enabled` is false. Existing enrichment columns are overwritten, so
    /// applying twice equals applying once.
    pub fn enrich(&self, mut table: RecordTable, enabled: bool) -> Result<RecordTable, AppError> {
        if !enabled {
            return Ok(table);
        }

        let mut income = Vec::with_capacity(table.len());
        let mut owner = Vec::with_capacity(table.len());
        let mut email = Vec::with_capacity(table.len());
        for i in 0..table.len() {
            let [(_, a), (_, b), (_, c)] = self.fields(i);
            income.push(a);
            owner.push(b);
            email.push(c);
        }

        table.set_column(MEDIAN_INCOME, income)?;
        table.set_column(OWNER_OCCUPIED_PERCENT, owner)?;
        table.set_column(EMAIL_CONTACTS, email)?;
        debug!(rows = table.len(), source = ?self, "table enriched");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::table;

    fn sample(n: usize) -> RecordTable {
        let mut t = RecordTable::new(vec!["Account".into(), "Region".into()]);
        for i in 0..n {
            t.push_row(vec![Value::Text(format!("acct-{i}")), Value::from("North")]).unwrap();
        }
        t
    }

    #[test]
    fn formulas_match_for_many_indices() {
        for i in 0..500usize {
            let ii = i as i64;
            assert_eq!(SyntheticDemographics::median_income(i), 65000 + (ii * 1000) % 20000);
            assert_eq!(SyntheticDemographics::owner_occupied_percent(i), 60 + (ii * 3) % 40);
            assert_eq!(SyntheticDemographics::email_contacts(i), 2 + ii % 4);
        }
    }

    #[test]
    fn known_values() {
        assert_eq!(SyntheticDemographics::median_income(0), 65000);
        assert_eq!(SyntheticDemographics::median_income(19), 84000);
        assert_eq!(SyntheticDemographics::median_income(20), 65000);
        assert_eq!(SyntheticDemographics::owner_occupied_percent(14), 62);
        assert_eq!(SyntheticDemographics::email_contacts(7), 5);
    }

    #[test]
    fn enrich_appends_three_columns_per_row() {
        let out = EnrichmentSource::Synthetic.enrich(sample(25), true).unwrap();
        assert_eq!(out.len(), 25);
        assert_eq!(
            out.columns(),
            &["Account", "Region", MEDIAN_INCOME, OWNER_OCCUPIED_PERCENT, EMAIL_CONTACTS]
        );
        assert_eq!(out.get(3, MEDIAN_INCOME), Some(&Value::Int(68000)));
        assert_eq!(out.get(3, OWNER_OCCUPIED_PERCENT), Some(&Value::Int(69)));
        assert_eq!(out.get(3, EMAIL_CONTACTS), Some(&Value::Int(5)));
        assert_eq!(out.get(3, "Account"), Some(&Value::Text("acct-3".into())));
    }

    #[test]
    fn enrich_is_idempotent() {
        let once = EnrichmentSource::Synthetic.enrich(sample(12), true).unwrap();
        let twice = EnrichmentSource::Synthetic.enrich(once.clone(), true).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn disabled_is_identity() {
        let input = table(&["Stage", "Value"], &[&["Won", "10"], &["Lost", ""]]);
        let out = EnrichmentSource::Synthetic.enrich(input.clone(), false).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn empty_table_enriches_to_empty() {
        let out = EnrichmentSource::Synthetic.enrich(sample(0), true).unwrap();
        assert!(out.is_empty());
        assert!(out.has_column(EMAIL_CONTACTS));
    }
}
