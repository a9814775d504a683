//! Extended Producer Responsibility reporting.
//!
//! Pure computation over pages of suppliers, ledger entries, and
//! transactions already fetched from the store. Nothing here touches the
//! database, which keeps the business rules unit-testable.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::db::{LedgerEntry, Supplier, Transaction};

/// The six canonical regulatory waste streams.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stream {
    Plastic,
    PaperPackaging,
    Glass,
    Metals,
    Electrical,
    Other,
}

impl Stream {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Plastic => "Plastic",
            Self::PaperPackaging => "Paper & Packaging",
            Self::Glass => "Glass",
            Self::Metals => "Metals",
            Self::Electrical => "Electrical & Electronic",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword sets in precedence order. First match wins, so a label carrying
/// both "plastic" and "glass" lands in Plastic. Historical records were
/// classified under this exact ordering; do not reorder.
const CLASSIFICATION_RULES: &[(Stream, &[&str])] = &[
    (Stream::Plastic, &["plastic", "pet"]),
    (Stream::PaperPackaging, &["paper", "cardboard"]),
    (Stream::Glass, &["glass"]),
    (Stream::Metals, &["copper", "aluminum", "steel", "metal"]),
    (Stream::Electrical, &["electronic", "weee", "battery"]),
];

/// Classify a free-text material label into its regulatory stream.
/// Case-insensitive substring matching; unmatched labels fall to `Other`.
#[must_use]
pub fn classify_material(material_type: &str) -> Stream {
    let label = material_type.to_lowercase();
    for (stream, keywords) in CLASSIFICATION_RULES {
        if keywords.iter().any(|k| label.contains(k)) {
            return *stream;
        }
    }
    Stream::Other
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct StreamTotals {
    pub weight: f64,
    pub fees: f64,
}

#[derive(Debug, Serialize)]
pub struct EprReport {
    pub compliance_pct: f64,
    pub total_fees: f64,
    pub supplier_count: usize,
    pub weee_compliant_count: usize,
    /// Stream label -> accumulated weight/fees, stable ordering.
    pub streams: BTreeMap<String, StreamTotals>,
}

impl EprReport {
    /// Build the compliance report from one page of each collection.
    ///
    /// Transactions join to ledger entries through `ledger_entry_id`. A
    /// transaction whose entry is missing from the fetched page still counts
    /// toward `total_fees` but lands in no stream bucket; referential gaps
    /// are tolerated, not reported.
    #[must_use]
    pub fn compute(
        suppliers: &[Supplier],
        entries: &[LedgerEntry],
        transactions: &[Transaction],
    ) -> Self {
        let weee_compliant_count = suppliers.iter().filter(|s| s.is_weee_compliant).count();
        let compliance_pct = percentage(weee_compliant_count, suppliers.len());

        let by_id: HashMap<&str, &LedgerEntry> =
            entries.iter().map(|e| (e.id.as_str(), e)).collect();

        let mut total_fees = 0.0;
        let mut streams: BTreeMap<String, StreamTotals> = BTreeMap::new();

        for tx in transactions {
            total_fees += tx.epr_fee;

            if let Some(entry) = by_id.get(tx.ledger_entry_id.as_str()) {
                let stream = classify_material(&entry.material_type);
                let bucket = streams.entry(stream.label().to_string()).or_default();
                bucket.weight += entry.weight_kg;
                bucket.fees += tx.epr_fee;
            }
        }

        Self {
            compliance_pct,
            total_fees,
            supplier_count: suppliers.len(),
            weee_compliant_count,
            streams,
        }
    }

    /// Render the report as a structured audit document. Each export mints a
    /// fresh opaque audit identifier; the report data itself is unchanged.
    pub fn to_audit_xml(&self) -> anyhow::Result<String> {
        let doc = AuditDocument {
            audit_id: uuid::Uuid::new_v4().simple().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            compliance_pct: self.compliance_pct,
            total_fees: self.total_fees,
            streams: AuditStreams {
                stream: self
                    .streams
                    .iter()
                    .map(|(name, totals)| AuditStream {
                        name: name.clone(),
                        weight: totals.weight,
                        fees: totals.fees,
                    })
                    .collect(),
            },
        };

        let body = quick_xml::se::to_string(&doc)?;
        Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>{body}"))
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Serialize)]
#[serde(rename = "epr_audit")]
struct AuditDocument {
    #[serde(rename = "@audit_id")]
    audit_id: String,
    #[serde(rename = "@generated_at")]
    generated_at: String,
    compliance_pct: f64,
    total_fees: f64,
    streams: AuditStreams,
}

#[derive(Serialize)]
struct AuditStreams {
    stream: Vec<AuditStream>,
}

#[derive(Serialize)]
struct AuditStream {
    #[serde(rename = "@name")]
    name: String,
    weight: f64,
    fees: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier(id: &str, compliant: bool) -> Supplier {
        Supplier {
            id: id.to_string(),
            name: format!("Supplier {id}"),
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            epr_number: None,
            is_weee_compliant: compliant,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn entry(id: &str, material: &str, weight: f64) -> LedgerEntry {
        LedgerEntry {
            id: id.to_string(),
            supplier_id: "s1".to_string(),
            material_type: material.to_string(),
            weight_kg: weight,
            capture_timestamp: "2026-01-01T00:00:00Z".to_string(),
            is_synced: true,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn tx(id: &str, entry_id: &str, fee: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            ledger_entry_id: entry_id.to_string(),
            amount: 100.0,
            currency: "GBP".to_string(),
            transaction_timestamp: "2026-01-01T00:00:00Z".to_string(),
            epr_fee: fee,
            is_synced: true,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn plastic_wins_over_glass_in_mixed_labels() {
        assert_eq!(classify_material("plastic-glass laminate"), Stream::Plastic);
    }

    #[test]
    fn pet_counts_as_plastic() {
        assert_eq!(classify_material("PET bottles"), Stream::Plastic);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify_material("GLASS jars"), Stream::Glass);
        assert_eq!(classify_material("Copper wire"), Stream::Metals);
        assert_eq!(classify_material("WEEE pallet"), Stream::Electrical);
        assert_eq!(classify_material("Cardboard bales"), Stream::PaperPackaging);
    }

    #[test]
    fn unknown_labels_fall_to_other() {
        assert_eq!(classify_material("unknown debris"), Stream::Other);
    }

    #[test]
    fn report_joins_transactions_to_streams() {
        let suppliers = vec![supplier("s1", true), supplier("s2", false)];
        let entries = vec![entry("e1", "Copper wire", 12.5)];
        let transactions = vec![tx("t1", "e1", 4.0)];

        let report = EprReport::compute(&suppliers, &entries, &transactions);

        assert!((report.compliance_pct - 50.0).abs() < f64::EPSILON);
        assert!((report.total_fees - 4.0).abs() < f64::EPSILON);
        let metals = &report.streams["Metals"];
        assert!((metals.weight - 12.5).abs() < f64::EPSILON);
        assert!((metals.fees - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dangling_transaction_counts_in_fees_but_no_bucket() {
        let entries = vec![entry("e1", "glass cullet", 3.0)];
        let transactions = vec![tx("t1", "e1", 1.0), tx("t2", "missing", 2.5)];

        let report = EprReport::compute(&[], &entries, &transactions);

        assert!((report.total_fees - 3.5).abs() < f64::EPSILON);
        let total_bucket_fees: f64 = report.streams.values().map(|s| s.fees).sum();
        assert!((total_bucket_fees - 1.0).abs() < f64::EPSILON);
        assert!(report.streams.contains_key("Glass"));
    }

    #[test]
    fn empty_collections_produce_zeroed_report() {
        let report = EprReport::compute(&[], &[], &[]);
        assert!((report.compliance_pct).abs() < f64::EPSILON);
        assert!((report.total_fees).abs() < f64::EPSILON);
        assert!(report.streams.is_empty());
    }

    #[test]
    fn audit_xml_carries_streams_and_fresh_id() {
        let suppliers = vec![supplier("s1", true)];
        let entries = vec![entry("e1", "steel offcuts", 8.0)];
        let transactions = vec![tx("t1", "e1", 2.0)];
        let report = EprReport::compute(&suppliers, &entries, &transactions);

        let xml = report.to_audit_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("audit_id=\""));
        assert!(xml.contains("<stream name=\"Metals\""));
        assert!(xml.contains("<weight>8"));

        let again = report.to_audit_xml().unwrap();
        assert_ne!(xml, again, "each export mints a new audit id");
    }
}
