use color_eyre::Result;
use serde::Serialize;

use crate::cli::{AddArgs, OutputArgs};
use crate::db::models::{DashboardRow, NewPatient};
use crate::db::{SeparationReport, SplitStore};
use crate::demo::build_demo;

const NOT_SPECIFIED: &str = "Not specified";

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn or_not_specified<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_SPECIFIED.to_string(), |value| value.to_string())
}

pub fn init(store: &SplitStore) -> Result<()> {
    if store.is_local_only() {
        println!("Personal data store ready (local-only mode, no medical store)");
    } else {
        println!("Personal and medical data stores ready");
    }
    Ok(())
}

pub async fn add(store: &SplitStore, args: AddArgs) -> Result<()> {
    let patient = NewPatient {
        full_name: args.full_name,
        phone: args.phone,
        email: args.email,
        age: args.age,
        height: args.height,
    };
    let outcome = store.add_patient(&patient).await?;

    println!("Patient added: {}", outcome.uuid);
    if outcome.medical_saved {
        println!("Medical data is now available anonymously.");
    } else {
        println!("Medical data was not saved (local-only mode).");
    }
    Ok(())
}

pub async fn list(store: &SplitStore, output: OutputArgs) -> Result<()> {
    let rows = store.list_medical().await?;
    if output.json {
        return print_json(&rows);
    }

    println!("\nAnonymized Patients");
    println!("===================");
    if rows.is_empty() {
        println!("No medical records.");
    }
    for DashboardRow {
        uuid,
        age,
        height,
        created_at,
        risk_score,
    } in rows
    {
        println!(
            "- {uuid} | age {} | height {} | risk {} | {}",
            or_not_specified(age),
            or_not_specified(height),
            risk_score.map_or_else(|| "N/A".to_string(), |score| score.to_string()),
            created_at.unwrap_or_default(),
        );
    }
    Ok(())
}

pub async fn show(store: &SplitStore, uuid: &str, output: OutputArgs) -> Result<()> {
    let detail = store.patient_detail(uuid).await?;
    if output.json {
        return print_json(&detail);
    }

    if let Some(warning) = &detail.security_warning {
        println!("WARNING: {warning}");
    }
    let row = DashboardRow::from_document(&detail.document);
    println!("\nPatient {}", row.uuid);
    println!("Age: {}", or_not_specified(row.age));
    println!("Height: {}", or_not_specified(row.height));
    println!(
        "Risk score: {}",
        row.risk_score
            .map_or_else(|| "N/A".to_string(), |score| score.to_string())
    );
    println!("Created: {}", row.created_at.unwrap_or_default());
    if let Some(updated) = detail.document.get("last_updated").and_then(|v| v.as_str()) {
        println!("Last updated: {updated}");
    }
    Ok(())
}

pub async fn contact(store: &SplitStore, uuid: &str, output: OutputArgs) -> Result<()> {
    let record = store.personal_record(uuid).await?;
    if output.json {
        return print_json(&record);
    }

    println!("\nPersonal record {} (do not display publicly)", record.uuid);
    println!("Name: {}", record.full_name);
    println!("Phone: {}", record.phone);
    println!("Email: {}", record.email);
    println!("Created: {}", record.created_at);
    Ok(())
}

pub async fn edit(store: &SplitStore, uuid: &str, age: &str, height: &str) -> Result<()> {
    store.update_medical(uuid, age, height).await?;
    println!("Medical data updated for {uuid}");
    Ok(())
}

pub async fn delete(store: &SplitStore, uuid: &str) -> Result<()> {
    let outcome = store.delete_patient(uuid).await?;
    println!(
        "Personal data {}; medical data {}",
        if outcome.personal_removed { "deleted" } else { "not found" },
        if outcome.medical_removed { "deleted" } else { "not found" },
    );
    Ok(())
}

pub async fn export(store: &SplitStore) -> Result<()> {
    print_json(&store.export_medical().await?)
}

pub async fn verify(store: &SplitStore, output: OutputArgs) -> Result<()> {
    let report = store.verify_separation().await?;
    if output.json {
        print_json(&VerifySummary::from(&report))?;
        return Ok(());
    }
    print!("{}", render_report(&report));
    Ok(())
}

pub fn demo(weeks: usize, seed: Option<u64>) -> Result<()> {
    print_json(&build_demo(weeks, seed)?)
}

/// Summary plus full findings, as emitted by `verify --json`.
#[derive(Debug, Serialize)]
pub struct VerifySummary<'a> {
    pub sqlite_patients: usize,
    pub medical_records: usize,
    pub medical_in_sqlite: bool,
    pub personal_in_medical: bool,
    pub linkage_issues: bool,
    pub details: &'a SeparationReport,
}

impl<'a> From<&'a SeparationReport> for VerifySummary<'a> {
    fn from(report: &'a SeparationReport) -> Self {
        Self {
            sqlite_patients: report.local_patients,
            medical_records: report.medical_records,
            medical_in_sqlite: report.medical_in_local(),
            personal_in_medical: report.personal_in_medical(),
            linkage_issues: report.linkage_issues(),
            details: report,
        }
    }
}

fn push_sample(out: &mut String, ids: &[String]) {
    use std::fmt::Write as _;
    for id in ids.iter().take(3) {
        let _ = writeln!(out, "     - {id}");
    }
    if ids.len() > 3 {
        let _ = writeln!(out, "     ... and {} more", ids.len() - 3);
    }
}

pub fn render_report(report: &SeparationReport) -> String {
    use std::fmt::Write as _;
    let mut out = String::new();

    let _ = writeln!(out, "\nData Separation Verification");
    let _ = writeln!(out, "============================");
    let _ = writeln!(out, "\n1. Local personal store");
    let _ = writeln!(out, "   {} patients", report.local_patients);
    if report.medical_in_local() {
        let _ = writeln!(
            out,
            "   WARNING: medical columns in personal table: {}",
            report.medical_columns_in_local.join(", ")
        );
    } else {
        let _ = writeln!(out, "   OK: no medical columns");
    }

    let _ = writeln!(out, "\n2. Medical store");
    if !report.medical_checked {
        let _ = writeln!(out, "   Not configured, running in local-only mode");
        return out;
    }
    let _ = writeln!(out, "   {} medical records", report.medical_records);
    if report.personal_in_medical() {
        let _ = writeln!(
            out,
            "   BREACH: personal fields found: {}",
            report.personal_fields_in_medical.join(", ")
        );
    } else {
        let _ = writeln!(out, "   OK: no personal data");
    }
    if !report.documents_missing_uuid.is_empty() {
        let _ = writeln!(out, "   WARNING: documents missing uuid:");
        push_sample(&mut out, &report.documents_missing_uuid);
    }
    if !report.malformed_uuids.is_empty() {
        let _ = writeln!(out, "   WARNING: suspicious uuid format:");
        push_sample(&mut out, &report.malformed_uuids);
    }
    if !report.documents_without_medical_data.is_empty() {
        let _ = writeln!(out, "   WARNING: documents without medical data:");
        push_sample(&mut out, &report.documents_without_medical_data);
    }

    let _ = writeln!(out, "\n3. Linkage");
    if !report.local_only.is_empty() {
        let _ = writeln!(
            out,
            "   {} patients without medical records",
            report.local_only.len()
        );
        push_sample(&mut out, &report.local_only);
    }
    if !report.medical_only.is_empty() {
        let _ = writeln!(
            out,
            "   {} medical records without patients",
            report.medical_only.len()
        );
        push_sample(&mut out, &report.medical_only);
    }
    let _ = writeln!(out, "   {} patients linked", report.linked);
    if report.linkage_issues() {
        let _ = writeln!(out, "   Some linkage issues found");
    } else {
        let _ = writeln!(out, "   All patients properly linked");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_only_report_stops_after_personal_store() {
        let report = SeparationReport {
            local_patients: 2,
            ..SeparationReport::default()
        };
        let text = render_report(&report);
        assert!(text.contains("2 patients"));
        assert!(text.contains("local-only mode"));
        assert!(!text.contains("Linkage"));
    }

    #[test]
    fn orphan_samples_are_truncated() {
        let report = SeparationReport {
            medical_checked: true,
            local_only: (0..5).map(|i| format!("id-{i}")).collect(),
            ..SeparationReport::default()
        };
        let text = render_report(&report);
        assert!(text.contains("5 patients without medical records"));
        assert!(text.contains("id-2"));
        assert!(!text.contains("id-3"));
        assert!(text.contains("... and 2 more"));
        assert!(text.contains("Some linkage issues found"));
    }

    #[test]
    fn summary_flags_follow_report() {
        let report = SeparationReport {
            medical_checked: true,
            personal_fields_in_medical: vec!["email".into()],
            ..SeparationReport::default()
        };
        let value = serde_json::to_value(VerifySummary::from(&report)).unwrap();
        assert_eq!(value["personal_in_medical"], true);
        assert_eq!(value["medical_in_sqlite"], false);
        assert_eq!(value["details"]["personal_fields_in_medical"][0], "email");
    }
}
