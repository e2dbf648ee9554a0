//! Implementation of the `annos report` sub command.

use std::{io::Write, time::Instant};

use clap::Parser;
use serde_json::Value;

use crate::{common::expand_path, pathways::Database};

use super::{classify::is_impactful, load_records, rsid_of};

/// Command line arguments for `annos report` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Report impactful SNPs from fetched annotations", long_about = None)]
pub struct Args {
    /// Path to records JSON written by `annos fetch`.
    #[arg(long, required = true)]
    pub path_input: String,
    /// Database the records were fetched for.
    #[arg(long, value_enum)]
    pub database: Database,
    /// Path to output TSV; standard output if omitted.
    #[arg(long)]
    pub path_output: Option<String>,
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReportRecord {
    pub database: Database,
    pub dbsnp_id: String,
    pub impactful: bool,
}

/// Classify each record that carries an rs identifier.
pub fn report(database: Database, records: &[Value]) -> Vec<ReportRecord> {
    records
        .iter()
        .filter_map(|record| match rsid_of(record) {
            Some(rsid) => Some(ReportRecord {
                database,
                dbsnp_id: rsid.to_string(),
                impactful: is_impactful(record),
            }),
            None => {
                tracing::warn!("skipping annotation record without rs identifier");
                None
            }
        })
        .collect()
}

/// Write the report as TSV.
fn write_report<W: Write>(writer: W, records: &[ReportRecord]) -> Result<(), anyhow::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Main entry point for `annos report` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = Instant::now();
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let records = load_records(expand_path(&args.path_input))?;
    let report = report(args.database, &records);
    tracing::info!(
        "{} of {} SNP records are impactful",
        report.iter().filter(|r| r.impactful).count(),
        report.len()
    );

    match args.path_output.as_ref() {
        Some(path_output) => write_report(
            crate::common::io::open_write_maybe_gz(expand_path(path_output))?,
            &report,
        )?,
        None => write_report(std::io::stdout().lock(), &report)?,
    }

    tracing::info!(
        "All of `annos report` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[tracing_test::traced_test]
    #[test]
    fn report_fixture() -> Result<(), anyhow::Error> {
        let mut records = load_records("tests/annos/records.json")?;
        records.push(serde_json::json!({"cadd": {"sift": {"cat": "deleterious"}}}));

        let report = report(Database::Kegg, &records);

        let mut buf = Vec::new();
        write_report(&mut buf, &report)?;
        insta::assert_snapshot!(String::from_utf8(buf)?, @r###"
        database	dbsnp_id	impactful
        kegg	rs1	true
        kegg	rs1	false
        kegg	rs2	false
        kegg	rs3	false
        kegg	rs4	true
        kegg	rs77	false
        "###);
        assert!(logs_contain("skipping annotation record without rs identifier"));

        Ok(())
    }
}
