//! Sync command handler

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;

use super::SyncCommands;
use crate::config::Config;
use crate::ingest::{BatchResult, RowProcessor};
use crate::model::DashboardData;
use crate::output::{
    OutputFormat, batch_summary, write_csv, write_csv_records, write_diagnostics, write_json,
    write_summary, write_table,
};
use crate::reference::ReferenceData;
use crate::source::{HttpSettings, Source, load_sheet};

/// Fetch, decode and process the workbook once
pub async fn run_pipeline(
    source: &Source,
    settings: &HttpSettings,
    reference: &ReferenceData,
) -> Result<BatchResult> {
    let sheet = load_sheet(source, settings)
        .await
        .with_context(|| format!("Failed to fetch spreadsheet data from {}", source))?;

    log::info!("Raw data rows: {}", sheet.rows.len());

    Ok(RowProcessor::new(reference).process_batch(&sheet.rows))
}

fn load_reference(path: Option<&Path>) -> Result<ReferenceData> {
    match path {
        Some(path) => ReferenceData::from_toml_file(path)
            .with_context(|| format!("Failed to load reference data from {}", path.display())),
        None => Ok(ReferenceData::builtin()),
    }
}

/// Handle the sync command
pub async fn handle_sync_command(args: SyncCommands, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;

    if args.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let source = args.source.resolve(&config)?;
    let reference_path = args.reference.clone().or_else(|| config.reference.path.clone());
    let reference = load_reference(reference_path.as_deref())?;

    let start = Instant::now();
    let result = run_pipeline(&source, &config.source.http_settings(), &reference).await?;
    log::info!("Sync completed in {:?}", start.elapsed());

    let mut err = std::io::stderr().lock();
    if args.diagnostics {
        write_diagnostics(&mut err, &result.diagnostics)?;
    }
    writeln!(err, "{}", batch_summary(&result).dimmed())?;

    let format = args.format.unwrap_or(config.output.format);
    let mut out = std::io::stdout().lock();

    if args.summary {
        let dashboard = DashboardData::build(result.vehicles);
        match format {
            OutputFormat::Table => write_summary(&mut out, &dashboard)?,
            OutputFormat::Json => write_json(&mut out, &dashboard)?,
            OutputFormat::Csv => write_csv_records(&mut out, &dashboard.routes)?,
        }
    } else {
        match format {
            OutputFormat::Table => write_table(&mut out, &result.vehicles)?,
            OutputFormat::Json => write_json(&mut out, &result)?,
            OutputFormat::Csv => write_csv(&mut out, &result.vehicles)?,
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::cols;
    use crate::model::VehicleStatus;
    use rust_xlsxwriter::Workbook;

    #[tokio::test]
    async fn test_run_pipeline_from_file() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = [
            cols::CARRIER,
            cols::PLATE,
            cols::DRIVER,
            "FC Destino",
            cols::PLANNED_ARRIVAL_TZX,
            cols::ORIGIN_ARRIVAL,
            cols::STATUS,
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        let rows = [
            ["GARBERG", "ABC1D23", "Ana", "GR8", "10:00", "10:05", ""],
            ["innovation", "DEF4G56", "Rui", "GR9", "10:00", "09:55", ""],
            ["UNKNOWN_CO", "HIJ7K89", "Lia", "XC9", "", "", ""],
            ["", "", "", "", "", "", "Cancelado"],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32 + 1, c as u16, *value).unwrap();
                }
            }
        }
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        workbook.save(file.path()).unwrap();

        let source = Source::File(file.path().to_path_buf());
        let result = run_pipeline(&source, &HttpSettings::default(), &ReferenceData::builtin())
            .await
            .unwrap();

        assert_eq!(result.vehicles.len(), 3);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.vehicles[0].status, VehicleStatus::Delayed);
        assert_eq!(result.vehicles[1].status, VehicleStatus::Delivered);
        assert_eq!(result.vehicles[2].status, VehicleStatus::Cancelled);
        assert_eq!(result.vehicles[2].license_plate, "N/A");
        assert_eq!(result.vehicles[2].destination_fc, "Destino Desconhecido");

        let skipped = result
            .diagnostics
            .iter()
            .find(|d| d.message.contains("UNKNOWN_CO"))
            .unwrap();
        assert_eq!(skipped.row, 4);
    }

    #[tokio::test]
    async fn test_diagnostic_rows_survive_blank_lines() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, cols::CARRIER).unwrap();
        sheet.write_string(0, 1, cols::PLATE).unwrap();
        sheet.write_string(1, 0, "GARBERG").unwrap();
        sheet.write_string(1, 1, "ABC1D23").unwrap();
        // Sheet row 3 is blank
        sheet.write_string(3, 0, "UNKNOWN_CO").unwrap();
        sheet.write_string(3, 1, "DEF4G56").unwrap();
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        workbook.save(file.path()).unwrap();

        let source = Source::File(file.path().to_path_buf());
        let result = run_pipeline(&source, &HttpSettings::default(), &ReferenceData::builtin())
            .await
            .unwrap();

        assert_eq!(result.vehicles.len(), 1);
        assert_eq!(result.skipped, 1);
        let skipped = result
            .diagnostics
            .iter()
            .find(|d| d.message.contains("UNKNOWN_CO"))
            .unwrap();
        assert_eq!(skipped.row, 4);
    }

    #[tokio::test]
    async fn test_run_pipeline_missing_file() {
        let source = Source::File("/nonexistent/trips.xlsx".into());
        let err = run_pipeline(&source, &HttpSettings::default(), &ReferenceData::builtin())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to fetch spreadsheet data"));
    }

    #[test]
    fn test_load_reference_defaults_to_builtin() {
        assert_eq!(load_reference(None).unwrap(), ReferenceData::builtin());
        assert!(load_reference(Some(Path::new("/nonexistent/ref.toml"))).is_err());
    }
}
