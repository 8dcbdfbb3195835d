//! Rendering of vehicles and dashboard summaries

use std::io::Write;

use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};

use crate::ingest::{BatchResult, Diagnostic};
use crate::model::{DashboardData, Vehicle, VehicleStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

fn paint_status(status: VehicleStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        VehicleStatus::Pending => label.dimmed(),
        VehicleStatus::InTransit => label.cyan(),
        VehicleStatus::Delivered => label.green(),
        VehicleStatus::Delayed => label.yellow().bold(),
        VehicleStatus::Cancelled => label.red(),
    }
}

/// Fixed-width vehicle table
pub fn write_table<W: Write>(out: &mut W, vehicles: &[Vehicle]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<10} {:<22} {:<16} {:<26} {:>8} {:>8} {:>8} {:>8}  {}",
        "PLATE", "DRIVER", "CARRIER", "ROUTE", "PLN DEP", "PLN ARR", "DEP", "ARR", "STATUS"
    )?;

    for v in vehicles {
        writeln!(
            out,
            "{:<10} {:<22} {:<16} {:<26} {:>8} {:>8} {:>8} {:>8}  {}",
            truncate(&v.license_plate, 10),
            truncate(&v.driver_name, 22),
            truncate(&v.transport_company, 16),
            truncate(&v.route, 26),
            dash_if_empty(&v.schedule.planned_departure),
            dash_if_empty(&v.schedule.planned_arrival),
            v.schedule.actual_departure.as_deref().unwrap_or("-"),
            v.schedule.actual_arrival.as_deref().unwrap_or("-"),
            paint_status(v.status)
        )?;
    }
    Ok(())
}

/// Per-route summary table
pub fn write_summary<W: Write>(out: &mut W, dashboard: &DashboardData) -> std::io::Result<()> {
    writeln!(
        out,
        "{} vehicles, {} routes, {} active (synced {})",
        dashboard.total_vehicles.to_string().bold(),
        dashboard.routes.len(),
        dashboard.active_routes,
        dashboard.last_sync.dimmed()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<30} {:>6} {:>10} {:>10} {:>8} {:>8}",
        "ROUTE", "TOTAL", "IN TRANSIT", "DELIVERED", "DELAYED", "ON TIME"
    )?;
    for route in &dashboard.routes {
        writeln!(
            out,
            "{:<30} {:>6} {:>10} {:>10} {:>8} {:>8}",
            truncate(&route.route, 30),
            route.total_vehicles,
            route.in_transit,
            route.delivered,
            route.delayed,
            route.on_time
        )?;
    }
    Ok(())
}

/// Diagnostics trail, one line per row
pub fn write_diagnostics<W: Write>(out: &mut W, diagnostics: &[Diagnostic]) -> std::io::Result<()> {
    for d in diagnostics {
        writeln!(out, "{} {}", format!("row {}:", d.row).yellow(), d.message)?;
    }
    Ok(())
}

/// Pretty JSON of any serializable value
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize JSON output")?;
    writeln!(out)?;
    Ok(())
}

/// Flat CSV row; nested schedule fields are spread into columns
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow<'a> {
    id: &'a str,
    license_plate: &'a str,
    driver_name: &'a str,
    transport_company: &'a str,
    #[serde(rename = "originFC")]
    origin_fc: &'a str,
    #[serde(rename = "destinationFC")]
    destination_fc: &'a str,
    route: &'a str,
    planned_departure: &'a str,
    planned_arrival: &'a str,
    actual_departure: &'a str,
    actual_arrival: &'a str,
    status: &'a str,
    isa: &'a str,
    data_carga: &'a str,
    rota_completa: &'a str,
    tipo_veiculo: &'a str,
    id_viagem: &'a str,
    sm: &'a str,
    caf: &'a str,
    pallets: &'a str,
    vol: &'a str,
    chegada_destino: &'a str,
    finalizado: &'a str,
    #[serde(rename = "baixaDeCAF")]
    baixa_de_caf: &'a str,
    last_update: &'a str,
}

impl<'a> From<&'a Vehicle> for CsvRow<'a> {
    fn from(v: &'a Vehicle) -> Self {
        Self {
            id: &v.id,
            license_plate: &v.license_plate,
            driver_name: &v.driver_name,
            transport_company: &v.transport_company,
            origin_fc: &v.origin_fc,
            destination_fc: &v.destination_fc,
            route: &v.route,
            planned_departure: &v.schedule.planned_departure,
            planned_arrival: &v.schedule.planned_arrival,
            actual_departure: v.schedule.actual_departure.as_deref().unwrap_or(""),
            actual_arrival: v.schedule.actual_arrival.as_deref().unwrap_or(""),
            status: v.status.as_str(),
            isa: &v.isa,
            data_carga: &v.data_carga,
            rota_completa: &v.rota_completa,
            tipo_veiculo: &v.tipo_veiculo,
            id_viagem: &v.id_viagem,
            sm: &v.sm,
            caf: &v.caf,
            pallets: &v.pallets,
            vol: &v.vol,
            chegada_destino: &v.chegada_destino,
            finalizado: &v.finalizado,
            baixa_de_caf: &v.baixa_de_caf,
            last_update: &v.last_update,
        }
    }
}

/// Vehicles as CSV with a header row
pub fn write_csv<W: Write>(out: W, vehicles: &[Vehicle]) -> Result<()> {
    write_csv_records(out, vehicles.iter().map(CsvRow::from))
}

/// Any flat records as CSV with a header row
pub fn write_csv_records<W, T, I>(out: W, records: I) -> Result<()>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_writer(out);
    for (idx, record) in records.into_iter().enumerate() {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write CSV record {}", idx + 1))?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// One-line run summary
pub fn batch_summary(result: &BatchResult) -> String {
    let counts: Vec<String> = VehicleStatus::ALL
        .iter()
        .map(|s| format!("{} {}", result.count_by_status(*s), s))
        .collect();
    format!(
        "{} vehicles processed, {} rows skipped ({})",
        result.vehicles.len(),
        result.skipped,
        counts.join(", ")
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn dash_if_empty(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}
