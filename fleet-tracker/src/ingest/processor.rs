//! Row processor - turns raw sheet rows into vehicle records
//!
//! Each row is handled on its own: a bad row is skipped with a diagnostic and
//! never aborts the batch. Only an unknown carrier code or a row that cannot
//! be read at all drops a row; missing display fields fall back to `N/A`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{NOT_AVAILABLE, UNKNOWN_DESTINATION, Vehicle, VehicleSchedule, VehicleStatus};
use crate::reference::ReferenceData;

use super::cell::{CellValue, format_number};
use super::normalize::{decode_serial, normalize_date, normalize_time};
use super::row::{RawRow, cols};
use super::status::{StatusSignals, derive_status};

/// Origin facility code used when the reference tables name none
pub const DEFAULT_ORIGIN: &str = "TZX";

/// Why a row produced no vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Carrier code present but not in the reference table
    UnknownCarrier { code: String },
    /// The row could not be turned into a record
    RowProcessingFailure { message: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnknownCarrier { code } => {
                write!(f, "carrier '{}' not found", code)
            }
            SkipReason::RowProcessingFailure { message } => {
                write!(f, "processing failed: {}", message)
            }
        }
    }
}

/// Error building a record from a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The row carries no cells at all
    NoCells,
    /// Every cell of the row is blank
    BlankRow,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::NoCells => write!(f, "row has no cells"),
            RowError::BlankRow => write!(f, "row is blank"),
        }
    }
}

impl std::error::Error for RowError {}

/// Result of processing a single row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Emitted(Box<Vehicle>),
    Skipped(SkipReason),
}

/// Kind of a per-row diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Plate, driver, or carrier missing; the row was still emitted
    MissingRequired,
    /// The row was dropped
    Skipped,
}

/// Something worth telling the operator about one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based sheet row (the header is row 1)
    pub row: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Output of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub vehicles: Vec<Vehicle>,
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchResult {
    /// Number of rows that went in
    pub fn rows_seen(&self) -> usize {
        self.vehicles.len() + self.skipped
    }

    pub fn count_by_status(&self, status: VehicleStatus) -> usize {
        self.vehicles.iter().filter(|v| v.status == status).count()
    }
}

/// Sheet row number shown to operators.
///
/// Rows decoded from a sheet carry their own line. Rows built elsewhere fall
/// back to their position: `index` is 0-based with the header excluded.
pub fn display_row(index: usize, row: &RawRow) -> usize {
    row.line().unwrap_or(index + 2)
}

/// Converts raw rows into vehicles against a fixed set of reference tables
pub struct RowProcessor<'a> {
    reference: &'a ReferenceData,
    origin: String,
    generated_at: DateTime<Utc>,
}

impl<'a> RowProcessor<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self::at(reference, Utc::now())
    }

    /// Processor whose records are stamped with `generated_at`
    pub fn at(reference: &'a ReferenceData, generated_at: DateTime<Utc>) -> Self {
        let origin = reference
            .origin()
            .map(|f| f.code.clone())
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Self {
            reference,
            origin,
            generated_at,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Process every row, in order
    pub fn process_batch(&self, rows: &[RawRow]) -> BatchResult {
        let mut result = BatchResult::default();

        for (index, row) in rows.iter().enumerate() {
            match self.process_row(index, row, &mut result.diagnostics) {
                RowOutcome::Emitted(vehicle) => result.vehicles.push(*vehicle),
                RowOutcome::Skipped(_) => result.skipped += 1,
            }
        }

        log::info!(
            "Processing finished: {} rows, {} vehicles processed, {} rows skipped",
            result.rows_seen(),
            result.vehicles.len(),
            result.skipped
        );
        result
    }

    /// Process the row at `index` (0-based position in the batch).
    ///
    /// Warnings and skips are appended to `diagnostics`, numbered by sheet row.
    pub fn process_row(
        &self,
        index: usize,
        row: &RawRow,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> RowOutcome {
        let line = display_row(index, row);

        let outcome = match self.build_vehicle(index, row, diagnostics) {
            Ok(Some(vehicle)) => RowOutcome::Emitted(Box::new(vehicle)),
            Ok(None) => {
                let code = row.text(cols::CARRIER);
                log::warn!("Row {} skipped: carrier '{}' not found", line, code);
                RowOutcome::Skipped(SkipReason::UnknownCarrier { code })
            }
            Err(err) => {
                log::error!("Error processing row {}: {}", line, err);
                RowOutcome::Skipped(SkipReason::RowProcessingFailure {
                    message: err.to_string(),
                })
            }
        };

        if let RowOutcome::Skipped(reason) = &outcome {
            diagnostics.push(Diagnostic {
                row: line,
                kind: DiagnosticKind::Skipped,
                message: reason.to_string(),
            });
        }

        outcome
    }

    /// `Ok(None)` when the carrier gate rejects the row
    fn build_vehicle(
        &self,
        index: usize,
        row: &RawRow,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<Vehicle>, RowError> {
        if row.is_empty() {
            return Err(RowError::NoCells);
        }
        if row.is_blank() {
            return Err(RowError::BlankRow);
        }

        let line = display_row(index, row);

        let carrier = row.text(cols::CARRIER);
        let plate = row.text(cols::PLATE);
        let driver = row.text(cols::DRIVER);

        if carrier.is_empty() || plate.is_empty() || driver.is_empty() {
            let message = format!(
                "missing required data - carrier: '{}', plate: '{}', driver: '{}'",
                carrier, plate, driver
            );
            log::warn!("Row {} {}", line, message);
            diagnostics.push(Diagnostic {
                row: line,
                kind: DiagnosticKind::MissingRequired,
                message,
            });
        }

        // Empty carrier passes; only a code we don't know drops the row
        if !carrier.is_empty() && self.reference.find_carrier(&carrier).is_none() {
            return Ok(None);
        }

        let destination = extract_destination(row, line);

        if let Some(known) = self.reference.find_carrier(&carrier) {
            if self.reference.find_facility(&destination).is_some() && !known.serves(&destination) {
                log::debug!(
                    "Row {}: carrier '{}' is not listed for facility '{}'",
                    line,
                    known.code,
                    destination
                );
            }
        }

        let planned_arrival = normalize_time(row.get(cols::PLANNED_ARRIVAL_TZX));
        let planned_departure = normalize_time(row.get(cols::PLANNED_DEPARTURE_TZX));
        let origin_arrival = normalize_time(row.get(cols::ORIGIN_ARRIVAL));
        let origin_departure = normalize_time(row.get(cols::ORIGIN_DEPARTURE));
        let status_text = row.text(cols::STATUS);

        let status = derive_status(&StatusSignals {
            status_text: &status_text,
            planned_arrival: &planned_arrival,
            actual_departure: &origin_departure,
            actual_arrival: &origin_arrival,
        });

        let id = format!(
            "{}-{}-{}",
            if plate.is_empty() { "unknown" } else { plate.as_str() },
            self.generated_at.timestamp_millis(),
            index
        );

        Ok(Some(Vehicle {
            id,
            isa: row.text(cols::ISA),
            data_carga: normalize_date(row.get(cols::LOAD_DATE)),
            rota_completa: row.text(cols::FULL_ROUTE),
            tipo_veiculo: row.text(cols::VEHICLE_TYPE),
            planejado_chegada_tzx: planned_arrival.clone(),
            planejado_saida_tzx: planned_departure.clone(),
            planejado_chegada_fc: destination.clone(),
            id_viagem: row.text(cols::TRIP_ID),
            sm: row.text(cols::SM),
            caf: row.text(cols::CAF),
            pallets: row.text(cols::PALLETS),
            vol: row.text(cols::VOLUME),
            chegada_origem: origin_arrival.clone(),
            saida_origem: origin_departure.clone(),
            chegada_destino: normalize_date(row.get(cols::DESTINATION_ARRIVAL)),
            finalizado: normalize_date(row.get(cols::FINISHED)),
            baixa_de_caf: row.text(cols::CAF_CLEARANCE),
            license_plate: or_not_available(plate),
            driver_name: or_not_available(driver),
            transport_company: or_not_available(carrier),
            origin_fc: self.origin.clone(),
            route: Vehicle::route_label(&self.origin, &destination),
            destination_fc: destination,
            schedule: VehicleSchedule {
                planned_departure,
                planned_arrival,
                actual_departure: non_empty(origin_departure),
                actual_arrival: non_empty(origin_arrival),
            },
            status,
            last_update: self.generated_at.to_rfc3339(),
        }))
    }
}

/// Destination facility from the first alias column that holds a value.
///
/// Numeric hits are date serials by the sheet's convention and render as
/// `YYYY-MM-DD`; a serial that does not decode keeps its number.
fn extract_destination(row: &RawRow, line: usize) -> String {
    let destination = match row.first_present(cols::DESTINATION_ALIASES) {
        Some((column, CellValue::Numeric(n))) => {
            log::debug!(
                "Row {}: numeric destination {} in column '{}'",
                line,
                format_number(*n),
                column
            );
            decode_serial(*n)
                .map(|dt| dt.to_iso_date())
                .unwrap_or_else(|| format_number(*n))
        }
        Some((_, cell)) => cell.to_trimmed_string(),
        None => String::new(),
    };

    if destination.is_empty() {
        UNKNOWN_DESTINATION.to_string()
    } else {
        destination
    }
}

fn or_not_available(value: String) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
