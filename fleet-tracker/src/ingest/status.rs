//! Delivery status derivation
//!
//! Precedence: explicit status text, then arrival evidence, then departure
//! evidence, then `Pending`.

use crate::model::VehicleStatus;

use super::normalize::parse_clock;

/// Keyword groups checked against the status column, highest priority first.
///
/// Stems rather than whole words: `cancelad` and `atrasad` also match the
/// feminine forms, and both spellings of `trânsito` are listed.
const STATUS_KEYWORDS: &[(VehicleStatus, &[&str])] = &[
    (VehicleStatus::Cancelled, &["cancelad"]),
    (VehicleStatus::Delivered, &["entregue"]),
    (VehicleStatus::Delayed, &["atrasad"]),
    (VehicleStatus::InTransit, &["transito", "trânsito"]),
];

/// Signals a row offers about where the vehicle is
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusSignals<'a> {
    pub status_text: &'a str,
    pub planned_arrival: &'a str,
    pub actual_departure: &'a str,
    pub actual_arrival: &'a str,
}

/// Map free status text onto a status, if any keyword group matches
pub fn status_from_text(text: &str) -> Option<VehicleStatus> {
    let folded = text.trim().to_lowercase();
    if folded.is_empty() {
        return None;
    }

    STATUS_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
        .map(|(status, _)| *status)
}

/// Derive the status of one trip
pub fn derive_status(signals: &StatusSignals<'_>) -> VehicleStatus {
    if let Some(status) = status_from_text(signals.status_text) {
        return status;
    }

    if !signals.actual_arrival.trim().is_empty() {
        return arrival_status(signals.planned_arrival, signals.actual_arrival);
    }

    if !signals.actual_departure.trim().is_empty() {
        return VehicleStatus::InTransit;
    }

    VehicleStatus::Pending
}

/// Arrived: late against the plan means delayed. Both clocks sit on the same
/// day; a plan that is missing or not a clock counts as on time.
fn arrival_status(planned: &str, actual: &str) -> VehicleStatus {
    match (parse_clock(planned), parse_clock(actual)) {
        (Some(planned), Some(actual)) if actual > planned => VehicleStatus::Delayed,
        _ => VehicleStatus::Delivered,
    }
}
