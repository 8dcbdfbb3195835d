//! Vehicle trip records produced by the row processor

use serde::Serialize;

/// Display value for required fields the sheet left blank
pub const NOT_AVAILABLE: &str = "N/A";

/// Destination used when no alias column names one
pub const UNKNOWN_DESTINATION: &str = "Destino Desconhecido";

/// Lifecycle state of a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Pending,
    InTransit,
    Delivered,
    Delayed,
    Cancelled,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 5] = [
        VehicleStatus::Pending,
        VehicleStatus::InTransit,
        VehicleStatus::Delivered,
        VehicleStatus::Delayed,
        VehicleStatus::Cancelled,
    ];

    /// Wire name, as used in JSON and CSV output
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Pending => "pending",
            VehicleStatus::InTransit => "in_transit",
            VehicleStatus::Delivered => "delivered",
            VehicleStatus::Delayed => "delayed",
            VehicleStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Planned and observed clock times of a trip, all `HH:MM:SS`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSchedule {
    pub planned_departure: String,
    pub planned_arrival: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_departure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_arrival: Option<String>,
}

/// One normalized trip.
///
/// Records are rebuilt from scratch on every run; `id` is only unique within
/// the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,

    // Passthrough columns, dates and times already canonicalized
    pub isa: String,
    pub data_carga: String,
    pub rota_completa: String,
    pub tipo_veiculo: String,
    #[serde(rename = "planejadoChegadaTZX")]
    pub planejado_chegada_tzx: String,
    #[serde(rename = "planejadoSaidaTZX")]
    pub planejado_saida_tzx: String,
    #[serde(rename = "planejadoChegadaFC")]
    pub planejado_chegada_fc: String,
    pub id_viagem: String,
    pub sm: String,
    pub caf: String,
    pub pallets: String,
    pub vol: String,
    pub chegada_origem: String,
    pub saida_origem: String,
    pub chegada_destino: String,
    pub finalizado: String,
    #[serde(rename = "baixaDeCAF")]
    pub baixa_de_caf: String,

    pub license_plate: String,
    pub driver_name: String,
    pub transport_company: String,
    #[serde(rename = "originFC")]
    pub origin_fc: String,
    #[serde(rename = "destinationFC")]
    pub destination_fc: String,
    pub schedule: VehicleSchedule,
    pub status: VehicleStatus,
    pub route: String,
    /// RFC 3339 time the record was normalized
    pub last_update: String,
}

impl Vehicle {
    /// `"<origin> → <destination>"`
    pub fn route_label(origin: &str, destination: &str) -> String {
        format!("{} → {}", origin, destination)
    }
}
