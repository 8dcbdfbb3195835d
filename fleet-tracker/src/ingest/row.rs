//! Untyped source rows and the column names they are read by

use std::collections::HashMap;

use super::cell::CellValue;

/// Header names of the trip sheet
pub mod cols {
    pub const CARRIER: &str = "Transportadora";
    pub const PLATE: &str = "Placa";
    pub const DRIVER: &str = "Motorista";
    pub const ISA: &str = "ISA";
    pub const LOAD_DATE: &str = "Data da Carga";
    pub const FULL_ROUTE: &str = "Rota Completa";
    pub const VEHICLE_TYPE: &str = "Tipo de Veículo";
    pub const PLANNED_ARRIVAL_TZX: &str = "Planejado Chegada TZX";
    pub const PLANNED_DEPARTURE_TZX: &str = "Planejado Saída TZX";
    pub const TRIP_ID: &str = "ID Viagem";
    pub const SM: &str = "SM";
    pub const CAF: &str = "CAF";
    pub const PALLETS: &str = "Pallets";
    pub const VOLUME: &str = "Vol";
    pub const ORIGIN_ARRIVAL: &str = "Chegada Origem";
    pub const ORIGIN_DEPARTURE: &str = "Saída Origem";
    pub const DESTINATION_ARRIVAL: &str = "Chegada Destino";
    pub const FINISHED: &str = "Finalizado";
    pub const CAF_CLEARANCE: &str = "Baixa de CAF";
    pub const STATUS: &str = "Status";

    /// Columns that may carry the destination facility, in probe order
    pub const DESTINATION_ALIASES: &[&str] = &[
        "FC Destino",
        "Planejado Chegada FC",
        "Destino FC",
        "Chegada Destino",
        "destinationFC",
    ];
}

/// One sheet row keyed by header name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, CellValue>,
    /// 1-based row number in the sheet, when the row came from one
    line: Option<usize>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the row with its 1-based sheet row number
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Cell under `column`; absent columns read as `Empty`
    pub fn get(&self, column: &str) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    /// Trimmed text of a column, empty when absent
    pub fn text(&self, column: &str) -> String {
        self.get(column).to_trimmed_string()
    }

    /// First column of `candidates` holding a present value
    pub fn first_present<'a>(&'a self, candidates: &[&'a str]) -> Option<(&'a str, &'a CellValue)> {
        candidates
            .iter()
            .map(|name| (*name, self.get(name)))
            .find(|(_, cell)| cell.is_present())
    }

    /// True when every cell is blank
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
            line: None,
        }
    }
}
