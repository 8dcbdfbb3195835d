//! Raw spreadsheet cell representation

use calamine::Data;

/// A single cell as it arrives from the workbook, before normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or blank cell
    #[default]
    Empty,
    /// Human-entered text
    Text(String),
    /// Plain number or a native date serial
    Numeric(f64),
}

impl CellValue {
    /// Build a text cell
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// True for `Empty` and for text that is blank after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Numeric(_) => false,
        }
    }

    /// True when the cell carries a usable value.
    ///
    /// Blank text, zero and NaN count as unset, matching how the sheet's
    /// consumers have always tested cells for truthiness.
    pub fn is_present(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Text(s) => !s.trim().is_empty(),
            CellValue::Numeric(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    /// Try to get as number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    /// Trimmed textual rendering; numbers print without a trailing `.0`
    pub fn to_trimmed_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Numeric(n) => format_number(*n),
        }
    }
}

/// Render a number the way the sheet displays it: whole numbers have no fraction
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Numeric(*i as f64),
            Data::Float(f) => CellValue::Numeric(*f),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            // Date-typed cells keep their serial; the normalizer decides the rendering
            Data::DateTime(dt) => CellValue::Numeric(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) => CellValue::Empty,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Numeric(n)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => write!(f, "(empty)"),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Numeric(n) => write!(f, "{}", format_number(*n)),
        }
    }
}
