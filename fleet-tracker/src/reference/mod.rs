//! Carrier and facility reference tables
//!
//! The tables are loaded once (built-in, or from a TOML override file) and
//! handed to the row processor by reference; nothing mutates them afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Location tag of the facility trips depart from
pub const ORIGIN_LOCATION: &str = "Origem";

/// A transport company allowed to run trips
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    pub name: String,
    pub code: String,
    #[serde(default, alias = "allowedFCs")]
    pub allowed_facilities: Vec<String>,
    #[serde(default, alias = "excludedFCs")]
    pub excluded_facilities: Vec<String>,
}

impl Carrier {
    fn new(name: &str, code: &str, allowed: &[&str], excluded: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            allowed_facilities: allowed.iter().map(|s| s.to_string()).collect(),
            excluded_facilities: excluded.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Case-insensitive code comparison
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.to_lowercase() == code.to_lowercase()
    }

    /// Whether the carrier may deliver to `facility`
    pub fn serves(&self, facility: &str) -> bool {
        let allowed = self
            .allowed_facilities
            .iter()
            .any(|f| f.eq_ignore_ascii_case(facility));
        let excluded = self
            .excluded_facilities
            .iter()
            .any(|f| f.eq_ignore_ascii_case(facility));
        allowed && !excluded
    }
}

/// A fulfillment location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub code: String,
    pub name: String,
    pub location: String,
}

impl Facility {
    fn new(code: &str, name: &str, location: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            location: location.to_string(),
        }
    }
}

/// Error loading a reference override file
#[derive(Debug)]
pub enum ReferenceError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse {
        path: String,
        source: toml::de::Error,
    },
    /// File parsed but declares no carriers
    NoCarriers { path: String },
}

impl std::fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceError::Io { path, source } => {
                write!(f, "Failed to read reference file '{}': {}", path, source)
            }
            ReferenceError::Parse { path, source } => {
                write!(f, "Invalid reference file '{}': {}", path, source)
            }
            ReferenceError::NoCarriers { path } => {
                write!(f, "Reference file '{}' declares no carriers", path)
            }
        }
    }
}

impl std::error::Error for ReferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReferenceError::Io { source, .. } => Some(source),
            ReferenceError::Parse { source, .. } => Some(source),
            ReferenceError::NoCarriers { .. } => None,
        }
    }
}

/// Immutable carrier and facility lookup tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub carriers: Vec<Carrier>,
    #[serde(default)]
    pub facilities: Vec<Facility>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceData {
    pub fn new(carriers: Vec<Carrier>, facilities: Vec<Facility>) -> Self {
        Self {
            carriers,
            facilities,
        }
    }

    /// Tables shipped with the binary
    pub fn builtin() -> Self {
        const ALL: &[&str] = &["GR8", "GR9", "XC9", "XCV9"];
        const NO_XCV9: &[&str] = &["GR8", "GR9", "XC9"];

        let carriers = vec![
            Carrier::new("INNOVATION", "INNOVATION", NO_XCV9, &["XCV9"]),
            Carrier::new("GARBERG", "GARBERG", ALL, &[]),
            Carrier::new("FULLFLEX", "FULLFLEX", ALL, &[]),
            Carrier::new("PACHECO", "PACHECO", ALL, &[]),
            Carrier::new("FRATELLI", "FRATELLI", ALL, &[]),
            Carrier::new("SANPOR", "SANPOR", NO_XCV9, &["XCV9"]),
            Carrier::new("PRC", "PRC", ALL, &[]),
            Carrier::new("P.R.C TRANSPORTES", "PRC", ALL, &[]),
            Carrier::new("BMG", "BMG", ALL, &[]),
            Carrier::new("FROTA TEX", "FROTA TEX", ALL, &[]),
            Carrier::new("NEW ALPHA", "NEW ALPHA", ALL, &[]),
            Carrier::new("MOSCARDINI", "MOSCARDINI", ALL, &[]),
            Carrier::new("SHLOG", "SHLOG", ALL, &[]),
        ];

        let facilities = vec![
            Facility::new("TZX", "Centro de Origem TZX", ORIGIN_LOCATION),
            Facility::new("GR8", "Fulfillment Center GR8", "Destino"),
            Facility::new("GR9", "Fulfillment Center GR9", "Destino"),
            Facility::new("XC9", "Fulfillment Center XC9", "Destino"),
            Facility::new("XCV9", "Fulfillment Center XCV9", "Destino"),
        ];

        Self::new(carriers, facilities)
    }

    /// Parse tables from TOML (`[[carriers]]` and `[[facilities]]` arrays)
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load an override file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
            path: display.clone(),
            source,
        })?;

        let data = Self::from_toml_str(&content).map_err(|source| ReferenceError::Parse {
            path: display.clone(),
            source,
        })?;

        if data.carriers.is_empty() {
            return Err(ReferenceError::NoCarriers { path: display });
        }

        log::info!(
            "Loaded {} carriers and {} facilities from {}",
            data.carriers.len(),
            data.facilities.len(),
            display
        );
        Ok(data)
    }

    /// First carrier whose code matches, ignoring case
    pub fn find_carrier(&self, code: &str) -> Option<&Carrier> {
        self.carriers.iter().find(|c| c.matches_code(code))
    }

    pub fn find_facility(&self, code: &str) -> Option<&Facility> {
        self.facilities
            .iter()
            .find(|f| f.code.eq_ignore_ascii_case(code))
    }

    /// The facility trips leave from
    pub fn origin(&self) -> Option<&Facility> {
        self.facilities
            .iter()
            .find(|f| f.location == ORIGIN_LOCATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_find_carrier_ignores_case() {
        let reference = ReferenceData::builtin();
        let carrier = reference.find_carrier("innovation").unwrap();
        assert_eq!(carrier.code, "INNOVATION");
        assert!(reference.find_carrier("Frota Tex").is_some());
        assert!(reference.find_carrier("UNKNOWN_CO").is_none());
    }

    #[test]
    fn test_duplicate_codes_resolve_to_first_entry() {
        let reference = ReferenceData::builtin();
        assert_eq!(reference.find_carrier("prc").unwrap().name, "PRC");
    }

    #[test]
    fn test_serves_honours_exclusions() {
        let reference = ReferenceData::builtin();
        let innovation = reference.find_carrier("INNOVATION").unwrap();
        assert!(innovation.serves("GR8"));
        assert!(!innovation.serves("XCV9"));

        let garberg = reference.find_carrier("GARBERG").unwrap();
        assert!(garberg.serves("xcv9"));
        assert!(!garberg.serves("TZX"));
    }

    #[test]
    fn test_origin_and_facilities() {
        let reference = ReferenceData::builtin();
        assert_eq!(reference.origin().unwrap().code, "TZX");
        assert_eq!(
            reference.find_facility("gr9").unwrap().name,
            "Fulfillment Center GR9"
        );
    }

    #[test]
    fn test_from_toml_str() {
        let reference = ReferenceData::from_toml_str(
            r#"
            [[carriers]]
            name = "ACME"
            code = "ACME"
            allowedFacilities = ["GR8"]

            [[carriers]]
            name = "LEGACY"
            code = "LEG"
            allowedFCs = ["GR8", "GR9"]
            excludedFCs = ["GR9"]

            [[facilities]]
            code = "TZX"
            name = "Origem"
            location = "Origem"
            "#,
        )
        .unwrap();

        assert_eq!(reference.carriers.len(), 2);
        assert!(reference.carriers[0].excluded_facilities.is_empty());
        assert!(!reference.find_carrier("leg").unwrap().serves("GR9"));
        assert_eq!(reference.origin().unwrap().code, "TZX");
    }

    #[test]
    fn test_from_toml_file_errors() {
        let missing = ReferenceData::from_toml_file("/nonexistent/reference.toml");
        assert!(matches!(missing, Err(ReferenceError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "carriers = []").unwrap();
        let empty = ReferenceData::from_toml_file(file.path());
        assert!(matches!(empty, Err(ReferenceError::NoCarriers { .. })));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "[[carriers]\nname = ").unwrap();
        let parse = ReferenceData::from_toml_file(broken.path());
        assert!(matches!(parse, Err(ReferenceError::Parse { .. })));
    }
}
