/// Closed vocabularies for inferred vehicle attributes
///
/// The display forms are what the catalog site filters on, so they double as
/// the serialized representation.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gearbox family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transmission {
    /// Manual gearbox
    #[serde(rename = "MT")]
    Manual,

    /// Any automatic variant: torque converter, CVT, robotic
    #[serde(rename = "AT")]
    Automatic,
}

impl Transmission {
    /// Returns the catalog code for this gearbox family
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Manual => "MT",
            Self::Automatic => "AT",
        }
    }

    /// Parses a catalog code, case-insensitively
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "MT" => Some(Self::Manual),
            "AT" => Some(Self::Automatic),
            _ => None,
        }
    }
}

impl Default for Transmission {
    fn default() -> Self {
        Self::Automatic
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Fuel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    #[serde(rename = "Бензин")]
    Gasoline,

    #[serde(rename = "Дизель")]
    Diesel,

    #[serde(rename = "Гибрид")]
    Hybrid,

    #[serde(rename = "Электро")]
    Electric,

    #[serde(rename = "Газ")]
    Gas,
}

impl FuelType {
    /// Returns the catalog label for this fuel type
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Gasoline => "Бензин",
            Self::Diesel => "Дизель",
            Self::Hybrid => "Гибрид",
            Self::Electric => "Электро",
            Self::Gas => "Газ",
        }
    }

    /// Parses a catalog label, case-insensitively
    pub fn from_label(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|fuel| fuel.as_label().to_lowercase() == wanted)
    }

    /// Returns every fuel type in catalog order
    pub fn all() -> Vec<Self> {
        vec![
            Self::Gasoline,
            Self::Diesel,
            Self::Hybrid,
            Self::Electric,
            Self::Gas,
        ]
    }
}

impl Default for FuelType {
    fn default() -> Self {
        Self::Gasoline
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmission_codes() {
        assert_eq!(Transmission::Manual.as_code(), "MT");
        assert_eq!(Transmission::Automatic.as_code(), "AT");
        assert_eq!(Transmission::from_code(" at "), Some(Transmission::Automatic));
        assert_eq!(Transmission::from_code("CVT"), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Transmission::default(), Transmission::Automatic);
        assert_eq!(FuelType::default(), FuelType::Gasoline);
    }

    #[test]
    fn test_fuel_labels() {
        for fuel in FuelType::all() {
            assert_eq!(FuelType::from_label(fuel.as_label()), Some(fuel));
        }
        assert_eq!(FuelType::from_label("дизель"), Some(FuelType::Diesel));
        assert_eq!(FuelType::from_label("водород"), None);
    }

    #[test]
    fn test_serialized_forms() {
        assert_eq!(
            serde_json::to_string(&Transmission::Automatic).unwrap(),
            "\"AT\""
        );
        assert_eq!(
            serde_json::to_string(&FuelType::Electric).unwrap(),
            "\"Электро\""
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Transmission::Manual), "MT");
        assert_eq!(format!("{}", FuelType::Gas), "Газ");
    }
}
