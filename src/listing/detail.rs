/// Data read from a listing's detail page
use std::fmt;

/// Fields of the detail page's parameter table, in label-matching order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Year,
    Mileage,
    Transmission,
    FuelType,
    DriveType,
    BodyType,
    Color,
    Vin,
}

impl DetailField {
    /// Returns the Russian label the marketplace prints for this field
    pub fn label(&self) -> &'static str {
        match self {
            Self::Year => "Год выпуска",
            Self::Mileage => "Пробег",
            Self::Transmission => "Коробка передач",
            Self::FuelType => "Тип топлива",
            Self::DriveType => "Привод",
            Self::BodyType => "Тип кузова",
            Self::Color => "Цвет",
            Self::Vin => "VIN",
        }
    }

    /// Returns all fields in the order labels are tried against a row
    pub fn all() -> [Self; 8] {
        [
            Self::Year,
            Self::Mileage,
            Self::Transmission,
            Self::FuelType,
            Self::DriveType,
            Self::BodyType,
            Self::Color,
            Self::Vin,
        ]
    }
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Raw values from the parameter table, keyed by field
///
/// Values are kept as text; the record decides how to interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailAttributes {
    pub year: Option<String>,
    pub mileage: Option<String>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub drive_type: Option<String>,
    pub body_type: Option<String>,
    pub color: Option<String>,
    pub vin: Option<String>,
}

impl DetailAttributes {
    /// Stores a value for a field, replacing any previous one
    pub fn set(&mut self, field: DetailField, value: String) {
        let slot = match field {
            DetailField::Year => &mut self.year,
            DetailField::Mileage => &mut self.mileage,
            DetailField::Transmission => &mut self.transmission,
            DetailField::FuelType => &mut self.fuel_type,
            DetailField::DriveType => &mut self.drive_type,
            DetailField::BodyType => &mut self.body_type,
            DetailField::Color => &mut self.color,
            DetailField::Vin => &mut self.vin,
        };
        *slot = Some(value);
    }

    /// Returns the stored value for a field
    pub fn get(&self, field: DetailField) -> Option<&str> {
        let slot = match field {
            DetailField::Year => &self.year,
            DetailField::Mileage => &self.mileage,
            DetailField::Transmission => &self.transmission,
            DetailField::FuelType => &self.fuel_type,
            DetailField::DriveType => &self.drive_type,
            DetailField::BodyType => &self.body_type,
            DetailField::Color => &self.color,
            DetailField::Vin => &self.vin,
        };
        slot.as_deref()
    }

    /// Number of fields that carry a value
    pub fn len(&self) -> usize {
        DetailField::all()
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything enrichment extracted from one detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    /// Gallery image URLs, unique, in discovery order
    pub images: Vec<String>,

    /// Full listing description
    pub description: Option<String>,

    /// Parameter table values
    pub attributes: DetailAttributes,
}
