//! Attribute inference from free listing text
//!
//! Vehicle attributes are inferred with ordered keyword tables, not NLP: the
//! text is lowercased and the first table entry found as a substring decides
//! the value. Table order is therefore part of the contract.
//!
//! No match is not an error. Inference returns `None` and the record factory
//! applies its vocabulary defaults.

mod vocabulary;

pub use vocabulary::{FuelType, Transmission};

use crate::text::parse_mileage;
use once_cell::sync::Lazy;
use regex::Regex;

static ENGINE_VOLUME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\d+").unwrap());

/// Gearbox keywords, Latin and Cyrillic spellings plus colloquial names
const TRANSMISSION_TABLE: &[(&str, Transmission)] = &[
    ("MT", Transmission::Manual),
    ("МТ", Transmission::Manual),
    ("механика", Transmission::Manual),
    ("ручная", Transmission::Manual),
    ("AT", Transmission::Automatic),
    ("АТ", Transmission::Automatic),
    ("автомат", Transmission::Automatic),
    ("автоматическая", Transmission::Automatic),
    ("CVT", Transmission::Automatic),
    ("робот", Transmission::Automatic),
    ("вариатор", Transmission::Automatic),
];

const FUEL_TABLE: &[(&str, FuelType)] = &[
    ("бензин", FuelType::Gasoline),
    ("дизель", FuelType::Diesel),
    ("гибрид", FuelType::Hybrid),
    ("электро", FuelType::Electric),
    ("газ", FuelType::Gas),
];

/// Everything the inferencer could read out of a title and description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredAttributes {
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub engine_volume: Option<String>,
    pub mileage: Option<u32>,
}

/// Looks up the first keyword of `table` that occurs in `text`
fn first_match<T: Copy>(table: &[(&str, T)], text: &str) -> Option<T> {
    let lowered = text.to_lowercase();
    table
        .iter()
        .find(|(keyword, _)| lowered.contains(&keyword.to_lowercase()))
        .map(|(_, value)| *value)
}

/// Infers the gearbox family from free text
///
/// Matching is a case-insensitive substring test, so short codes also match
/// inside words ("AT" in "Atlas"). The first table entry found wins.
pub fn infer_transmission(text: &str) -> Option<Transmission> {
    first_match(TRANSMISSION_TABLE, text)
}

/// Infers the fuel type from free text
pub fn infer_fuel_type(text: &str) -> Option<FuelType> {
    first_match(FUEL_TABLE, text)
}

/// Takes the first `digits.digits` group of a title as the engine volume in liters
///
/// Only the title is consulted; descriptions mention too many other decimals.
pub fn infer_engine_volume(title: &str) -> Option<String> {
    ENGINE_VOLUME_RE.find(title).map(|m| m.as_str().to_string())
}

/// Infers mileage in kilometers, see [`parse_mileage`]
pub fn infer_mileage(text: &str) -> Option<u32> {
    parse_mileage(text)
}

/// Runs every inference over a title and an optional description
pub fn infer_attributes(title: &str, description: &str) -> InferredAttributes {
    let text = format!("{} {}", title, description);

    InferredAttributes {
        transmission: infer_transmission(&text),
        fuel_type: infer_fuel_type(&text),
        engine_volume: infer_engine_volume(title),
        mileage: infer_mileage(&text),
    }
}
