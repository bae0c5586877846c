use crate::infer::{infer_attributes, infer_fuel_type, infer_transmission, FuelType, Transmission};
use crate::listing::DetailPage;
use crate::text::{parse_mileage, parse_price, parse_title, DEFAULT_YEAR};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Oldest model year the catalog accepts
pub const MIN_YEAR: i32 = 1990;

const DEFAULT_DRIVE_TYPE: &str = "Передний";
const DEFAULT_BODY_TYPE: &str = "Седан";
const DEFAULT_COLOR: &str = "Не указан";
const DEFAULT_CONDITION: &str = "Хорошее";

/// A normalized vehicle listing
///
/// Built once per discovered item by [`ListingRecord::from_title`], optionally
/// enriched with [`ListingRecord::apply_details`] and [`ListingRecord::set_images`],
/// then handed to the catalog writer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Title exactly as scraped
    pub title: String,

    /// Canonical brand
    pub brand: String,

    /// Model text left after brand, year and engine tokens are removed
    pub model: String,

    /// Model year, always within [`MIN_YEAR`, current year + 1]
    pub year: i32,

    /// Price in whole rubles; 0 means unknown
    pub price: u64,

    /// Mileage in kilometers
    pub mileage: Option<u32>,

    /// Engine displacement in liters, as printed
    pub engine_volume: Option<String>,

    pub fuel_type: Option<FuelType>,

    pub transmission: Option<Transmission>,

    pub drive_type: String,

    pub body_type: String,

    pub color: String,

    pub condition: String,

    pub vin: Option<String>,

    /// Canonical URL of the listing's detail page
    pub source_url: String,

    /// Image identifiers (local file names once downloaded); the first is the cover
    pub images: Vec<String>,

    pub description: String,
}

impl ListingRecord {
    /// Builds a record from the summary data of a listing
    ///
    /// Brand, model and year come from the title; gearbox, fuel, engine volume
    /// and mileage are inferred from it. Every field the title cannot supply gets
    /// its catalog default here and nowhere else.
    ///
    /// # Example
    ///
    /// ```
    /// use lot_harvester::listing::ListingRecord;
    ///
    /// let record = ListingRecord::from_title(
    ///     "BMW 5 серия 2.0 AT, 2017, 121 900 км",
    ///     2_490_000,
    ///     "https://www.avito.ru/moskva/avtomobili/bmw_5_123",
    /// );
    /// assert_eq!(record.brand, "BMW");
    /// assert_eq!(record.year, 2017);
    /// assert_eq!(record.mileage, Some(121_900));
    /// ```
    pub fn from_title(title: &str, price: u64, source_url: &str) -> Self {
        let parsed = parse_title(title);
        let inferred = infer_attributes(title, "");
        let year = normalize_year(parsed.year, current_year());

        let description = default_description(&parsed.brand, &parsed.model, year);

        Self {
            title: parsed.full_title,
            brand: parsed.brand,
            model: parsed.model,
            year,
            price,
            mileage: inferred.mileage,
            engine_volume: inferred.engine_volume,
            fuel_type: Some(inferred.fuel_type.unwrap_or_default()),
            transmission: Some(inferred.transmission.unwrap_or_default()),
            drive_type: DEFAULT_DRIVE_TYPE.to_string(),
            body_type: DEFAULT_BODY_TYPE.to_string(),
            color: DEFAULT_COLOR.to_string(),
            condition: DEFAULT_CONDITION.to_string(),
            vin: None,
            source_url: source_url.to_string(),
            images: Vec::new(),
            description,
        }
    }

    /// Merges values read from the listing's detail page
    ///
    /// A detail-page value replaces the title-derived one only when it is present,
    /// non-empty and interpretable: the year must fall in range, and mileage,
    /// gearbox and fuel must re-infer to a value. Images are not touched here.
    pub fn apply_details(&mut self, details: &DetailPage) {
        if let Some(description) = non_empty(details.description.as_deref()) {
            self.description = description.to_string();
        }

        let attrs = &details.attributes;

        if let Some(text) = non_empty(attrs.year.as_deref()) {
            let year = i32::try_from(parse_price(text)).unwrap_or(0);
            if year_in_range(year, current_year()) {
                self.year = year;
            }
        }

        if let Some(mileage) = non_empty(attrs.mileage.as_deref()).and_then(parse_mileage) {
            self.mileage = Some(mileage);
        }

        if let Some(transmission) =
            non_empty(attrs.transmission.as_deref()).and_then(infer_transmission)
        {
            self.transmission = Some(transmission);
        }

        if let Some(fuel) = non_empty(attrs.fuel_type.as_deref()).and_then(infer_fuel_type) {
            self.fuel_type = Some(fuel);
        }

        if let Some(drive) = non_empty(attrs.drive_type.as_deref()) {
            self.drive_type = drive.to_string();
        }

        if let Some(body) = non_empty(attrs.body_type.as_deref()) {
            self.body_type = body.to_string();
        }

        if let Some(color) = non_empty(attrs.color.as_deref()) {
            self.color = color.to_string();
        }

        if let Some(vin) = non_empty(attrs.vin.as_deref()) {
            self.vin = Some(vin.to_string());
        }
    }

    /// Replaces the image list, dropping duplicates but keeping first-seen order
    pub fn set_images<I>(&mut self, images: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.images.clear();
        for image in images {
            if !self.images.contains(&image) {
                self.images.push(image);
            }
        }
    }

    /// Returns the cover image, if any
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// One-line description used in progress logs
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} {} - {} ₽ (images: {})",
            self.brand,
            self.model,
            self.year,
            self.price,
            self.images.len()
        )
    }
}

/// Clamps a parsed year into the accepted range, falling back to the default
pub fn normalize_year(year: i32, current_year: i32) -> i32 {
    if year_in_range(year, current_year) {
        year
    } else {
        DEFAULT_YEAR
    }
}

fn year_in_range(year: i32, current_year: i32) -> bool {
    (MIN_YEAR..=current_year + 1).contains(&year)
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn default_description(brand: &str, model: &str, year: i32) -> String {
    format!("{} {} {} года в хорошем состоянии.", brand, model, year)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
