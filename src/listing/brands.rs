//! Brand and model catalogue
//!
//! The registry starts from a built-in snapshot and grows when new brands are
//! seen. It is owned by whoever needs it and passed explicitly; there is no
//! process-wide table.

use std::collections::BTreeMap;

const DEFAULT_BRANDS: &[(&str, &[&str])] = &[
    ("Audi", &["A1", "A3", "A4", "A5", "A6", "A7", "A8", "Q2", "Q3", "Q4 e-tron", "Q5", "Q7", "Q8", "e-tron", "e-tron GT", "RS3", "RS4", "RS5", "RS6", "RS7", "RS Q8", "TT", "R8"]),
    ("BMW", &["1 серия", "2 серия", "3 серия", "4 серия", "5 серия", "6 серия", "7 серия", "8 серия", "X1", "X2", "X3", "X4", "X5", "X6", "X7", "iX", "i3", "i4", "i8", "Z4", "M2", "M3", "M4", "M5"]),
    ("Chevrolet", &["Aveo", "Cruze", "Malibu", "Camaro", "Corvette", "Tahoe", "Suburban", "Traverse", "Silverado"]),
    ("Citroen", &["C3", "C4", "C5 Aircross", "Berlingo", "SpaceTourer", "e-C4"]),
    ("Ford", &["Focus", "Mondeo", "Mustang", "Fiesta", "EcoSport", "Kuga", "Explorer", "Ranger", "F-150", "Bronco"]),
    ("Genesis", &["G70", "G80", "G90", "GV60", "GV70", "GV80"]),
    ("Honda", &["Civic", "Accord", "CR-V", "HR-V", "Pilot", "Passport", "Ridgeline", "Odyssey"]),
    ("Hyundai", &["Solaris", "Accent", "Elantra", "Sonata", "i30", "Tucson", "Santa Fe", "Creta", "Palisade", "Kona", "Ioniq 5", "Ioniq 6", "Staria"]),
    ("Infiniti", &["Q50", "Q60", "Q70", "QX50", "QX55", "QX60", "QX80"]),
    ("Jeep", &["Wrangler", "Cherokee", "Grand Cherokee", "Compass", "Renegade", "Gladiator"]),
    ("Kia", &["Rio", "K5", "Stinger", "Cerato", "Ceed", "Sportage", "Sorento", "Seltos", "Soul", "Carnival", "EV6", "Niro"]),
    ("Land Rover", &["Defender", "Discovery", "Discovery Sport", "Range Rover", "Range Rover Sport", "Range Rover Evoque"]),
    ("Lexus", &["ES", "IS", "LS", "GS", "RC", "LC", "UX", "NX", "RX", "GX", "LX", "LM"]),
    ("Mazda", &["2", "3", "6", "CX-3", "CX-30", "CX-5", "CX-50", "CX-60", "CX-90", "MX-5", "MX-30"]),
    ("Mercedes-Benz", &["A-класс", "B-класс", "C-класс", "CLA-класс", "CLS-класс", "E-класс", "S-класс", "GLA-класс", "GLB-класс", "GLC-класс", "GLE-класс", "GLS-класс", "G-класс", "EQA", "EQB", "EQC", "EQE", "EQS", "AMG GT", "SL-класс", "V-класс", "Vito"]),
    ("Mitsubishi", &["Lancer", "Outlander", "ASX", "Eclipse Cross", "Pajero", "Pajero Sport", "L200"]),
    ("Nissan", &["Almera", "Sentra", "Teana", "Murano", "Qashqai", "X-Trail", "Patrol", "Juke", "Ariya", "GT-R"]),
    ("Peugeot", &["208", "308", "408", "508", "2008", "3008", "5008", "Rifter", "e-208", "e-2008"]),
    ("Porsche", &["911", "718 Boxster", "718 Cayman", "Panamera", "Cayenne", "Macan", "Taycan"]),
    ("Renault", &["Logan", "Sandero", "Kaptur", "Arkana", "Duster", "Megane", "Talisman", "Koleos", "Kangoo"]),
    ("Skoda", &["Rapid", "Octavia", "Superb", "Kodiaq", "Karoq", "Kamiq", "Enyaq", "Scala", "Fabia"]),
    ("Subaru", &["Impreza", "Legacy", "Outback", "Forester", "XV", "Crosstrek", "Ascent", "BRZ", "WRX"]),
    ("Tesla", &["Model 3", "Model S", "Model X", "Model Y", "Cybertruck"]),
    ("Toyota", &["Camry", "Corolla", "RAV4", "Highlander", "Land Cruiser", "Prado", "Fortuner", "C-HR", "Yaris", "Supra", "Crown", "Alphard", "Vellfire", "Hilux", "Tundra"]),
    ("Volkswagen", &["Polo", "Golf", "Jetta", "Passat", "Arteon", "Tiguan", "Touareg", "T-Roc", "ID.3", "ID.4", "ID.5", "Multivan", "Transporter", "Amarok"]),
    ("Volvo", &["S60", "S90", "V60", "V90", "XC40", "XC60", "XC90", "C40", "EX30", "EX90"]),
    ("ВАЗ (LADA)", &["Granta", "Vesta", "Largus", "XRAY", "Niva", "Niva Travel"]),
    ("УАЗ", &["Patriot", "Hunter", "Pickup", "Profi"]),
];

/// Brand → models catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandRegistry {
    brands: BTreeMap<String, Vec<String>>,
}

impl BrandRegistry {
    /// Creates a registry from an explicit snapshot
    pub fn new<I, B, M>(snapshot: I) -> Self
    where
        I: IntoIterator<Item = (B, Vec<M>)>,
        B: Into<String>,
        M: Into<String>,
    {
        let brands = snapshot
            .into_iter()
            .map(|(brand, models)| (brand.into(), models.into_iter().map(Into::into).collect()))
            .collect();
        Self { brands }
    }

    /// Creates a registry seeded with the built-in catalogue
    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_BRANDS
                .iter()
                .map(|(brand, models)| (*brand, models.to_vec())),
        )
    }

    /// Registers a brand with no known models
    ///
    /// # Returns
    ///
    /// `true` if the brand was new, `false` if it was already present (its
    /// models are left untouched) or the name is blank.
    pub fn add_if_absent(&mut self, brand: &str) -> bool {
        let brand = brand.trim();
        if brand.is_empty() || self.brands.contains_key(brand) {
            return false;
        }
        self.brands.insert(brand.to_string(), Vec::new());
        true
    }

    pub fn contains(&self, brand: &str) -> bool {
        self.brands.contains_key(brand)
    }

    /// Returns brand names in sorted order
    pub fn brands(&self) -> Vec<&str> {
        self.brands.keys().map(String::as_str).collect()
    }

    /// Returns the known models of a brand; empty for unknown brands
    pub fn models_for(&self, brand: &str) -> &[String] {
        self.brands.get(brand).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults() {
        let registry = BrandRegistry::with_defaults();
        assert_eq!(registry.len(), DEFAULT_BRANDS.len());
        assert!(registry.contains("BMW"));
        assert!(registry.contains("ВАЗ (LADA)"));
        assert!(registry.models_for("Toyota").iter().any(|m| m == "Camry"));
    }

    #[test]
    fn test_brands_sorted() {
        let registry = BrandRegistry::new(vec![("Volvo", vec!["XC90"]), ("Audi", vec!["A4"])]);
        assert_eq!(registry.brands(), vec!["Audi", "Volvo"]);
    }

    #[test]
    fn test_add_if_absent() {
        let mut registry = BrandRegistry::with_defaults();
        let before = registry.len();

        assert!(registry.add_if_absent("Haval"));
        assert!(registry.contains("Haval"));
        assert!(registry.models_for("Haval").is_empty());
        assert_eq!(registry.len(), before + 1);

        assert!(!registry.add_if_absent("Haval"));
        assert_eq!(registry.len(), before + 1);
    }

    #[test]
    fn test_add_if_absent_keeps_existing_models() {
        let mut registry = BrandRegistry::with_defaults();
        let models = registry.models_for("Kia").len();

        assert!(!registry.add_if_absent("Kia"));
        assert_eq!(registry.models_for("Kia").len(), models);
    }

    #[test]
    fn test_add_if_absent_rejects_blank() {
        let mut registry = BrandRegistry::default();
        assert!(!registry.add_if_absent("   "));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_models_for_unknown_brand() {
        let registry = BrandRegistry::with_defaults();
        assert!(registry.models_for("Zaporozhets").is_empty());
    }
}
