//! Chat front-end intents
//!
//! Button presses in the dealership's chat front-end arrive as short callback
//! strings. They are parsed once into [`Intent`] so handlers can dispatch
//! with an exhaustive `match`; `Display` produces the wire form again when
//! building keyboards.

use std::fmt;

const MANUAL: &str = "manual";

/// Which value a picker is choosing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickField {
    Brand,
    Model,
}

impl PickField {
    /// Prefix of this picker's callback strings
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Model => "model",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "brand" => Some(Self::Brand),
            "model" => Some(Self::Model),
            _ => None,
        }
    }
}

/// A parsed callback
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    Contacts,
    About,
    Help,
    /// Start the add-a-car flow (admin only)
    AddCar,
    /// A brand was picked from the list
    ///
    /// The value `manual` is reserved: `brand:manual` parses as
    /// [`Intent::ManualEntry`]. Build pickers with [`Intent::pick`].
    Brand(String),
    /// A model was picked from the list; `manual` is reserved as for `Brand`
    Model(String),
    /// The user wants to type the value instead of picking it
    ManualEntry(PickField),
    ConfirmCar,
    CancelCar,
    CancelAddCar,
    AdminStats,
    BackToStart,
}

impl Intent {
    /// Parses a callback string
    ///
    /// Picker callbacks are `prefix:value`, split at the first `:` so values
    /// may contain colons themselves. An empty value is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use lot_harvester::intent::{Intent, PickField};
    ///
    /// assert_eq!(Intent::parse("brand:BMW"), Some(Intent::Brand("BMW".to_string())));
    /// assert_eq!(Intent::parse("model:manual"), Some(Intent::ManualEntry(PickField::Model)));
    /// assert_eq!(Intent::parse("unknown"), None);
    /// ```
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "contacts" => return Some(Self::Contacts),
            "about" => return Some(Self::About),
            "help" => return Some(Self::Help),
            "admin_add_car" => return Some(Self::AddCar),
            "confirm_car" => return Some(Self::ConfirmCar),
            "cancel_car" => return Some(Self::CancelCar),
            "cancel_add_car" => return Some(Self::CancelAddCar),
            "admin_stats" => return Some(Self::AdminStats),
            "back_to_start" => return Some(Self::BackToStart),
            _ => {}
        }

        let (prefix, value) = data.split_once(':')?;
        let field = PickField::from_prefix(prefix)?;

        if value.is_empty() {
            return None;
        }

        if value == MANUAL {
            return Some(Self::ManualEntry(field));
        }

        Self::pick(field, value)
    }

    /// Builds a picker intent whose wire form parses back to itself
    ///
    /// Returns `None` for an empty value or the reserved value `manual`, which
    /// would read back as [`Intent::ManualEntry`].
    ///
    /// # Example
    ///
    /// ```
    /// use lot_harvester::intent::{Intent, PickField};
    ///
    /// assert_eq!(Intent::pick(PickField::Brand, "BMW"), Some(Intent::Brand("BMW".to_string())));
    /// assert_eq!(Intent::pick(PickField::Model, "manual"), None);
    /// ```
    pub fn pick(field: PickField, value: &str) -> Option<Self> {
        if value.is_empty() || value == MANUAL {
            return None;
        }

        Some(match field {
            PickField::Brand => Self::Brand(value.to_string()),
            PickField::Model => Self::Model(value.to_string()),
        })
    }

    /// Whether only administrators may trigger this intent
    pub fn requires_admin(&self) -> bool {
        !matches!(
            self,
            Self::Contacts | Self::About | Self::Help | Self::BackToStart
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contacts => write!(f, "contacts"),
            Self::About => write!(f, "about"),
            Self::Help => write!(f, "help"),
            Self::AddCar => write!(f, "admin_add_car"),
            Self::Brand(brand) => write!(f, "{}:{}", PickField::Brand.prefix(), brand),
            Self::Model(model) => write!(f, "{}:{}", PickField::Model.prefix(), model),
            Self::ManualEntry(field) => write!(f, "{}:{}", field.prefix(), MANUAL),
            Self::ConfirmCar => write!(f, "confirm_car"),
            Self::CancelCar => write!(f, "cancel_car"),
            Self::CancelAddCar => write!(f, "cancel_add_car"),
            Self::AdminStats => write!(f, "admin_stats"),
            Self::BackToStart => write!(f, "back_to_start"),
        }
    }
}
