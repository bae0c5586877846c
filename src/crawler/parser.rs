//! Marketplace markup knowledge
//!
//! Selectors for the listing and detail pages, plus the pure helpers that
//! turn raw attribute and text values into record inputs:
//! - parameter rows ("Год выпуска: 2017") into labelled values
//! - gallery sources into de-duplicated, upgraded image URLs
//! - relative links into absolute URLs

use crate::listing::DetailField;
use url::Url;

/// One listing card on the search results page
pub const ITEM_SELECTOR: &str = r#"[itemtype="http://schema.org/Product"]"#;

pub const TITLE_SELECTOR: &str = r#"[itemprop="name"]"#;

/// Machine-readable price, read from its `content` attribute
pub const PRICE_SELECTOR: &str = r#"[itemprop="price"]"#;

/// Human-readable price, used when the machine-readable one is missing
pub const PRICE_TEXT_SELECTOR: &str = r#"[data-marker="item-price"]"#;

pub const URL_SELECTOR: &str = r#"[itemprop="url"]"#;

pub const GALLERY_SELECTOR: &str = r#"[data-marker="image-preview/item"] img"#;

/// Main image, used when the gallery yields nothing
pub const FALLBACK_IMAGE_SELECTOR: &str = r#"[data-marker="image-frame/image"], img[alt*="цена"]"#;

pub const DESCRIPTION_SELECTOR: &str =
    r#"[data-marker="item-view/item-description"], [itemprop="description"]"#;

pub const PARAMS_SELECTOR: &str = r#"[data-marker="item-view/item-params"] li, .item-params-list li"#;

const PLACEHOLDER_MARKERS: &[&str] = &["placeholder", "no-photo"];

const LOW_QUALITY_MARKER: &str = "?cqp=";
const HIGH_QUALITY_SUFFIX: &str = "?size=1200x900";

/// Matches a parameter row against the known labels
///
/// The first label contained in the row wins. The value is the text after the
/// last `:`; rows without a colon use the text with the label removed.
///
/// # Returns
///
/// `None` when no label matches or the value is empty.
///
/// # Example
///
/// ```
/// use lot_harvester::crawler::parse_param_row;
/// use lot_harvester::listing::DetailField;
///
/// assert_eq!(
///     parse_param_row("Коробка передач: автомат"),
///     Some((DetailField::Transmission, "автомат".to_string()))
/// );
/// ```
pub fn parse_param_row(text: &str) -> Option<(DetailField, String)> {
    let text = text.trim();
    let field = DetailField::all()
        .into_iter()
        .find(|field| text.contains(field.label()))?;

    let value = match text.rsplit_once(':') {
        Some((_, value)) => value.trim().to_string(),
        None => text.replacen(field.label(), "", 1).trim().to_string(),
    };

    if value.is_empty() {
        None
    } else {
        Some((field, value))
    }
}

/// Returns true for sources that are stand-ins rather than photos
pub fn is_placeholder_image(src: &str) -> bool {
    let lowered = src.to_lowercase();
    PLACEHOLDER_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Rewrites a thumbnail URL to request the large rendition
///
/// Sources carrying a `?cqp=` quality parameter are cut at that parameter and
/// given `?size=1200x900`; anything else is returned unchanged.
pub fn upgrade_image_url(src: &str) -> String {
    match src.split_once(LOW_QUALITY_MARKER) {
        Some((base, _)) => format!("{}{}", base, HIGH_QUALITY_SUFFIX),
        None => src.to_string(),
    }
}

/// Filters, upgrades and de-duplicates image sources, keeping at most `max`
pub fn collect_images<I>(sources: I, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut images: Vec<String> = Vec::new();

    for src in sources {
        let src = src.trim();
        if src.is_empty() || is_placeholder_image(src) {
            continue;
        }

        let upgraded = upgrade_image_url(src);
        if !images.contains(&upgraded) {
            images.push(upgraded);
        }
    }

    images.truncate(max);
    images
}

/// Resolves a possibly relative link against the page it was found on
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(String::from)
}
