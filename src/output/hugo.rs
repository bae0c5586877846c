//! Hugo content generation
//!
//! Each record becomes one Markdown file with YAML front matter that the
//! catalog site filters and renders on. String scalars are written as JSON
//! strings, which YAML reads as double-quoted scalars, so quotes and colons in
//! titles and descriptions are safe.

use crate::listing::ListingRecord;
use crate::output::traits::{io_error, CatalogWriter, OutputResult, WriteSummary};
use crate::text::slugify;
use chrono::{DateTime, FixedOffset, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Image used by records without downloaded photos
pub const PLACEHOLDER_IMAGE: &str = "images/cars/placeholder.svg";

/// Site-relative directory downloaded images are served from
const IMAGE_PREFIX: &str = "images/cars";

const TAGS: &[&str] = &["авито", "автомобиль"];

/// Value shown for unknown VINs and mileages
const NOT_SPECIFIED: &str = "Не указан";

/// Returns the content file name for a record
///
/// # Example
///
/// ```
/// use lot_harvester::listing::ListingRecord;
/// use lot_harvester::output::content_filename;
///
/// let record = ListingRecord::from_title("Land Rover Range Rover Sport, 2016", 0, "https://example.com/1");
/// assert_eq!(content_filename(&record), "land-rover-range-rover-sport-2016.md");
/// ```
pub fn content_filename(record: &ListingRecord) -> String {
    format!(
        "{}-{}-{}.md",
        slugify(&record.brand),
        slugify(&record.model),
        record.year
    )
}

/// Formats a price with spaces between thousands
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn quoted_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<String> = values.into_iter().map(quoted).collect();
    format!("[{}]", items.join(", "))
}

/// Renders a record as a Hugo content page
pub fn render_markdown(record: &ListingRecord, date: &DateTime<FixedOffset>) -> String {
    let images: Vec<String> = if record.images.is_empty() {
        vec![PLACEHOLDER_IMAGE.to_string()]
    } else {
        record
            .images
            .iter()
            .map(|name| format!("{}/{}", IMAGE_PREFIX, name))
            .collect()
    };
    let cover = &images[0];

    let transmission = record
        .transmission
        .map(|t| t.to_string())
        .unwrap_or_default();
    let fuel_type = record.fuel_type.map(|f| f.to_string()).unwrap_or_default();

    let mut md = String::new();

    md.push_str("---\n");
    md.push_str(&format!("title: {}\n", quoted(&record.title)));
    md.push_str(&format!("date: {}\n", date.format("%Y-%m-%dT%H:%M:%S%:z")));
    md.push_str("draft: false\n");
    md.push_str(&format!("image: {}\n", quoted(cover)));
    md.push_str(&format!(
        "images: {}\n",
        quoted_list(images.iter().map(String::as_str))
    ));
    md.push('\n');
    md.push_str(&format!("brand: {}\n", quoted(&record.brand)));
    md.push_str(&format!("model: {}\n", quoted(&record.model)));
    md.push_str(&format!("year: {}\n", record.year));
    md.push_str(&format!("price: {}\n", record.price));
    if let Some(mileage) = record.mileage {
        md.push_str(&format!("mileage: {}\n", mileage));
    }
    if let Some(volume) = &record.engine_volume {
        md.push_str(&format!("engine_volume: {}\n", volume));
    }
    md.push_str(&format!("fuel_type: {}\n", quoted(&fuel_type)));
    md.push_str(&format!("transmission: {}\n", quoted(&transmission)));
    md.push_str(&format!("drive_type: {}\n", quoted(&record.drive_type)));
    md.push_str(&format!("body_type: {}\n", quoted(&record.body_type)));
    md.push_str(&format!("color: {}\n", quoted(&record.color)));
    md.push_str(&format!("condition: {}\n", quoted(&record.condition)));
    md.push_str(&format!(
        "vin: {}\n",
        quoted(record.vin.as_deref().unwrap_or(NOT_SPECIFIED))
    ));
    md.push_str(&format!("description: {}\n", quoted(&record.description)));
    md.push_str(&format!("source_url: {}\n", quoted(&record.source_url)));
    md.push_str(&format!("tags: {}\n", quoted_list(TAGS.iter().copied())));
    md.push_str("---\n\n");

    md.push_str(&format!(
        "## Характеристики {} {} {}\n\n",
        record.brand, record.model, record.year
    ));
    md.push_str("| Параметр | Значение |\n");
    md.push_str("|----------|----------|\n");
    md.push_str(&format!("| **Марка** | {} |\n", record.brand));
    md.push_str(&format!("| **Модель** | {} |\n", record.model));
    md.push_str(&format!("| **Год выпуска** | {} |\n", record.year));
    md.push_str(&format!("| **Цена** | {} ₽ |\n", format_price(record.price)));
    match record.mileage {
        Some(mileage) => md.push_str(&format!(
            "| **Пробег** | {} км |\n",
            format_price(u64::from(mileage))
        )),
        None => md.push_str(&format!("| **Пробег** | {} |\n", NOT_SPECIFIED)),
    }
    match &record.engine_volume {
        Some(volume) => md.push_str(&format!("| **Объем двигателя** | {} л |\n", volume)),
        None => md.push_str(&format!("| **Объем двигателя** | {} |\n", NOT_SPECIFIED)),
    }
    md.push_str(&format!("| **Тип топлива** | {} |\n", fuel_type));
    md.push_str(&format!("| **Коробка передач** | {} |\n", transmission));
    md.push_str(&format!("| **Привод** | {} |\n", record.drive_type));
    md.push_str(&format!("| **Тип кузова** | {} |\n", record.body_type));
    md.push_str(&format!("| **Цвет** | {} |\n", record.color));
    md.push_str(&format!("| **Состояние** | {} |\n", record.condition));
    md.push('\n');

    md.push_str("## Описание\n\n");
    md.push_str(&record.description);
    md.push('\n');

    md
}

/// Writes one content file per record into `dir`
///
/// Existing files are left alone unless `overwrite` is set. Records that map
/// to the same file name within one call are written once.
///
/// # Returns
///
/// * `Ok(WriteSummary)` - Counts of written and skipped files
/// * `Err(OutputError)` - The directory or a file couldn't be written
pub fn write_catalog(
    records: &[ListingRecord],
    dir: &Path,
    overwrite: bool,
) -> OutputResult<WriteSummary> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;

    let date = Local::now().fixed_offset();
    let mut summary = WriteSummary::default();
    let mut seen = Vec::new();

    for record in records {
        let filename = content_filename(record);
        let path = dir.join(&filename);

        if seen.contains(&filename) || (!overwrite && path.exists()) {
            tracing::debug!("Content file exists, skipping: {}", path.display());
            summary.skipped += 1;
            continue;
        }

        fs::write(&path, render_markdown(record, &date)).map_err(io_error(&path))?;
        tracing::info!("Created {}", path.display());
        summary.written += 1;
        seen.push(filename);
    }

    Ok(summary)
}

/// [`CatalogWriter`] around [`write_catalog`]
#[derive(Debug, Clone)]
pub struct HugoWriter {
    content_dir: PathBuf,
    overwrite: bool,
}

impl HugoWriter {
    pub fn new(content_dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            content_dir: content_dir.into(),
            overwrite,
        }
    }
}

impl CatalogWriter for HugoWriter {
    fn name(&self) -> &'static str {
        "hugo"
    }

    fn write(&self, records: &[ListingRecord]) -> OutputResult<WriteSummary> {
        write_catalog(records, &self.content_dir, self.overwrite)
    }
}
