//! Cyrillic-to-ASCII slugs for content file names

/// Transliteration of a lowercase Cyrillic letter, if it has one
fn transliterate(c: char) -> Option<&'static str> {
    let mapped = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(mapped)
}

/// Builds a lowercase slug from arbitrary text
///
/// Cyrillic letters are transliterated, other alphanumerics and `-`/`_` pass
/// through, spaces become hyphens and everything else is dropped. Runs of
/// hyphens collapse to one and the result never starts or ends with a hyphen.
///
/// # Example
///
/// ```
/// use lot_harvester::text::slugify;
///
/// assert_eq!(slugify("5 серия"), "5-seriya");
/// assert_eq!(slugify("ВАЗ (LADA)"), "vaz-lada");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for c in text.to_lowercase().chars() {
        if let Some(latin) = transliterate(c) {
            slug.push_str(latin);
        } else if c.is_alphanumeric() || c == '_' {
            slug.push(c);
        } else if c == '-' || c == ' ' {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }

    slug.trim_matches('-').to_string()
}
