//! Metadata inference for models with no price-list row.
//!
//! When a discovered model can't be paired with any CSV row, its catalogue
//! entry is synthesized entirely from the filename: the leading token is
//! treated as a SKU, the rest becomes a title-cased product name, and the
//! category comes from a fixed keyword table.

/// Ordered keyword table for category inference. First matching keyword
/// wins, so `bedside_table` lands in Beds, not Tables.
const CATEGORY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["sofa", "couch"], "Sofas"),
    (&["dining", "dinning"], "Dining"),
    (&["chair", "stool"], "Chairs"),
    (&["bed", "mattress"], "Beds"),
    (&["table", "desk"], "Tables"),
    (&["fridge", "stove", "fryer"], "Electronics"),
    (&["wardrobe", "robe", "chest"], "Storage"),
];

/// Fallback category for rows with no category and filenames with no
/// recognized keyword.
pub const MISC_CATEGORY: &str = "Miscellaneous";

/// Canonicalize a price-list category field.
///
/// Trims, corrects the recurring `DINNING` typo to `Dining`, and falls
/// back to [`MISC_CATEGORY`] when the field is empty.
pub fn canonical_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        MISC_CATEGORY.to_string()
    } else if trimmed.eq_ignore_ascii_case("dinning") {
        "Dining".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Infer a display name from a model filename.
///
/// Strips the `.glb` extension and a leading uppercase SKU token, turns
/// underscores into spaces, and title-cases each word. Sanitized names are
/// lowercase, so the uppercase-token strip only fires on raw filenames:
/// `x9_bedside_table.glb` → `"X9 Bedside Table"`.
pub fn infer_name(filename: &str) -> String {
    let stem = strip_model_extension(filename);
    let stem = strip_leading_sku_token(stem);
    stem.replace('_', " ")
        .split(' ')
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Infer a SKU from a model filename: the first `_`-delimited token,
/// extension stripped, uppercased.
pub fn infer_sku(filename: &str) -> String {
    let token = filename.split('_').next().unwrap_or(filename);
    strip_model_extension(token).to_uppercase()
}

/// Infer a category from a model filename via the keyword table.
pub fn infer_category(filename: &str) -> &'static str {
    let lowered = filename.to_lowercase();
    for (keywords, category) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return category;
        }
    }
    MISC_CATEGORY
}

fn strip_model_extension(s: &str) -> &str {
    let len = s.len();
    if len >= 4 && s[len - 4..].eq_ignore_ascii_case(".glb") {
        &s[..len - 4]
    } else {
        s
    }
}

/// Drop a leading `UPPERCASE-OR-DIGITS ` token (a SKU prefix typed with a
/// space rather than an underscore).
fn strip_leading_sku_token(s: &str) -> &str {
    let prefix_len = s
        .chars()
        .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .count();
    if prefix_len > 0 && s[prefix_len..].starts_with(' ') {
        &s[prefix_len + 1..]
    } else {
        s
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = first.to_uppercase().to_string();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_from_sanitized_filename() {
        assert_eq!(infer_name("x9_bedside_table.glb"), "X9 Bedside Table");
    }

    #[test]
    fn name_strips_leading_uppercase_sku_token() {
        assert_eq!(infer_name("X9 Bedside Table.glb"), "Bedside Table");
    }

    #[test]
    fn sku_is_first_token_uppercased() {
        assert_eq!(infer_sku("x9_bedside_table.glb"), "X9");
        assert_eq!(infer_sku("couch.glb"), "COUCH");
    }

    #[test]
    fn category_keywords() {
        assert_eq!(infer_category("green_sofa.glb"), "Sofas");
        assert_eq!(infer_category("dinning_set_6.glb"), "Dining");
        assert_eq!(infer_category("bar_stool.glb"), "Chairs");
        assert_eq!(infer_category("air_fryer_xl.glb"), "Electronics");
        assert_eq!(infer_category("oak_wardrobe.glb"), "Storage");
        assert_eq!(infer_category("mystery_item.glb"), "Miscellaneous");
    }

    #[test]
    fn category_first_keyword_wins() {
        // "bedside" contains "bed", which is scanned before "table".
        assert_eq!(infer_category("x9_bedside_table.glb"), "Beds");
        assert_eq!(infer_category("writing_desk.glb"), "Tables");
    }

    #[test]
    fn canonical_category_fixes_typo() {
        assert_eq!(canonical_category(" DINNING "), "Dining");
        assert_eq!(canonical_category("dinning"), "Dining");
        assert_eq!(canonical_category("Sofas"), "Sofas");
        assert_eq!(canonical_category("  "), "Miscellaneous");
    }
}
