//! Filename canonicalization and comparison keys.
//!
//! Two distinct normalizations live here and must not be conflated:
//!
//! - [`sanitize_file_name`] produces a filesystem-safe name and is used
//!   to rename model files on disk. It keeps word boundaries as `_`.
//! - [`comparison_key`] strips everything that isn't alphanumeric and is
//!   used only for substring matching, never for renaming.

/// Sanitize a filename for on-disk storage.
///
/// The extension is split off, the stem is lowercased, every character
/// outside `[a-z0-9]` becomes `_`, runs of `_` are collapsed, a trailing
/// `_` is stripped, and the lowercased extension is reattached.
///
/// Idempotent: sanitizing an already-sanitized name is a no-op.
pub fn sanitize_file_name(name: &str) -> String {
    let (stem, ext) = split_extension(name);

    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;
    for ch in stem.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            last_was_underscore = false;
        } else if !last_was_underscore {
            out.push('_');
            last_was_underscore = true;
        }
    }
    if out.ends_with('_') {
        out.pop();
    }

    out.push_str(&ext.to_ascii_lowercase());
    out
}

/// Reduce a string to its comparison key: lowercase, alphanumerics only.
///
/// Deliberately more aggressive than [`sanitize_file_name`] — `"S-100 v2"`
/// and `"s100_v2"` both key to `"s100v2"` so substring matching survives
/// inconsistent punctuation.
pub fn comparison_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Split a filename into `(stem, extension)` where the extension includes
/// its leading dot. Dotfiles and extensionless names have an empty extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_replaces_punctuation() {
        assert_eq!(
            sanitize_file_name("S100 Green Sofa (FINAL).GLB"),
            "s100_green_sofa_final.glb"
        );
    }

    #[test]
    fn collapses_underscore_runs() {
        assert_eq!(sanitize_file_name("a -- b.glb"), "a_b.glb");
    }

    #[test]
    fn strips_trailing_underscore() {
        assert_eq!(sanitize_file_name("chair!.glb"), "chair.glb");
    }

    #[test]
    fn idempotent() {
        let once = sanitize_file_name("Lounge Chair #3.glb");
        assert_eq!(sanitize_file_name(&once), once);
    }

    #[test]
    fn keeps_only_last_extension() {
        assert_eq!(sanitize_file_name("set.v2.glb"), "set_v2.glb");
    }

    #[test]
    fn extensionless_and_dotfiles() {
        assert_eq!(sanitize_file_name("README"), "readme");
        // A dotfile's dot is part of the stem, so it becomes an underscore.
        assert_eq!(sanitize_file_name(".hidden"), "_hidden");
    }

    #[test]
    fn comparison_key_strips_everything() {
        assert_eq!(comparison_key("S-100 v2"), "s100v2");
        assert_eq!(comparison_key("s100_v2.glb"), "s100v2glb");
        assert_eq!(comparison_key("---"), "");
    }
}
