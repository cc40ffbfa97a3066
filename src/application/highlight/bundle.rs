//! Grammar and theme assets compiled into the binary.

use std::sync::Arc;

use once_cell::sync::Lazy;
use syntect::{
    dumps::from_uncompressed_data,
    highlighting::{Theme, ThemeSet},
    parsing::SyntaxSet,
};

static SYNTAX_SET: Lazy<Arc<SyntaxSet>> = Lazy::new(|| {
    let syntax_bytes = include_bytes!(env!("SYNTAX_PACK_FILE"));
    let syntax_set: SyntaxSet =
        from_uncompressed_data(syntax_bytes).expect("syntax pack must be valid");
    Arc::new(syntax_set)
});

static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Shared grammar set, decoded on first use.
pub fn bundled_syntaxes() -> Arc<SyntaxSet> {
    Arc::clone(&SYNTAX_SET)
}

/// Names of the themes the renderer can be configured with, sorted.
pub fn theme_names() -> Vec<&'static str> {
    THEME_SET.themes.keys().map(String::as_str).collect()
}

pub fn find_theme(name: &str) -> Option<Theme> {
    THEME_SET.themes.get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_pack_contains_common_languages() {
        let syntaxes = bundled_syntaxes();
        for token in ["py", "rs", "sql", "js", "sh", "json", "toml"] {
            assert!(
                syntaxes.find_syntax_by_token(token).is_some(),
                "missing syntax for `{token}`"
            );
        }
    }

    #[test]
    fn default_theme_is_available() {
        assert!(find_theme("InspiredGitHub").is_some());
        assert!(theme_names().contains(&"InspiredGitHub"));
    }
}
