//! Localisation for `greenboard-ui`.
//!
//! Fluent bundles live under `i18n/<lang>/greenboard_ui.ftl` and are embedded with
//! `rust-embed`; `en-US` is the fallback and the reference for key completeness.
//!
//! Call [`init`] once at start-up (it is idempotent), then look strings up with `t!`:
//! ```ignore
//! ui::i18n::init();
//! let heading = ui::t!("timeline-heading");
//! let label = ui::t!("selection-build", build = 1712);
//! ```
//!
//! Desktop builds pick the OS locale list, web builds use `navigator.languages`.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::{langid, LanguageIdentifier};

pub use i18n_embed_fl::fl;

/// `t!("key")` or `t!("key", arg = value)` against the shared loader.
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fallback file is `i18n/en-US/{DOMAIN}.ftl`.
const DOMAIN: &str = "greenboard_ui";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

pub static LOADER: Lazy<FluentLanguageLoader> =
    Lazy::new(|| FluentLanguageLoader::new(DOMAIN, langid!("en-US")));

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        LOADER.set_use_isolating(false);
        let requested = requested_languages();
        if let Err(err) = i18n_embed::select(&*LOADER, &Localizations, &requested) {
            tracing::warn!(%err, "failed selecting languages, continuing with fallback");
        }
    });
}

/// Switch language at runtime. Unparseable tags are ignored.
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let Ok(lang) = tag.parse::<LanguageIdentifier>() else {
        return Ok(());
    };
    i18n_embed::select(&*LOADER, &Localizations, &[lang]).map(|_| ())
}

/// Embedded language tags, sorted.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(str::to_string))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_bundles_are_embedded() {
        assert_eq!(available_languages(), vec!["en-US", "es-ES"]);
    }

    #[test]
    fn lookup_substitutes_arguments() {
        init();
        let _ = set_language("en-US");
        assert_eq!(fl!(&*LOADER, "timeline-heading"), "Build history");
        let label = fl!(&*LOADER, "selection-build", build = 1712);
        assert!(label.contains("1712"));
    }

    #[test]
    fn bogus_tag_keeps_current_language() {
        init();
        let before = fl!(&*LOADER, "timeline-heading");
        let _ = set_language("not a tag");
        assert_eq!(fl!(&*LOADER, "timeline-heading"), before);
    }
}
