//! Platform glue.

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserQuery;

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::JsValue;

    use crate::core::state::QueryWriter;

    /// Mirrors query writes into the address bar without adding history entries.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserQuery;

    impl QueryWriter for BrowserQuery {
        fn set_param(&mut self, key: &str, value: Option<&str>) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(href) = window.location().href() else {
                return;
            };
            let Ok(url) = web_sys::Url::new(&href) else {
                return;
            };

            let params = url.search_params();
            match value {
                Some(value) => params.set(key, value),
                None => params.delete(key),
            }

            if let Ok(history) = window.history() {
                if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url.href())) {
                    tracing::warn!(?err, "unable to update the address bar");
                }
            }
        }
    }
}
