#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;

use ui::components::AppNavbar;
use ui::core::source;
use ui::views::{Dashboard, DashboardSource};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopShell)]
    #[route("/")]
    Dashboard {},
}

// Shared theme, embedded so packaged builds need no assets directory.
const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

#[cfg(feature = "desktop")]
fn main() {
    dioxus::logger::initialize_default();

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("Greenboard – v{}", env!("CARGO_PKG_VERSION")))
                    .with_maximized(true),
            ),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    dioxus::logger::initialize_default();
    LaunchBuilder::server().launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    let rows = use_signal(source::rows_from_env);
    let config = use_signal(source::config_from_env);
    use_context_provider(|| DashboardSource { rows, config });

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        // Remount the routed subtree on language change so every string is re-read.
        div {
            key: "{lang_code()}",
            Router::<Route> { }
        }
    }
}

#[component]
fn DesktopShell() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
