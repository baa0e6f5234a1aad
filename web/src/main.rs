use dioxus::prelude::*;

use ui::components::AppNavbar;
use ui::core::source;
use ui::views::{Dashboard, DashboardSource};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebShell)]
    #[route("/")]
    Dashboard {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    let rows = use_signal(source::demo_rows);
    let config = use_signal(Default::default);
    use_context_provider(|| DashboardSource { rows, config });

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        div {
            key: "{lang_code()}",
            Router::<Route> {}
        }
    }
}

#[component]
fn WebShell() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
