//! Export of the current drawing: SVG everywhere, PNG on native targets.

use dioxus::prelude::*;
use tracing::info;

use crate::t;
use crate::timeline::ChartScene;

const FILE_STEM: &str = "greenboard-timeline";

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working(&'static str),
    Done(String),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    fn label(self) -> &'static str {
        match self {
            ExportFormat::Svg => "SVG",
            ExportFormat::Png => "PNG",
        }
    }
}

#[component]
pub fn TimelineExportPanel(scene: ChartScene) -> Element {
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working(format) => Some((
            "export-card__meta".to_string(),
            format!("{}…", t!("export-working", format = format.to_string())),
        )),
        ExportStatus::Done(message) => Some((
            "export-card__meta export-card__meta--success".to_string(),
            message.clone(),
        )),
        ExportStatus::Error(err) => Some((
            "export-card__meta export-card__meta--error".to_string(),
            err.clone(),
        )),
    };

    let export_handler = move |format: ExportFormat| {
        let scene = scene.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_: MouseEvent| {
            if busy_signal() {
                return;
            }
            busy_signal.set(true);
            status_signal.set(ExportStatus::Working(format.label()));
            let outcome = match format {
                ExportFormat::Svg => export_svg(&scene),
                ExportFormat::Png => export_png(&scene),
            };
            match outcome {
                Ok(message) => status_signal.set(ExportStatus::Done(message)),
                Err(err) => status_signal.set(ExportStatus::Error(err)),
            }
            busy_signal.set(false);
        }
    };

    rsx! {
        section { class: "export-card",
            div { class: "export-card__header",
                h2 { {t!("export-heading")} }
            }
            p { {t!("export-intro")} }

            div { class: "export-card__actions",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy(),
                    onclick: export_handler(ExportFormat::Svg),
                    {t!("export-svg")}
                }
                if cfg!(not(target_arch = "wasm32")) {
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: busy(),
                        onclick: export_handler(ExportFormat::Png),
                        {t!("export-png")}
                    }
                }
            }

            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}

/// Standalone SVG document for the scene as currently drawn.
pub fn svg_document(scene: &ChartScene) -> String {
    let mut markup = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    markup.push_str(&scene.to_svg_markup());
    markup.push('\n');
    markup
}

pub fn export_svg(scene: &ChartScene) -> Result<String, String> {
    let filename = format!("{FILE_STEM}-{}.svg", timestamp_slug());
    let delivery = deliver(&filename, "image/svg+xml", svg_document(scene).into_bytes())?;
    info!(%filename, "timeline exported as SVG");
    Ok(delivery_message(delivery))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn export_png(scene: &ChartScene) -> Result<String, String> {
    let bytes = rasterize_png(&scene.to_svg_markup())?;
    let filename = format!("{FILE_STEM}-{}.png", timestamp_slug());
    let delivery = deliver(&filename, "image/png", bytes)?;
    info!(%filename, "timeline exported as PNG");
    Ok(delivery_message(delivery))
}

#[cfg(target_arch = "wasm32")]
pub fn export_png(_scene: &ChartScene) -> Result<String, String> {
    Err("PNG export is only available in the desktop app".to_string())
}

/// Rasterise SVG markup at its own size onto a transparent pixmap.
#[cfg(not(target_arch = "wasm32"))]
pub fn rasterize_png(markup: &str) -> Result<Vec<u8>, String> {
    use resvg::{tiny_skia, usvg};

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(markup, &options).map_err(|err| err.to_string())?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or("Unable to allocate PNG canvas")?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|err| err.to_string())
}

fn delivery_message(delivery: Option<String>) -> String {
    match delivery {
        Some(path) => t!("export-saved", path = path),
        None => t!("export-download-started"),
    }
}

fn timestamp_slug() -> String {
    use time::{macros::format_description, OffsetDateTime};

    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "export".into())
}

/// Browser download on the web, a file in the data directory on desktop.
#[cfg_attr(not(target_arch = "wasm32"), allow(unused_variables))]
fn deliver(filename: &str, mime: &str, bytes: Vec<u8>) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;

        let dir = export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        fs::write(&path, &bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("org", "Greenboard", "Greenboard")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{TimelineChart, TimelineConfig, TimelineData};

    fn scene() -> ChartScene {
        let data = TimelineData::new(vec![(1, 5), (2, 3), (3, 8)], vec![(1, 1), (2, 0), (3, 2)]);
        TimelineChart::build(&data, TimelineConfig::default(), Some(2))
            .unwrap()
            .scene()
            .clone()
    }

    #[test]
    fn svg_document_has_xml_prolog() {
        let doc = svg_document(&scene());
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    }

    #[test]
    fn working_message_names_the_format() {
        crate::i18n::init();
        let message = t!("export-working", format = ExportFormat::Png.label().to_string());
        assert!(message.contains("PNG"), "{message}");
    }

    #[test]
    fn slug_is_filename_safe() {
        let slug = timestamp_slug();
        assert!(slug.chars().all(|c| c.is_ascii_digit() || c == '_'));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn png_has_the_scene_size() {
        let scene = scene();
        let png = rasterize_png(&scene.to_svg_markup()).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        assert_eq!(width, scene.width as u32);
        assert_eq!(height, scene.height.ceil() as u32);
    }
}
