/// Browser services the new-tab page needs beyond storage.
///
/// In the extension these go through `newtab.js`; native builds (tests,
/// tooling) get inert stand-ins so the rest of the crate compiles unchanged.

#[cfg(target_arch = "wasm32")]
pub type PlatformStore = crate::storage::ChromeStore;

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = crate::storage::MemoryStore;

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    // Import JS bridge functions
    #[wasm_bindgen(module = "/newtab.js")]
    extern "C" {
        fn exportToFile(data: &str, filename: &str);

        #[wasm_bindgen(catch)]
        async fn fetchText(url: &str) -> Result<JsValue, JsValue>;
    }

    pub fn download_file(contents: &str, filename: &str) {
        exportToFile(contents, filename);
    }

    pub async fn fetch_text(url: &str) -> Result<String, String> {
        let text = fetchText(url).await.map_err(describe)?;
        text.as_string()
            .ok_or_else(|| "Response was not text".to_string())
    }

    fn describe(error: JsValue) -> String {
        error
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| error.as_string())
            .unwrap_or_else(|| format!("{:?}", error))
    }

    pub fn confirm(message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    pub fn prompt(message: &str, current: &str) -> Option<String> {
        web_sys::window()?
            .prompt_with_message_and_default(message, current)
            .ok()
            .flatten()
    }

    pub fn apply_body_appearance(classes: &[String], style: &str) {
        let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        else {
            log::warn!("No document body to style");
            return;
        };

        body.set_class_name(&classes.join(" "));
        if let Err(e) = body.set_attribute("style", style) {
            log::warn!("Failed to set body style: {:?}", e);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod browser {
    pub fn download_file(_contents: &str, filename: &str) {
        log::info!("Downloads need a browser, dropping {}", filename);
    }

    pub async fn fetch_text(url: &str) -> Result<String, String> {
        Err(format!("Cannot fetch {} outside the browser", url))
    }

    pub fn confirm(_message: &str) -> bool {
        true
    }

    pub fn prompt(_message: &str, _current: &str) -> Option<String> {
        None
    }

    pub fn apply_body_appearance(_classes: &[String], _style: &str) {}
}

/// Save `contents` as a file download named `filename`
pub fn download_file(contents: &str, filename: &str) {
    browser::download_file(contents, filename);
}

/// GET `url` and return the body as text
pub async fn fetch_text(url: &str) -> Result<String, String> {
    browser::fetch_text(url).await
}

/// Ask the user a yes/no question
pub fn confirm(message: &str) -> bool {
    browser::confirm(message)
}

/// Ask the user for a line of text; `None` when cancelled
pub fn prompt(message: &str, current: &str) -> Option<String> {
    browser::prompt(message, current)
}

/// Put theme and layout classes and inline style on `<body>`
pub fn apply_body_appearance(classes: &[String], style: &str) {
    browser::apply_body_appearance(classes, style);
}
