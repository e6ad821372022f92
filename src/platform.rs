// src/platform.rs
//
// Host-specific glue: where the initial query comes from, what URL a share
// link points at, and how exported bytes reach the user.

use rockgen::ExportError;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use wasm_bindgen::JsCast;

        pub fn initial_query(_fallback: Option<&str>) -> String {
            web_sys::window()
                .and_then(|win| win.location().search().ok())
                .unwrap_or_default()
        }

        pub fn share_base_url(configured: &str) -> String {
            web_sys::window()
                .and_then(|win| win.location().href().ok())
                .unwrap_or_else(|| configured.to_string())
        }

        pub fn deliver_download(file_name: &str, mime: &str, bytes: &[u8]) -> Result<String, ExportError> {
            let fail = |what: &str| ExportError::Download(what.to_string());

            let array = js_sys::Uint8Array::from(bytes);
            let parts = js_sys::Array::of1(&array);
            let options = web_sys::BlobPropertyBag::new();
            options.set_type(mime);
            let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                .map_err(|_| fail("could not create blob"))?;
            let url = web_sys::Url::create_object_url_with_blob(&blob)
                .map_err(|_| fail("could not create object URL"))?;

            let document = web_sys::window()
                .and_then(|win| win.document())
                .ok_or_else(|| fail("no document"))?;
            let body = document.body().ok_or_else(|| fail("no document body"))?;
            let link = document
                .create_element("a")
                .map_err(|_| fail("could not create link"))?
                .dyn_into::<web_sys::HtmlAnchorElement>()
                .map_err(|_| fail("link is not an anchor"))?;
            link.set_href(&url);
            link.set_download(file_name);
            body.append_child(&link).map_err(|_| fail("could not attach link"))?;
            link.click();
            if let Err(err) = body.remove_child(&link) {
                log::warn!("could not detach download link: {:?}", err);
            }
            if let Err(err) = web_sys::Url::revoke_object_url(&url) {
                log::warn!("could not revoke {}: {:?}", url, err);
            }
            Ok(file_name.to_string())
        }
    } else {
        use std::path::PathBuf;

        pub fn initial_query(from_args: Option<&str>) -> String {
            from_args.unwrap_or_default().to_string()
        }

        pub fn share_base_url(configured: &str) -> String {
            configured.to_string()
        }

        /// Writes into the working directory and returns the path written.
        pub fn deliver_download(file_name: &str, _mime: &str, bytes: &[u8]) -> Result<String, ExportError> {
            let path = PathBuf::from(file_name);
            std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(path.display().to_string())
        }
    }
}
