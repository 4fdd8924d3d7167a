//! WASM-facing entry points for the QR solid pipeline.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`. Native tests use the `*_internal` helpers, which return
//! Rust errors instead of `JsValue`s.
//!
//! ```
//! let buffers = qr_solid_wasm::render_qr_internal(r#"{"text": "hello"}"#).unwrap();
//! assert!(buffers.triangle_count() > 0);
//! ```

use config::constants::DEFAULT_QR_SIZE;
use qr_host::commands::{QrCodeCommand, SignboardCommand};
use qr_host::{messages, CommandError, CommandHandler, Document};
use solid_mesh::{MeshBuffers, MeshError};
use thiserror::Error;
use wasm_bindgen::prelude::*;

mod mesh_handle;

pub use mesh_handle::MeshHandle;

/// Failure of a render call.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{}", messages::user_message(.0))]
    Command(#[from] CommandError),

    #[error("mesh export failed: {0}")]
    Mesh(#[from] MeshError),
}

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "qr_solid_wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Default side length of the QR footprint in mm.
///
/// # Examples
/// ```
/// assert!(qr_solid_wasm::default_qr_size() > 0.0);
/// ```
#[wasm_bindgen]
pub fn default_qr_size() -> f64 {
    DEFAULT_QR_SIZE
}

/// Renders a QR code from JSON inputs (see `QrCodeInputs`).
///
/// # Errors
/// Returns a JavaScript string with the user-facing failure message.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const mesh = render_qr(JSON.stringify({ text: "hello", size: 30 }));
/// // console.log(mesh.triangle_count);
/// ```
#[wasm_bindgen]
pub fn render_qr(inputs_json: &str) -> Result<MeshHandle, JsValue> {
    render_qr_internal(inputs_json)
        .map(MeshHandle::from_buffers)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Renders a complete signboard from JSON inputs (see `SignboardInputs`).
///
/// # Errors
/// Returns a JavaScript string with the user-facing failure message.
#[wasm_bindgen]
pub fn render_signboard(inputs_json: &str) -> Result<MeshHandle, JsValue> {
    render_signboard_internal(inputs_json)
        .map(MeshHandle::from_buffers)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Host-side QR render returning the document mesh buffers.
pub fn render_qr_internal(inputs_json: &str) -> Result<MeshBuffers, RenderError> {
    render_with(&mut QrCodeCommand::new(), inputs_json)
}

/// Host-side signboard render returning the document mesh buffers.
pub fn render_signboard_internal(inputs_json: &str) -> Result<MeshBuffers, RenderError> {
    render_with(&mut SignboardCommand::new(), inputs_json)
}

fn render_with(command: &mut dyn CommandHandler, inputs_json: &str) -> Result<MeshBuffers, RenderError> {
    let mut document = Document::new();
    command.execute(inputs_json, &mut document)?;
    Ok(document.to_mesh()?.to_buffers())
}
