//! # Mesh Handle
//!
//! WASM-friendly wrapper for mesh data that can be transferred to JavaScript.

use solid_mesh::MeshBuffers;
use wasm_bindgen::prelude::*;

/// A handle to mesh data that can be accessed from JavaScript.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const mesh = render_qr(JSON.stringify({ text: "hello" }));
///
/// const geometry = new THREE.BufferGeometry();
/// geometry.setAttribute('position', new THREE.BufferAttribute(mesh.vertices(), 3));
/// geometry.setAttribute('normal', new THREE.BufferAttribute(mesh.normals(), 3));
/// geometry.setIndex(new THREE.BufferAttribute(mesh.indices(), 1));
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct MeshHandle {
    buffers: MeshBuffers,
}

#[wasm_bindgen]
impl MeshHandle {
    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> u32 {
        self.buffers.vertex_count() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> u32 {
        self.buffers.triangle_count() as u32
    }

    /// Positions as `[x, y, z, ...]`.
    pub fn vertices(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.buffers.vertices[..])
    }

    /// Indices as `[i0, i1, i2, ...]`, counter-clockwise from outside.
    pub fn indices(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(&self.buffers.indices[..])
    }

    /// Per-vertex normals as `[nx, ny, nz, ...]`.
    pub fn normals(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.buffers.normals[..])
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.indices.is_empty()
    }
}

impl MeshHandle {
    pub fn from_buffers(buffers: MeshBuffers) -> Self {
        Self { buffers }
    }

    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }
}
