//! Asset loading/parsers (meshes, textures).
//! Binary teapot mesh loader, smooth normal estimation, RGBA8 texture decode.

pub mod binary;
pub mod error;
pub mod mesh;
mod normals;
pub mod texture;

pub use error::{AssetError, AssetResult};
pub use mesh::{Bounds, MeshData, Vertex};
pub use texture::TextureData;
