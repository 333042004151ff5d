//! genimage MCP server library
//!
//! Turns a text prompt into a PNG file on local disk using the Gemini or
//! Imagen models of the Generative Language API, exposed as an MCP tool.

pub mod handler;
pub mod resources;
pub mod response;
pub mod server;
pub mod storage;
pub mod viewer;

pub use handler::{GenerateImageParams, ImageHandler, StoredImageFile};
pub use server::ImageServer;
pub use viewer::{ImageViewer, NoopViewer, SystemViewer};
