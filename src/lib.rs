//! # matlang
//!
//! A compiler for the text material description language.
//!
//! A material document declares fixed-function render state (cull face,
//! blending, depth test and write), a shader and named uniform bindings, at
//! document, technique and pass level:
//!
//! ```text
//! technique main {
//!     Shader "lit.glsl"
//!     pass {
//!         CullFace Back
//!         BlendFunc SrcAlpha, OneMinusSrcAlpha
//!         SetUniform tint (1.0, 0.5, 0.25, 1.0)
//!     }
//! }
//! ```
//!
//! [`compile`] turns such text into a [`File`](ast::File) tree;
//! [`apply_document`] replays the tree onto render passes, and
//! [`Material::from_document`] builds the resolved state directly.

pub mod apply;
pub mod ast;
pub mod config;
pub mod error;
pub mod formats;
pub mod lexer;
pub mod material;
pub mod parser;
pub mod resources;

pub use apply::{apply_document, PassResolver, RenderPass};
pub use config::CompilerConfig;
pub use error::{CompileError, CompileResult, ErrorKind};
pub use material::{Material, MaterialPass, MaterialTechnique};
pub use parser::{compile, compile_file, compile_with_config};
pub use resources::{AssetRegistry, ResourceResolver, ShaderHandle, TextureHandle};
