//! Parse tree of the material language
//!
//! The tree produced by the compiler: a [`File`] of [`Technique`]s of
//! [`Pass`]es, each carrying an [`OptionList`] of render options and uniform
//! bindings, plus the source position helpers used for diagnostics.

pub mod position;
pub mod tree;
pub mod values;

pub use position::Position;
pub use tree::{
    File, OptionList, Pass, RenderOption, ResourceRef, Technique, Uniform, UniformValue,
};
pub use values::{BlendFunc, BlendState, CullFace};
