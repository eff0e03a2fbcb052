//! Parse tree of a material document
//!
//! A [`File`] owns its techniques, a [`Technique`] owns its passes, and every
//! level carries an [`OptionList`]. Nodes are built bottom-up by the parse
//! context and never shared between parents.

use serde::Serialize;
use std::fmt;

use super::values::{BlendState, CullFace};
use crate::resources::{ShaderHandle, TextureHandle};

/// A resource reference after path resolution and loading
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceRef<H> {
    /// Path computed relative to the document
    pub path: String,
    pub handle: H,
}

impl<H> ResourceRef<H> {
    pub fn new(path: impl Into<String>, handle: H) -> Self {
        Self {
            path: path.into(),
            handle,
        }
    }
}

/// One fixed-function setting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RenderOption {
    CullFace(CullFace),
    Blend(BlendState),
    DepthTest(bool),
    DepthWrite(bool),
    Shader(ResourceRef<ShaderHandle>),
}

impl RenderOption {
    /// Keyword that introduces this option in source text
    pub fn keyword(&self) -> &'static str {
        match self {
            RenderOption::CullFace(_) => "CullFace",
            RenderOption::Blend(_) => "BlendFunc",
            RenderOption::DepthTest(_) => "DepthTest",
            RenderOption::DepthWrite(_) => "DepthWrite",
            RenderOption::Shader(_) => "Shader",
        }
    }
}

impl fmt::Display for RenderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |enabled: bool| if enabled { "On" } else { "Off" };
        match self {
            RenderOption::CullFace(face) => write!(f, "{} {}", self.keyword(), face),
            RenderOption::Blend(state) => write!(f, "{} {}", self.keyword(), state),
            RenderOption::DepthTest(enabled) | RenderOption::DepthWrite(enabled) => {
                write!(f, "{} {}", self.keyword(), on_off(*enabled))
            }
            RenderOption::Shader(shader) => write!(f, "{} {:?}", self.keyword(), shader.path),
        }
    }
}

/// Value bound to a named uniform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Texture(ResourceRef<TextureHandle>),
}

impl UniformValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            UniformValue::Float(_) => "float",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Texture(_) => "texture",
        }
    }
}

impl fmt::Display for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components: &[f32] = match self {
            UniformValue::Float(x) => return write!(f, "{}", x),
            UniformValue::Texture(texture) => return write!(f, "{:?}", texture.path),
            UniformValue::Vec2(v) => v,
            UniformValue::Vec3(v) => v,
            UniformValue::Vec4(v) => v,
        };
        f.write_str("(")?;
        for (i, component) in components.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", component)?;
        }
        f.write_str(")")
    }
}

/// Named uniform binding, in source order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Uniform {
    pub name: String,
    pub value: UniformValue,
}

/// Options and uniforms of one scope
///
/// Both sequences keep insertion order. Duplicates are kept: when applied,
/// the later entry overwrites the earlier one on the target pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionList {
    pub options: Vec<RenderOption>,
    pub uniforms: Vec<Uniform>,
}

impl OptionList {
    pub fn push_option(&mut self, option: RenderOption) {
        self.options.push(option);
    }

    pub fn push_uniform(&mut self, name: impl Into<String>, value: UniformValue) {
        self.uniforms.push(Uniform {
            name: name.into(),
            value,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.uniforms.is_empty()
    }

    /// Last value bound to `name` in this scope
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms
            .iter()
            .rev()
            .find(|uniform| uniform.name == name)
            .map(|uniform| &uniform.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pass {
    pub name: Option<String>,
    #[serde(flatten)]
    pub options: OptionList,
}

impl Pass {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            options: OptionList::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Technique {
    pub name: Option<String>,
    #[serde(flatten)]
    pub options: OptionList,
    pub passes: Vec<Pass>,
}

impl Technique {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            options: OptionList::default(),
            passes: Vec::new(),
        }
    }

    /// First pass called `name`
    pub fn pass(&self, name: &str) -> Option<&Pass> {
        self.passes
            .iter()
            .find(|pass| pass.name.as_deref() == Some(name))
    }
}

/// Document root
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct File {
    #[serde(flatten)]
    pub options: OptionList,
    pub techniques: Vec<Technique>,
}

impl File {
    /// First technique called `name`
    pub fn technique(&self, name: &str) -> Option<&Technique> {
        self.techniques
            .iter()
            .find(|technique| technique.name.as_deref() == Some(name))
    }

    pub fn pass_count(&self) -> usize {
        self.techniques.iter().map(|t| t.passes.len()).sum()
    }
}
