//! Materials: resolved render state built from a document
//!
//! A [`Material`] owns [`MaterialTechnique`]s, each owning [`MaterialPass`]es
//! that hold the final state of one pass after file, technique and pass
//! options have been applied on top of the engine defaults.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::apply::{PassResolver, RenderPass};
use crate::ast::{BlendFunc, BlendState, CullFace, File, OptionList, UniformValue};
use crate::config::CompilerConfig;
use crate::error::CompileResult;
use crate::parser::compile_file;
use crate::resources::{ResourceResolver, ShaderHandle};

/// Render state of one pass
///
/// Defaults: back faces culled, blending off with `SrcAlpha, OneMinusSrcAlpha`
/// factors, depth test and depth write off, no shader.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPass {
    name: Option<String>,
    cull_face: CullFace,
    blend: BlendState,
    depth_test: bool,
    depth_write: bool,
    shader: Option<ShaderHandle>,
    uniforms: Vec<(String, UniformValue)>,
    uniform_index: HashMap<String, usize>,
}

impl MaterialPass {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            cull_face: CullFace::Back,
            blend: BlendState::disabled(),
            depth_test: false,
            depth_write: false,
            shader: None,
            uniforms: Vec::new(),
            uniform_index: HashMap::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn cull_face(&self) -> CullFace {
        self.cull_face
    }

    pub fn blend(&self) -> BlendState {
        self.blend
    }

    pub fn depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    pub fn depth_write_enabled(&self) -> bool {
        self.depth_write
    }

    pub fn shader(&self) -> Option<ShaderHandle> {
        self.shader
    }

    /// Uniforms in the order their names were first set
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.uniforms
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniform_index
            .get(name)
            .map(|&index| &self.uniforms[index].1)
    }

    /// Forward the whole state of this pass to another render pass
    pub fn apply_to<P: RenderPass + ?Sized>(&self, target: &mut P) {
        if let Some(shader) = self.shader {
            target.set_shader(shader);
        }
        target.set_cull_face(self.cull_face);
        target.set_depth_test_enabled(self.depth_test);
        target.set_depth_write_enabled(self.depth_write);
        target.set_blending_enabled(self.blend.enabled);
        if self.blend.enabled {
            target.set_blend_func(self.blend.src, self.blend.dst);
        }
        for (name, value) in &self.uniforms {
            target.set_uniform(name, value);
        }
    }
}

impl RenderPass for MaterialPass {
    fn set_cull_face(&mut self, face: CullFace) {
        self.cull_face = face;
    }

    fn set_blending_enabled(&mut self, enabled: bool) {
        self.blend.enabled = enabled;
    }

    fn set_blend_func(&mut self, src: BlendFunc, dst: BlendFunc) {
        self.blend.src = src;
        self.blend.dst = dst;
    }

    fn set_depth_test_enabled(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn set_depth_write_enabled(&mut self, enabled: bool) {
        self.depth_write = enabled;
    }

    fn set_shader(&mut self, shader: ShaderHandle) {
        self.shader = Some(shader);
    }

    fn set_uniform(&mut self, name: &str, value: &UniformValue) {
        match self.uniform_index.get(name) {
            Some(&index) => self.uniforms[index].1 = value.clone(),
            None => {
                self.uniform_index
                    .insert(name.to_string(), self.uniforms.len());
                self.uniforms.push((name.to_string(), value.clone()));
            }
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "On"
    } else {
        "Off"
    }
}

impl fmt::Display for MaterialPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CullFace {}", self.cull_face)?;
        writeln!(f, "BlendFunc {}", self.blend)?;
        writeln!(f, "DepthTest {}", on_off(self.depth_test))?;
        writeln!(f, "DepthWrite {}", on_off(self.depth_write))?;
        match self.shader {
            Some(shader) => writeln!(f, "Shader #{}", shader.0)?,
            None => writeln!(f, "Shader none")?,
        }
        for (name, value) in &self.uniforms {
            writeln!(f, "SetUniform {} {}", name, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTechnique {
    name: Option<String>,
    passes: Vec<MaterialPass>,
}

impl MaterialTechnique {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            passes: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn passes(&self) -> &[MaterialPass] {
        &self.passes
    }

    pub fn pass(&self, name: &str) -> Option<&MaterialPass> {
        self.passes.iter().find(|pass| pass.name() == Some(name))
    }

    pub fn pass_at(&self, index: usize) -> Option<&MaterialPass> {
        self.passes.get(index)
    }

    pub fn add_pass(&mut self, pass: MaterialPass) {
        self.passes.push(pass);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    techniques: Vec<MaterialTechnique>,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the material described by a compiled document
    ///
    /// A technique without passes gets one unnamed pass. A document without
    /// techniques gets one unnamed technique holding that pass.
    pub fn from_document(file: &File) -> Self {
        let mut material = Material::new();

        if file.techniques.is_empty() {
            let mut technique = MaterialTechnique::new(None);
            technique.add_pass(build_pass(None, &[&file.options]));
            material.add_technique(technique);
            return material;
        }

        for source in &file.techniques {
            let mut technique = MaterialTechnique::new(source.name.clone());
            if source.passes.is_empty() {
                technique.add_pass(build_pass(None, &[&file.options, &source.options]));
            }
            for pass in &source.passes {
                technique.add_pass(build_pass(
                    pass.name.clone(),
                    &[&file.options, &source.options, &pass.options],
                ));
            }
            material.add_technique(technique);
        }
        material
    }

    /// Read, compile and build the material stored at `path`
    pub fn load<R>(
        path: impl AsRef<Path>,
        resolver: &mut R,
        config: &CompilerConfig,
    ) -> CompileResult<Self>
    where
        R: ResourceResolver + ?Sized,
    {
        let file = compile_file(path, resolver, config)?;
        Ok(Self::from_document(&file))
    }

    pub fn techniques(&self) -> &[MaterialTechnique] {
        &self.techniques
    }

    pub fn technique(&self, name: &str) -> Option<&MaterialTechnique> {
        self.techniques
            .iter()
            .find(|technique| technique.name() == Some(name))
    }

    pub fn technique_at(&self, index: usize) -> Option<&MaterialTechnique> {
        self.techniques.get(index)
    }

    pub fn add_technique(&mut self, technique: MaterialTechnique) {
        self.techniques.push(technique);
    }

    pub fn pass_count(&self) -> usize {
        self.techniques.iter().map(|t| t.passes.len()).sum()
    }
}

fn build_pass(name: Option<String>, layers: &[&OptionList]) -> MaterialPass {
    let mut pass = MaterialPass::new(name);
    for layer in layers {
        layer.apply_to_pass(&mut pass);
    }
    pass
}

impl PassResolver for Material {
    type Pass = MaterialPass;

    /// First technique and pass whose names match; `None` matches unnamed ones
    fn resolve_pass(
        &mut self,
        technique: Option<&str>,
        pass: Option<&str>,
    ) -> Option<&mut MaterialPass> {
        self.techniques
            .iter_mut()
            .find(|candidate| candidate.name.as_deref() == technique)?
            .passes
            .iter_mut()
            .find(|candidate| candidate.name.as_deref() == pass)
    }
}
