//! Application of a compiled document onto render passes
//!
//! Options and uniforms are replayed in parse order, so a later value of the
//! same kind overwrites an earlier one on the target pass. For every pass of
//! the document the target receives the file-level state, then the
//! technique-level state, then the pass's own state.

use log::debug;

use crate::ast::{BlendFunc, CullFace, File, OptionList, RenderOption, UniformValue};
use crate::resources::ShaderHandle;

/// Render pass state a document can be applied to
pub trait RenderPass {
    fn set_cull_face(&mut self, face: CullFace);
    fn set_blending_enabled(&mut self, enabled: bool);
    fn set_blend_func(&mut self, src: BlendFunc, dst: BlendFunc);
    fn set_depth_test_enabled(&mut self, enabled: bool);
    fn set_depth_write_enabled(&mut self, enabled: bool);
    fn set_shader(&mut self, shader: ShaderHandle);
    fn set_uniform(&mut self, name: &str, value: &UniformValue);
}

/// Maps techniques and passes of a document onto the caller's pass objects
///
/// `None` stands for an unnamed technique or pass, or for the implicit pass
/// of a technique (or document) that declares none.
pub trait PassResolver {
    type Pass: RenderPass;

    fn resolve_pass(
        &mut self,
        technique: Option<&str>,
        pass: Option<&str>,
    ) -> Option<&mut Self::Pass>;
}

impl RenderOption {
    pub fn apply_to_pass<P: RenderPass + ?Sized>(&self, pass: &mut P) {
        match self {
            RenderOption::CullFace(face) => pass.set_cull_face(*face),
            RenderOption::Blend(state) => {
                pass.set_blending_enabled(state.enabled);
                // Factors of a disabled blend are meaningless
                if state.enabled {
                    pass.set_blend_func(state.src, state.dst);
                }
            }
            RenderOption::DepthTest(enabled) => pass.set_depth_test_enabled(*enabled),
            RenderOption::DepthWrite(enabled) => pass.set_depth_write_enabled(*enabled),
            RenderOption::Shader(shader) => pass.set_shader(shader.handle),
        }
    }
}

impl UniformValue {
    pub fn apply_to_pass<P: RenderPass + ?Sized>(&self, pass: &mut P, name: &str) {
        pass.set_uniform(name, self);
    }
}

impl OptionList {
    /// Apply options, then uniforms, each in insertion order
    pub fn apply_to_pass<P: RenderPass + ?Sized>(&self, pass: &mut P) {
        for option in &self.options {
            option.apply_to_pass(pass);
        }
        for uniform in &self.uniforms {
            uniform.value.apply_to_pass(pass, &uniform.name);
        }
    }
}

/// Apply `file` to the passes `resolver` hands out
///
/// Returns the number of targets that received state.
pub fn apply_document<R: PassResolver + ?Sized>(file: &File, resolver: &mut R) -> usize {
    let mut applied = 0;

    if file.techniques.is_empty() {
        if let Some(target) = resolver.resolve_pass(None, None) {
            file.options.apply_to_pass(target);
            applied += 1;
        } else {
            debug!("no target for document-level pass");
        }
        return applied;
    }

    for technique in &file.techniques {
        let technique_name = technique.name.as_deref();

        if technique.passes.is_empty() {
            match resolver.resolve_pass(technique_name, None) {
                Some(target) => {
                    file.options.apply_to_pass(target);
                    technique.options.apply_to_pass(target);
                    applied += 1;
                }
                None => debug!("no target for technique {:?}", technique_name),
            }
            continue;
        }

        for pass in &technique.passes {
            let pass_name = pass.name.as_deref();
            match resolver.resolve_pass(technique_name, pass_name) {
                Some(target) => {
                    file.options.apply_to_pass(target);
                    technique.options.apply_to_pass(target);
                    pass.options.apply_to_pass(target);
                    applied += 1;
                }
                None => debug!(
                    "no target for pass {:?} of technique {:?}",
                    pass_name, technique_name
                ),
            }
        }
    }

    applied
}
