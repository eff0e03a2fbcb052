//! Parse context: the state machine behind the semantic actions
//!
//! The context is created fresh for every compilation and owned by the call
//! that drives it. It keeps typed stacks of pending literal values, the stack
//! of open scopes (`File`, then optionally a `Technique`, then optionally a
//! `Pass`), the technique and pass being built, and the document root.
//!
//! Literal values are pushed as their rules match and popped by the composite
//! rule that needs them, so a `Vec3` uniform pops its three floats last
//! component first and pushes a single assembled value.

use std::ops::Range;

use crate::ast::{
    BlendFunc, BlendState, File, OptionList, Pass, RenderOption, ResourceRef, Technique,
    UniformValue,
};
use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::parser::actions::Action;
use crate::resources::ResourceResolver;

/// Kind of an open option-list scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    File,
    Technique,
    Pass,
}

pub struct ParseContext<'a, R: ResourceResolver + ?Sized> {
    source: &'a str,
    source_path: String,
    resolver: &'a mut R,
    bool_values: Vec<bool>,
    float_values: Vec<f32>,
    string_values: Vec<String>,
    blend_func_values: Vec<BlendFunc>,
    uniform_values: Vec<UniformValue>,
    scopes: Vec<Scope>,
    current_technique: Option<Technique>,
    current_pass: Option<Pass>,
    file: File,
}

impl<'a, R: ResourceResolver + ?Sized> ParseContext<'a, R> {
    /// Fresh context with the document root as the only open scope
    pub fn new(source: &'a str, source_path: impl Into<String>, resolver: &'a mut R) -> Self {
        Self {
            source,
            source_path: source_path.into(),
            resolver,
            bool_values: Vec::new(),
            float_values: Vec::new(),
            string_values: Vec::new(),
            blend_func_values: Vec::new(),
            uniform_values: Vec::new(),
            scopes: vec![Scope::File],
            current_technique: None,
            current_pass: None,
            file: File::default(),
        }
    }

    /// Number of open scopes, the document root included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current_scope(&self) -> Option<Scope> {
        self.scopes.last().copied()
    }

    /// Run one semantic action for the rule that matched `span`
    ///
    /// Internal-defect errors name the rule whose action failed.
    pub fn apply(&mut self, action: Action, span: Range<usize>) -> CompileResult<()> {
        let rule = action.rule_name();
        self.run_action(action, span).map_err(|mut err| {
            if err.kind.is_internal() {
                err.message = format!("{}: {}", rule, err.message);
            }
            err
        })
    }

    fn run_action(&mut self, action: Action, span: Range<usize>) -> CompileResult<()> {
        let completes_statement = action.completes_statement();
        match action {
            Action::BoolFalse => self.bool_values.push(false),
            Action::BoolTrue => self.bool_values.push(true),
            Action::Float(value) => self.float_values.push(value),
            Action::Identifier(text) | Action::String(text) => self.string_values.push(text),
            Action::BlendFunc(func) => self.blend_func_values.push(func),

            Action::CullFaceOption(face) => {
                self.emit_option(RenderOption::CullFace(face), &span)?;
            }
            Action::BlendOption { enabled } => {
                let state = if enabled {
                    let dst = self.pop_blend_func(&span)?;
                    let src = self.pop_blend_func(&span)?;
                    BlendState::enabled(src, dst)
                } else {
                    BlendState::disabled()
                };
                self.emit_option(RenderOption::Blend(state), &span)?;
            }
            Action::DepthTestOption => {
                let value = self.pop_bool(&span)?;
                self.emit_option(RenderOption::DepthTest(value), &span)?;
            }
            Action::DepthWriteOption => {
                let value = self.pop_bool(&span)?;
                self.emit_option(RenderOption::DepthWrite(value), &span)?;
            }
            Action::ShaderOption => {
                let reference = self.pop_string(&span)?;
                let path = self
                    .resolver
                    .resolve_relative_path(&reference, &self.source_path);
                let handle = match self.resolver.load_shader(&path) {
                    Ok(handle) => handle,
                    Err(err) => {
                        return Err(self.error(ErrorKind::ResourceResolution, &span, err.to_string()))
                    }
                };
                self.emit_option(RenderOption::Shader(ResourceRef::new(path, handle)), &span)?;
            }

            Action::UniformFloatValue => {
                let x = self.pop_float(&span)?;
                self.uniform_values.push(UniformValue::Float(x));
            }
            Action::UniformVec2Value => {
                let y = self.pop_float(&span)?;
                let x = self.pop_float(&span)?;
                self.uniform_values.push(UniformValue::Vec2([x, y]));
            }
            Action::UniformVec3Value => {
                let z = self.pop_float(&span)?;
                let y = self.pop_float(&span)?;
                let x = self.pop_float(&span)?;
                self.uniform_values.push(UniformValue::Vec3([x, y, z]));
            }
            Action::UniformVec4Value => {
                let w = self.pop_float(&span)?;
                let z = self.pop_float(&span)?;
                let y = self.pop_float(&span)?;
                let x = self.pop_float(&span)?;
                self.uniform_values.push(UniformValue::Vec4([x, y, z, w]));
            }
            Action::UniformTextureValue => {
                let reference = self.pop_string(&span)?;
                let path = self
                    .resolver
                    .resolve_relative_path(&reference, &self.source_path);
                let handle = match self.resolver.load_texture(&path) {
                    Ok(handle) => handle,
                    Err(err) => {
                        return Err(self.error(ErrorKind::ResourceResolution, &span, err.to_string()))
                    }
                };
                self.uniform_values
                    .push(UniformValue::Texture(ResourceRef::new(path, handle)));
            }
            Action::Uniform => {
                let value = match self.uniform_values.pop() {
                    Some(value) => value,
                    None => return Err(self.underflow(&span, "uniform")),
                };
                let name = self.pop_string(&span)?;
                self.with_current_list(&span, |list| list.push_uniform(name, value))?;
            }

            Action::TechniqueBegin { name } => {
                if self.current_technique.is_some() || self.current_scope() != Some(Scope::File) {
                    return Err(self.error(
                        ErrorKind::ScopeImbalance,
                        &span,
                        "technique opened while another scope is open",
                    ));
                }
                self.current_technique = Some(Technique::new(name));
                self.scopes.push(Scope::Technique);
            }
            Action::TechniqueEnd => {
                self.pop_scope(Scope::Technique, &span)?;
                match self.current_technique.take() {
                    Some(technique) => self.file.techniques.push(technique),
                    None => {
                        return Err(self.error(
                            ErrorKind::ScopeImbalance,
                            &span,
                            "technique closed without being opened",
                        ))
                    }
                }
            }
            Action::PassBegin { name } => {
                if self.current_pass.is_some()
                    || self.current_technique.is_none()
                    || self.current_scope() != Some(Scope::Technique)
                {
                    return Err(self.error(
                        ErrorKind::ScopeImbalance,
                        &span,
                        "pass opened outside of a technique",
                    ));
                }
                self.current_pass = Some(Pass::new(name));
                self.scopes.push(Scope::Pass);
            }
            Action::PassEnd => {
                self.pop_scope(Scope::Pass, &span)?;
                let pass = self.current_pass.take();
                match (pass, self.current_technique.as_mut()) {
                    (Some(pass), Some(technique)) => technique.passes.push(pass),
                    _ => {
                        return Err(self.error(
                            ErrorKind::ScopeImbalance,
                            &span,
                            "pass closed without being opened",
                        ))
                    }
                }
            }
        }

        if completes_statement {
            self.check_consumed(&span)?;
        }
        Ok(())
    }

    /// Run a sequence of actions in order, stopping at the first failure
    pub fn apply_all<I>(&mut self, actions: I) -> CompileResult<()>
    where
        I: IntoIterator<Item = (Action, Range<usize>)>,
    {
        for (action, span) in actions {
            self.apply(action, span)?;
        }
        Ok(())
    }

    /// Extract the document once the whole input has been consumed
    pub fn finish(self) -> CompileResult<File> {
        let end = self.source.len()..self.source.len();
        if self.scopes != [Scope::File] || self.current_technique.is_some() {
            let open = self
                .current_scope()
                .map(|scope| format!("{:?}", scope).to_lowercase())
                .unwrap_or_else(|| "document".to_string());
            return Err(self.error(
                ErrorKind::ScopeImbalance,
                &end,
                format!("end of input with {} scope still open", open),
            ));
        }
        self.check_consumed(&end)?;
        Ok(self.file)
    }

    fn emit_option(&mut self, option: RenderOption, span: &Range<usize>) -> CompileResult<()> {
        self.with_current_list(span, |list| list.push_option(option))
    }

    fn with_current_list<F>(&mut self, span: &Range<usize>, f: F) -> CompileResult<()>
    where
        F: FnOnce(&mut OptionList),
    {
        let list = match self.scopes.last() {
            Some(Scope::File) => Some(&mut self.file.options),
            Some(Scope::Technique) => self.current_technique.as_mut().map(|t| &mut t.options),
            Some(Scope::Pass) => self.current_pass.as_mut().map(|p| &mut p.options),
            None => None,
        };
        match list {
            Some(list) => {
                f(list);
                Ok(())
            }
            None => Err(self.error(
                ErrorKind::ScopeImbalance,
                span,
                "no open scope to receive the statement",
            )),
        }
    }

    fn pop_scope(&mut self, expected: Scope, span: &Range<usize>) -> CompileResult<()> {
        // The document root is never popped
        if self.scopes.len() > 1 && self.scopes.last() == Some(&expected) {
            self.scopes.pop();
            Ok(())
        } else {
            let found = self.current_scope();
            Err(self.error(
                ErrorKind::ScopeImbalance,
                span,
                format!("closing {:?} scope but the open scope is {:?}", expected, found),
            ))
        }
    }

    fn pop_bool(&mut self, span: &Range<usize>) -> CompileResult<bool> {
        self.bool_values
            .pop()
            .ok_or_else(|| self.underflow(span, "bool"))
    }

    fn pop_float(&mut self, span: &Range<usize>) -> CompileResult<f32> {
        self.float_values
            .pop()
            .ok_or_else(|| self.underflow(span, "float"))
    }

    fn pop_string(&mut self, span: &Range<usize>) -> CompileResult<String> {
        self.string_values
            .pop()
            .ok_or_else(|| self.underflow(span, "string"))
    }

    fn pop_blend_func(&mut self, span: &Range<usize>) -> CompileResult<BlendFunc> {
        self.blend_func_values
            .pop()
            .ok_or_else(|| self.underflow(span, "blend function"))
    }

    fn check_consumed(&self, span: &Range<usize>) -> CompileResult<()> {
        let leftovers = [
            ("bool", self.bool_values.len()),
            ("float", self.float_values.len()),
            ("string", self.string_values.len()),
            ("blend function", self.blend_func_values.len()),
            ("uniform value", self.uniform_values.len()),
        ];
        match leftovers.iter().find(|(_, count)| *count > 0) {
            Some((stack, count)) => Err(self.error(
                ErrorKind::UnconsumedValues,
                span,
                format!("{} {} value(s) left unconsumed", count, stack),
            )),
            None => Ok(()),
        }
    }

    fn underflow(&self, span: &Range<usize>, stack: &str) -> CompileError {
        self.error(
            ErrorKind::StackUnderflow,
            span,
            format!("expected a pending {} value but the stack is empty", stack),
        )
    }

    fn error(&self, kind: ErrorKind, span: &Range<usize>, message: impl Into<String>) -> CompileError {
        CompileError::new(kind, self.source_path.as_str(), message).at_offset(self.source, span.start)
    }
}
