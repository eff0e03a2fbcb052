//! Semantic actions fired by grammar rules
//!
//! Each successful rule match contributes the actions below, in match order.
//! Literal rules push a decoded value; composite rules pop the fixed number
//! of values their production is known to have pushed; scope rules open and
//! close techniques and passes. The [`ParseContext`](super::context::ParseContext)
//! gives them meaning.

use std::ops::Range;

use crate::ast::{BlendFunc, CullFace};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Literals
    BoolFalse,
    BoolTrue,
    Float(f32),
    Identifier(String),
    String(String),
    BlendFunc(BlendFunc),

    // Options
    CullFaceOption(CullFace),
    /// Pops a source and a destination factor when `enabled`
    BlendOption {
        enabled: bool,
    },
    DepthTestOption,
    DepthWriteOption,
    ShaderOption,

    // Uniforms
    UniformFloatValue,
    UniformVec2Value,
    UniformVec3Value,
    UniformVec4Value,
    UniformTextureValue,
    Uniform,

    // Scopes
    TechniqueBegin {
        name: Option<String>,
    },
    TechniqueEnd,
    PassBegin {
        name: Option<String>,
    },
    PassEnd,
}

impl Action {
    /// Rule name, as used in diagnostics
    pub fn rule_name(&self) -> &'static str {
        match self {
            Action::BoolFalse => "BoolFalse",
            Action::BoolTrue => "BoolTrue",
            Action::Float(_) => "FloatingPointNumber",
            Action::Identifier(_) => "IdentifierText",
            Action::String(_) => "StringLiteral",
            Action::BlendFunc(_) => "BlendFuncValue",
            Action::CullFaceOption(_) => "CullFaceOption",
            Action::BlendOption { .. } => "BlendOption",
            Action::DepthTestOption => "DepthTestOption",
            Action::DepthWriteOption => "DepthWriteOption",
            Action::ShaderOption => "ShaderOption",
            Action::UniformFloatValue => "UniformFloatValue",
            Action::UniformVec2Value => "UniformVec2Value",
            Action::UniformVec3Value => "UniformVec3Value",
            Action::UniformVec4Value => "UniformVec4Value",
            Action::UniformTextureValue => "UniformTextureValue",
            Action::Uniform => "Uniform",
            Action::TechniqueBegin { .. } => "TechniqueBegin",
            Action::TechniqueEnd => "TechniqueEnd",
            Action::PassBegin { .. } => "PassBegin",
            Action::PassEnd => "PassEnd",
        }
    }

    /// Whether this action completes an option or uniform production
    pub fn completes_statement(&self) -> bool {
        matches!(
            self,
            Action::CullFaceOption(_)
                | Action::BlendOption { .. }
                | Action::DepthTestOption
                | Action::DepthWriteOption
                | Action::ShaderOption
                | Action::Uniform
        )
    }
}

/// Action with the byte range of the input its rule matched
pub type SpannedAction = (Action, Range<usize>);
