//! Property-based tests for the compiler
//!
//! Documents are generated from random option and uniform statements, so
//! every generated input is valid by construction.

use matlang::ast::{File, UniformValue};
use matlang::lexer::lex_with_spans;
use matlang::parser::grammar::parse_actions;
use matlang::parser::{Action, ParseContext};
use matlang::{compile, AssetRegistry};
use proptest::prelude::*;

fn float_literal() -> impl Strategy<Value = String> {
    (-1000i32..1000, 0u32..1000, prop::option::of(-5i32..5)).prop_map(|(whole, frac, exp)| {
        let mut text = format!("{}.{}", whole, frac);
        if let Some(exp) = exp {
            text.push_str(&format!("e{}", exp));
        }
        text
    })
}

fn statement() -> impl Strategy<Value = String> {
    let cull = prop::sample::select(vec!["None", "Front", "Back"])
        .prop_map(|face| format!("CullFace: {}", face));
    let factor = prop::sample::select(vec![
        "Zero",
        "One",
        "SrcColor",
        "SrcAlpha",
        "SrcAlphaSaturate",
        "DstColor",
        "DstAlpha",
        "OneMinusSrcColor",
        "OneMinusSrcAlpha",
        "OneMinusDstColor",
        "OneMinusDstAlpha",
    ]);
    let blend = (factor.clone(), factor).prop_map(|(src, dst)| format!("BlendFunc {}, {}", src, dst));
    let depth = (
        prop::sample::select(vec!["DepthTest", "DepthWrite"]),
        prop::sample::select(vec!["On", "Off"]),
    )
        .prop_map(|(option, value)| format!("{} {}", option, value));
    let uniform = ("[a-z][a-z0-9_]{0,6}", prop::collection::vec(float_literal(), 1..=4)).prop_map(
        |(name, components)| {
            if components.len() == 1 {
                format!("SetUniform {} {}", name, components[0])
            } else {
                format!("SetUniform {} ({})", name, components.join(", "))
            }
        },
    );
    prop_oneof![cull, blend, depth, uniform]
}

fn pass_source() -> impl Strategy<Value = String> {
    (
        prop::option::of("[a-z]{1,6}"),
        prop::collection::vec(statement(), 0..4),
    )
        .prop_map(|(name, body)| {
            format!(
                "pass {} {{\n{}\n}}",
                name.unwrap_or_default(),
                body.join("\n")
            )
        })
}

fn technique_source() -> impl Strategy<Value = String> {
    (
        prop::option::of("[a-z]{1,6}"),
        prop::collection::vec(statement(), 0..3),
        prop::collection::vec(pass_source(), 0..3),
    )
        .prop_map(|(name, options, passes)| {
            format!(
                "technique {} {{\n{}\n{}\n}}",
                name.unwrap_or_default(),
                options.join("\n"),
                passes.join("\n")
            )
        })
}

fn document() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(statement(), 0..4),
        prop::collection::vec(technique_source(), 0..3),
    )
        .prop_map(|(options, techniques)| {
            format!("{}\n{}\n", options.join("\n"), techniques.join("\n"))
        })
}

fn compile_ok(source: &str) -> File {
    let mut registry = AssetRegistry::new();
    compile(source, "generated.mat", &mut registry).unwrap_or_else(|err| panic!("{}\n{}", err, source))
}

proptest! {
    #[test]
    fn compiling_twice_yields_identical_trees(source in document()) {
        prop_assert_eq!(compile_ok(&source), compile_ok(&source));
    }

    #[test]
    fn scopes_balance_and_unwind(source in document()) {
        let tokens = lex_with_spans(&source).unwrap();
        let actions = parse_actions(tokens).unwrap();

        let begins = actions
            .iter()
            .filter(|(action, _)| matches!(action, Action::TechniqueBegin { .. } | Action::PassBegin { .. }))
            .count();
        let ends = actions
            .iter()
            .filter(|(action, _)| matches!(action, Action::TechniqueEnd | Action::PassEnd))
            .count();
        prop_assert_eq!(begins, ends);

        let mut registry = AssetRegistry::new();
        let mut context = ParseContext::new(&source, "generated.mat", &mut registry);
        context.apply_all(actions).unwrap();
        prop_assert_eq!(context.depth(), 1);
        prop_assert!(context.finish().is_ok());
    }

    #[test]
    fn float_literals_decode_like_str_parse(literal in float_literal()) {
        let file = compile_ok(&format!("SetUniform x {}", literal));
        let expected: f32 = literal.parse().unwrap();
        prop_assert_eq!(file.options.uniform("x"), Some(&UniformValue::Float(expected)));
    }

    #[test]
    fn vector_components_keep_their_order(components in prop::collection::vec(-100i32..100, 2..=4)) {
        let literals: Vec<String> = components.iter().map(|c| c.to_string()).collect();
        let file = compile_ok(&format!("SetUniform v ({})", literals.join(", ")));
        let floats: Vec<f32> = components.iter().map(|&c| c as f32).collect();
        let expected = match floats.len() {
            2 => UniformValue::Vec2([floats[0], floats[1]]),
            3 => UniformValue::Vec3([floats[0], floats[1], floats[2]]),
            _ => UniformValue::Vec4([floats[0], floats[1], floats[2], floats[3]]),
        };
        prop_assert_eq!(file.options.uniform("v"), Some(&expected));
    }
}
