//! Grammar of the material language
//!
//! Combinators over the `(Token, byte range)` stream produced by the lexer.
//! Every rule yields the semantic actions its match fired, in match order and
//! each with the byte range it covers. Alternatives that fail are backtracked
//! together with their actions, so only the successful parse reaches the
//! [`ParseContext`](super::context::ParseContext).
//!
//! Grammar:
//!
//! ```text
//! File          = (Technique | Option | Uniform)* EOF
//! Technique     = "technique" Ident? "{" (Pass | Option | Uniform)* "}"
//! Pass          = "pass" Ident? "{" (Option | Uniform)* "}"
//! Option        = CullFace | BlendFunc | DepthTest | DepthWrite | Shader
//! CullFace      = "CullFace" ":"? ("None" | "Front" | "Back")
//! BlendFunc     = "BlendFunc" ":"? ("Disabled" | BlendFactor "," BlendFactor)
//! DepthTest     = "DepthTest" ":"? ("On" | "Off")
//! DepthWrite    = "DepthWrite" ":"? ("On" | "Off")
//! Shader        = "Shader" ":"? String
//! Uniform       = "SetUniform" Ident UniformValue
//! UniformValue  = Vec4 | Vec3 | Vec2 | Float | String
//! ```

use chumsky::prelude::*;
use std::ops::Range;

use crate::ast::{BlendFunc, CullFace};
use crate::lexer::{decode_float, Token, TokenSpan};
use crate::parser::actions::{Action, SpannedAction};

/// Type alias for parser error
pub type ParserError = Simple<TokenSpan>;

type Actions = Vec<SpannedAction>;

/// Match a specific punctuation token, yielding its byte range
fn token(expected: Token) -> impl Parser<TokenSpan, Range<usize>, Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok == &expected).map(|(_, range)| range)
}

/// Match the identifier `word`, yielding its byte range
fn keyword(word: &'static str) -> impl Parser<TokenSpan, Range<usize>, Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok.is_keyword(word)).map(|(_, range)| range)
}

/// Optional `:` between an option keyword and its value
fn separator() -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    token(Token::Colon).or_not().ignored()
}

fn identifier() -> impl Parser<TokenSpan, (String, Range<usize>), Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Ident(text) => Ok((text, range)),
        other => Err(Simple::custom(
            span,
            format!("expected identifier, found `{}`", other),
        )),
    })
}

pub fn bool_value() -> impl Parser<TokenSpan, SpannedAction, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match &tok {
        Token::Ident(text) if text == "On" => Ok((Action::BoolTrue, range)),
        Token::Ident(text) if text == "Off" => Ok((Action::BoolFalse, range)),
        _ => Err(Simple::custom(
            span,
            format!("expected `On` or `Off`, found `{}`", tok),
        )),
    })
}

pub fn float_value() -> impl Parser<TokenSpan, SpannedAction, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match &tok {
        Token::Float(text) => match decode_float(text) {
            Some(value) => Ok((Action::Float(value), range)),
            None => Err(Simple::custom(
                span,
                format!("number `{}` out of range for a 32-bit float", text),
            )),
        },
        _ => Err(Simple::custom(
            span,
            format!("expected number, found `{}`", tok),
        )),
    })
}

pub fn string_value() -> impl Parser<TokenSpan, SpannedAction, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Str(text) => Ok((Action::String(text), range)),
        other => Err(Simple::custom(
            span,
            format!("expected string literal, found `{}`", other),
        )),
    })
}

fn cull_face_value() -> impl Parser<TokenSpan, (CullFace, Range<usize>), Error = ParserError> + Clone
{
    filter_map(|span, (tok, range): TokenSpan| {
        let face = match &tok {
            Token::Ident(text) => CullFace::from_keyword(text),
            _ => None,
        };
        face.map(|face| (face, range))
            .ok_or_else(|| Simple::custom(span, format!("unknown cull face `{}`", tok)))
    })
}

pub fn blend_func_value() -> impl Parser<TokenSpan, SpannedAction, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        let func = match &tok {
            Token::Ident(text) => BlendFunc::from_keyword(text),
            _ => None,
        };
        func.map(|func| (Action::BlendFunc(func), range))
            .ok_or_else(|| Simple::custom(span, format!("unknown blend function `{}`", tok)))
    })
}

fn cull_face_option() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    keyword("CullFace")
        .then_ignore(separator())
        .then(cull_face_value())
        .map(|(start, (face, end))| vec![(Action::CullFaceOption(face), start.start..end.end)])
}

fn blend_option() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    let disabled = keyword("Disabled").map(|range| (Vec::new(), false, range.end));
    let pair = blend_func_value()
        .then_ignore(token(Token::Comma))
        .then(blend_func_value())
        .map(|(src, dst)| {
            let end = dst.1.end;
            (vec![src, dst], true, end)
        });

    keyword("BlendFunc")
        .then_ignore(separator())
        .then(disabled.or(pair))
        .map(|(start, (mut actions, enabled, end))| {
            actions.push((Action::BlendOption { enabled }, start.start..end));
            actions
        })
}

fn bool_option(
    word: &'static str,
    action: Action,
) -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    keyword(word)
        .then_ignore(separator())
        .then(bool_value())
        .map(move |(start, value)| {
            let range = start.start..value.1.end;
            vec![value, (action.clone(), range)]
        })
}

fn shader_option() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    keyword("Shader")
        .then_ignore(separator())
        .ignore_then(string_value())
        .map(|reference| {
            // Resource errors point at the literal
            let range = reference.1.clone();
            vec![reference, (Action::ShaderOption, range)]
        })
}

pub fn option() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    choice((
        cull_face_option(),
        blend_option(),
        bool_option("DepthTest", Action::DepthTestOption).boxed(),
        bool_option("DepthWrite", Action::DepthWriteOption).boxed(),
        shader_option(),
    ))
    .boxed()
}

/// Parenthesized tuple of exactly `arity` floats
fn vector_value(
    arity: usize,
    action: Action,
) -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    token(Token::LParen)
        .then(float_value().separated_by(token(Token::Comma)).exactly(arity))
        .then(token(Token::RParen))
        .map(move |((open, mut components), close)| {
            components.push((action.clone(), open.start..close.end));
            components
        })
}

pub fn uniform_value() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    let float = float_value().map(|value| {
        let range = value.1.clone();
        vec![value, (Action::UniformFloatValue, range)]
    });
    let texture = string_value().map(|reference| {
        let range = reference.1.clone();
        vec![reference, (Action::UniformTextureValue, range)]
    });

    // Widest tuple first so a 4-tuple is never cut short
    choice((
        vector_value(4, Action::UniformVec4Value).boxed(),
        vector_value(3, Action::UniformVec3Value).boxed(),
        vector_value(2, Action::UniformVec2Value).boxed(),
        float.boxed(),
        texture.boxed(),
    ))
    .boxed()
}

pub fn uniform() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    keyword("SetUniform")
        .then(identifier())
        .then(uniform_value())
        .map(|((start, (name, name_range)), value)| {
            let end = value
                .last()
                .map(|(_, range)| range.end)
                .unwrap_or(name_range.end);
            let mut actions = Vec::with_capacity(value.len() + 2);
            actions.push((Action::Identifier(name), name_range));
            actions.extend(value);
            actions.push((Action::Uniform, start.start..end));
            actions
        })
}

/// Body item of a pass
fn pass_statement() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    option().or(uniform())
}

pub fn pass() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    keyword("pass")
        .then(identifier().or_not())
        .then(token(Token::LBrace))
        .then(pass_statement().repeated())
        .then(token(Token::RBrace))
        .map(|((((start, name), open), body), close)| {
            let mut actions = vec![(
                Action::PassBegin {
                    name: name.map(|(name, _)| name),
                },
                start.start..open.end,
            )];
            actions.extend(body.into_iter().flatten());
            actions.push((Action::PassEnd, close));
            actions
        })
        .boxed()
}

pub fn technique() -> impl Parser<TokenSpan, Actions, Error = ParserError> + Clone {
    keyword("technique")
        .then(identifier().or_not())
        .then(token(Token::LBrace))
        .then(choice((pass(), option(), uniform().boxed())).repeated())
        .then(token(Token::RBrace))
        .map(|((((start, name), open), body), close)| {
            let mut actions = vec![(
                Action::TechniqueBegin {
                    name: name.map(|(name, _)| name),
                },
                start.start..open.end,
            )];
            actions.extend(body.into_iter().flatten());
            actions.push((Action::TechniqueEnd, close));
            actions
        })
        .boxed()
}

/// Primary production: a whole document
pub fn file() -> impl Parser<TokenSpan, Actions, Error = ParserError> {
    choice((technique(), option(), uniform().boxed()))
        .repeated()
        .then_ignore(end())
        .map(|statements| statements.into_iter().flatten().collect())
}

/// Run the grammar over a token stream, yielding the fired actions in order
pub fn parse_actions(tokens: Vec<TokenSpan>) -> Result<Actions, Vec<ParserError>> {
    file().parse(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_with_spans;

    fn actions(source: &str) -> Vec<Action> {
        let tokens = tokenize_with_spans(source).unwrap();
        parse_actions(tokens)
            .unwrap()
            .into_iter()
            .map(|(action, _)| action)
            .collect()
    }

    fn fails(source: &str) -> bool {
        let tokens = tokenize_with_spans(source).unwrap();
        parse_actions(tokens).is_err()
    }

    #[test]
    fn test_empty_document() {
        assert!(actions("").is_empty());
        assert!(actions("  // only a comment\n").is_empty());
    }

    #[test]
    fn test_option_with_and_without_separator() {
        let expected = vec![Action::CullFaceOption(CullFace::Back)];
        assert_eq!(actions("CullFace: Back"), expected);
        assert_eq!(actions("CullFace Back"), expected);
    }

    #[test]
    fn test_blend_pair_pushes_factors_in_order() {
        assert_eq!(
            actions("BlendFunc: SrcAlphaSaturate, One"),
            vec![
                Action::BlendFunc(BlendFunc::SrcAlphaSaturate),
                Action::BlendFunc(BlendFunc::One),
                Action::BlendOption { enabled: true },
            ]
        );
        assert_eq!(
            actions("BlendFunc Disabled"),
            vec![Action::BlendOption { enabled: false }]
        );
    }

    #[test]
    fn test_uniform_actions() {
        assert_eq!(
            actions("SetUniform scale (2, 3)"),
            vec![
                Action::Identifier("scale".into()),
                Action::Float(2.0),
                Action::Float(3.0),
                Action::UniformVec2Value,
                Action::Uniform,
            ]
        );
        assert_eq!(
            actions("SetUniform diffuse \"wood.png\""),
            vec![
                Action::Identifier("diffuse".into()),
                Action::String("wood.png".into()),
                Action::UniformTextureValue,
                Action::Uniform,
            ]
        );
    }

    #[test]
    fn test_scope_actions_bracket_their_body() {
        assert_eq!(
            actions("technique main { DepthTest On pass { } }"),
            vec![
                Action::TechniqueBegin {
                    name: Some("main".into())
                },
                Action::BoolTrue,
                Action::DepthTestOption,
                Action::PassBegin { name: None },
                Action::PassEnd,
                Action::TechniqueEnd,
            ]
        );
    }

    #[test]
    fn test_action_ranges_cover_source() {
        let source = "Shader \"lit.glsl\"";
        let tokens = tokenize_with_spans(source).unwrap();
        let result = parse_actions(tokens).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(&source[result[1].1.clone()], "\"lit.glsl\"");
    }

    #[test]
    fn test_rejections() {
        // Passes only live inside techniques
        assert!(fails("pass { }"));
        // Techniques do not nest
        assert!(fails("technique { technique { } }"));
        assert!(fails("technique {"));
        assert!(fails("CullFace Sideways"));
        assert!(fails("BlendFunc SrcAlpha"));
        assert!(fails("SetUniform v (1, 2, 3, 4, 5)"));
        assert!(fails("SetUniform v ()"));
        assert!(fails("DepthWrite true"));
    }
}
