//! Public API for the parser.
//!
//! Text goes through the lexer, the grammar and the parse context in turn.
//! The first failure of any stage aborts the compilation.

use log::{debug, info, warn};
use std::path::Path;

use crate::ast::File;
use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::lexer::{lex_with_spans, strip_byte_order_mark, LexError, TokenSpan};
use crate::parser::context::ParseContext;
use crate::parser::grammar::{parse_actions, ParserError};
use crate::resources::ResourceResolver;
use chumsky::error::SimpleReason;

/// Compile a material document with the default configuration
///
/// `source_path` names the document in diagnostics and is the base for
/// relative shader and texture references.
pub fn compile<R>(source: &str, source_path: &str, resolver: &mut R) -> CompileResult<File>
where
    R: ResourceResolver + ?Sized,
{
    compile_with_config(source, source_path, resolver, &CompilerConfig::default())
}

pub fn compile_with_config<R>(
    source: &str,
    source_path: &str,
    resolver: &mut R,
    config: &CompilerConfig,
) -> CompileResult<File>
where
    R: ResourceResolver + ?Sized,
{
    info!("compiling material `{}`", source_path);

    let text = if config.strip_byte_order_mark {
        let (text, stripped) = strip_byte_order_mark(source);
        if stripped {
            warn!("{}: ignoring UTF-8 byte order mark", source_path);
        }
        text
    } else {
        source
    };

    let tokens = lex_with_spans(text).map_err(|err| lex_error(text, source_path, err))?;
    let actions = parse_actions(tokens.clone())
        .map_err(|errors| syntax_error(text, source_path, &tokens, errors))?;
    debug!(
        "{}: {} tokens, {} actions",
        source_path,
        tokens.len(),
        actions.len()
    );

    let mut context = ParseContext::new(text, source_path, resolver);
    context.apply_all(actions)?;
    let file = context.finish()?;

    debug!(
        "{}: {} techniques, {} passes",
        source_path,
        file.techniques.len(),
        file.pass_count()
    );
    Ok(file)
}

/// Read and compile the document at `path`
pub fn compile_file<R>(
    path: impl AsRef<Path>,
    resolver: &mut R,
    config: &CompilerConfig,
) -> CompileResult<File>
where
    R: ResourceResolver + ?Sized,
{
    let path = path.as_ref();
    let source_path = path.to_string_lossy().replace('\\', "/");
    let source = std::fs::read_to_string(path)
        .map_err(|err| CompileError::new(ErrorKind::Io, source_path.as_str(), err.to_string()))?;
    compile_with_config(&source, &source_path, resolver, config)
}

fn lex_error(source: &str, source_path: &str, err: LexError) -> CompileError {
    let offset = err.span().start;
    CompileError::new(ErrorKind::Syntax, source_path, err.to_string()).at_offset(source, offset)
}

/// Report the failure that got furthest into the input
fn syntax_error(
    source: &str,
    source_path: &str,
    tokens: &[TokenSpan],
    errors: Vec<ParserError>,
) -> CompileError {
    let furthest = errors.into_iter().max_by_key(|err| err.span().start);
    let err = match furthest {
        Some(err) => err,
        None => {
            return CompileError::new(ErrorKind::Syntax, source_path, "invalid document")
                .at_offset(source, 0)
        }
    };

    // Parser spans index the token list
    let found = tokens.get(err.span().start);
    let offset = found.map(|(_, range)| range.start).unwrap_or(source.len());
    let found_text = match found {
        Some((token, _)) => format!("`{}`", token),
        None => "end of input".to_string(),
    };

    let message = match err.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unclosed { delimiter, .. } => {
            format!("unclosed `{}`", delimiter.0)
        }
        SimpleReason::Unexpected => format!("unexpected {}", found_text),
    };

    CompileError::new(ErrorKind::Syntax, source_path, message).at_offset(source, offset)
}
