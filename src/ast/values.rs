//! Fixed-function enumerations and their keywords
//!
//! Keyword tables are ordered longest/most-specific first. The lexer already
//! reads identifiers whole, but anything that matches keywords by prefix must
//! walk the tables in this order so `SrcAlphaSaturate` wins over `SrcAlpha`
//! and `OneMinusSrcAlpha` wins over `One`.

use serde::Serialize;
use std::fmt;

/// Which faces get culled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CullFace {
    None,
    Front,
    Back,
}

impl CullFace {
    pub const KEYWORDS: [(&'static str, CullFace); 3] = [
        ("Front", CullFace::Front),
        ("Back", CullFace::Back),
        ("None", CullFace::None),
    ];

    pub fn from_keyword(text: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == text)
            .map(|(_, face)| *face)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            CullFace::None => "None",
            CullFace::Front => "Front",
            CullFace::Back => "Back",
        }
    }
}

impl fmt::Display for CullFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Blending factor applied to the source or destination color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlendFunc {
    Zero,
    One,
    SrcColor,
    SrcAlpha,
    SrcAlphaSaturate,
    DstColor,
    DstAlpha,
    OneMinusSrcColor,
    OneMinusSrcAlpha,
    OneMinusDstColor,
    OneMinusDstAlpha,
}

impl BlendFunc {
    pub const KEYWORDS: [(&'static str, BlendFunc); 11] = [
        ("OneMinusSrcColor", BlendFunc::OneMinusSrcColor),
        ("OneMinusSrcAlpha", BlendFunc::OneMinusSrcAlpha),
        ("OneMinusDstColor", BlendFunc::OneMinusDstColor),
        ("OneMinusDstAlpha", BlendFunc::OneMinusDstAlpha),
        ("SrcAlphaSaturate", BlendFunc::SrcAlphaSaturate),
        ("SrcColor", BlendFunc::SrcColor),
        ("SrcAlpha", BlendFunc::SrcAlpha),
        ("DstColor", BlendFunc::DstColor),
        ("DstAlpha", BlendFunc::DstAlpha),
        ("Zero", BlendFunc::Zero),
        ("One", BlendFunc::One),
    ];

    pub fn from_keyword(text: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == text)
            .map(|(_, func)| *func)
    }

    pub fn keyword(&self) -> &'static str {
        Self::KEYWORDS
            .iter()
            .find(|(_, func)| func == self)
            .map(|(keyword, _)| *keyword)
            .unwrap_or("?")
    }
}

impl fmt::Display for BlendFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Value of a `BlendFunc` option
///
/// `src` and `dst` only carry meaning while `enabled` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlendState {
    pub enabled: bool,
    pub src: BlendFunc,
    pub dst: BlendFunc,
}

impl BlendState {
    pub fn enabled(src: BlendFunc, dst: BlendFunc) -> Self {
        Self {
            enabled: true,
            src,
            dst,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            src: BlendFunc::SrcAlpha,
            dst: BlendFunc::OneMinusSrcAlpha,
        }
    }
}

impl fmt::Display for BlendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "{}, {}", self.src, self.dst)
        } else {
            f.write_str("Disabled")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_keywords_longest_first() {
        for (i, (earlier, _)) in BlendFunc::KEYWORDS.iter().enumerate() {
            for (later, _) in &BlendFunc::KEYWORDS[i + 1..] {
                assert!(
                    !later.starts_with(earlier),
                    "`{}` shadows the longer keyword `{}`",
                    earlier,
                    later
                );
            }
        }
    }

    #[test]
    fn test_keyword_round_trip() {
        for (keyword, func) in BlendFunc::KEYWORDS {
            assert_eq!(BlendFunc::from_keyword(keyword), Some(func));
            assert_eq!(func.keyword(), keyword);
        }
        for (keyword, face) in CullFace::KEYWORDS {
            assert_eq!(CullFace::from_keyword(keyword), Some(face));
            assert_eq!(face.to_string(), keyword);
        }
    }

    #[test]
    fn test_unknown_keywords() {
        assert_eq!(BlendFunc::from_keyword("SrcAlph"), None);
        assert_eq!(BlendFunc::from_keyword("one"), None);
        assert_eq!(CullFace::from_keyword("Sideways"), None);
    }

    #[test]
    fn test_blend_state_display() {
        let state = BlendState::enabled(BlendFunc::SrcAlpha, BlendFunc::OneMinusSrcAlpha);
        assert_eq!(state.to_string(), "SrcAlpha, OneMinusSrcAlpha");
        assert_eq!(BlendState::disabled().to_string(), "Disabled");
    }
}
