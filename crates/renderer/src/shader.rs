//! GLSL source assembly.
//!
//! Shader bodies are authored once in legacy style (`attribute`, `varying`,
//! `gl_FragColor`) and retargeted to a core profile by a fixed
//! substitution table:
//!
//! | legacy            | vertex stage | fragment stage           |
//! |-------------------|--------------|--------------------------|
//! | `attribute`       | `in`         | `in`                     |
//! | `varying`         | `out`        | `in`                     |
//! | `//DECLAREGLFRAG` | (kept)       | `out vec4 outFragColor;` |
//! | `gl_FragColor`    | (kept)       | `outFragColor`           |
//!
//! Keywords are matched as whole identifiers only. Targets older than
//! GLSL 1.50 get the `#version` line and the body unchanged.

use std::fmt;

/// Pipeline stage a source string is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

pub const CORE_GLSL_VERSION: u32 = 330;
/// First GLSL version without `attribute`/`varying`/`gl_FragColor` in core.
const FIRST_CORE_VERSION: u32 = 150;

/// Marker line in fragment bodies where the colour output gets declared.
pub const FRAG_OUTPUT_MARKER: &str = "//DECLAREGLFRAG";
pub const FRAG_OUTPUT: &str = "outFragColor";

/// Attribute names bound to fixed locations before linking.
pub const POSITION_ATTRIB: (u32, &str) = (0, "aPos");
pub const NORMAL_ATTRIB: (u32, &str) = (1, "aNormal");

const DISCO_VERTEX_BODY: &str = include_str!("shaders/disco.vert");
const DISCO_FRAGMENT_BODY: &str = include_str!("shaders/disco.frag");

#[derive(Clone, Copy, Debug)]
enum Rewrite {
    Word(&'static str, &'static str),
    Literal(&'static str, &'static str),
}

const VERTEX_REWRITES: &[Rewrite] = &[
    Rewrite::Word("attribute", "in"),
    Rewrite::Word("varying", "out"),
];

const FRAGMENT_REWRITES: &[Rewrite] = &[
    Rewrite::Word("attribute", "in"),
    Rewrite::Word("varying", "in"),
    Rewrite::Literal(FRAG_OUTPUT_MARKER, "out vec4 outFragColor;"),
    Rewrite::Word("gl_FragColor", FRAG_OUTPUT),
];

/// Prepends `#version` and applies the substitution table for that version.
#[derive(Clone, Copy, Debug)]
pub struct ShaderSourceBuilder {
    version: u32,
}

impl ShaderSourceBuilder {
    pub const fn new(version: u32) -> Self {
        Self { version }
    }

    pub const fn core() -> Self {
        Self::new(CORE_GLSL_VERSION)
    }

    pub fn build(&self, stage: ShaderStage, body: &str) -> String {
        let mut src = format!("#version {}\n", self.version);
        if self.version < FIRST_CORE_VERSION {
            src.push_str(body);
            return src;
        }

        let rewrites = match stage {
            ShaderStage::Vertex => VERTEX_REWRITES,
            ShaderStage::Fragment => FRAGMENT_REWRITES,
        };
        let body = rewrites.iter().fold(body.to_owned(), |acc, rw| match *rw {
            Rewrite::Word(from, to) => replace_word(&acc, from, to),
            Rewrite::Literal(from, to) => acc.replace(from, to),
        });
        src.push_str(&body);
        src
    }
}

impl Default for ShaderSourceBuilder {
    fn default() -> Self {
        Self::core()
    }
}

/// Build `body` for `stage` against GLSL 3.30.
pub fn build_source(stage: ShaderStage, body: &str) -> String {
    ShaderSourceBuilder::core().build(stage, body)
}

pub fn disco_vertex_source() -> String {
    build_source(ShaderStage::Vertex, DISCO_VERTEX_BODY)
}

pub fn disco_fragment_source() -> String {
    build_source(ShaderStage::Fragment, DISCO_FRAGMENT_BODY)
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace `word` where it stands as a whole identifier.
fn replace_word(src: &str, word: &str, with: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut last = 0;
    for (start, _) in src.match_indices(word) {
        let end = start + word.len();
        let glued = src[..start].chars().next_back().is_some_and(is_ident_char)
            || src[end..].chars().next().is_some_and(is_ident_char);
        if !glued {
            out.push_str(&src[last..start]);
            out.push_str(with);
            last = end;
        }
    }
    out.push_str(&src[last..]);
    out
}
