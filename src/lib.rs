//! A small backtracking regular-expression engine.
//!
//! Supported syntax: literal characters, `.` (any one character), `*`
//! (zero or more of the preceding atom), `(...)` groups and `|`
//! alternation. A match always covers the whole text.
//!
//! ```
//! let pattern = backtrack_re::compile("(ab)*c").unwrap();
//! assert!(pattern.is_match("ababc"));
//! assert!(!pattern.is_match("abab"));
//!
//! let caps = pattern.captures("ababc").unwrap();
//! assert_eq!(caps.get(1), Some("ab"));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod program;

use std::ops::Range;
use std::str::FromStr;

pub use ast::Node;
pub use error::CompileError;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use program::{Inst, Program};

/// Which characters a pattern may contain, and how malformed patterns are
/// handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Any character outside `*.()|` is a literal. Unclosed groups are
    /// closed at the end of the pattern, stray `)` and operators without
    /// an operand are dropped. Compilation never fails.
    #[default]
    Lenient,
    /// Literals must be alphabetic and the pattern must be well formed.
    Strict,
}

/// How alternation behaves when the rest of the pattern fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backtrack {
    /// Once the left branch matches, its result is final and the right
    /// branch is never tried, even if the rest of the pattern fails.
    #[default]
    Committed,
    /// A failure after the left branch retries with the right branch.
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub dialect: Dialect,
    pub backtrack: Backtrack,
}

impl Options {
    pub fn strict() -> Self {
        Self::default().with_dialect(Dialect::Strict)
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_backtrack(mut self, backtrack: Backtrack) -> Self {
        self.backtrack = backtrack;
        self
    }
}

/// A compiled pattern.
///
/// Immutable once built; captures are returned per call, so one `Pattern`
/// can be shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    root: Option<Node>,
    program: Program,
    options: Options,
}

impl Pattern {
    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Root of the parsed tree, `None` for a pattern that matches only
    /// the empty text.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Number of groups, counting groups the lenient dialect dropped.
    pub fn group_count(&self) -> usize {
        self.program.group_count()
    }

    /// The instruction list the matcher runs.
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Anchored match: `true` only if the whole text matches.
    pub fn is_match(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        matcher::Matcher::new(&self.program, &chars).run().is_some()
    }

    /// Like [`Pattern::is_match`], also returning what each group consumed.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        let chars: Vec<char> = text.chars().collect();
        let slots = matcher::Matcher::new(&self.program, &chars).run()?;

        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let ranges = slots
            .into_iter()
            .map(|slot| slot.map(|(start, end)| offsets[start]..offsets[end]))
            .collect();
        Some(Captures { text, ranges })
    }
}

impl FromStr for Pattern {
    type Err = CompileError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        compile(pattern)
    }
}

/// Substrings consumed by the groups of one successful match.
///
/// Index 0 is the whole text. A group that took no part in the match
/// has no capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures<'t> {
    text: &'t str,
    ranges: Vec<Option<Range<usize>>>,
}

impl<'t> Captures<'t> {
    pub fn get(&self, index: usize) -> Option<&'t str> {
        let text = self.text;
        self.range(index).map(|range| &text[range])
    }

    /// Byte range of capture `index` in the text.
    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        self.ranges.get(index).cloned().flatten()
    }

    /// Number of slots, i.e. groups plus one.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&'t str>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

/// Compile with default [`Options`]: lenient dialect, committed alternation.
pub fn compile(pattern: &str) -> Result<Pattern, CompileError> {
    compile_with(pattern, Options::default())
}

pub fn compile_with(pattern: &str, options: Options) -> Result<Pattern, CompileError> {
    let mut parser = Parser::new(pattern, options.dialect)?;
    let root = parser.parse()?;
    let program = Program::compile(root.as_ref(), parser.group_count(), options.backtrack);
    Ok(Pattern {
        source: pattern.to_string(),
        root,
        program,
        options,
    })
}

pub fn is_match(pattern: &Pattern, text: &str) -> bool {
    pattern.is_match(text)
}
