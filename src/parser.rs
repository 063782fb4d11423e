use crate::ast::Node;
use crate::error::CompileError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::Dialect;

/// Recursive-descent parser over the token stream of one pattern.
///
/// Holds the current token and group nesting depth, and allocates group
/// indices (starting at 1) in order of the opening parenthesis. Subtrees
/// are `Option<Node>`: `None` is a construct that matched nothing in the
/// pattern, such as an empty pattern or, in the lenient dialect, a
/// dropped dangling operator.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    dialect: Dialect,
    depth: usize,
    next_group_index: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser and read the first token.
    pub fn new(pattern: &'a str, dialect: Dialect) -> Result<Self, CompileError> {
        let mut lexer = Lexer::new(pattern, dialect);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            dialect,
            depth: 0,
            next_group_index: 1,
        })
    }

    /// Number of groups allocated so far.
    pub fn group_count(&self) -> usize {
        self.next_group_index - 1
    }

    fn alloc_group_index(&mut self) -> usize {
        let index = self.next_group_index;
        self.next_group_index += 1;
        index
    }

    fn advance(&mut self) -> Result<(), CompileError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn is_strict(&self) -> bool {
        self.dialect == Dialect::Strict
    }

    /// Entry point: parse the whole pattern.
    ///
    /// Example:
    /// - Pattern: `a|b` → Alternation(Literal('a'), Literal('b'))
    pub fn parse(&mut self) -> Result<Option<Node>, CompileError> {
        self.parse_expression()
    }

    /// Parse primaries until `End` or the `)` closing the current group,
    /// folding concatenation and alternation left to right over the tree
    /// built so far. Outside any group a stray `)` is skipped in the
    /// lenient dialect and folding continues.
    ///
    /// Examples:
    /// - Pattern: `a|b*`  → Alternation(Literal('a'), Star(Literal('b')))
    /// - Pattern: `ab|cd` → Concat(Alternation(Concat(a, b), c), d)
    /// - Pattern: `a)|b`  → lenient Alternation(a, b), strict `UnbalancedGroup`
    fn parse_expression(&mut self) -> Result<Option<Node>, CompileError> {
        let mut left = self.parse_primary()?;
        loop {
            match self.current.kind {
                TokenKind::End => break,
                TokenKind::RParen if self.depth > 0 => break,
                TokenKind::RParen => {
                    if self.is_strict() {
                        return Err(CompileError::UnbalancedGroup {
                            position: self.current.position,
                        });
                    }
                    self.advance()?;
                }
                TokenKind::Alternation => {
                    let position = self.current.position;
                    self.advance()?;
                    let right = self.parse_primary()?;
                    left = match (left, right) {
                        (Some(l), Some(r)) => Some(Node::alternation(l, r)),
                        _ if self.is_strict() => {
                            return Err(CompileError::DanglingOperator { op: '|', position });
                        }
                        (l, r) => l.or(r),
                    };
                }
                _ => {
                    let right = self.parse_primary()?;
                    left = join(left, right, Node::concat);
                }
            }
        }
        Ok(left)
    }

    /// Parse an atom and an optional trailing `*`.
    ///
    /// Returns `None` without consuming anything when the current token
    /// cannot start a primary (`|`, `)` or end of pattern).
    ///
    /// Examples:
    /// - Pattern: `a*`  → Star(Literal('a'))
    /// - Pattern: `a**` → lenient Star(Literal('a')), strict `DanglingOperator`
    /// - Pattern: `*a`  → lenient drops the `*`, strict `DanglingOperator`
    fn parse_primary(&mut self) -> Result<Option<Node>, CompileError> {
        let mut atom = match self.current.kind {
            TokenKind::Literal => {
                let node = self.current.value.map(Node::Literal);
                self.advance()?;
                node
            }
            TokenKind::Dot => {
                self.advance()?;
                Some(Node::Dot)
            }
            TokenKind::LParen => self.parse_group()?,
            TokenKind::Star => None,
            TokenKind::Alternation | TokenKind::RParen | TokenKind::End => return Ok(None),
        };

        while self.current.kind == TokenKind::Star {
            let position = self.current.position;
            self.advance()?;
            atom = match atom {
                Some(Node::Star(_)) | None if self.is_strict() => {
                    return Err(CompileError::DanglingOperator { op: '*', position });
                }
                Some(node @ Node::Star(_)) => Some(node),
                Some(node) => Some(Node::star(node)),
                None => None,
            };
        }
        Ok(atom)
    }

    /// Parse `( Expression )`.
    ///
    /// A group still open at the end of the pattern is closed there in the
    /// lenient dialect. An empty group is dropped, but its index stays
    /// allocated so later groups keep their numbers.
    ///
    /// Example:
    /// - Pattern: `(ab` → lenient Group { index: 1, Concat(a, b) }, strict `UnbalancedGroup`
    fn parse_group(&mut self) -> Result<Option<Node>, CompileError> {
        let open = self.current.position;
        self.advance()?;
        let index = self.alloc_group_index();
        self.depth += 1;
        let inner = self.parse_expression()?;
        self.depth -= 1;

        if self.current.kind == TokenKind::RParen {
            self.advance()?;
        } else if self.is_strict() {
            return Err(CompileError::UnbalancedGroup { position: open });
        }

        match inner {
            Some(node) => Ok(Some(Node::group(index, node))),
            None if self.is_strict() => Err(CompileError::EmptyGroup { position: open }),
            None => Ok(None),
        }
    }
}

fn join(left: Option<Node>, right: Option<Node>, op: fn(Node, Node) -> Node) -> Option<Node> {
    match (left, right) {
        (Some(l), Some(r)) => Some(op(l, r)),
        (l, r) => l.or(r),
    }
}
