//! The canonical string form of a [Term].
//!
//! ```text
//! <http://example.com/a>                  named node
//! _:b1                                    blank node
//! "abc"  "abc"@en  "1"^^<http://...#int>  literals (xsd:string is implicit)
//! ?x                                      variable
//!                                         default graph (empty string)
//! <<s p o>>  <<s p o g>>                  quoted triple (graph only if not default)
//! ```
//!
//! Inside a quoted triple, the default graph is written as `DEFAULT`, as the empty string would not
//! separate it from the other components.
//!
//! The parser accepts exactly what the writer produces (plus some additional escape sequences and
//! whitespace). It does not validate IRIs, blank node labels, or language tags, as the form is used
//! to restore terms that have been serialized before.

use crate::{Quad, Term, TermSyntaxError};
use oxrdf::vocab::xsd;
use oxrdf::{BlankNode, Literal, NamedNode, Variable};
use std::fmt::Write;

const DEFAULT_GRAPH_KEYWORD: &str = "DEFAULT";

pub(super) fn write_term(f: &mut impl Write, term: &Term) -> std::fmt::Result {
    match term {
        Term::NamedNode(node) => write!(f, "<{}>", node.as_str()),
        Term::BlankNode(node) => write!(f, "_:{}", node.as_str()),
        Term::Literal(literal) => write_literal(f, literal),
        Term::DefaultGraph => Ok(()),
        Term::Variable(variable) => write!(f, "?{}", variable.as_str()),
        Term::Triple(triple) => {
            f.write_str("<<")?;
            write_component(f, &triple.subject)?;
            f.write_char(' ')?;
            write_component(f, &triple.predicate)?;
            f.write_char(' ')?;
            write_component(f, &triple.object)?;
            if !triple.graph.is_default_graph() {
                f.write_char(' ')?;
                write_component(f, &triple.graph)?;
            }
            f.write_str(">>")
        }
    }
}

fn write_component(f: &mut impl Write, term: &Term) -> std::fmt::Result {
    match term {
        Term::DefaultGraph => f.write_str(DEFAULT_GRAPH_KEYWORD),
        term => write_term(f, term),
    }
}

fn write_literal(f: &mut impl Write, literal: &Literal) -> std::fmt::Result {
    f.write_char('"')?;
    for c in literal.value().chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')?;

    if let Some(language) = literal.language() {
        write!(f, "@{language}")
    } else if literal.datatype() == xsd::STRING {
        Ok(())
    } else {
        write!(f, "^^<{}>", literal.datatype().as_str())
    }
}

/// A recursive descent parser for the canonical term form.
pub(super) struct TermParser<'input> {
    input: &'input str,
    position: usize,
}

impl<'input> TermParser<'input> {
    pub(super) fn new(input: &'input str) -> Self {
        Self { input, position: 0 }
    }

    /// Parses the entire input as a single term.
    pub(super) fn parse(mut self) -> Result<Term, TermSyntaxError> {
        if self.input.is_empty() {
            return Ok(Term::DefaultGraph);
        }

        let term = self.parse_term()?;
        if self.position != self.input.len() {
            return Err(self.error("Unexpected trailing input"));
        }
        Ok(term)
    }

    fn parse_term(&mut self) -> Result<Term, TermSyntaxError> {
        match self.peek() {
            Some('<') if self.rest().starts_with("<<") => self.parse_triple(),
            Some('<') => Ok(Term::NamedNode(self.parse_iri()?)),
            Some('_') => {
                self.expect("_:")?;
                let label = self.take_label();
                if label.is_empty() {
                    return Err(self.error("Empty blank node label"));
                }
                Ok(Term::BlankNode(BlankNode::new_unchecked(label)))
            }
            Some('?') => {
                self.expect("?")?;
                let name = self.take_label();
                if name.is_empty() {
                    return Err(self.error("Empty variable name"));
                }
                Ok(Term::Variable(Variable::new_unchecked(name)))
            }
            Some('"') => self.parse_literal(),
            Some('D') => {
                self.expect(DEFAULT_GRAPH_KEYWORD)?;
                Ok(Term::DefaultGraph)
            }
            Some(c) => Err(self.error(format!("Unexpected character '{c}'"))),
            None => Err(self.error("Unexpected end of input")),
        }
    }

    fn parse_triple(&mut self) -> Result<Term, TermSyntaxError> {
        self.expect("<<")?;
        self.skip_whitespace();
        let subject = self.parse_term()?;
        self.skip_whitespace();
        let predicate = self.parse_term()?;
        self.skip_whitespace();
        let object = self.parse_term()?;
        self.skip_whitespace();

        let graph = if self.rest().starts_with(">>") {
            Term::DefaultGraph
        } else {
            let graph = self.parse_term()?;
            self.skip_whitespace();
            graph
        };
        self.expect(">>")?;

        Ok(Term::Triple(Box::new(Quad::new(
            subject, predicate, object, graph,
        ))))
    }

    fn parse_iri(&mut self) -> Result<NamedNode, TermSyntaxError> {
        self.expect("<")?;
        let Some(end) = self.rest().find('>') else {
            return Err(self.error("Unterminated IRI"));
        };
        let iri = &self.rest()[..end];
        self.position += end + 1;
        Ok(NamedNode::new_unchecked(iri))
    }

    fn parse_literal(&mut self) -> Result<Term, TermSyntaxError> {
        self.expect("\"")?;
        let mut value = String::new();
        loop {
            let Some(c) = self.next_char() else {
                return Err(self.error("Unterminated literal"));
            };
            match c {
                '"' => break,
                '\\' => value.push(self.parse_escape()?),
                c => value.push(c),
            }
        }

        if self.rest().starts_with('@') {
            self.expect("@")?;
            let language = self.take_label();
            if language.is_empty() {
                return Err(self.error("Empty language tag"));
            }
            Ok(Term::Literal(Literal::new_language_tagged_literal_unchecked(
                value, language,
            )))
        } else if self.rest().starts_with("^^") {
            self.expect("^^")?;
            let datatype = self.parse_iri()?;
            Ok(Term::Literal(Literal::new_typed_literal(value, datatype)))
        } else {
            Ok(Term::Literal(Literal::new_simple_literal(value)))
        }
    }

    fn parse_escape(&mut self) -> Result<char, TermSyntaxError> {
        let escaped = match self.next_char() {
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\u{c}',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some('u') => self.parse_code_point(4)?,
            Some('U') => self.parse_code_point(8)?,
            Some(c) => return Err(self.error(format!("Invalid escape sequence '\\{c}'"))),
            None => return Err(self.error("Unterminated escape sequence")),
        };
        Ok(escaped)
    }

    fn parse_code_point(&mut self, digits: usize) -> Result<char, TermSyntaxError> {
        let hex = self
            .rest()
            .get(..digits)
            .ok_or_else(|| self.error("Truncated unicode escape sequence"))?;
        let code_point = u32::from_str_radix(hex, 16)
            .map_err(|_| self.error(format!("Invalid unicode escape sequence '{hex}'")))?;
        let c = char::from_u32(code_point)
            .ok_or_else(|| self.error(format!("Invalid code point {code_point:X}")))?;
        self.position += digits;
        Ok(c)
    }

    /// Consumes a blank node label, variable name, or language tag. These end at whitespace, the
    /// end of a quoted triple, or the end of the input.
    fn take_label(&mut self) -> &'input str {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(rest.len());
        self.position += end;
        &rest[..end]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();
    }

    fn expect(&mut self, token: &str) -> Result<(), TermSyntaxError> {
        if !self.rest().starts_with(token) {
            return Err(self.error(format!("Expected '{token}'")));
        }
        self.position += token.len();
        Ok(())
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'input str {
        &self.input[self.position..]
    }

    fn error(&self, message: impl Into<String>) -> TermSyntaxError {
        TermSyntaxError::new(self.position, message)
    }
}
