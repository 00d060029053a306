use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use itertools::Itertools;

use crate::errors::{Message, Res, Span, Spanned};
use crate::pddl::input::Input;
use crate::Sym;

pub type SAtom = Sym;

/// A list of s-expressions, together with the span of the text it was read from.
#[derive(Clone)]
pub struct SList {
    list: Vec<SExpr>,
    span: Span,
}

impl SList {
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            elems: self.list.as_slice(),
            span: &self.span,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl Spanned for SList {
    fn span(&self) -> Option<&Span> {
        Some(&self.span)
    }
}

impl Display for SList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.list.iter().format(" "))
    }
}

#[derive(Clone)]
pub enum SExpr {
    Atom(SAtom),
    List(SList),
}

impl SExpr {
    pub fn is_atom(&self, expected_atom: &str) -> bool {
        self.as_atom().is_some_and(|a| a.canonical_str() == expected_atom)
    }

    pub fn as_atom(&self) -> Option<&SAtom> {
        match self {
            SExpr::Atom(a) => Some(a),
            SExpr::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&SList> {
        match self {
            SExpr::List(l) => Some(l),
            SExpr::Atom(_) => None,
        }
    }

    pub fn as_list_iter(&self) -> Option<ListIter<'_>> {
        self.as_list().map(SList::iter)
    }

    /// If this expression is a list whose head is the given atom, returns the remaining elements.
    pub fn as_application(&self, head: &str) -> Option<&[SExpr]> {
        match self {
            SExpr::List(l) => match l.list.first() {
                Some(SExpr::Atom(first)) if first.canonical_str() == head => Some(&l.list[1..]),
                _ => None,
            },
            SExpr::Atom(_) => None,
        }
    }
}

impl Spanned for SExpr {
    fn span(&self) -> Option<&Span> {
        match self {
            SExpr::Atom(a) => a.span(),
            SExpr::List(l) => l.span(),
        }
    }
}

impl Display for SExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::Atom(a) => write!(f, "{a}"),
            SExpr::List(l) => write!(f, "{l}"),
        }
    }
}

impl Debug for SExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Consumes the elements of a list, producing localized errors when an element is missing or
/// is not of the expected kind.
#[derive(Clone)]
pub struct ListIter<'a> {
    elems: &'a [SExpr],
    span: &'a Span,
}

impl<'a> ListIter<'a> {
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn peek(&self) -> Option<&'a SExpr> {
        self.elems.first()
    }

    pub fn pop(&mut self) -> Res<&'a SExpr> {
        self.next().ok_or_else(|| self.span.invalid("Unexpected end of list"))
    }

    pub fn pop_known_atom(&mut self, expected: &str) -> Res<()> {
        match self.next() {
            None => Err(self.span.invalid(format!("Expected atom `{expected}` but got end of list"))),
            Some(sexpr) if sexpr.is_atom(expected) => Ok(()),
            Some(sexpr) => Err(sexpr.invalid(format!("Expected atom `{expected}`"))),
        }
    }

    pub fn pop_atom(&mut self) -> Res<&'a SAtom> {
        match self.next() {
            None => Err(self.span.invalid("Expected an atom but got end of list")),
            Some(SExpr::Atom(a)) => Ok(a),
            Some(e) => Err(e.invalid("Expected an atom")),
        }
    }

    pub fn pop_list(&mut self) -> Res<&'a SList> {
        match self.next() {
            None => Err(self.span.invalid("Expected a list but got end of list")),
            Some(SExpr::List(l)) => Ok(l),
            Some(e) => Err(e.invalid("Expected a list")),
        }
    }

    /// Span of the whole list.
    pub fn loc(&self) -> Span {
        self.span.clone()
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a SExpr;

    fn next(&mut self) -> Option<Self::Item> {
        match self.elems.split_first() {
            None => None,
            Some((head, tail)) => {
                self.elems = tail;
                Some(head)
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    /// Symbol spanning the byte range `start..end`
    Sym { start: usize, end: usize },
    LParen(usize),
    RParen(usize),
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = source.char_indices().peekable();
    let close = |start: &mut Option<usize>, end: usize, tokens: &mut Vec<Token>| {
        if let Some(s) = start.take() {
            tokens.push(Token::Sym { start: s, end });
        }
    };
    while let Some((i, c)) = chars.next() {
        if c == ';' {
            close(&mut start, i, &mut tokens);
            // drop all chars until the end of the line
            while chars.next_if(|(_, c)| *c != '\n').is_some() {}
        } else if c.is_whitespace() || c == '(' || c == ')' {
            close(&mut start, i, &mut tokens);
            if c == '(' {
                tokens.push(Token::LParen(i));
            } else if c == ')' {
                tokens.push(Token::RParen(i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    close(&mut start, source.len(), &mut tokens);
    tokens
}

/// Parses a single s-expression. Anything after it (except comments) is an error.
pub fn parse(input: Arc<Input>) -> Res<SExpr> {
    let mut exprs = parse_many(input.clone())?.into_iter();
    match (exprs.next(), exprs.next()) {
        (Some(e), None) => Ok(e),
        (None, _) => Err(Message::error(match &input.source {
            Some(file) => format!("No s-expression in {file}"),
            None => "Empty input".to_string(),
        })),
        (Some(_), Some(extra)) => Err(extra.invalid("Unexpected content after the end of the expression")),
    }
}

/// Parses a sequence of s-expressions.
pub fn parse_many(input: Arc<Input>) -> Res<Vec<SExpr>> {
    let tokens = tokenize(&input.text);
    let mut tokens = tokens.iter().peekable();
    let mut exprs = Vec::new();
    while tokens.peek().is_some() {
        exprs.push(read(&mut tokens, &input)?);
    }
    Ok(exprs)
}

fn read(tokens: &mut std::iter::Peekable<core::slice::Iter<Token>>, input: &Arc<Input>) -> Res<SExpr> {
    match tokens.next() {
        Some(Token::Sym { start, end }) => {
            let span = Span::new(input.clone(), *start, *end - 1);
            let text = &input.text[*start..*end];
            Ok(SExpr::Atom(Sym::with_source(text, span)))
        }
        Some(Token::LParen(start)) => {
            let mut es = Vec::new();
            loop {
                match tokens.peek() {
                    Some(Token::RParen(end)) => {
                        let span = Span::new(input.clone(), *start, *end);
                        tokens.next();
                        return Ok(SExpr::List(SList { list: es, span }));
                    }
                    Some(_) => es.push(read(tokens, input)?),
                    None => {
                        let span = Span::new(input.clone(), *start, *start);
                        return Err(span.invalid("Unclosed parenthesis"));
                    }
                }
            }
        }
        Some(Token::RParen(pos)) => {
            let span = Span::new(input.clone(), *pos, *pos);
            Err(span.invalid("Unexpected closing parenthesis"))
        }
        None => Err(Message::error("Unexpected end of input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(s: &str) -> Res<SExpr> {
        parse(Arc::new(Input::from_string(s)))
    }

    #[test]
    fn tokens_and_comments() {
        let toks = tokenize("(at b0 ; comment (\n r0)");
        assert_eq!(
            toks,
            vec![
                Token::LParen(0),
                Token::Sym { start: 1, end: 3 },
                Token::Sym { start: 4, end: 6 },
                Token::Sym { start: 20, end: 22 },
                Token::RParen(22),
            ]
        );
    }

    #[test]
    fn nested_lists() -> Res<()> {
        let e = parse_str("(define (domain Gripper) (:requirements :typing))")?;
        assert_eq!(e.to_string(), "(define (domain Gripper) (:requirements :typing))");
        let mut it = e.as_list_iter().unwrap();
        it.pop_known_atom("define")?;
        let mut name = it.pop_list()?.iter();
        name.pop_known_atom("domain")?;
        let name = name.pop_atom()?;
        assert_eq!(name.canonical_str(), "gripper");
        assert_eq!(name.loc().str(), "Gripper");
        let reqs = it.pop()?;
        assert_eq!(reqs.as_application(":requirements").map(|r| r.len()), Some(1));
        assert!(it.is_empty());
        assert!(it.pop().is_err());
        Ok(())
    }

    #[test]
    fn unbalanced_parentheses() {
        let err = parse_str("(and (at a b)").unwrap_err();
        assert!(err.title_str().starts_with("Unclosed parenthesis"));
        let err = parse_str("(and))").unwrap_err();
        assert!(err.title_str().starts_with("Unexpected closing parenthesis"));
        assert!(parse_str("a b").is_err());
        assert!(parse_str("  ; nothing here\n").is_err());
    }
}
