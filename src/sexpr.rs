//! Generic nested-list tree for KiCad's s-expression documents.
//!
//! Only the structure needed for extraction is modelled: a list carries the
//! label atom it opens with and its remaining children; everything else is an
//! atom. Lookup helpers return `Option` because an absent field is ordinary
//! data for this tool, not an error.

use std::fmt::Display;

mod lexer;
mod parser;

/// Parse a whole document into its top-level forms.
///
/// A document with no forms yields an empty vec. Parsing never fails; see
/// [`parser::Parser`] for how damaged input degrades.
pub fn parse_document(input: &str) -> Vec<SExpr<'_>> {
    parser::Parser::new(input).parse_document()
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SExpr<'a> {
    /// `(label child ...)`
    List(&'a str, Box<[SExpr<'a>]>),
    /// A bare word or quoted string.
    Atom(&'a str),
}

impl<'a> Display for SExpr<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::List(label, children) => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
            SExpr::Atom(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl<'a> SExpr<'a> {
    pub fn label(&self) -> Option<&'a str> {
        match self {
            SExpr::List(label, _) => Some(label),
            SExpr::Atom(_) => None,
        }
    }

    /// The value of a labeled child: the first atom of the first child list
    /// carrying `label`, as in `(number "7" ...)`.
    pub fn value(&self, label: &str) -> Option<&'a str> {
        self.child(label)?.string_arg(0)
    }

    /// The n-th atom child, counting atoms only: `(property "Footprint" "X")`
    /// has `string_arg(0) == "Footprint"` and `string_arg(1) == "X"`.
    pub fn string_arg(&self, n: usize) -> Option<&'a str> {
        match self {
            SExpr::Atom(_) => None,
            SExpr::List(_, children) => children
                .iter()
                .filter_map(|child| match child {
                    SExpr::Atom(s) => Some(*s),
                    SExpr::List(_, _) => None,
                })
                .nth(n),
        }
    }

    pub fn child<'b>(&'b self, label: &str) -> Option<&'b SExpr<'a>> {
        self.children(label).next()
    }

    /// Direct child lists carrying `label`, in document order.
    pub fn children<'b, 'c>(&'b self, label: &'c str) -> LabeledChildren<'a, 'b, 'c> {
        let iter = match self {
            SExpr::Atom(_) => None,
            SExpr::List(_, children) => Some(children.iter()),
        };
        LabeledChildren { iter, label }
    }

    /// Descendant lists carrying `label`, at any depth, in document order.
    /// The node itself is not considered.
    pub fn descendants<'b, 'c>(&'b self, label: &'c str) -> Descendants<'a, 'b, 'c> {
        let stack = match self {
            SExpr::Atom(_) => Vec::new(),
            SExpr::List(_, children) => children.iter().rev().collect(),
        };
        Descendants { stack, label }
    }
}

#[derive(Debug)]
pub struct LabeledChildren<'a, 'b, 'c> {
    iter: Option<std::slice::Iter<'b, SExpr<'a>>>,
    label: &'c str,
}

impl<'a, 'b, 'c> Iterator for LabeledChildren<'a, 'b, 'c> {
    type Item = &'b SExpr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let iter = self.iter.as_mut()?;
        loop {
            let item = iter.next();
            match &item {
                None => return None,
                Some(SExpr::Atom(_)) => continue,
                Some(SExpr::List(label, _)) => {
                    if *label == self.label {
                        return item;
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct Descendants<'a, 'b, 'c> {
    stack: Vec<&'b SExpr<'a>>,
    label: &'c str,
}

impl<'a, 'b, 'c> Iterator for Descendants<'a, 'b, 'c> {
    type Item = &'b SExpr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let SExpr::List(label, children) = node {
                self.stack.extend(children.iter().rev());
                if *label == self.label {
                    return Some(node);
                }
            }
        }
        None
    }
}
