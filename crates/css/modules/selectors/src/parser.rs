//! CSS selector parsing.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorList, SimpleSelector,
};
use core::mem::take;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Internal tokenizer token kinds.
pub enum Tok {
    /// A combinator token like child/adjacent/general sibling.
    Combinator(Combinator),
    /// Whitespace that implies a descendant combinator.
    DescendantWS,
    /// A simple selector token (type, class, id, attribute, pseudo-class, universal).
    Simple(SimpleSelector),
    /// A byte that cannot start any selector token.
    Invalid,
}

/// Tokenizer over a selector string.
pub struct SelectorTokenizer {
    /// Underlying owned bytes for the selector.
    input_bytes: Vec<u8>,
    /// Current cursor index into `input_bytes`.
    index: usize,
    /// Whether we should emit a descendant whitespace token on `next()` call.
    pending_whitespace: bool,
}

impl SelectorTokenizer {
    /// Construct a tokenizer from input.
    #[inline]
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input_bytes: input.as_bytes().to_vec(),
            index: 0,
            pending_whitespace: false,
        }
    }

    /// Return the next selector token, if any.
    #[inline]
    pub(crate) fn next(&mut self) -> Option<Tok> {
        self.skip_whitespace_descendant();
        if self.pending_whitespace {
            self.pending_whitespace = false;
            // Trailing whitespace does not imply a combinator.
            self.input_bytes.get(self.index)?;
            return Some(Tok::DescendantWS);
        }
        let &current = self.input_bytes.get(self.index)?;
        let token = match current {
            b'*' => {
                self.advance();
                Tok::Simple(SimpleSelector::Universal)
            }
            b'.' => self.consume_class(),
            b'#' => self.consume_id(),
            b'[' => self.consume_attr(),
            b':' => self.consume_pseudo(),
            b'>' => {
                self.advance();
                Tok::Combinator(Combinator::Child)
            }
            b'+' => {
                self.advance();
                Tok::Combinator(Combinator::AdjacentSibling)
            }
            b'~' => {
                self.advance();
                Tok::Combinator(Combinator::GeneralSibling)
            }
            _ => self.consume_type(),
        };
        Some(token)
    }

    /// Move the cursor one byte forward.
    #[inline]
    fn advance(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    /// Skip whitespace and mark that a descendant combinator should be emitted next.
    #[inline]
    fn skip_whitespace_descendant(&mut self) {
        let mut saw = false;
        while let Some(&byte) = self.input_bytes.get(self.index) {
            if byte.is_ascii_whitespace() {
                saw = true;
                self.advance();
            } else {
                break;
            }
        }
        if saw {
            self.pending_whitespace = true;
        }
    }

    /// Consume an identifier consisting of ASCII alphanumerics, '-' and '_'.
    #[inline]
    fn consume_ident(&mut self, lowercase: bool) -> String {
        let start = self.index;
        while let Some(&byte) = self.input_bytes.get(self.index) {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let slice = self.input_bytes.get(start..self.index).unwrap_or(&[]);
        let ident = String::from_utf8_lossy(slice);
        if lowercase {
            ident.to_ascii_lowercase()
        } else {
            ident.into_owned()
        }
    }

    /// Parse a type selector identifier into a `SimpleSelector::Type`.
    #[inline]
    fn consume_type(&mut self) -> Tok {
        let ident = self.consume_ident(true);
        if ident.is_empty() {
            self.advance();
            return Tok::Invalid;
        }
        Tok::Simple(SimpleSelector::Type(ident))
    }

    /// Parse a class selector following '.' into `SimpleSelector::Class`.
    #[inline]
    fn consume_class(&mut self) -> Tok {
        // skip '.'
        self.advance();
        let ident = self.consume_ident(false);
        if ident.is_empty() {
            return Tok::Invalid;
        }
        Tok::Simple(SimpleSelector::Class(ident))
    }

    /// Parse an id selector following '#' into `SimpleSelector::IdSelector`.
    #[inline]
    fn consume_id(&mut self) -> Tok {
        // skip '#'
        self.advance();
        let ident = self.consume_ident(false);
        if ident.is_empty() {
            return Tok::Invalid;
        }
        Tok::Simple(SimpleSelector::IdSelector(ident))
    }

    /// Parse a pseudo-class following ':' into `SimpleSelector::PseudoClass`.
    #[inline]
    fn consume_pseudo(&mut self) -> Tok {
        // skip ':'
        self.advance();
        let ident = self.consume_ident(true);
        if ident.is_empty() {
            return Tok::Invalid;
        }
        Tok::Simple(SimpleSelector::PseudoClass(PseudoClass::from_name(&ident)))
    }

    /// Parse an attribute selector, supporting `[name]` and `[name=value]` (quoted or unquoted).
    #[inline]
    fn consume_attr(&mut self) -> Tok {
        // skip '['
        self.advance();
        self.skip_spaces();
        let name = self.consume_ident(true);
        self.skip_spaces();
        let value = if self.peek_is(b'=') {
            self.advance();
            self.skip_spaces();
            match self.input_bytes.get(self.index).copied() {
                Some(quote @ (b'"' | b'\'')) => {
                    self.advance();
                    Some(self.consume_quoted_attr_value(quote))
                }
                _ => Some(self.consume_unquoted_attr_value()),
            }
        } else {
            None
        };
        self.skip_spaces();
        if !self.peek_is(b']') || name.is_empty() {
            return Tok::Invalid;
        }
        self.advance();
        match value {
            Some(value) => Tok::Simple(SimpleSelector::AttrEquals { name, value }),
            None => Tok::Simple(SimpleSelector::AttrExists(name)),
        }
    }

    /// True if the byte under the cursor equals `expected`.
    #[inline]
    fn peek_is(&self, expected: u8) -> bool {
        self.input_bytes
            .get(self.index)
            .is_some_and(|&byte| byte == expected)
    }

    /// Consume an unquoted attribute value until whitespace or a closing bracket.
    #[inline]
    fn consume_unquoted_attr_value(&mut self) -> String {
        let start = self.index;
        while let Some(&byte) = self.input_bytes.get(self.index) {
            if byte.is_ascii_whitespace() || byte == b']' {
                break;
            }
            self.advance();
        }
        let slice = self.input_bytes.get(start..self.index).unwrap_or(&[]);
        String::from_utf8_lossy(slice).to_string()
    }

    /// Consume a quoted attribute value until the matching quote byte.
    #[inline]
    fn consume_quoted_attr_value(&mut self, quote: u8) -> String {
        let start = self.index;
        while matches!(self.input_bytes.get(self.index), Some(&byte) if byte != quote) {
            self.advance();
        }
        let slice = self.input_bytes.get(start..self.index).unwrap_or(&[]);
        let out = String::from_utf8_lossy(slice).to_string();
        if self.input_bytes.get(self.index).is_some() {
            self.advance();
        }
        out
    }

    /// Skip ASCII whitespace.
    #[inline]
    fn skip_spaces(&mut self) {
        while matches!(self.input_bytes.get(self.index), Some(byte) if byte.is_ascii_whitespace()) {
            self.advance();
        }
    }
}

/// Parse a selector list from CSS text. Invalid members are dropped.
/// Spec: Section 3, 4, 5–8, 11
pub fn parse_selector_list(input: &str) -> SelectorList {
    let mut list = SelectorList::default();
    for part in input.split(',') {
        let sel = parse_complex_selector(part.trim());
        if !sel.is_empty() {
            list.selectors.push(sel);
        }
    }
    list
}

/// Parse one complex selector. Returns an empty selector when the input
/// contains a token that cannot be parsed.
/// Spec: Section 11 - Combinators; Section 5–8 - simple selectors
pub fn parse_complex_selector(input: &str) -> ComplexSelector {
    let mut tokens = SelectorTokenizer::new(input.trim());
    let mut first: Option<CompoundSelector> = None;
    let mut rest: Vec<(Combinator, CompoundSelector)> = Vec::new();
    let mut current = CompoundSelector::default();
    // Combinator linking the previous compound to `current`.
    let mut link: Option<Combinator> = None;
    // Combinator seen after `current`, applied once the next compound starts.
    let mut pending: Option<Combinator> = None;

    while let Some(token) = tokens.next() {
        match token {
            Tok::Invalid => return ComplexSelector::default(),
            Tok::Combinator(comb) => {
                if current.simples.is_empty() {
                    return ComplexSelector::default();
                }
                pending = Some(comb);
            }
            Tok::DescendantWS => {
                if pending.is_none() {
                    pending = Some(Combinator::Descendant);
                }
            }
            Tok::Simple(simple) => {
                if let Some(comb) = pending.take() {
                    if !current.simples.is_empty() {
                        commit_compound(&mut first, &mut rest, take(&mut current), link);
                        link = Some(comb);
                    }
                }
                current.simples.push(simple);
            }
        }
    }

    if pending.is_some() && !matches!(pending, Some(Combinator::Descendant)) {
        // Dangling explicit combinator, e.g. "a >".
        return ComplexSelector::default();
    }
    if !current.simples.is_empty() {
        commit_compound(&mut first, &mut rest, current, link);
    }

    ComplexSelector {
        first: first.unwrap_or_default(),
        rest,
    }
}

/// Attach a finished compound either as the left-most one or after `link`.
fn commit_compound(
    first: &mut Option<CompoundSelector>,
    rest: &mut Vec<(Combinator, CompoundSelector)>,
    compound: CompoundSelector,
    link: Option<Combinator>,
) {
    if first.is_none() {
        *first = Some(compound);
    } else {
        rest.push((link.unwrap_or(Combinator::Descendant), compound));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> SimpleSelector {
        SimpleSelector::Class(name.to_owned())
    }

    #[test]
    fn parses_compound_with_pseudo_class() {
        let sel = parse_complex_selector("Button.primary:HOVER");
        assert!(sel.rest.is_empty());
        assert_eq!(
            sel.first.simples,
            vec![
                SimpleSelector::Type("button".to_owned()),
                class("primary"),
                SimpleSelector::PseudoClass(PseudoClass::Hover),
            ]
        );
    }

    #[test]
    fn keeps_each_combinator_in_a_chain() {
        let sel = parse_complex_selector(".a > .b .c ~ .d + .e");
        let combinators: Vec<Combinator> = sel.rest.iter().map(|pair| pair.0).collect();
        assert_eq!(
            combinators,
            vec![
                Combinator::Child,
                Combinator::Descendant,
                Combinator::GeneralSibling,
                Combinator::AdjacentSibling,
            ]
        );
        assert_eq!(sel.first.simples, vec![class("a")]);
        assert_eq!(sel.subject().simples, vec![class("e")]);
    }

    #[test]
    fn combinators_without_whitespace() {
        let sel = parse_complex_selector("a>b+c");
        assert_eq!(sel.rest.len(), 2);
        assert_eq!(sel.rest[0].0, Combinator::Child);
        assert_eq!(sel.rest[1].0, Combinator::AdjacentSibling);
    }

    #[test]
    fn attribute_presence_and_equality() {
        let sel = parse_complex_selector("[disabled][type='check box']");
        assert_eq!(
            sel.first.simples,
            vec![
                SimpleSelector::AttrExists("disabled".to_owned()),
                SimpleSelector::AttrEquals {
                    name: "type".to_owned(),
                    value: "check box".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn invalid_input_yields_empty_selector() {
        assert!(parse_complex_selector("a )").is_empty());
        assert!(parse_complex_selector("a >").is_empty());
        assert!(parse_complex_selector("> a").is_empty());
        assert!(parse_complex_selector("[x").is_empty());
    }

    #[test]
    fn list_splits_on_commas_and_drops_invalid_members() {
        let list = parse_selector_list(".a, .b:focus ,  ) ");
        assert_eq!(list.selectors.len(), 2);
    }
}
