//! CSS Syntax Module Level 3 - Parsing and tokenization.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Produces a raw rule tree (preludes as text, declarations as name/value
//! pairs) for style rules, `@media` blocks and `@keyframes` blocks. Anything
//! else is skipped with a warning.
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::StyleSheetParser;
use log::warn;

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub name: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
}

/// A single style rule with a raw prelude and parsed declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    /// Raw prelude text (the selector list, or a keyframe selector list).
    pub prelude: String,
    /// Declarations within the rule block.
    pub declarations: Vec<Declaration>,
}

/// An `@media` block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaRule {
    /// Raw media query list text.
    pub query: String,
    /// Style rules inside the block, in source order.
    pub rules: Vec<StyleRule>,
}

/// An `@keyframes` block; each block's prelude is its keyframe selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyframesRule {
    pub name: String,
    pub blocks: Vec<StyleRule>,
}

/// A rule at stylesheet level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopLevelRule {
    Style(StyleRule),
    Media(MediaRule),
    Keyframes(KeyframesRule),
}

/// A parsed stylesheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level rules in source order.
    pub rules: Vec<TopLevelRule>,
}

/// Strip a trailing `!important`, returning the remaining value and whether
/// it was present.
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if let Some(pos) = trimmed.rfind('!') {
        let (head, tail) = trimmed.split_at(pos);
        if tail[1..].trim().eq_ignore_ascii_case("important") {
            return (head.trim_end().to_owned(), true);
        }
    }
    (trimmed.to_owned(), false)
}

/// A declaration parser that records property name and its raw value.
struct BodyDeclParser;

impl<'i> CssDeclarationParser<'i> for BodyDeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let raw = input.slice_from(start);
        let (value, important) = split_important_tail(raw);
        Ok(Declaration {
            name: name.to_ascii_lowercase(),
            value,
            important,
        })
    }
}

impl<'i> CssAtRuleParser<'i> for BodyDeclParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> CssQualifiedRuleParser<'i> for BodyDeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> CssRuleBodyItemParser<'i, Declaration, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Parse declarations from a rule block using `cssparser` body parser.
fn parse_declarations_from_block(block: &mut Parser) -> Vec<Declaration> {
    let mut body = BodyDeclParser;
    CssRuleBodyParser::new(block, &mut body)
        .filter_map(|item| match item {
            Ok(decl) => Some(decl),
            Err((_, slice)) => {
                warn!(target: "css_syntax", "skipping invalid declaration `{}`", slice.trim());
                None
            }
        })
        .collect()
}

/// Prelude of a recognised at-rule.
enum AtRulePrelude {
    Media(String),
    Keyframes(String),
}

/// Rule parser. At stylesheet level it accepts `@media` and `@keyframes`;
/// inside those blocks (`nested`) it only accepts qualified rules.
struct RuleParser {
    nested: bool,
}

impl<'i> CssAtRuleParser<'i> for RuleParser {
    type Prelude = AtRulePrelude;
    type AtRule = TopLevelRule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        if self.nested {
            return Err(input.new_error(BasicParseErrorKind::AtRuleInvalid(name)));
        }
        if name.eq_ignore_ascii_case("media") {
            let start = input.position();
            while input.next().is_ok() {}
            return Ok(AtRulePrelude::Media(input.slice_from(start).trim().to_owned()));
        }
        if name.eq_ignore_ascii_case("keyframes") {
            let keyframes_name = str::to_owned(input.expect_ident_or_string()?);
            return Ok(AtRulePrelude::Keyframes(keyframes_name));
        }
        Err(input.new_error(BasicParseErrorKind::AtRuleInvalid(name)))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let rules = parse_nested_rules(input);
        Ok(match prelude {
            AtRulePrelude::Media(query) => TopLevelRule::Media(MediaRule { query, rules }),
            AtRulePrelude::Keyframes(name) => TopLevelRule::Keyframes(KeyframesRule {
                name,
                blocks: rules,
            }),
        })
    }
}

impl<'i> CssQualifiedRuleParser<'i> for RuleParser {
    type Prelude = String; // raw selector/prelude
    type QualifiedRule = TopLevelRule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.state();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok(input.slice_from(start.position()).trim().to_owned())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Ok(TopLevelRule::Style(StyleRule {
            prelude,
            declarations: parse_declarations_from_block(input),
        }))
    }
}

/// Iterate rules of `parser`, logging and dropping the invalid ones.
fn collect_rules(parser: &mut Parser, nested: bool) -> Vec<TopLevelRule> {
    let mut rule_parser = RuleParser { nested };
    StyleSheetParser::new(parser, &mut rule_parser)
        .filter_map(|item| match item {
            Ok(rule) => Some(rule),
            Err((_, slice)) => {
                warn!(target: "css_syntax", "skipping invalid rule `{}`", slice.trim());
                None
            }
        })
        .collect()
}

/// Style rules inside an at-rule block.
fn parse_nested_rules(block: &mut Parser) -> Vec<StyleRule> {
    collect_rules(block, true)
        .into_iter()
        .filter_map(|rule| match rule {
            TopLevelRule::Style(style) => Some(style),
            TopLevelRule::Media(_) | TopLevelRule::Keyframes(_) => None,
        })
        .collect()
}

/// Parse a full stylesheet into a `Stylesheet` using cssparser.
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    Stylesheet {
        rules: collect_rules(&mut parser, false),
    }
}

/// Parse the body of an inline `style` attribute (`a: b; c: d`).
pub fn parse_declarations(css: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_declarations_from_block(&mut parser)
}
