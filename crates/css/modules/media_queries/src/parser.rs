//! Media query list grammar on top of `cssparser`.
//! Spec: Section 2.4 - Media query syntax

use anyhow::anyhow;
use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::{MediaExpression, MediaQuery, MediaType, Orientation, Qualifier, Range};

/// CSS pixels per inch.
const DPI_PER_DPPX: f32 = 96.0;
/// Centimetres per inch.
const CM_PER_INCH: f32 = 2.54;

/// Parse a comma separated list of media queries.
pub fn parse_media_query_list(text: &str) -> anyhow::Result<Vec<MediaQuery>> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parser
        .parse_comma_separated(parse_media_query)
        .map_err(|err| {
            anyhow!(
                "invalid media query list `{}` at column {}",
                text.trim(),
                err.location.column
            )
        })
}

/// `[only | not]? <type> [and <expr>]*` or `<expr> [and <expr>]*`.
fn parse_media_query<'input>(
    input: &mut Parser<'input, '_>,
) -> Result<MediaQuery, ParseError<'input, ()>> {
    let mut query = MediaQuery::default();
    let location = input.current_source_location();
    if let Ok(word) = input.try_parse(|parser| parser.expect_ident_cloned()) {
        let mut name = word.to_ascii_lowercase();
        if name == "only" || name == "not" {
            query.qualifier = Some(if name == "only" {
                Qualifier::Only
            } else {
                Qualifier::Not
            });
            name = input.expect_ident_cloned()?.to_ascii_lowercase();
        }
        let Some(media_type) = MediaType::from_name(&name) else {
            return Err(location.new_custom_error(()));
        };
        query.media_type = media_type;
    } else {
        query.expressions.push(parse_expression(input)?);
    }
    while input
        .try_parse(|parser| parser.expect_ident_matching("and"))
        .is_ok()
    {
        query.expressions.push(parse_expression(input)?);
    }
    Ok(query)
}

/// `( <feature-name> : <value> )`
fn parse_expression<'input>(
    input: &mut Parser<'input, '_>,
) -> Result<MediaExpression, ParseError<'input, ()>> {
    input.expect_parenthesis_block()?;
    input.parse_nested_block(|block| {
        let location = block.current_source_location();
        let feature = block.expect_ident_cloned()?.to_ascii_lowercase();
        block.expect_colon()?;
        let (range, base) = match feature.strip_prefix("min-") {
            Some(base) => (Range::Min, base),
            None => feature
                .strip_prefix("max-")
                .map_or((Range::Exact, feature.as_str()), |base| (Range::Max, base)),
        };
        match base {
            "width" => Ok(MediaExpression::Width(range, parse_length(block)?)),
            "height" => Ok(MediaExpression::Height(range, parse_length(block)?)),
            "resolution" => Ok(MediaExpression::Resolution(range, parse_resolution(block)?)),
            "orientation" if range == Range::Exact => {
                let value = block.expect_ident_cloned()?.to_ascii_lowercase();
                match value.as_str() {
                    "portrait" => Ok(MediaExpression::Orientation(Orientation::Portrait)),
                    "landscape" => Ok(MediaExpression::Orientation(Orientation::Landscape)),
                    _ => Err(location.new_custom_error(())),
                }
            }
            _ => Err(location.new_custom_error(())),
        }
    })
}

/// Lengths in `px`/`dp` or unitless.
fn parse_length<'input>(input: &mut Parser<'input, '_>) -> Result<f32, ParseError<'input, ()>> {
    let location = input.current_source_location();
    match input.next()?.clone() {
        Token::Number { value, .. } => Ok(value),
        Token::Dimension { value, unit, .. }
            if unit.eq_ignore_ascii_case("px") || unit.eq_ignore_ascii_case("dp") =>
        {
            Ok(value)
        }
        _ => Err(location.new_custom_error(())),
    }
}

/// Resolutions in `dppx`/`x`, `dpi` or `dpcm`, normalised to dppx.
fn parse_resolution<'input>(
    input: &mut Parser<'input, '_>,
) -> Result<f32, ParseError<'input, ()>> {
    let location = input.current_source_location();
    let Token::Dimension { value, unit, .. } = input.next()?.clone() else {
        return Err(location.new_custom_error(()));
    };
    match unit.to_ascii_lowercase().as_str() {
        "dppx" | "x" => Ok(value),
        "dpi" => Ok(value / DPI_PER_DPPX),
        "dpcm" => Ok(value * CM_PER_INCH / DPI_PER_DPPX),
        _ => Err(location.new_custom_error(())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_with_features() -> anyhow::Result<()> {
        let queries =
            parse_media_query_list("only screen and (min-width: 400px) and (max-height: 300dp)")?;
        assert_eq!(
            queries,
            vec![MediaQuery {
                qualifier: Some(Qualifier::Only),
                media_type: MediaType::Screen,
                expressions: vec![
                    MediaExpression::Width(Range::Min, 400.0),
                    MediaExpression::Height(Range::Max, 300.0),
                ],
            }]
        );
        Ok(())
    }

    #[test]
    fn bare_feature_list() -> anyhow::Result<()> {
        let queries = parse_media_query_list("(orientation: landscape), (width: 10)")?;
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].media_type, MediaType::All);
        assert_eq!(
            queries[1].expressions,
            vec![MediaExpression::Width(Range::Exact, 10.0)]
        );
        Ok(())
    }
}
