// Request parser: kind(attr) | kind(x: attr, y: attr) | kind(attr, attr)

use super::lexer::{identifier, ws};
use crate::charts::ChartKind;
use crate::dispatch::{AttributeSelector, ChartRequest};
use crate::error::{ChartError, Result};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{eof, map},
    sequence::{preceded, separated_pair},
    IResult,
};

/// Parse a named pair
/// Format: x: col, y: col
fn parse_named_pair(input: &str) -> IResult<&str, AttributeSelector> {
    map(
        separated_pair(
            preceded(pair_key("x"), ws(identifier)),
            ws(char(',')),
            preceded(pair_key("y"), ws(identifier)),
        ),
        |(x, y)| AttributeSelector::Pair { x, y },
    )(input)
}

fn pair_key<'a>(key: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, char> {
    preceded(ws(tag(key)), ws(char(':')))
}

/// Parse a positional pair
/// Format: col, col
fn parse_positional_pair(input: &str) -> IResult<&str, AttributeSelector> {
    map(
        separated_pair(ws(identifier), ws(char(',')), ws(identifier)),
        |(x, y)| AttributeSelector::Pair { x, y },
    )(input)
}

fn parse_single(input: &str) -> IResult<&str, AttributeSelector> {
    map(ws(identifier), AttributeSelector::Single)(input)
}

/// Parse a request expression into its raw kind name and selector
/// Format: kind(args)
pub fn parse_request_expr(input: &str) -> IResult<&str, (String, AttributeSelector)> {
    let (input, kind) = ws(identifier)(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, selector) = alt((parse_named_pair, parse_positional_pair, parse_single))(input)?;
    let (input, _) = ws(char(')'))(input)?;
    let (input, _) = ws(eof)(input)?;

    Ok((input, (kind, selector)))
}

/// Parse a complete chart request such as `scatter(x: releasedyear, y: streams)`.
///
/// Syntax errors fail with `Parse`; a well-formed request naming an unknown
/// chart fails with `UnknownChartKind`. Arity is checked by the dispatcher.
pub fn parse_request(text: &str) -> Result<ChartRequest> {
    let (_, (kind, selector)) = parse_request_expr(text).map_err(|e| match e {
        nom::Err::Error(err) | nom::Err::Failure(err) => ChartError::Parse(format!(
            "unexpected input at '{}' in '{}'",
            err.input.trim(),
            text.trim()
        )),
        nom::Err::Incomplete(_) => ChartError::Parse(format!("incomplete request '{}'", text.trim())),
    })?;

    let kind = kind.parse::<ChartKind>()?;
    Ok(ChartRequest::new(kind, selector))
}
