//! Low-level nom parser functions for attribute shorthand values.
//!
//! Covers lengths, dimensions, colors and borders as they appear in
//! declaratively written attribute values (`"12pt"`, `"50%"`, `"1pt solid #000"`).

use crate::border::{Border, BorderStyle};
use crate::dimension::Dimension;
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while_m_n};
use nom::character::complete::{char, digit1, one_of, space0};
use nom::combinator::{map, map_res, opt, recognize};
use nom::error::Error as NomError;
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};
use tabulate_types::Color;
use thiserror::Error;

/// Errors that can occur during shorthand parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

// --- Helper Parsers ---

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = NomError<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = NomError<&'a str>>,
{
    delimited(space0, inner, space0)
}

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit1)))),
                recognize(pair(char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

// --- Unit & Dimension Parsers ---

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        map(tag_no_case("pt"), |_| 1.0),
        map(tag_no_case("px"), |_| 1.0),
        map(tag_no_case("in"), |_| 72.0),
        map(tag_no_case("cm"), |_| 28.35),
        map(tag_no_case("mm"), |_| 2.835),
    ))
    .parse(input)
}

/// Parses a length value with optional unit (e.g., "12pt", "1in", "10mm"). Unitless means points.
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    let (input, value) = parse_f32(input)?;
    let (input, unit_multiplier) = opt(parse_unit).parse(input)?;
    Ok((input, value * unit_multiplier.unwrap_or(1.0)))
}

/// Parses a dimension value (length, percentage, or "auto").
pub fn parse_dimension(input: &str) -> IResult<&str, Dimension> {
    alt((
        map(tag("auto"), |_| Dimension::Auto),
        map(pair(parse_f32, char('%')), |(val, _)| Dimension::Percent(val)),
        map(parse_length, Dimension::Pt),
    ))
    .parse(input)
}

// --- Color & Border Parsers ---

/// Parses a hex color (e.g., "#FF0000" or "#F00").
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    map_res(
        recognize(preceded(
            char('#'),
            take_while_m_n(3, 6, |c: char| c.is_ascii_hexdigit()),
        )),
        Color::parse_hex,
    )
    .parse(input)
}

/// Parses a border style keyword.
pub fn parse_border_style(input: &str) -> IResult<&str, BorderStyle> {
    alt((
        map(tag_no_case("solid"), |_| BorderStyle::Solid),
        map(tag_no_case("dashed"), |_| BorderStyle::Dashed),
        map(tag_no_case("dotted"), |_| BorderStyle::Dotted),
        map(tag_no_case("double"), |_| BorderStyle::Double),
        map(tag_no_case("none"), |_| BorderStyle::None),
    ))
    .parse(input)
}

/// Parses a border shorthand (e.g., "2pt solid #00ff00"). The color is optional.
pub fn parse_border(input: &str) -> IResult<&str, Border> {
    map(
        (ws(parse_length), ws(parse_border_style), opt(ws(parse_color))),
        |(width, style, color)| Border {
            width: Some(width),
            style: Some(style),
            color,
        },
    )
    .parse(input)
}

/// Runs a parser over the whole (trimmed) input.
pub fn run_parser<'a, T, P>(mut parser: P, input: &'a str) -> Result<T, StyleParseError>
where
    P: Parser<&'a str, Output = T, Error = NomError<&'a str>>,
{
    match parser.parse(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

/// Parses a length string into points.
pub fn parse_length_str(input: &str) -> Result<f32, StyleParseError> {
    run_parser(parse_length, input).map_err(|_| StyleParseError::InvalidValue {
        property: "length".to_string(),
        value: input.to_string(),
    })
}
