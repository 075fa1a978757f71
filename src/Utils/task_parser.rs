/// parse document with structure like
/// ```text
/// title1
///   key1: value1, value2
///   key2: "quoted value, with spaces"
/// title2
///   key3: value3
/// ```
/// into HashMap<String, HashMap<String, Option<Vec<Value>>>>. If a template is given, every
/// title/key of the template is present in the result, keys absent from the document as None.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// Float or Integer as f64: "a: 0" and "a: 0.0" mean the same thing
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// word characters without spaces, not starting with a digit
fn parse_name(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

fn parse_title(input: &str) -> IResult<&str, String> {
    parse_name(input)
}

fn parse_key(input: &str) -> IResult<&str, String> {
    parse_name(input)
}

/// "..." or '...'; everything between the quotes is kept as is
fn parse_quoted(input: &str) -> IResult<&str, Value> {
    let double = delimited(char('"'), take_while(|c: char| c != '"' && c != '\n'), char('"'));
    let single = delimited(char('\''), take_while(|c: char| c != '\'' && c != '\n'), char('\''));
    map(alt((double, single)), |s: &str| Value::String(s.to_string())).parse(input)
}

/// unquoted value: up to a comma, whitespace or semicolon, typed by the first parse that succeeds
fn parse_bare_value(input: &str) -> IResult<&str, Value> {
    let value_parser =
        take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';' | '"' | '\''));
    map(value_parser, |s: &str| {
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    })
    .parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((parse_quoted, parse_bare_value)).parse(input)
}

/// comma separated values on the same line as the key
fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator_coma = delimited(space0, tag(","), space0);
    separated_list1(separator_coma, parse_value).parse(input)
}

fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, char(':'), space0);
    terminated(
        separated_pair(parse_key, colon_separator, parse_value_list),
        multispace0,
    )
    .parse(input)
}

/// a title followed by at least one key-value pair
fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(parse_key_value_pair).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Filters out comment lines (starting with //, #, %, or ;) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the sections of a comment-free document; a repeated title extends the earlier section
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(multispace0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;

    let mut result: DocumentMap = HashMap::new();
    for (title, section_map) in sections {
        let entry = result.entry(title).or_default();
        for (key, values) in section_map {
            entry.insert(key, Some(values));
        }
    }
    Ok((input, result))
}

/// Parses a whole document (comments allowed) and merges it with an optional template.
/// A document without any sections is empty, not malformed.
pub fn parse_document_as(
    input: &str,
    template: Option<DocumentMap>,
) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    let mut parsed = if filtered.trim().is_empty() {
        DocumentMap::new()
    } else {
        parse_document_checked(&filtered)?
    };

    if let Some(template) = template {
        for (title, keys_map) in template {
            let section_map = parsed.entry(title).or_default();
            for key in keys_map.into_keys() {
                section_map.entry(key).or_insert(None);
            }
        }
    }
    Ok(parsed)
}

/// the whole input must be consumed
fn parse_document_checked(input: &str) -> Result<DocumentMap, String> {
    match parse_document(input) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                let line = remaining.trim().lines().next().unwrap_or_default();
                return Err(format!("Failed to parse entire document. Cannot parse: '{}'", line));
            }
            Ok(parsed)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

/// template with the given titles and keys, all values None
pub fn template_from(layout: &[(&str, &[&str])]) -> DocumentMap {
    layout
        .iter()
        .map(|(title, keys)| {
            let section: SectionMap = keys.iter().map(|key| (key.to_string(), None)).collect();
            (title.to_string(), section)
        })
        .collect()
}

/////////////////////////////TESTS////////////////////////////////////////////////////
