use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_until},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{map_res, opt, recognize},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{Result, StoreError};

#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Open,
    Close,
    Add { name: String, email: String },
    Get { id: i64 },
    Find { email: String },
    Delete { id: i64 },
    SetActive { id: i64, active: bool },
    List { active_only: bool },
    Count,
    Clear,
    Help,
    Exit,
}

// --- BASIC PARSERS ---

fn parse_i64(input: &str) -> IResult<&str, i64> {
    map_res(recognize(tuple((opt(char('-')), digit1))), |s: &str| s.parse::<i64>())(input)
}

fn parse_quoted_string(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let (input, content) = take_until("\"")(input)?;
    let (input, _) = char('"')(input)?;
    Ok((input, content.to_string()))
}

/// An id, optionally wrapped in single quotes: `42` or `'42'`.
fn parse_id(input: &str) -> IResult<&str, i64> {
    delimited(opt(char('\'')), parse_i64, opt(char('\'')))(input)
}

// --- HELPERS ---
fn ws<'a, F, O, E: nom::error::ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where F: FnMut(&'a str) -> IResult<&'a str, O, E> {
    delimited(multispace0, inner, multispace0)
}

fn tag_ci(t: &'static str) -> impl FnMut(&str) -> IResult<&str, &str> {
    move |input| tag_no_case(t)(input)
}

fn keyword_then_id<'a>(kw: &'static str, input: &'a str) -> IResult<&'a str, i64> {
    let (input, _) = tag_ci(kw)(input)?;
    let (input, _) = multispace1(input)?;
    parse_id(input)
}

// --- COMMAND PARSERS ---

fn parse_open(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("OPEN")(input)?;
    Ok((input, Command::Open))
}

fn parse_close(input: &str) -> IResult<&str, Command> {
    let (input, _) = alt((tag_ci("CLOSE"), tag_ci("DESTROY")))(input)?;
    Ok((input, Command::Close))
}

fn parse_add(input: &str) -> IResult<&str, Command> {
    let (input, _) = alt((tag_ci("ADD"), tag_ci("SAVE")))(input)?;
    let (input, _) = opt(ws(tag_ci("USER")))(input)?;
    let (input, name) = ws(parse_quoted_string)(input)?;
    let (input, _) = opt(ws(char(',')))(input)?;
    let (input, email) = ws(parse_quoted_string)(input)?;
    Ok((input, Command::Add { name, email }))
}

fn parse_get(input: &str) -> IResult<&str, Command> {
    let (input, id) = keyword_then_id("GET", input)?;
    Ok((input, Command::Get { id }))
}

fn parse_find(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("FIND")(input)?;
    let (input, _) = opt(preceded(multispace1, tag_ci("EMAIL")))(input)?;
    let (input, email) = ws(parse_quoted_string)(input)?;
    Ok((input, Command::Find { email }))
}

fn parse_delete(input: &str) -> IResult<&str, Command> {
    let (input, id) = keyword_then_id("DELETE", input)?;
    Ok((input, Command::Delete { id }))
}

fn parse_activate(input: &str) -> IResult<&str, Command> {
    let (input, id) = keyword_then_id("ACTIVATE", input)?;
    Ok((input, Command::SetActive { id, active: true }))
}

fn parse_deactivate(input: &str) -> IResult<&str, Command> {
    let (input, id) = keyword_then_id("DEACTIVATE", input)?;
    Ok((input, Command::SetActive { id, active: false }))
}

fn parse_list(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("LIST")(input)?;
    let (input, active) = opt(preceded(multispace1, tag_ci("ACTIVE")))(input)?;
    Ok((input, Command::List { active_only: active.is_some() }))
}

fn parse_count(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("COUNT")(input)?;
    Ok((input, Command::Count))
}

fn parse_clear(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("CLEAR")(input)?;
    Ok((input, Command::Clear))
}

fn parse_help(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("HELP")(input)?;
    Ok((input, Command::Help))
}

fn parse_exit(input: &str) -> IResult<&str, Command> {
    let (input, _) = alt((tag_ci("EXIT"), tag_ci("QUIT")))(input)?;
    Ok((input, Command::Exit))
}

pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim();
    let result = alt((
        parse_open,
        parse_close,
        parse_add,
        parse_get,
        parse_find,
        parse_delete,
        parse_activate,
        parse_deactivate,
        parse_list,
        parse_count,
        parse_clear,
        parse_help,
        parse_exit,
    ))(input);

    match result {
        Ok((remainder, cmd)) => {
            if !remainder.trim().is_empty() {
                return Err(StoreError::Parse(format!("Unexpected tokens at end: '{}'", remainder)));
            }
            Ok(cmd)
        },
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            // e.input contains the slice where parsing failed
            let context: String = if e.input.chars().count() > 20 {
                format!("{}...", e.input.chars().take(20).collect::<String>())
            } else {
                e.input.to_string()
            };
            Err(StoreError::Parse(format!("Invalid syntax near: '{}'", context)))
        },
        Err(nom::Err::Incomplete(_)) => Err(StoreError::Parse("Incomplete command.".to_string())),
    }
}
