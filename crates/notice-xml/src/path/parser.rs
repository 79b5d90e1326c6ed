//! nom grammar for path expressions.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, not, opt, peek, recognize, value},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use super::ast::{Axis, CompareOp, Expr, LocationPath, NodeTest, Operand, Predicate, Step};
use crate::error::PathError;

/// Parses a complete expression; trailing input is a syntax error.
pub fn parse_expr(source: &str) -> Result<Expr, PathError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(PathError::Syntax {
            expr: source.to_string(),
            message: "empty expression".to_string(),
        });
    }
    match all_consuming(expr)(trimmed) {
        Ok((_, parsed)) => Ok(parsed),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(PathError::Syntax {
            expr: source.to_string(),
            message: format!("unexpected input at {:?}", e.input),
        }),
        Err(nom::Err::Incomplete(_)) => Err(PathError::Syntax {
            expr: source.to_string(),
            message: "incomplete expression".to_string(),
        }),
    }
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, inner, multispace0)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// A keyword that is not the prefix of a longer name.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), not(take_while1(is_name_char)))
}

fn expr(input: &str) -> IResult<&str, Expr> {
    or_expr(input)
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(keyword("or")), and_expr))(input)?;
    Ok((input, fold(first, rest, Expr::Or)))
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary_expr(input)?;
    let (input, rest) = many0(preceded(ws(keyword("and")), unary_expr))(input)?;
    Ok((input, fold(first, rest, Expr::And)))
}

fn fold(first: Expr, rest: Vec<Expr>, join: fn(Box<Expr>, Box<Expr>) -> Expr) -> Expr {
    rest.into_iter()
        .fold(first, |acc, next| join(Box::new(acc), Box::new(next)))
}

fn unary_expr(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        map(
            preceded(
                pair(tag("not"), multispace0),
                delimited(char('('), ws(expr), char(')')),
            ),
            |inner| Expr::Not(Box::new(inner)),
        ),
        delimited(char('('), ws(expr), char(')')),
        comparison,
    )))(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (input, left) = operand(input)?;
    let (input, rest) = opt(pair(ws(compare_op), operand))(input)?;
    let parsed = match rest {
        Some((op, right)) => Expr::Compare { left, op, right },
        None => Expr::Operand(left),
    };
    Ok((input, parsed))
}

fn compare_op(input: &str) -> IResult<&str, CompareOp> {
    alt((value(CompareOp::Ne, tag("!=")), value(CompareOp::Eq, char('='))))(input)
}

fn operand(input: &str) -> IResult<&str, Operand> {
    alt((
        map(string_literal, |text: &str| Operand::Text(text.to_string())),
        map(number, Operand::Number),
        map(location_path, Operand::Path),
    ))(input)
}

fn string_literal(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
    ))(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    // `double` alone would also accept names such as `inf`.
    preceded(peek(alt((digit1, tag("-")))), double)(input)
}

pub(crate) fn location_path(input: &str) -> IResult<&str, LocationPath> {
    alt((
        map(preceded(tag("//"), relative_steps), |steps| {
            let mut all = vec![Step::new(Axis::DescendantOrSelf, NodeTest::Node)];
            all.extend(steps);
            LocationPath {
                absolute: true,
                steps: all,
            }
        }),
        map(preceded(char('/'), opt(relative_steps)), |steps| {
            LocationPath {
                absolute: true,
                steps: steps.unwrap_or_default(),
            }
        }),
        map(relative_steps, |steps| LocationPath {
            absolute: false,
            steps,
        }),
    ))(input)
}

fn relative_steps(input: &str) -> IResult<&str, Vec<Step>> {
    let (input, first) = step(input)?;
    let (input, rest) = many0(pair(alt((tag("//"), tag("/"))), step))(input)?;
    let mut steps = vec![first];
    for (separator, next) in rest {
        if separator == "//" {
            steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::Node));
        }
        steps.push(next);
    }
    Ok((input, steps))
}

fn step(input: &str) -> IResult<&str, Step> {
    alt((
        value(Step::new(Axis::Parent, NodeTest::Node), tag("..")),
        value(Step::new(Axis::SelfNode, NodeTest::Node), char('.')),
        map(preceded(char('@'), name_test), |test| {
            Step::new(Axis::Attribute, test)
        }),
        map(pair(node_test, many0(predicate)), |(test, predicates)| Step {
            axis: Axis::Child,
            test,
            predicates,
        }),
    ))(input)
}

fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        value(NodeTest::Text, tuple((tag("text"), multispace0, tag("()")))),
        value(NodeTest::Node, tuple((tag("node"), multispace0, tag("()")))),
        name_test,
    ))(input)
}

fn name_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        value(NodeTest::Any, char('*')),
        map(qualified_name, |name: &str| NodeTest::Name(name.to_string())),
    ))(input)
}

fn qualified_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(ncname, opt(pair(char(':'), ncname))))(input)
}

fn ncname(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_name_start),
        take_while(is_name_char),
    ))(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    delimited(
        char('['),
        ws(alt((
            map(
                terminated(
                    map_res(digit1, str::parse::<usize>),
                    peek(pair(multispace0, char(']'))),
                ),
                Predicate::Position,
            ),
            map(expr, Predicate::Filter),
        ))),
        char(']'),
    )(input)
}
