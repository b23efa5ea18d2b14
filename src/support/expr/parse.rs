//! `nom` parsers for templates and restrictions.
//!
//! Precedence, loosest first:
//! - `or` / `|`, `and` / `&`, `not` / `~`
//! - comparisons `< <= > >= == !=`
//! - `+ -`, then `* /`
//! - unary `-` / `+`
//! - `**` (or `^`), right-associative, binding tighter than unary minus
//!   on its left so `-2**2 == -4`

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{map, map_res, not, opt, recognize, value},
    error::ErrorKind,
    multi::{fold_many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
};
use thiserror::Error;

use super::{BinOp, CmpOp, Condition, Constant, Equality, Expr, Func, is_reserved};

/// Errors produced while parsing a template or restriction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected exactly one `==`, found {0}")]
    EqualityCount(usize),

    #[error("syntax error near `{0}`")]
    Syntax(String),

    #[error("unconsumed input: `{0}`")]
    UnconsumedInput(String),
}

type PResult<'a, O> = IResult<&'a str, O>;

/// Parses an arithmetic expression.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not a complete expression.
pub fn parse_expr(text: &str) -> Result<Expr, ParseError> {
    finish(text, expr)
}

/// Parses a boolean restriction such as `v * H <= 8`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not a complete condition.
pub fn parse_condition(text: &str) -> Result<Condition, ParseError> {
    finish(text, condition)
}

/// Parses a template containing exactly one `==`.
///
/// # Example
///
/// ```
/// use insulation_solver::support::expr::{ParseError, parse_equality};
///
/// let eq = parse_equality("r_c == 2 * k / h").unwrap();
/// assert!(eq.contains("h"));
///
/// assert_eq!(parse_equality("a + b"), Err(ParseError::EqualityCount(0)));
/// assert_eq!(parse_equality("a == b == c"), Err(ParseError::EqualityCount(2)));
/// ```
///
/// # Errors
///
/// Returns [`ParseError::EqualityCount`] unless the text has exactly one
/// `==`, or a syntax error for either side.
pub fn parse_equality(text: &str) -> Result<Equality, ParseError> {
    let count = text.matches("==").count();
    let Some((lhs, rhs)) = text.split_once("==").filter(|_| count == 1) else {
        return Err(ParseError::EqualityCount(count));
    };
    Ok(Equality {
        lhs: parse_expr(lhs)?,
        rhs: parse_expr(rhs)?,
    })
}

fn finish<'a, O>(
    text: &'a str,
    mut parser: impl FnMut(&'a str) -> PResult<'a, O>,
) -> Result<O, ParseError> {
    match parser(text) {
        Ok((rest, out)) => {
            let rest = rest.trim();
            if rest.is_empty() {
                Ok(out)
            } else {
                Err(ParseError::UnconsumedInput(rest.to_string()))
            }
        }
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => {
            Err(ParseError::Syntax(err.input.chars().take(24).collect()))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Syntax(String::new())),
    }
}

fn reject(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, ErrorKind::Verify))
}

fn ws<'a, O, P>(parser: P) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    P: FnMut(&'a str) -> PResult<'a, O>,
{
    delimited(multispace0, parser, multispace0)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(satisfy(is_ident_start), take_while(is_ident_continue)))(input)
}

/// Matches `word` only when it is not the prefix of a longer identifier.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    terminated(tag(word), not(satisfy(is_ident_continue)))
}

fn expr(input: &str) -> PResult<'_, Expr> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(
            ws(alt((
                value(BinOp::Add, char('+')),
                value(BinOp::Sub, char('-')),
            ))),
            term,
        ),
        move || first.clone(),
        |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
    )(input)
}

fn term(input: &str) -> PResult<'_, Expr> {
    let (input, first) = unary(input)?;
    fold_many0(
        pair(
            ws(alt((
                value(BinOp::Mul, terminated(char('*'), not(char('*')))),
                value(BinOp::Div, char('/')),
            ))),
            unary,
        ),
        move || first.clone(),
        |lhs, (op, rhs)| Expr::binary(op, lhs, rhs),
    )(input)
}

fn unary(input: &str) -> PResult<'_, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |inner| Expr::Neg(Box::new(inner))),
        preceded(ws(char('+')), unary),
        power,
    ))(input)
}

fn power(input: &str) -> PResult<'_, Expr> {
    let (input, base) = primary(input)?;
    let (input, exponent) = opt(preceded(ws(alt((tag("**"), tag("^")))), unary))(input)?;
    let expr = match exponent {
        Some(exponent) => Expr::binary(BinOp::Pow, base, exponent),
        None => base,
    };
    Ok((input, expr))
}

fn primary(input: &str) -> PResult<'_, Expr> {
    ws(alt((number, parens, call, named)))(input)
}

fn number(input: &str) -> PResult<'_, Expr> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = tuple((one_of("eE"), opt(one_of("+-")), digit1));
    map_res(recognize(pair(mantissa, opt(exponent))), |text: &str| {
        text.parse::<f64>().map(Expr::Num)
    })(input)
}

fn parens(input: &str) -> PResult<'_, Expr> {
    delimited(ws(char('(')), expr, ws(char(')')))(input)
}

fn call(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let Some(func) = Func::from_name(name) else {
        return Err(reject(input));
    };
    let (rest, args) = delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), expr),
        ws(char(')')),
    )(rest)?;
    Ok((rest, Expr::Call { func, args }))
}

fn named(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let expr = match name {
        "pi" => Expr::Const(Constant::Pi),
        "E" => Expr::Const(Constant::E),
        _ if is_reserved(name) => return Err(reject(input)),
        _ => Expr::Var(name.to_string()),
    };
    Ok((rest, expr))
}

fn condition(input: &str) -> PResult<'_, Condition> {
    let (input, first) = conjunction(input)?;
    fold_many0(
        preceded(ws(alt((keyword("or"), tag("|")))), conjunction),
        move || first.clone(),
        |a, b| Condition::Or(Box::new(a), Box::new(b)),
    )(input)
}

fn conjunction(input: &str) -> PResult<'_, Condition> {
    let (input, first) = negation(input)?;
    fold_many0(
        preceded(ws(alt((keyword("and"), tag("&")))), negation),
        move || first.clone(),
        |a, b| Condition::And(Box::new(a), Box::new(b)),
    )(input)
}

fn negation(input: &str) -> PResult<'_, Condition> {
    alt((
        map(
            preceded(ws(alt((keyword("not"), tag("~")))), negation),
            |inner| Condition::Not(Box::new(inner)),
        ),
        ws(alt((
            value(Condition::Bool(true), keyword("True")),
            value(Condition::Bool(false), keyword("False")),
        ))),
        comparison,
        delimited(ws(char('(')), condition, ws(char(')'))),
    ))(input)
}

fn comparison(input: &str) -> PResult<'_, Condition> {
    let (input, lhs) = expr(input)?;
    let (input, rhs) = opt(pair(ws(cmp_op), expr))(input)?;
    let condition = match rhs {
        Some((op, rhs)) => Condition::Compare { op, lhs, rhs },
        None => Condition::Truthy(lhs),
    };
    Ok((input, condition))
}

fn cmp_op(input: &str) -> PResult<'_, CmpOp> {
    alt((
        value(CmpOp::Le, tag("<=")),
        value(CmpOp::Ge, tag(">=")),
        value(CmpOp::Eq, tag("==")),
        value(CmpOp::Ne, tag("!=")),
        value(CmpOp::Lt, char('<')),
        value(CmpOp::Gt, char('>')),
    ))(input)
}
