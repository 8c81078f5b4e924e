use winnow::combinator::{alt, cut_err, opt, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{CompareOp, Value};

use super::ast::{Endpoint, UnaryTest, UnaryTests};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

// -- Names ------------------------------------------------------------------

fn segment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// `name` or `dotted.name`. A dot must be followed by another segment, so the
/// `..` of a range never becomes part of a name.
fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (segment, dotted_tail).take().parse_next(input)
}

fn dotted_tail(input: &mut &str) -> ModalResult<()> {
    repeat(0.., ('.', segment)).parse_next(input)
}

fn keyword_or_name(name: &str) -> Endpoint {
    match name {
        "true" => Endpoint::Value(Value::Bool(true)),
        "false" => Endpoint::Value(Value::Bool(false)),
        "null" => Endpoint::Value(Value::Null),
        other => Endpoint::Name(other.to_owned()),
    }
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<Value> {
    let text = (
        opt('-'),
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .parse_next(input)?;
    if text.contains('.') {
        let f: f64 = text
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = text
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Int(i))
    }
}

pub(super) fn endpoint(input: &mut &str) -> ModalResult<Endpoint> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(|s| Endpoint::Value(Value::String(s))),
        number.map(Endpoint::Value),
        ident.map(keyword_or_name),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "literal or name",
    )))
    .parse_next(input)
}

// -- Unary tests ------------------------------------------------------------

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt((
        "<=".value(CompareOp::Lte),
        ">=".value(CompareOp::Gte),
        "<".value(CompareOp::Lt),
        ">".value(CompareOp::Gt),
    ))
    .parse_next(input)
}

fn comparison(input: &mut &str) -> ModalResult<UnaryTest> {
    let op = compare_op.parse_next(input)?;
    let endpoint = cut_err(endpoint).parse_next(input)?;
    Ok(UnaryTest::Compare { op, endpoint })
}

fn range(input: &mut &str) -> ModalResult<UnaryTest> {
    let start_inclusive = alt(('['.value(true), '('.value(false), ']'.value(false)))
        .parse_next(input)?;
    let start = cut_err(endpoint).parse_next(input)?;
    (ws, cut_err("..")).void().parse_next(input)?;
    let end = cut_err(endpoint).parse_next(input)?;
    ws.parse_next(input)?;
    let end_inclusive = cut_err(alt((']'.value(true), ')'.value(false), '['.value(false))))
        .context(StrContext::Expected(StrContextValue::Description(
            "range end",
        )))
        .parse_next(input)?;
    Ok(UnaryTest::Range {
        start,
        start_inclusive,
        end,
        end_inclusive,
    })
}

fn unary_test(input: &mut &str) -> ModalResult<UnaryTest> {
    ws.parse_next(input)?;
    alt((
        range,
        comparison,
        endpoint.map(|endpoint| UnaryTest::Compare {
            op: CompareOp::Eq,
            endpoint,
        }),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "unary test",
    )))
    .parse_next(input)
}

fn test_list(input: &mut &str) -> ModalResult<Vec<UnaryTest>> {
    separated(1.., unary_test, (ws, ',')).parse_next(input)
}

fn negation(input: &mut &str) -> ModalResult<UnaryTests> {
    ("not", ws, '(').void().parse_next(input)?;
    let tests = cut_err(test_list).parse_next(input)?;
    (ws, cut_err(')')).void().parse_next(input)?;
    Ok(UnaryTests::Negation(tests))
}

// -- Top-level parser -------------------------------------------------------

pub(super) fn unary_tests(input: &mut &str) -> ModalResult<UnaryTests> {
    ws.parse_next(input)?;
    let tests = alt((negation, test_list.map(UnaryTests::Disjunction))).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(tests)
}
