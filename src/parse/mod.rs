mod ast;
mod error;
mod grammar;

pub use ast::{Endpoint, OutputExpr, UnaryTest, UnaryTests};
pub use error::ParseError;

/// Parse the text of an input entry into [`UnaryTests`].
///
/// An empty entry and `-` both mean "no test".
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid unary test syntax.
pub fn parse_unary_tests(input: &str) -> Result<UnaryTests, ParseError> {
    use winnow::Parser;
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(UnaryTests::Any);
    }
    grammar::unary_tests
        .parse(trimmed)
        .map_err(|e| ParseError::new(e.to_string()))
}

/// Parse the text of an output entry: a literal or a variable name.
///
/// An empty entry is the null literal.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is neither a literal nor a name.
pub fn parse_output(input: &str) -> Result<OutputExpr, ParseError> {
    use winnow::Parser;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Endpoint::Value(crate::Value::Null));
    }
    grammar::endpoint
        .parse(trimmed)
        .map_err(|e| ParseError::new(e.to_string()))
}
