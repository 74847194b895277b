//! Parse pest pairs into expression AST nodes

use miette::SourceSpan;
use pest::Parser;
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::Pair;

use crate::ast::*;
use crate::errors::{ExprError, expr_source};
use crate::{PointExprParser, Rule};

/// Parse a point expression such as `sqrt(x^2 + y^2)` or `rawy * 100`
pub fn parse_expr(source: &str) -> Result<Expr, ExprError> {
    let pairs = PointExprParser::parse(Rule::expression, source)
        .map_err(|e| syntax_error(source, e))?;

    for pair in pairs {
        if pair.as_rule() == Rule::expression {
            for inner in pair.into_inner() {
                if inner.as_rule() == Rule::expr {
                    return parse_sum(source, inner);
                }
            }
        }
    }

    Err(ExprError::Syntax {
        src: expr_source(source),
        span: (0, source.len()).into(),
        expected: "an expression".to_string(),
    })
}

fn syntax_error(source: &str, err: pest::error::Error<Rule>) -> ExprError {
    let span: SourceSpan = match err.location {
        InputLocation::Pos(pos) => (pos, 0).into(),
        InputLocation::Span((start, end)) => (start, end - start).into(),
    };
    let expected = match &err.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => positives
            .iter()
            .map(|r| format!("{:?}", r))
            .collect::<Vec<_>>()
            .join(" or "),
        ErrorVariant::ParsingError { .. } => "end of input".to_string(),
        ErrorVariant::CustomError { message } => message.clone(),
    };
    ExprError::Syntax {
        src: expr_source(source),
        span,
        expected,
    }
}

fn span_of(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

/// The grammar guarantees these children exist; a miss means the grammar
/// and this module disagree.
fn required<'i>(
    source: &str,
    pair: Option<Pair<'i, Rule>>,
    what: &str,
) -> Result<Pair<'i, Rule>, ExprError> {
    pair.ok_or_else(|| ExprError::Syntax {
        src: expr_source(source),
        span: (source.len(), 0).into(),
        expected: what.to_string(),
    })
}

fn parse_sum(source: &str, pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // expr = term ~ (add_op ~ term)*
    let mut inner = pair.into_inner();
    let mut result = parse_term(source, required(source, inner.next(), "term")?)?;

    while let Some(op_pair) = inner.next() {
        let op = match op_pair.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            _ => continue,
        };
        let rhs = parse_term(source, required(source, inner.next(), "term")?)?;
        result = Expr::BinaryOp(Box::new(result), op, Box::new(rhs));
    }

    Ok(result)
}

fn parse_term(source: &str, pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // term = factor ~ (mul_op ~ factor)*
    let mut inner = pair.into_inner();
    let mut result = parse_factor(source, required(source, inner.next(), "factor")?)?;

    while let Some(op_pair) = inner.next() {
        let op = match op_pair.as_str() {
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            _ => continue,
        };
        let rhs = parse_factor(source, required(source, inner.next(), "factor")?)?;
        result = Expr::BinaryOp(Box::new(result), op, Box::new(rhs));
    }

    Ok(result)
}

fn parse_factor(source: &str, pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // factor = prefix? ~ power
    let mut inner = pair.into_inner().peekable();

    let mut prefix: Option<UnaryOp> = None;
    if inner.peek().map(|p| p.as_rule()) == Some(Rule::prefix) {
        let p = required(source, inner.next(), "prefix")?;
        prefix = Some(if p.as_str() == "-" {
            UnaryOp::Neg
        } else {
            UnaryOp::Pos
        });
    }

    let result = parse_power(source, required(source, inner.next(), "operand")?)?;

    // Prefix binds looser than `^`: -2^2 is -(2^2)
    Ok(match prefix {
        Some(op) => Expr::UnaryOp(op, Box::new(result)),
        None => result,
    })
}

fn parse_power(source: &str, pair: Pair<Rule>) -> Result<Expr, ExprError> {
    // power = primary ~ (pow_op ~ factor)?
    let mut inner = pair.into_inner();
    let base = parse_primary(source, required(source, inner.next(), "operand")?)?;

    if inner.next().is_some() {
        let exponent = parse_factor(source, required(source, inner.next(), "exponent")?)?;
        return Ok(Expr::BinaryOp(Box::new(base), BinaryOp::Pow, Box::new(exponent)));
    }

    Ok(base)
}

fn parse_primary(source: &str, pair: Pair<Rule>) -> Result<Expr, ExprError> {
    let first = required(source, pair.into_inner().next(), "operand")?;

    match first.as_rule() {
        Rule::expr => Ok(Expr::ParenExpr(Box::new(parse_sum(source, first)?))),
        Rule::func_call => parse_func_call(source, first),
        Rule::number => parse_number(source, first),
        Rule::ident => {
            let name = first.as_str();
            PointVar::from_name(name)
                .map(Expr::Var)
                .ok_or_else(|| ExprError::UnknownIdentifier {
                    name: name.to_string(),
                    src: expr_source(source),
                    span: span_of(&first),
                })
        }
        other => Err(ExprError::Syntax {
            src: expr_source(source),
            span: span_of(&first),
            expected: format!("operand, found {:?}", other),
        }),
    }
}

fn parse_func_call(source: &str, pair: Pair<Rule>) -> Result<Expr, ExprError> {
    let span = span_of(&pair);
    let mut inner = pair.into_inner();
    let name_pair = required(source, inner.next(), "function name")?;
    let func = Function::from_name(name_pair.as_str()).ok_or_else(|| ExprError::UnknownFunction {
        name: name_pair.as_str().to_string(),
        src: expr_source(source),
        span: span_of(&name_pair),
    })?;

    let mut args = Vec::new();
    for arg in inner {
        if arg.as_rule() == Rule::expr {
            args.push(parse_sum(source, arg)?);
        }
    }

    if args.len() != func.arity() {
        return Err(ExprError::Arity {
            name: func.name(),
            expected: func.arity(),
            got: args.len(),
            src: expr_source(source),
            span,
        });
    }

    Ok(Expr::FuncCall(FuncCall { func, args }))
}

fn parse_number(source: &str, pair: Pair<Rule>) -> Result<Expr, ExprError> {
    pair.as_str()
        .parse::<f64>()
        .map(Expr::Number)
        .map_err(|e| ExprError::InvalidNumber {
            message: e.to_string(),
            src: expr_source(source),
            span: span_of(&pair),
        })
}
