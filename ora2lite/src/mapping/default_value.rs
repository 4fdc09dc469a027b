//! Translation of Oracle column DEFAULT expressions

use sqlparser::ast::{Expr, UnaryOperator, Value};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::Token;
use tracing::debug;

/// Translate an Oracle `DATA_DEFAULT` expression into a SQLite DEFAULT
/// expression.
///
/// Literals and `NULL` carry over, the current-date functions map to their
/// SQLite keywords, and anything else yields `None`.
pub fn translate_default(expression: &str) -> Option<String> {
    let expression = expression.trim();
    if expression.is_empty() {
        return None;
    }

    let translated = parse_expr(expression).and_then(|expr| translate_expr(&expr));
    if translated.is_none() {
        debug!("Dropping DEFAULT {}: not portable to SQLite", expression);
    }
    translated
}

fn parse_expr(expression: &str) -> Option<Expr> {
    let dialect = GenericDialect {};
    let mut parser = Parser::new(&dialect).try_with_sql(expression).ok()?;
    let expr = parser.parse_expr().ok()?;

    if parser.peek_token().token != Token::EOF {
        return None;
    }
    Some(expr)
}

fn translate_expr(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Value(v) => match &v.value {
            Value::Number(..) | Value::SingleQuotedString(_) | Value::Null => {
                Some(expr.to_string())
            }
            Value::NationalStringLiteral(s) => Some(format!("'{}'", s.replace('\'', "''"))),
            _ => None,
        },
        Expr::UnaryOp {
            op: UnaryOperator::Minus | UnaryOperator::Plus,
            expr: inner,
        } => match inner.as_ref() {
            Expr::Value(v) if matches!(v.value, Value::Number(..)) => Some(expr.to_string()),
            _ => None,
        },
        Expr::Nested(inner) => translate_expr(inner),
        Expr::Identifier(ident) => current_time_keyword(&ident.value),
        Expr::Function(function) => current_time_keyword(&function.name.to_string()),
        _ => None,
    }
}

fn current_time_keyword(name: &str) -> Option<String> {
    match name.to_uppercase().as_str() {
        "SYSDATE" | "SYSTIMESTAMP" | "CURRENT_TIMESTAMP" | "LOCALTIMESTAMP" => {
            Some("CURRENT_TIMESTAMP".to_string())
        }
        "CURRENT_DATE" => Some("CURRENT_DATE".to_string()),
        _ => None,
    }
}
