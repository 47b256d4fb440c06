//! Sandboxed evaluation of catalog criterion expressions.
//!
//! Criteria arrive as free text from an externally editable spreadsheet, so
//! they are never handed to a general-purpose interpreter. The expression is
//! tokenized and parsed against a closed grammar, identifiers are resolved
//! against a fixed variable scope built from the patient profile, and any
//! failure makes the rule not applicable rather than aborting the request.

mod parser;

use std::collections::BTreeMap;

use parser::{parse, tokenize, BinaryOp, Expr};

use super::bmi::BmiResult;
use super::domain::{ConditionProfile, RiskFactor};

#[derive(Debug, thiserror::Error)]
pub enum CriterionError {
    #[error("criterion is empty")]
    Empty,
    #[error("unexpected character '{character}' at byte {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid numeric literal '{0}'")]
    InvalidNumber(String),
    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("expression has trailing input")]
    TrailingInput,
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(&'static str),
    #[error("criterion did not produce a boolean")]
    NotBoolean,
}

/// Value bound to a criterion variable.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeValue {
    Number(f64),
    Text(String),
}

/// The closed set of variables a criterion may reference, bound to one
/// patient's profile. Categorical values carry the questionnaire labels
/// verbatim so spreadsheet authors compare against the exact strings they see.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableScope {
    bindings: BTreeMap<&'static str, ScopeValue>,
}

impl VariableScope {
    pub fn for_profile(profile: &ConditionProfile, bmi: &BmiResult) -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert("edad", ScopeValue::Number(f64::from(profile.age)));
        bindings.insert("imc", ScopeValue::Number(bmi.value));
        bindings.insert(
            "sexo",
            ScopeValue::Text(profile.biological_sex.label().to_string()),
        );

        let ternary = [
            ("fumador", RiskFactor::Smoker),
            ("antecedentes_mama", RiskFactor::FamilyHistoryBreast),
            ("diabetes", RiskFactor::Diabetes),
            ("hipertension", RiskFactor::Hypertension),
        ];
        for (name, factor) in ternary {
            bindings.insert(name, ScopeValue::Text(profile.answer(factor).label().to_string()));
        }

        Self { bindings }
    }

    fn resolve(&self, name: &str) -> Option<&ScopeValue> {
        self.bindings.get(name)
    }
}

/// Decide whether a criterion applies to the bound profile, failing closed:
/// malformed expressions and unknown variables make the rule not applicable,
/// with the reason reported on the observability channel.
pub fn evaluate(criterion: &str, scope: &VariableScope) -> bool {
    match eval_expression(criterion, scope) {
        Ok(applies) => applies,
        Err(error) => {
            tracing::warn!(%criterion, %error, "criterion rejected; rule treated as not applicable");
            false
        }
    }
}

/// Fallible form of [`evaluate`] for tests and diagnostics.
pub fn eval_expression(criterion: &str, scope: &VariableScope) -> Result<bool, CriterionError> {
    let trimmed = criterion.trim();
    if trimmed.is_empty() {
        return Err(CriterionError::Empty);
    }
    let tokens = tokenize(trimmed)?;
    let expr = parse(&tokens)?;
    match eval(&expr, scope)? {
        Evaluated::Bool(value) => Ok(value),
        _ => Err(CriterionError::NotBoolean),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Evaluated {
    Number(f64),
    Text(String),
    Bool(bool),
}

fn eval(expr: &Expr, scope: &VariableScope) -> Result<Evaluated, CriterionError> {
    match expr {
        Expr::Number(value) => Ok(Evaluated::Number(*value)),
        Expr::Text(value) => Ok(Evaluated::Text(value.clone())),
        Expr::Variable(name) => match scope.resolve(name) {
            Some(ScopeValue::Number(value)) => Ok(Evaluated::Number(*value)),
            Some(ScopeValue::Text(value)) => Ok(Evaluated::Text(value.clone())),
            None => Err(CriterionError::UnknownVariable(name.clone())),
        },
        Expr::Negate(inner) => match eval(inner, scope)? {
            Evaluated::Number(value) => Ok(Evaluated::Number(-value)),
            _ => Err(CriterionError::TypeMismatch("negation needs a number")),
        },
        Expr::Binary { op, left, right } => {
            let left = eval(left, scope)?;
            let right = eval(right, scope)?;
            apply(*op, left, right)
        }
    }
}

fn apply(op: BinaryOp, left: Evaluated, right: Evaluated) -> Result<Evaluated, CriterionError> {
    use Evaluated::{Bool, Number, Text};

    match op {
        BinaryOp::Or | BinaryOp::And => match (left, right) {
            (Bool(a), Bool(b)) => Ok(Bool(if op == BinaryOp::Or { a || b } else { a && b })),
            _ => Err(CriterionError::TypeMismatch(
                "'and'/'or' connect boolean conditions",
            )),
        },
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = match (&left, &right) {
                (Number(a), Number(b)) => a == b,
                (Text(a), Text(b)) => a == b,
                (Bool(a), Bool(b)) => a == b,
                _ => {
                    return Err(CriterionError::TypeMismatch(
                        "equality compares values of the same kind",
                    ))
                }
            };
            Ok(Bool(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => match (left, right) {
            (Number(a), Number(b)) => {
                let holds = match op {
                    BinaryOp::Lt => a < b,
                    BinaryOp::Le => a <= b,
                    BinaryOp::Gt => a > b,
                    _ => a >= b,
                };
                Ok(Bool(holds))
            }
            _ => Err(CriterionError::TypeMismatch(
                "ordering compares numbers only",
            )),
        },
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => match (left, right) {
            (Number(a), Number(b)) => {
                let value = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    _ => a / b,
                };
                Ok(Number(value))
            }
            _ => Err(CriterionError::TypeMismatch(
                "arithmetic applies to numbers only",
            )),
        },
    }
}
