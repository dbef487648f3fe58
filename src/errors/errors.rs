use std::fmt::Display;

use thiserror::Error;

use crate::{ir::types::Ty, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// The diagnostic message, without position.
    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::NotInScope { .. } => "NotInScope",
            ErrorImpl::ShapeMismatch { .. } => "ShapeMismatch",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::Custom { .. } => "Custom",
            ErrorImpl::NonTailCall { .. } => "NonTailCall",
            ErrorImpl::EscapingBranchTarget { .. } => "EscapingBranchTarget",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, does it fit its declared width?",
                token
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::VariableNotDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is not bound by any enclosing let, rec or parameter",
                variable
            )),
            ErrorImpl::NotInScope { .. } => ErrorTip::None,
            ErrorImpl::ShapeMismatch { expected, .. } => {
                ErrorTip::Suggestion(format!("A value of {} type is required here", expected))
            }
            ErrorImpl::TypeMismatch { expected, .. } => ErrorTip::Suggestion(format!(
                "Add an explicit `as {}` coercion if the reinterpretation is intended",
                expected
            )),
            ErrorImpl::ArityMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::Custom { .. } => ErrorTip::None,
            ErrorImpl::NonTailCall { .. } => ErrorTip::Suggestion(String::from(
                "Functions using variables from an enclosing scope compile to branch targets and can only be called in tail position",
            )),
            ErrorImpl::EscapingBranchTarget { .. } => ErrorTip::Suggestion(String::from(
                "Functions using variables from an enclosing scope can only be called directly",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown type {type_:?}")]
    UnknownType { type_: String },
    #[error("variable {variable:?} not in scope")]
    VariableNotDeclared { variable: String },
    #[error("variable v{id} not in scope")]
    NotInScope { id: u32 },
    #[error("expected {expected}, got {received}")]
    ShapeMismatch { expected: String, received: Ty },
    #[error("type mismatch: expected {expected}, got {received}")]
    TypeMismatch { expected: Ty, received: Ty },
    #[error("wrong number of arguments: expected {expected}, received {received}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("{message}")]
    Custom { message: String },
    #[error("call to branch-target function v{function} is not in tail position")]
    NonTailCall { function: u32 },
    #[error("branch-target function v{function} used as a value")]
    EscapingBranchTarget { function: u32 },
}

impl ErrorImpl {
    pub fn shape(expected: &str, received: &Ty) -> Self {
        ErrorImpl::ShapeMismatch {
            expected: expected.to_string(),
            received: received.clone(),
        }
    }

    pub fn custom(message: impl Into<String>) -> Self {
        ErrorImpl::Custom {
            message: message.into(),
        }
    }
}
