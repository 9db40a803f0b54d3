// Chart request expression parser

pub mod lexer;
pub mod request;

// Public API re-exports
pub use request::{parse_request, parse_request_expr};
