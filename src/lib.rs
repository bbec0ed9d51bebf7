pub use crate::lexing::tokenize;
pub use crate::parser_diagnostics::ParseError;
pub use crate::parsing::{parse, parse_complete};

pub mod ast;
pub mod lexing;
pub mod parser_diagnostics;
pub mod parsing;
pub mod pos;
pub mod sexp_ast;
pub mod stack_machine;
pub mod token;
pub(crate) mod util;
