//! Assembly of request documents from partial fragments and response shapes.

mod assembler;
mod lexer;
pub(crate) mod parser;
mod request_preparation_error;
mod request_template;

pub use request_preparation_error::RequestPreparationError;
pub use request_preparation_error::SourceLocation;
pub use request_template::BindOccurrence;
pub use request_template::BindParameter;
pub use request_template::RequestTemplate;
pub use request_template::VariableDefinition;

#[cfg(test)]
mod tests;
