//! CLI command implementations.

pub(crate) mod generate_tokens;
pub(crate) mod serve;

pub(crate) use generate_tokens::GenerateTokensArgs;
pub(crate) use serve::ServeArgs;
