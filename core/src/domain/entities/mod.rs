//! Domain entities.

pub mod token;

pub use token::{
    encode_last_used, parse_last_used, threshold_from_std, Token, TokenRecord, MAX_TOKEN_LENGTH,
};
