pub mod token;
pub mod token_stream;

pub use token::{Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream, TokenStreamBuilder, TokenStreamError};
