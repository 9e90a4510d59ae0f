pub mod classifier;
pub mod compressor;
mod error;
pub mod grouper;
pub mod tokenizer;

pub use classifier::{OptionInput, Token, classify, is_name_char};
pub(crate) use classifier::is_name;
pub use compressor::{OptionShape, compress};
pub use error::*;
pub use grouper::{Grouped, group};
pub use tokenizer::{Tokenized, join_args, tokenize};
