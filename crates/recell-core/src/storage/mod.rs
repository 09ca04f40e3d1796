//! Initial-input loading and table output.

mod md;
mod parser;

pub use md::write_markdown;
pub use parser::{parse_grd, parse_grd_content};
