pub mod parse;
pub mod pretty;
pub mod toc;
