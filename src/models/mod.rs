mod blog;

pub use blog::{Blog, BlogSummary};
