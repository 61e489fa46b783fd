pub mod article;

pub use article::{ParsedArticle, TextDirection};
