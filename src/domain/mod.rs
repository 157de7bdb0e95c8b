pub mod article;
pub mod favorite;
pub mod rewrite;
pub mod session;
