pub mod model;
pub mod repository;

// 公開APIの再エクスポート
pub use model::{format_favorite, FavoriteRecord};
pub use repository::{FavoriteRepository, StorageError};
