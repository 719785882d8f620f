pub mod db;
pub mod repositories;

pub use db::connect;
pub use repositories::SqliteSignalStore;
