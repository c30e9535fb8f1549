// Adapters layer: concrete implementations of the domain ports.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod views;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
pub use views::HtmlRenderer;
