//! PostgreSQL adapters.

mod order_repository;
mod product_reader;

pub use order_repository::PostgresOrderRepository;
pub use product_reader::PostgresProductReader;
