//! PostgreSQL implementation of ProductReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, ProductId};
use crate::ports::{Product, ProductReader};

/// PostgreSQL implementation of the ProductReader port.
///
/// The catalog is owned by another service; this adapter only reads the
/// columns checkout needs.
pub struct PostgresProductReader {
    pool: PgPool,
}

impl PostgresProductReader {
    /// Creates a new PostgresProductReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price_cents: i64,
    price_id: Option<String>,
    stripe_id: Option<String>,
    approved_for_sale: bool,
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: ProductId::new(row.id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid product id: {}", e))
            })?,
            name: row.name,
            price_cents: row.price_cents,
            price_id: row.price_id,
            stripe_id: row.stripe_id,
            approved_for_sale: row.approved_for_sale,
        })
    }
}

#[async_trait]
impl ProductReader for PostgresProductReader {
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_strings: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();

        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, price_cents, price_id, stripe_id, approved_for_sale
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(&id_strings)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load products: {}", e),
            )
        })?;

        rows.into_iter().map(Product::try_from).collect()
    }
}
