//! PostgreSQL implementation of OrderRepository.
//!
//! Provides persistent storage for Order aggregates using PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, ProductId, Timestamp, UserId};
use crate::domain::order::Order;
use crate::ports::{MarkPaidOutcome, OrderRepository};

/// PostgreSQL implementation of the OrderRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
/// The paid-flag flip is a single conditional UPDATE, so concurrent webhook
/// deliveries serialize on the row and exactly one sees `Marked`.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgresOrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: String,
    user_email: String,
    product_ids: Vec<String>,
    is_paid: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let products = row
            .product_ids
            .into_iter()
            .map(|id| {
                ProductId::new(id).map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Invalid product id: {}", e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Order {
            id: OrderId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            user_email: row.user_email,
            products,
            is_paid: row.is_paid,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        let product_ids: Vec<String> = order
            .products
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, user_email, product_ids, is_paid, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_str())
        .bind(&order.user_email)
        .bind(&product_ids)
        .bind(order.is_paid)
        .bind(order.created_at.as_datetime())
        .bind(order.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to create order: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, user_email, product_ids, is_paid, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find order: {}", e),
            )
        })?;

        row.map(Order::try_from).transpose()
    }

    async fn mark_paid_if_unpaid(&self, id: &OrderId) -> Result<MarkPaidOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET is_paid = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_paid = FALSE
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark order paid: {}", e),
            )
        })?;

        if result.rows_affected() == 1 {
            return Ok(MarkPaidOutcome::Marked);
        }

        // Zero rows: either already paid or missing. One more read decides.
        let exists: Option<(bool,)> = sqlx::query_as("SELECT is_paid FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check order: {}", e),
                )
            })?;

        match exists {
            Some(_) => Ok(MarkPaidOutcome::AlreadyPaid),
            None => Ok(MarkPaidOutcome::NotFound),
        }
    }
}
