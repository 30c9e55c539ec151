//! Postgres-backed product repository.
//!
//! Expects the `products` table from `sql/products.sql`. Statements run in
//! autocommit mode, so every write is durable when it returns and `save()` has
//! nothing left to flush.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use catalog_core::{PageRequest, PaginationResult, ProductId};
use catalog_products::{Product, ProductsRepository, RepositoryError, RepositoryResult};

/// Postgres-backed product store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is cheap to clone and safe to share.
///
/// ## Identity
///
/// Unassigned ids are allocated by the `SERIAL` column. Explicit ids are
/// inserted as given and rejected (write returns `false`) when taken; after
/// such an insert the sequence is advanced past the highest id. A unique
/// violation on insert is reported as `false`, not as a store fault.
#[derive(Debug, Clone)]
pub struct PostgresProductsRepository {
    pool: PgPool,
}

impl PostgresProductsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool to `database_url`.
    pub async fn connect(database_url: &str) -> RepositoryResult<Self> {
        let pool = PgPool::connect(database_url).await.map_err(backend)?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Move the `SERIAL` sequence past the highest stored id, so ids inserted
    /// explicitly are never handed out again by `nextval()`.
    async fn sync_id_sequence(&self) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            SELECT setval(pg_get_serial_sequence('products', 'id'), GREATEST(MAX(id), 1))
            FROM products
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }
}

fn backend(err: sqlx::Error) -> RepositoryError {
    RepositoryError::backend(err.to_string())
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

fn product_from_row(row: &PgRow) -> RepositoryResult<Product> {
    let id: i32 = row
        .try_get("id")
        .map_err(|e| RepositoryError::corrupt(format!("id: {e}")))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| RepositoryError::corrupt(format!("name: {e}")))?;
    let price: f64 = row
        .try_get("price")
        .map_err(|e| RepositoryError::corrupt(format!("price: {e}")))?;
    Ok(Product::new(id, name, price))
}

#[async_trait]
impl ProductsRepository for PostgresProductsRepository {
    #[instrument(skip(self), fields(operation = "get_products"))]
    async fn get_products(&self, page: PageRequest) -> RepositoryResult<PaginationResult<Product>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        let total = usize::try_from(total).unwrap_or(0);
        let total_pages = page.total_pages(total);

        let offset = match page.offset().and_then(|o| i64::try_from(o).ok()) {
            Some(offset) => offset,
            None => return Ok(PaginationResult::new(Vec::new(), total_pages)),
        };
        let limit = i64::from(page.page_size());

        let rows = sqlx::query(
            r#"
            SELECT id, name, price
            FROM products
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let result = rows
            .iter()
            .map(product_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(PaginationResult::new(result, total_pages))
    }

    #[instrument(skip(self), fields(operation = "get_product"))]
    async fn get_product(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), fields(operation = "product_exists"))]
    async fn product_exists(&self, id: ProductId) -> RepositoryResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(backend)
    }

    #[instrument(skip(self, product), fields(operation = "create_product"))]
    async fn create_product(&self, product: Product) -> RepositoryResult<bool> {
        let outcome = if product.id.is_assigned() {
            sqlx::query(
                r#"
                INSERT INTO products (id, name, price)
                VALUES ($1, $2, $3)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(product.id.get())
            .bind(&product.name)
            .bind(product.price)
            .execute(&self.pool)
            .await
        } else {
            sqlx::query("INSERT INTO products (name, price) VALUES ($1, $2)")
                .bind(&product.name)
                .bind(product.price)
                .execute(&self.pool)
                .await
        };
        let result = match outcome {
            Ok(result) => result,
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(product_id = %product.id, "create rejected: id already in use");
                return Ok(false);
            }
            Err(e) => return Err(backend(e)),
        };

        if result.rows_affected() != 1 {
            tracing::debug!(product_id = %product.id, "create affected no rows");
            return Ok(false);
        }
        if product.id.is_assigned() {
            self.sync_id_sequence().await?;
        }
        self.save().await
    }

    #[instrument(skip(self, product), fields(operation = "update_product", product_id = %product.id))]
    async fn update_product(&self, product: Product) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, price = $3
            WHERE id = $1
            "#,
        )
        .bind(product.id.get())
        .bind(&product.name)
        .bind(product.price)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() != 1 {
            return Ok(false);
        }
        self.save().await
    }

    async fn save(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
