//! Data access for the `books` relation.
//!
//! Every operation maps to one parameterized statement; store failures
//! propagate unchanged as `sqlx::Error` with no retries or translation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Book, NewBook, UpdateBookRequest};

const BOOK_COLUMNS: &str = "id, name, description, price, stock";

/// Storage operations the service layer depends on. The production
/// implementation is [`BookRepository`]; tests substitute an in-memory
/// store.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_all(&self) -> sqlx::Result<Vec<Book>>;

    async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<Book>>;

    async fn create(&self, book: &NewBook) -> sqlx::Result<Book>;

    /// Update only the fields present in the input. An empty input degrades
    /// to a plain lookup, returning the row unmodified.
    async fn update(&self, id: Uuid, input: &UpdateBookRequest) -> sqlx::Result<Option<Book>>;

    async fn delete(&self, id: Uuid) -> sqlx::Result<bool>;

    async fn exists(&self, id: Uuid) -> sqlx::Result<bool>;
}

/// Repository over the shared connection pool, injected at construction.
#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BookRepository {
    async fn find_all(&self) -> sqlx::Result<Vec<Book>> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books"))
            .fetch_all(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<Book>> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create(&self, book: &NewBook) -> sqlx::Result<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (name, description, price, stock) \
             VALUES ($1, $2, $3, $4) RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.name)
        .bind(&book.description)
        .bind(book.price)
        .bind(book.stock)
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: Uuid, input: &UpdateBookRequest) -> sqlx::Result<Option<Book>> {
        let Some(sql) = update_statement(input) else {
            return self.find_by_id(id).await;
        };

        // Binds must follow the same fixed field order as the statement.
        let mut query = sqlx::query_as::<_, Book>(&sql);
        if let Some(name) = &input.name {
            query = query.bind(name);
        }
        if let Some(description) = &input.description {
            query = query.bind(description);
        }
        if let Some(price) = input.price {
            query = query.bind(price);
        }
        if let Some(stock) = input.stock {
            query = query.bind(stock);
        }

        query.bind(id).fetch_optional(&self.pool).await
    }

    async fn delete(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: Uuid) -> sqlx::Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }
}

/// Build the partial-update statement: SET clauses in fixed field order
/// (name, description, price, stock), placeholders numbered from `$1`,
/// with the id bound as the final placeholder. `None` when no fields are
/// present.
fn update_statement(input: &UpdateBookRequest) -> Option<String> {
    let mut assignments = Vec::new();
    let mut placeholder = 1;

    let mut push = |column: &str, present: bool, placeholder: &mut usize| {
        if present {
            assignments.push(format!("{column} = ${placeholder}"));
            *placeholder += 1;
        }
    };

    push("name", input.name.is_some(), &mut placeholder);
    push("description", input.description.is_some(), &mut placeholder);
    push("price", input.price.is_some(), &mut placeholder);
    push("stock", input.stock.is_some(), &mut placeholder);

    if assignments.is_empty() {
        return None;
    }

    Some(format!(
        "UPDATE books SET {} WHERE id = ${placeholder} RETURNING {BOOK_COLUMNS}",
        assignments.join(", ")
    ))
}
