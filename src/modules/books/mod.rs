pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use async_trait::async_trait;
use axum::{routing::get, Router};
use sqlx::PgPool;

use bookstore_kernel::{InitCtx, Migration, Module};

use self::service::BookService;

/// CRUD module for the book catalog
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: BookService::new(pool),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(handlers::list_books).post(handlers::create_book),
            )
            .route(
                "/{id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {"description": "Envelope with all books and their count"},
                            "500": {"description": "Internal server error"}
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/CreateBook"}
                                }
                            }
                        },
                        "responses": {
                            "201": {"description": "Book created"},
                            "400": {"description": "Validation failure"}
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "responses": {
                            "200": {"description": "Envelope with the book"},
                            "400": {"description": "Book not found"}
                        }
                    },
                    "put": {
                        "summary": "Partially update a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/UpdateBook"}
                                }
                            }
                        },
                        "responses": {
                            "200": {"description": "Book updated"},
                            "400": {"description": "Validation failure or book not found"}
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {"description": "Book deleted"},
                            "400": {"description": "Book not found"}
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "format": "uuid"},
                            "name": {"type": "string"},
                            "description": {"type": "string"},
                            "price": {"type": "number", "minimum": 0},
                            "stock": {"type": "integer", "minimum": 0}
                        },
                        "required": ["id", "name", "description", "price", "stock"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "description": {"type": "string"},
                            "price": {"type": "number", "minimum": 0},
                            "stock": {"type": "integer", "minimum": 0}
                        },
                        "required": ["name", "description", "price", "stock"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "description": {"type": "string"},
                            "price": {"type": "number", "minimum": 0},
                            "stock": {"type": "integer", "minimum": 0}
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    name VARCHAR(255) NOT NULL,
                    description TEXT NOT NULL,
                    price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
                    stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0)
                );
                CREATE INDEX IF NOT EXISTS idx_books_name ON books(name);
                CREATE INDEX IF NOT EXISTS idx_books_price ON books(price);
                CREATE INDEX IF NOT EXISTS idx_books_stock ON books(stock);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(pool: PgPool) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(pool))
}
