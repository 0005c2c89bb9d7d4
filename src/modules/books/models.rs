use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted book record; `id` is generated by the store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

/// Create request body; every field is required but modeled as optional so
/// missing fields surface as validation errors, not deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

/// Partial update body; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

/// Fully validated create input handed to the repository.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}
