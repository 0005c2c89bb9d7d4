//! HTTP handlers for the books module.
//!
//! Handlers only translate requests into service calls and wrap results in
//! the success envelope; every error is forwarded to the centralized
//! `AppError` responder.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bookstore_http::error::AppError;
use bookstore_http::response::ApiResponse;

use super::models::{Book, CreateBookRequest, UpdateBookRequest};
use super::service::BookService;

/// GET /api/books
pub async fn list_books(
    State(service): State<BookService>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let books = service.get_all_books().await?;
    Ok(ApiResponse::list(books))
}

/// GET /api/books/{id}
pub async fn get_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = service.get_book_by_id(&id).await?;
    Ok(ApiResponse::data(book))
}

/// POST /api/books
pub async fn create_book(
    State(service): State<BookService>,
    Json(input): Json<CreateBookRequest>,
) -> Result<(StatusCode, ApiResponse<Book>), AppError> {
    let book = service.create_book(input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(book, "Book created successfully"),
    ))
}

/// PUT /api/books/{id}
pub async fn update_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBookRequest>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = service.update_book(&id, input).await?;
    Ok(ApiResponse::with_message(book, "Book updated successfully"))
}

/// DELETE /api/books/{id}
pub async fn delete_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    service.delete_book(&id).await?;
    Ok(ApiResponse::message("Book deleted successfully"))
}
