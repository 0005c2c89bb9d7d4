//! Business rules for the book catalog: field validation and
//! existence checks in front of the repository.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use bookstore_http::error::AppError;

use crate::utils::sanitize;

use super::models::{Book, CreateBookRequest, NewBook, UpdateBookRequest};
use super::repository::{BookRepository, BookStore};

#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(pool: PgPool) -> Self {
        Self::with_store(Arc::new(BookRepository::new(pool)))
    }

    /// Construct the service over any store implementation.
    pub fn with_store(repository: Arc<dyn BookStore>) -> Self {
        Self { repository }
    }

    pub async fn get_all_books(&self) -> Result<Vec<Book>, AppError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get_book_by_id(&self, id: &str) -> Result<Book, AppError> {
        let id = parse_id(id)?;
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(book_not_found)
    }

    /// Validate, then insert. The repository is never reached when
    /// validation fails.
    pub async fn create_book(&self, input: CreateBookRequest) -> Result<Book, AppError> {
        let book = validate_create(&input)?;
        Ok(self.repository.create(&book).await?)
    }

    /// Existence check, then partial validation, then the write. A write
    /// that matches no row (record deleted between check and write) is a
    /// caller-visible failure.
    pub async fn update_book(
        &self,
        id: &str,
        input: UpdateBookRequest,
    ) -> Result<Book, AppError> {
        let id = parse_id(id)?;

        if !self.repository.exists(id).await? {
            return Err(book_not_found());
        }

        validate_update(&input)?;

        self.repository
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::validation("Failed to update book"))
    }

    pub async fn delete_book(&self, id: &str) -> Result<(), AppError> {
        let id = parse_id(id)?;

        if !self.repository.exists(id).await? {
            return Err(book_not_found());
        }

        if !self.repository.delete(id).await? {
            return Err(AppError::validation("Failed to delete book"));
        }

        Ok(())
    }
}

fn book_not_found() -> AppError {
    AppError::validation("Book not found")
}

/// An id that does not parse can never match a row; treat it as absent.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| book_not_found())
}

/// Create rules, checked in order name, description, price, stock.
/// The first failing rule wins; no aggregation.
fn validate_create(input: &CreateBookRequest) -> Result<NewBook, AppError> {
    let name = match &input.name {
        Some(name) if !sanitize(name).is_empty() => name.clone(),
        _ => return Err(AppError::validation("Book name is required")),
    };

    let description = match &input.description {
        Some(description) if !sanitize(description).is_empty() => description.clone(),
        _ => return Err(AppError::validation("Book description is required")),
    };

    let price = match input.price {
        Some(price) if price >= 0.0 => price,
        _ => {
            return Err(AppError::validation(
                "Book price must be a non-negative number",
            ))
        }
    };

    let stock = match input.stock {
        Some(stock) if stock >= 0 => stock,
        _ => {
            return Err(AppError::validation(
                "Book stock must be a non-negative integer",
            ))
        }
    };

    Ok(NewBook {
        name,
        description,
        price,
        stock,
    })
}

/// Update rules: fields are optional, but present fields must be valid.
fn validate_update(input: &UpdateBookRequest) -> Result<(), AppError> {
    if let Some(name) = &input.name {
        if sanitize(name).is_empty() {
            return Err(AppError::validation("Book name cannot be empty"));
        }
    }

    if let Some(description) = &input.description {
        if sanitize(description).is_empty() {
            return Err(AppError::validation("Book description cannot be empty"));
        }
    }

    if let Some(price) = input.price {
        if price < 0.0 {
            return Err(AppError::validation(
                "Book price must be a non-negative number",
            ));
        }
    }

    if let Some(stock) = input.stock {
        if stock < 0 {
            return Err(AppError::validation(
                "Book stock must be a non-negative integer",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    fn valid_create() -> CreateBookRequest {
        CreateBookRequest {
            name: Some("Dune".to_string()),
            description: Some("Desert planet epic".to_string()),
            price: Some(12.5),
            stock: Some(4),
        }
    }

    fn message(error: AppError) -> String {
        error.to_string()
    }

    #[test]
    fn create_accepts_valid_input() {
        let book = validate_create(&valid_create()).unwrap();
        assert_eq!(book.name, "Dune");
        assert_eq!(book.stock, 4);
    }

    #[test]
    fn create_rejects_missing_or_blank_name() {
        let mut input = valid_create();
        input.name = None;
        assert_eq!(
            message(validate_create(&input).unwrap_err()),
            "Book name is required"
        );

        input.name = Some("   \t ".to_string());
        assert_eq!(
            message(validate_create(&input).unwrap_err()),
            "Book name is required"
        );
    }

    #[test]
    fn create_rejects_blank_description() {
        let mut input = valid_create();
        input.description = Some(String::new());
        assert_eq!(
            message(validate_create(&input).unwrap_err()),
            "Book description is required"
        );
    }

    #[test]
    fn create_rejects_negative_or_missing_price() {
        let mut input = valid_create();
        input.price = Some(-0.01);
        assert_eq!(
            message(validate_create(&input).unwrap_err()),
            "Book price must be a non-negative number"
        );

        input.price = None;
        assert_eq!(
            message(validate_create(&input).unwrap_err()),
            "Book price must be a non-negative number"
        );
    }

    #[test]
    fn create_rejects_negative_stock() {
        let mut input = valid_create();
        input.stock = Some(-1);
        assert_eq!(
            message(validate_create(&input).unwrap_err()),
            "Book stock must be a non-negative integer"
        );
    }

    #[test]
    fn create_checks_fire_in_field_order() {
        // Invalid in every field; only the name error is reported.
        let input = CreateBookRequest {
            name: Some(String::new()),
            description: None,
            price: Some(-1.0),
            stock: Some(-1),
        };
        assert_eq!(
            message(validate_create(&input).unwrap_err()),
            "Book name is required"
        );
    }

    #[test]
    fn update_allows_empty_input() {
        assert!(validate_update(&UpdateBookRequest::default()).is_ok());
    }

    #[test]
    fn update_rejects_present_but_blank_name() {
        let input = UpdateBookRequest {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            message(validate_update(&input).unwrap_err()),
            "Book name cannot be empty"
        );
    }

    #[test]
    fn update_rejects_present_but_blank_description() {
        let input = UpdateBookRequest {
            description: Some("\n".to_string()),
            ..Default::default()
        };
        assert_eq!(
            message(validate_update(&input).unwrap_err()),
            "Book description cannot be empty"
        );
    }

    #[test]
    fn update_rejects_negative_numbers() {
        let input = UpdateBookRequest {
            price: Some(-5.0),
            ..Default::default()
        };
        assert_eq!(
            message(validate_update(&input).unwrap_err()),
            "Book price must be a non-negative number"
        );

        let input = UpdateBookRequest {
            stock: Some(-3),
            ..Default::default()
        };
        assert_eq!(
            message(validate_update(&input).unwrap_err()),
            "Book stock must be a non-negative integer"
        );
    }

    #[test]
    fn update_accepts_single_valid_field() {
        let input = UpdateBookRequest {
            price: Some(49.99),
            ..Default::default()
        };
        assert!(validate_update(&input).is_ok());
    }

    #[test]
    fn unparsable_id_is_treated_as_absent() {
        assert_eq!(message(parse_id("missing").unwrap_err()), "Book not found");
        assert!(parse_id("7f6c6f2e-9f6a-4f0a-8c3b-1d2e3f405060").is_ok());
    }

    /// In-memory store recording how often each write path is reached.
    #[derive(Default)]
    struct FakeStore {
        books: Mutex<HashMap<Uuid, Book>>,
        create_calls: AtomicUsize,
        update_calls: AtomicUsize,
        delete_calls: AtomicUsize,
        // Simulates the row vanishing between the existence check and the
        // write: exists() answers true while update() matches nothing.
        vanish_on_write: bool,
    }

    impl FakeStore {
        fn seed(&self, book: Book) -> Uuid {
            let id = book.id;
            self.books.lock().unwrap().insert(id, book);
            id
        }

        fn sample_book() -> Book {
            Book {
                id: Uuid::new_v4(),
                name: "Dune".to_string(),
                description: "Desert planet epic".to_string(),
                price: 12.5,
                stock: 4,
            }
        }
    }

    #[async_trait]
    impl BookStore for FakeStore {
        async fn find_all(&self) -> sqlx::Result<Vec<Book>> {
            Ok(self.books.lock().unwrap().values().cloned().collect())
        }

        async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<Book>> {
            Ok(self.books.lock().unwrap().get(&id).cloned())
        }

        async fn create(&self, book: &NewBook) -> sqlx::Result<Book> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let book = Book {
                id: Uuid::new_v4(),
                name: book.name.clone(),
                description: book.description.clone(),
                price: book.price,
                stock: book.stock,
            };
            self.books.lock().unwrap().insert(book.id, book.clone());
            Ok(book)
        }

        async fn update(
            &self,
            id: Uuid,
            input: &UpdateBookRequest,
        ) -> sqlx::Result<Option<Book>> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            if self.vanish_on_write {
                return Ok(None);
            }

            let mut books = self.books.lock().unwrap();
            let Some(book) = books.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(name) = &input.name {
                book.name = name.clone();
            }
            if let Some(description) = &input.description {
                book.description = description.clone();
            }
            if let Some(price) = input.price {
                book.price = price;
            }
            if let Some(stock) = input.stock {
                book.stock = stock;
            }
            Ok(Some(book.clone()))
        }

        async fn delete(&self, id: Uuid) -> sqlx::Result<bool> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.vanish_on_write {
                return Ok(false);
            }
            Ok(self.books.lock().unwrap().remove(&id).is_some())
        }

        async fn exists(&self, id: Uuid) -> sqlx::Result<bool> {
            if self.vanish_on_write {
                return Ok(true);
            }
            Ok(self.books.lock().unwrap().contains_key(&id))
        }
    }

    fn service_over(store: Arc<FakeStore>) -> BookService {
        BookService::with_store(store)
    }

    #[tokio::test]
    async fn created_book_round_trips_through_lookup() {
        let store = Arc::new(FakeStore::default());
        let service = service_over(store.clone());

        let created = service.create_book(valid_create()).await.unwrap();
        assert_eq!(created.name, "Dune");
        assert_eq!(created.price, 12.5);

        let fetched = service
            .get_book_by_id(&created.id.to_string())
            .await
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_validation_failure_never_reaches_store() {
        let store = Arc::new(FakeStore::default());
        let service = service_over(store.clone());

        let mut input = valid_create();
        input.name = Some("  ".to_string());
        let error = service.create_book(input).await.unwrap_err();

        assert_eq!(message(error), "Book name is required");
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_absent_id_reports_not_found() {
        let service = service_over(Arc::new(FakeStore::default()));

        let error = service
            .get_book_by_id(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert_eq!(message(error), "Book not found");
    }

    #[tokio::test]
    async fn update_absent_id_fails_before_the_write() {
        let store = Arc::new(FakeStore::default());
        let service = service_over(store.clone());

        let input = UpdateBookRequest {
            price: Some(49.99),
            ..Default::default()
        };
        let error = service
            .update_book(&Uuid::new_v4().to_string(), input)
            .await
            .unwrap_err();

        assert_eq!(message(error), "Book not found");
        assert_eq!(store.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn partial_update_touches_only_present_fields() {
        let store = Arc::new(FakeStore::default());
        let id = store.seed(FakeStore::sample_book());
        let service = service_over(store.clone());

        let input = UpdateBookRequest {
            price: Some(49.99),
            ..Default::default()
        };
        let updated = service.update_book(&id.to_string(), input).await.unwrap();

        assert_eq!(updated.price, 49.99);
        assert_eq!(updated.name, "Dune");
        assert_eq!(updated.description, "Desert planet epic");
        assert_eq!(updated.stock, 4);
    }

    #[tokio::test]
    async fn empty_update_returns_record_unchanged() {
        let store = Arc::new(FakeStore::default());
        let book = FakeStore::sample_book();
        let id = store.seed(book.clone());
        let service = service_over(store);

        let result = service
            .update_book(&id.to_string(), UpdateBookRequest::default())
            .await
            .unwrap();
        assert_eq!(result, book);
    }

    #[tokio::test]
    async fn update_invalid_field_fails_before_the_write() {
        let store = Arc::new(FakeStore::default());
        let id = store.seed(FakeStore::sample_book());
        let service = service_over(store.clone());

        let input = UpdateBookRequest {
            price: Some(-5.0),
            ..Default::default()
        };
        let error = service
            .update_book(&id.to_string(), input)
            .await
            .unwrap_err();

        assert_eq!(message(error), "Book price must be a non-negative number");
        assert_eq!(store.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn row_vanishing_between_check_and_update_is_reported() {
        let store = Arc::new(FakeStore {
            vanish_on_write: true,
            ..Default::default()
        });
        let service = service_over(store);

        let input = UpdateBookRequest {
            stock: Some(1),
            ..Default::default()
        };
        let error = service
            .update_book(&Uuid::new_v4().to_string(), input)
            .await
            .unwrap_err();
        assert_eq!(message(error), "Failed to update book");
    }

    #[tokio::test]
    async fn row_vanishing_between_check_and_delete_is_reported() {
        let store = Arc::new(FakeStore {
            vanish_on_write: true,
            ..Default::default()
        });
        let service = service_over(store);

        let error = service
            .delete_book(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert_eq!(message(error), "Failed to delete book");
    }

    #[tokio::test]
    async fn delete_absent_id_never_reaches_the_store_delete() {
        let store = Arc::new(FakeStore::default());
        let service = service_over(store.clone());

        let error = service
            .delete_book(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();

        assert_eq!(message(error), "Book not found");
        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn deleting_twice_reports_not_found_on_the_second_attempt() {
        let store = Arc::new(FakeStore::default());
        let id = store.seed(FakeStore::sample_book());
        let service = service_over(store.clone());

        service.delete_book(&id.to_string()).await.unwrap();

        let error = service.delete_book(&id.to_string()).await.unwrap_err();
        assert_eq!(message(error), "Book not found");
        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);
    }
}
