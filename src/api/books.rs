//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::Author,
        book::{Book, BookDetails, BookPage, BookShort, CreateBook, PageQuery, SearchQuery, UpdateBook},
        category::Category,
    },
    AppState,
};

/// Books of a single category
#[derive(Serialize, ToSchema)]
pub struct CategoryBooks {
    pub category: Category,
    pub books: Vec<BookShort>,
}

/// Books written by a single author
#[derive(Serialize, ToSchema)]
pub struct AuthorBooks {
    pub author: Author,
    pub books: Vec<BookShort>,
}

/// List books with pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of books", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookPage>> {
    let page = state
        .services
        .catalog
        .list_books(query.page, query.per_page)
        .await?;
    Ok(Json(page))
}

/// List books, page number in the path
#[utoipa::path(
    get,
    path = "/books/page/{page}",
    tag = "books",
    params(
        ("page" = i64, Path, description = "Page number, starting at 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "One page of books", body = BookPage)
    )
)]
pub async fn list_books_page(
    State(state): State<AppState>,
    Path(page): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookPage>> {
    let page = state
        .services
        .catalog
        .list_books(Some(page), query.per_page)
        .await?;
    Ok(Json(page))
}

/// Search books by title
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Books whose title contains the query", body = Vec<BookShort>)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<BookShort>>> {
    let books = state.services.catalog.search_books(&query.q).await?;
    Ok(Json(books))
}

/// Books of a category, looked up by name
#[utoipa::path(
    get,
    path = "/books/category/{category_slug}",
    tag = "books",
    params(
        ("category_slug" = String, Path, description = "Category name")
    ),
    responses(
        (status = 200, description = "Category and its books", body = CategoryBooks),
        (status = 404, description = "Category not found")
    )
)]
pub async fn books_by_category(
    State(state): State<AppState>,
    Path(category_slug): Path<String>,
) -> AppResult<Json<CategoryBooks>> {
    let (category, books) = state
        .services
        .catalog
        .books_by_category(&category_slug)
        .await?;
    Ok(Json(CategoryBooks { category, books }))
}

/// Books of an author
#[utoipa::path(
    get,
    path = "/books/author/{author_id}",
    tag = "books",
    params(
        ("author_id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author and their books", body = AuthorBooks),
        (status = 404, description = "Author not found")
    )
)]
pub async fn books_by_author(
    State(state): State<AppState>,
    Path(author_id): Path<i32>,
) -> AppResult<Json<AuthorBooks>> {
    let (author, books) = state.services.catalog.books_by_author(author_id).await?;
    Ok(Json(AuthorBooks { author, books }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Author or category not found"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.catalog.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.update_book(id, data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book has loans")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
