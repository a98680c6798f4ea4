//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, book_instances, books, genres, health, home};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library API",
        version = "0.1.0",
        description = "Local Library catalog: books, authors, genres and copies",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        // Home
        home::index,
        // Authors
        authors::author_list,
        authors::author_detail,
        authors::author_create_get,
        authors::author_create_post,
        authors::author_delete_get,
        authors::author_delete_post,
        authors::author_update_get,
        authors::author_update_post,
        // Books
        books::book_list,
        books::book_detail,
        books::book_create_get,
        books::book_create_post,
        books::book_delete_get,
        books::book_delete_post,
        books::book_update_get,
        books::book_update_post,
        // Genres
        genres::genre_list,
        genres::genre_detail,
        genres::genre_create_get,
        genres::genre_create_post,
        genres::genre_delete_get,
        genres::genre_delete_post,
        genres::genre_update_get,
        genres::genre_update_post,
        // Book instances
        book_instances::bookinstance_list,
        book_instances::bookinstance_detail,
        book_instances::bookinstance_create_get,
        book_instances::bookinstance_create_post,
        book_instances::bookinstance_delete_get,
        book_instances::bookinstance_delete_post,
        book_instances::bookinstance_update_get,
        book_instances::bookinstance_update_post,
    ),
    components(
        schemas(
            // Models
            crate::models::Author,
            crate::models::Genre,
            crate::models::book::Book,
            crate::models::book::BookWithAuthor,
            crate::models::book::BookDetails,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceWithBook,
            crate::models::CopyStatus,
            // Forms
            crate::models::author::AuthorForm,
            crate::models::genre::GenreForm,
            crate::models::book::BookForm,
            crate::models::book_instance::BookInstanceForm,
            crate::forms::FieldError,
            // Pages
            home::IndexPage,
            crate::services::catalog::CatalogCounts,
            authors::AuthorModel,
            authors::AuthorListPage,
            authors::AuthorDetailPage,
            authors::AuthorFormPage,
            authors::AuthorDeletePage,
            books::BookListEntry,
            books::BookListPage,
            books::BookDetailPage,
            books::BookFormPage,
            books::BookDeletePage,
            genres::GenreListPage,
            genres::GenreDetailPage,
            genres::GenreFormPage,
            genres::GenreDeletePage,
            book_instances::BookInstanceListEntry,
            book_instances::BookInstanceListPage,
            book_instances::BookInstanceDetailPage,
            book_instances::BookInstanceFormPage,
            book_instances::BookInstanceDeletePage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Home page"),
        (name = "authors", description = "Author pages and forms"),
        (name = "books", description = "Book pages and forms"),
        (name = "genres", description = "Genre pages and forms"),
        (name = "bookinstances", description = "Book copy pages and forms")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
