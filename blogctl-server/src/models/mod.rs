//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod pagination;
pub mod post;
pub mod user;
pub mod validation;

pub use pagination::{Paginated, Pagination, PaginationParams};
pub use post::{PostBody, PostForm, PostTitle};
pub use user::{Email, LoginForm, Password, Registration, RegistrationForm, Username};
pub use validation::ValidationError;
