pub mod auth;
pub mod contracts;
pub mod pagination;
pub mod pii;

pub use pagination::{PageParams, PageQuery, PagedResult, SortOrder, MAX_PAGE_SIZE};
pub use pii::Masked;
