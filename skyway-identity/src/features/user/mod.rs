pub mod create_user;
pub mod delete_user_by_id;
pub mod get_user_by_id;
pub mod get_users;
pub mod update_user;

pub use create_user::{CreateUser, CreateUserHandler};
pub use delete_user_by_id::{DeleteUserById, DeleteUserByIdHandler};
pub use get_user_by_id::{GetUserById, GetUserByIdHandler};
pub use get_users::{GetUsers, GetUsersHandler};
pub use update_user::{UpdateUser, UpdateUserHandler};
