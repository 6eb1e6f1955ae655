pub mod auth;

pub mod users;

pub mod students;

pub mod forms;

pub mod frontend;

pub use auth::configure_auth_routes;
pub use forms::configure_forms_routes;
pub use frontend::configure_frontend_routes;
pub use students::configure_students_routes;
pub use users::configure_user_routes;
