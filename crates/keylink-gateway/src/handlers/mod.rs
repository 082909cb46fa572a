mod admin;
mod health;
mod url;

pub use admin::{delete_url_handler, get_url_info_handler};
pub use health::{health_handler, root_handler};
pub use url::{create_url_handler, redirect_handler};
