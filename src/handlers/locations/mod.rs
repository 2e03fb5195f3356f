mod delete;
mod get;
mod list;
mod patch;
mod post;

pub use delete::delete;
pub use get::get;
pub use list::list;
pub use patch::patch;
pub use post::post;
