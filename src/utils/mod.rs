pub mod errors;
pub mod table;

pub use errors::user_message;
pub use table::Table;
