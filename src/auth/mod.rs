pub mod extract;
pub mod password;
pub mod token;

pub use extract::CurrentUser;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
