pub mod actor;
pub mod health;
pub mod movie;
pub mod search;

pub use actor::*;
pub use health::*;
pub use movie::*;
pub use search::*;
