//! Host Commands
//!
//! Entry points a host calls against [`AppState`](crate::state::AppState).
//! Each returns an `AppResult`; hosts wrap it in a
//! [`CommandResponse`](crate::models::response::CommandResponse).

pub mod analyze;
pub mod cache;
pub mod definition;
pub mod discover;
pub mod run;
pub mod settings;

pub use analyze::*;
pub use cache::*;
pub use definition::*;
pub use discover::*;
pub use run::*;
pub use settings::*;
