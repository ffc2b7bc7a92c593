//! Pages of the site.
mod project;
pub use project::ProjectPage;
mod teaching;
pub use teaching::TeachingPage;

#[path = "404.rs"]
mod not_found;
pub use not_found::NotFound;

use crate::route::Route;

/// Every page of the site, in the order they are built and registered.
pub static ROUTES: &[&dyn Route] = &[&ProjectPage, &TeachingPage, &NotFound];
