//! Route modules for the form server
//!
//! Each module follows the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: HTMX actions and JSON endpoints
//! - page.rs: Full page and fragment rendering

pub mod form;
