//! Transaction form routes
//!
//! Features:
//! - Page load opens a new form session
//! - Add-row appends one transaction group to the form
//! - Submit posts the form to the calculation backend and renders the summary
//! - Preview returns the request JSON without sending it

pub mod api;
pub mod page;

pub use api::{api_preview, htmx_add_row, htmx_submit};
pub use page::page_form;
