//! Route title resolution.
//!
//! Static route-pattern tables are compiled once at startup; a request
//! path is matched first-wins against the selected table to produce the
//! page title and breadcrumb trail shown by the UI layer.

mod resolver;
mod table;
mod template;

pub use resolver::{DEFAULT_ADMIN_MARKER, PageTitle, TitleResolver};
pub use table::{CompiledRoute, Crumb, RouteEntry, RouteError, RouteTable};
pub use template::{RouteTemplate, TemplateError};
