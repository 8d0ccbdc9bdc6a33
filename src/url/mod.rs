//! URL handling module for tululu-fetch
//!
//! This module knows the URL shapes of the site:
//! - catalog pages: `<catalog>/<page>`
//! - book detail pages: `<base>/b<id>/`
//! - the raw text endpoint: `<base>/txt.php?id=<id>`
//!
//! It also parses book identifiers out of detail-page links.

mod book_id;
mod site;

pub use book_id::BookId;
pub use site::SiteUrls;
