pub mod router;
pub mod topics;

pub use router::{classify, route, RoutedAnswer};
pub use topics::{glossary, GlossaryEntry, Topic};
