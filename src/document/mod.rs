mod events;
mod xml;

pub use events::{EventKind, EventList, RawElement};
use xml::RawXmlEvent;
