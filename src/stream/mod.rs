//! Stream data model for addon responses
//!
//! Raw addon stream objects, the canonical [`ParsedStream`] they are
//! normalized into, and the [`StreamSource`] seam the wrapper fetches from.

pub mod parsed;
pub mod raw;
pub mod source;

pub use parsed::{AddonInfo, DebridProvider, ParsedStream, StreamType};
pub use raw::{BehaviorHints, ProxyHeaders, RawStream, Subtitle};
pub use source::{StreamRequest, StreamSource};
