//! Now-playing metadata: the canonical track model and the upstream wire formats.
//!
//! Every station publishes "now playing" in its own JSON shape. The parsers in
//! this module normalize those payloads into a [`TrackInfo`]. A payload that
//! cannot be decoded at all is a [`ParseError`]; a malformed sub-field (a
//! duration token, a timestamp) only degrades that field to its zero value.

mod error;
mod fields;
mod formats;
mod track;

pub use error::ParseError;
pub use formats::WireFormat;
pub use track::TrackInfo;
