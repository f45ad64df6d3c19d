//! Optional extensions to the base camera controller.

#[cfg(feature = "extension_track_subject")]
pub mod track_subject;
