//! Mood-driven horizon blending.
//!
//! A [`crate::MoodTable`] maps sky ids to moods and moods to haze, spill and dust settings;
//! the [`crate::HorizonBlender`] turns one mood into a full-canvas layer drawn between the
//! terrain and water slots.

pub(crate) mod horizon;
pub(crate) mod mood;
