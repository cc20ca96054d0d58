// Purpose: continuous control value -> discrete musical selection
// Tables are built once from theory primitives; the quantizer indexes them per tick

pub mod quantizer;
pub mod table;

pub use quantizer::{clamp_unit, index_for, select};
pub use table::{ChordTable, NoteTable, PitchSet, PitchTable, Voicing};
