//! Message framing over TCP. Splits the inbound byte stream into complete
//! `(opcode, payload)` frames using the active protocol family's length
//! table and writes pre-framed outbound bytes. Everything above this layer
//! works with whole messages only.

pub mod frame;

pub use frame::{FrameReader, FrameWriter, LengthTable};
