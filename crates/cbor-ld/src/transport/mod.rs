//! Downstream transport: compression envelope and chunked frames.
//!
//! Neither step looks inside the payload. A typical pipeline encodes a
//! document, wraps it with [`compress`], then cuts the result into frames
//! small enough for the carrier (QR codes, BLE characteristics) with
//! [`split_frames`]. The receiver runs the same steps backwards.

pub mod compress;
pub mod frame;

pub use compress::{compress, decompress};
pub use frame::{reassemble, split_frames, FrameHeader, FrameOptions};
