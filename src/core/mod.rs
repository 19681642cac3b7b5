//! Core module: Thread-Safe Ring Buffer dengan overwrite-on-full
//!
//! Prinsip desain:
//! - One Lock: Satu Mutex per buffer untuk semua operasi mutasi
//! - Non-Backpressuring: Put tidak pernah block, elemen tertua di-overwrite
//! - Fixed-Size Slots: Elemen `Copy` dengan ukuran tetap

mod config;
mod error;
mod ring_buffer;
mod slot_storage;

pub use config::{BufferConfig, BufferFlags, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use ring_buffer::{RingBuffer, MAX_CAPACITY};
