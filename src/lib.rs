//! cbuf - Thread-Safe Overwrite-on-Full Ring Buffer
//!
//! Arsitektur:
//! - Single Lock: parking_lot::Mutex menjaga head/tail/storage
//! - Overwrite-Oldest: Put tidak pernah gagal saat buffer penuh
//! - Lock-Free Polling: capacity/is_full/overwrite_count tanpa lock
//! - Grow-Only Resize: Kapasitas hanya bisa bertambah
//!
//! ```
//! use cbuf::RingBuffer;
//!
//! let rb: RingBuffer<u32> = RingBuffer::new(3)?;
//! for v in [10, 20, 30, 40] {
//!     rb.put(v);
//! }
//! assert_eq!(rb.overwrite_count(), 1);
//! assert_eq!(rb.get(), Some(20));
//! # Ok::<(), cbuf::Error>(())
//! ```

pub mod core;

pub use crate::core::{BufferConfig, BufferFlags, Error, Result, RingBuffer, MAX_CAPACITY};
