//! Error types untuk operasi ring buffer
//!
//! Semua error dikembalikan sebagai value ke caller langsung.
//! Overwrite BUKAN error - diamati lewat `overwrite_count()`.

use thiserror::Error;

/// Error dari operasi ring buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Kapasitas di luar rentang `1..=max` saat konstruksi
    #[error("invalid capacity {requested} (must be between 1 and {max})")]
    InvalidCapacity { requested: usize, max: usize },

    /// Tidak ada elemen yang bisa dibaca (kondisi normal, bukan fault)
    #[error("ring buffer is empty")]
    Empty,

    /// Resize ditolak: tidak lebih besar dari kapasitas sekarang, atau overflow
    #[error("resize from {current} to {requested} slots rejected")]
    ResizeRejected { current: usize, requested: usize },

    /// Allocator tidak bisa menyediakan storage
    #[error("failed to allocate storage for {slots} slots")]
    Allocation { slots: usize },
}

/// Result alias untuk seluruh crate
pub type Result<T> = std::result::Result<T, Error>;
