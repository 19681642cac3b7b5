//! Konfigurasi ring buffer
//!
//! Flag di sini adalah konfigurasi *reserved*: disimpan dan bisa dibaca,
//! tetapi put/get selalu memakai policy overwrite-oldest.

use std::fmt;
use std::ops::BitOr;

/// Kapasitas default (sama dengan langkah grow bawaan)
pub const DEFAULT_CAPACITY: usize = 64;

/// Reserved configuration flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferFlags(u16);

impl BufferFlags {
    /// Policy default: overwrite elemen tertua saat penuh
    pub const OVERWRITE: Self = Self(0x0000);
    /// Reserved: tolak put saat penuh
    pub const DO_NOT_OVERWRITE: Self = Self(0x0001);
    /// Reserved: grow otomatis saat penuh
    pub const RESIZE_AUTO: Self = Self(0x0002);
    /// Reserved: simpan timestamp per elemen
    pub const WRITE_TIMESTAMP: Self = Self(0x0004);

    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` jika ada flag reserved yang di-set
    #[inline(always)]
    pub const fn has_reserved(self) -> bool {
        self.0 != Self::OVERWRITE.0
    }
}

impl BitOr for BufferFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for BufferFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Buffer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Jumlah slot awal
    pub capacity: usize,
    /// Reserved flags (tidak mengubah perilaku put/get)
    pub flags: BufferFlags,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            flags: BufferFlags::OVERWRITE,
        }
    }
}

impl BufferConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn flags(mut self, flags: BufferFlags) -> Self {
        self.flags = flags;
        self
    }
}
