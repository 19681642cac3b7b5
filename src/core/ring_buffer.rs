//! Thread-Safe Overwrite-on-Full Ring Buffer
//!
//! Satu Mutex global per buffer untuk SPMC dan MPMC.
//! Saat buffer penuh, put TIDAK block dan TIDAK ditolak:
//! elemen tertua di-overwrite dan `overwrite_count` naik.
//!
//! Operasi yang memakai lock: put, get, len, is_empty, resize, reset.
//! Operasi tanpa lock (boleh stale): capacity, is_full, overwrite_count.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::config::{BufferConfig, BufferFlags};
use super::error::{Error, Result};
use super::slot_storage::SlotStorage;

/// Jumlah slot maksimum yang bisa direpresentasikan (u32::MAX)
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// State yang dijaga oleh lock
struct State<T> {
    storage: SlotStorage<T>,
    // Slot untuk put berikutnya
    head: usize,
    // Slot untuk get berikutnya (elemen tertua)
    tail: usize,
    full: bool,
}

impl<T: Copy> State<T> {
    #[inline(always)]
    fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.head == self.tail && !self.full
    }

    #[inline(always)]
    fn len(&self) -> usize {
        let capacity = self.capacity();
        if self.full {
            capacity
        } else if self.head >= self.tail {
            self.head - self.tail
        } else {
            capacity + self.head - self.tail
        }
    }
}

#[inline(always)]
fn advance(index: usize, capacity: usize) -> usize {
    if index + 1 == capacity {
        0
    } else {
        index + 1
    }
}

/// Bounded FIFO queue dengan policy overwrite-oldest
///
/// Handle opaque: index dan storage tidak pernah terekspos.
/// Share antar thread dengan `Arc<RingBuffer<T>>`.
pub struct RingBuffer<T> {
    state: Mutex<State<T>>,
    // Mirror dari state untuk pembacaan tanpa lock
    capacity: AtomicUsize,
    full: AtomicBool,
    overwrites: AtomicU64,
    flags: BufferFlags,
}

impl<T: Copy> RingBuffer<T> {
    /// Membuat ring buffer dengan `capacity` slot.
    ///
    /// Gagal jika `capacity == 0`, `capacity > MAX_CAPACITY`,
    /// atau storage tidak bisa dialokasikan.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(BufferConfig::with_capacity(capacity))
    }

    /// Membuat ring buffer dari `BufferConfig`.
    ///
    /// Reserved flags disimpan tetapi tidak mengubah perilaku put/get.
    pub fn with_config(config: BufferConfig) -> Result<Self> {
        let capacity = config.capacity;
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(Error::InvalidCapacity {
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }

        if config.flags.has_reserved() {
            warn!(flags = %config.flags, "reserved buffer flags are ignored");
        }

        let storage = SlotStorage::allocate(capacity)?;
        debug!(
            capacity,
            element_size = mem::size_of::<T>(),
            "ring buffer created"
        );

        Ok(Self {
            state: Mutex::new(State {
                storage,
                head: 0,
                tail: 0,
                full: false,
            }),
            capacity: AtomicUsize::new(capacity),
            full: AtomicBool::new(false),
            overwrites: AtomicU64::new(0),
            flags: config.flags,
        })
    }

    /// Put elemen ke buffer (producer side).
    ///
    /// Tidak pernah gagal. Jika buffer penuh sebelum write,
    /// elemen tertua di-drop dan `overwrite_count` bertambah satu.
    pub fn put(&self, value: T) {
        let mut state = self.state.lock();
        let capacity = state.capacity();

        let head = state.head;
        state.storage.write(head, value);

        if state.full {
            state.tail = advance(state.tail, capacity);
            let count = self.overwrites.fetch_add(1, Ordering::Release) + 1;
            trace!(overwrites = count, "oldest element overwritten");
        }

        state.head = advance(head, capacity);
        state.full = state.head == state.tail;
        self.full.store(state.full, Ordering::Release);
    }

    /// Get elemen tertua (consumer side).
    ///
    /// Returns `None` jika buffer kosong. Tidak pernah menunggu data.
    pub fn get(&self) -> Option<T> {
        let mut state = self.state.lock();
        if state.is_empty() {
            return None;
        }

        // SAFETY: buffer tidak kosong, jadi slot `tail` sudah ditulis oleh put
        let value = unsafe { state.storage.read(state.tail) };

        state.tail = advance(state.tail, state.capacity());
        state.full = false;
        self.full.store(false, Ordering::Release);

        Some(value)
    }

    /// Get ke output milik caller.
    ///
    /// Jika kosong, returns `Error::Empty` dan `out` tidak disentuh.
    pub fn get_into(&self, out: &mut T) -> Result<()> {
        match self.get() {
            Some(value) => {
                *out = value;
                Ok(())
            }
            None => Err(Error::Empty),
        }
    }

    /// Jumlah elemen yang belum dibaca
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Cek apakah buffer kosong (dengan lock)
    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Grow kapasitas ke `new_capacity` slot.
    ///
    /// Ditolak jika `new_capacity <= capacity()` atau
    /// `new_capacity + capacity()` mencapai `MAX_CAPACITY`.
    /// Elemen yang belum dibaca tetap ada dengan urutan yang sama.
    ///
    /// Note: jika urutan elemen sudah wrap melewati akhir storage lama,
    /// bagian yang wrap dipindah ke slot baru tepat setelah slot lama.
    /// Untuk buffer yang belum wrap, offset slot, head dan tail tidak berubah.
    pub fn resize(&self, new_capacity: usize) -> Result<()> {
        let mut state = self.state.lock();
        let current = state.capacity();

        let overflow = new_capacity
            .checked_add(current)
            .map_or(true, |total| total >= MAX_CAPACITY);

        if new_capacity <= current || overflow {
            debug!(current, requested = new_capacity, "resize rejected");
            return Err(Error::ResizeRejected {
                current,
                requested: new_capacity,
            });
        }

        let len = state.len();
        let tail = state.tail;
        state.head = state.storage.grow(new_capacity, tail, len)?;
        state.full = false;

        self.capacity.store(new_capacity, Ordering::Release);
        self.full.store(false, Ordering::Release);

        debug!(from = current, to = new_capacity, len, "ring buffer resized");
        Ok(())
    }

    /// Kosongkan buffer dan reset overwrite counter.
    ///
    /// Kapasitas dan storage tetap.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.head = 0;
        state.tail = 0;
        state.full = false;

        self.full.store(false, Ordering::Release);
        self.overwrites.store(0, Ordering::Release);
        debug!(capacity = state.capacity(), "ring buffer reset");
    }

    /// Kapasitas buffer (tanpa lock, boleh stale)
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Cek apakah buffer penuh (tanpa lock, boleh stale)
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.full.load(Ordering::Acquire)
    }

    /// Jumlah elemen yang di-drop karena overwrite (tanpa lock, boleh stale)
    #[inline(always)]
    pub fn overwrite_count(&self) -> u64 {
        self.overwrites.load(Ordering::Acquire)
    }

    /// Ukuran satu elemen dalam bytes
    #[inline(always)]
    pub const fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Reserved flags dari konfigurasi
    #[inline(always)]
    pub fn flags(&self) -> BufferFlags {
        self.flags
    }
}

impl<T: Copy> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("element_size", &self.element_size())
            .field("full", &self.is_full())
            .field("overwrites", &self.overwrite_count())
            .finish_non_exhaustive()
    }
}
