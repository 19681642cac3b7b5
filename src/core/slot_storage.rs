//! Slot Storage - backing array berukuran tetap untuk ring buffer
//!
//! Storage tidak tahu apa-apa tentang head/tail. Ia hanya:
//! - Alokasi `capacity` slot sekaligus (fallible, tanpa panic)
//! - Tulis/baca satu slot berdasarkan index
//! - Grow ke kapasitas baru dengan offset slot lama tetap

use std::mem::MaybeUninit;

use super::error::{Error, Result};

/// Contiguous block berisi `capacity` slot berukuran `size_of::<T>()`
pub(crate) struct SlotStorage<T> {
    slots: Box<[MaybeUninit<T>]>,
}

impl<T: Copy> SlotStorage<T> {
    /// Alokasi storage untuk `capacity` slot.
    ///
    /// Slot baru belum diinisialisasi - sama seperti malloc.
    pub(crate) fn allocate(capacity: usize) -> Result<Self> {
        Ok(Self {
            slots: alloc_slots(capacity)?,
        })
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub(crate) fn write(&mut self, index: usize, value: T) {
        self.slots[index].write(value);
    }

    /// Copy isi slot keluar.
    ///
    /// # Safety
    /// Slot `index` harus sudah pernah ditulis sejak alokasi/grow terakhir.
    #[inline(always)]
    pub(crate) unsafe fn read(&self, index: usize) -> T {
        self.slots[index].assume_init()
    }

    /// Grow storage ke `new_capacity` slot.
    ///
    /// Slot `[0, old_capacity)` disalin ke offset yang sama. Jika urutan logis
    /// `len` elemen mulai dari `tail` melewati batas storage lama, bagian yang
    /// sudah wrap (`[0, tail + len - old_capacity)`) disalin lagi tepat
    /// setelah slot lama sehingga urutan tetap kontinu modulo kapasitas baru.
    ///
    /// Returns posisi head yang baru. Storage lama tidak berubah jika alokasi gagal.
    pub(crate) fn grow(&mut self, new_capacity: usize, tail: usize, len: usize) -> Result<usize> {
        let old_capacity = self.slots.len();
        debug_assert!(new_capacity > old_capacity);

        let mut slots = alloc_slots(new_capacity)?;
        slots[..old_capacity].copy_from_slice(&self.slots);

        let wrapped = (tail + len).saturating_sub(old_capacity);
        for i in 0..wrapped {
            slots[(old_capacity + i) % new_capacity] = self.slots[i];
        }

        self.slots = slots;
        Ok((tail + len) % new_capacity)
    }
}

fn alloc_slots<T>(capacity: usize) -> Result<Box<[MaybeUninit<T>]>> {
    let mut vec: Vec<MaybeUninit<T>> = Vec::new();
    vec.try_reserve_exact(capacity)
        .map_err(|_| Error::Allocation { slots: capacity })?;
    vec.resize_with(capacity, MaybeUninit::uninit);
    Ok(vec.into_boxed_slice())
}
