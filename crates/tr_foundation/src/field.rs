// crates/tr_foundation/src/field.rs

//! Cell-field buffer with guaranteed alignment.
//!
//! Provides a cache-line-aligned contiguous buffer backed by std::alloc for
//! SIMD-friendly per-cell loops. Includes rayon parallel iterators and Serde
//! support. One `FieldBuf<Scalar>` holds one value per mesh cell.

use bytemuck::Pod;
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Cache line size used for field alignment (AVX-512 friendly).
pub const CACHE_ALIGN: usize = 64;

/// 对齐连续场缓冲区（每个网格单元一个值）
pub struct FieldBuf<T: Pod> {
    ptr: *mut T,
    len: usize,
}

unsafe impl<T: Pod + Send> Send for FieldBuf<T> {}
unsafe impl<T: Pod + Sync> Sync for FieldBuf<T> {}

impl<T: Pod> FieldBuf<T> {
    fn layout_for(len: usize) -> Layout {
        let size = len * std::mem::size_of::<T>();
        let align = CACHE_ALIGN.max(std::mem::align_of::<T>());
        Layout::from_size_align(size, align).expect("FieldBuf: invalid layout")
    }

    /// Create zero-initialized buffer of length `len`.
    pub fn zeros(len: usize) -> Self {
        if len == 0 {
            return Self {
                ptr: NonNull::dangling().as_ptr(),
                len: 0,
            };
        }

        let layout = Self::layout_for(len);
        let ptr = unsafe { alloc_zeroed(layout) as *mut T };
        if ptr.is_null() {
            handle_alloc_error(layout);
        }

        debug_assert_eq!((ptr as usize) % layout.align(), 0, "alignment violated");

        Self { ptr, len }
    }

    /// Create buffer of length `len` filled with `value`.
    pub fn filled(len: usize, value: T) -> Self {
        let mut buf = Self::zeros(len);
        buf.as_mut_slice().fill(value);
        buf
    }

    /// Re-align from an existing slice.
    pub fn from_slice(data: &[T]) -> Self {
        let mut buf = Self::zeros(data.len());
        buf.as_mut_slice().copy_from_slice(data);
        buf
    }

    /// Buffer length (number of cells).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the buffer holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read-only slice view.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    /// Mutable slice view.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    /// 并行只读迭代器
    pub fn par_iter(&self) -> rayon::slice::Iter<'_, T>
    where
        T: Sync,
    {
        self.as_slice().par_iter()
    }

    /// 并行可变迭代器
    pub fn par_iter_mut(&mut self) -> rayon::slice::IterMut<'_, T>
    where
        T: Send + Sync,
    {
        self.as_mut_slice().par_iter_mut()
    }

    /// Parallel fill.
    pub fn par_fill(&mut self, value: T)
    where
        T: Send + Sync,
    {
        self.as_mut_slice().par_iter_mut().for_each(|v| *v = value);
    }
}

impl<T: Pod> Drop for FieldBuf<T> {
    fn drop(&mut self) {
        if self.len > 0 {
            let layout = Self::layout_for(self.len);
            unsafe { dealloc(self.ptr as *mut u8, layout) };
        }
    }
}

impl<T: Pod> Clone for FieldBuf<T> {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }
}

impl<T: Pod + std::fmt::Debug> std::fmt::Debug for FieldBuf<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBuf")
            .field("len", &self.len)
            .field("data", &self.as_slice())
            .finish()
    }
}

impl<T: Pod> Deref for FieldBuf<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Pod> DerefMut for FieldBuf<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Pod + PartialEq> PartialEq for FieldBuf<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Pod + Serialize> Serialize for FieldBuf<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<'de, T: Pod + Deserialize<'de>> Deserialize<'de> for FieldBuf<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = Vec::<T>::deserialize(deserializer)?;
        Ok(Self::from_slice(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_and_alignment() {
        let buf: FieldBuf<f64> = FieldBuf::zeros(100);
        assert_eq!(buf.len(), 100);
        assert_eq!(buf.as_slice().as_ptr() as usize % CACHE_ALIGN, 0);
        assert!(buf.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty_buffer() {
        let buf: FieldBuf<f64> = FieldBuf::zeros(0);
        assert!(buf.is_empty());
        assert_eq!(buf.as_slice().len(), 0);
    }

    #[test]
    fn test_filled_and_index() {
        let mut buf = FieldBuf::filled(8, 2.5_f64);
        assert_eq!(buf[3], 2.5);
        buf[3] = 1.0;
        assert_eq!(buf[3], 1.0);
    }

    #[test]
    fn test_clone_independent() {
        let a = FieldBuf::filled(4, 1.0_f64);
        let mut b = a.clone();
        b[0] = 9.0;
        assert_eq!(a[0], 1.0);
        assert_eq!(b[0], 9.0);
    }

    #[test]
    fn test_par_fill() {
        let mut buf: FieldBuf<f64> = FieldBuf::zeros(1000);
        buf.par_fill(3.0);
        assert!(buf.iter().all(|&v| v == 3.0));
    }

    #[test]
    fn test_serde_roundtrip() {
        let buf = FieldBuf::from_slice(&[1.0_f64, 2.0, 3.0]);
        let json = serde_json::to_string(&buf).unwrap();
        let back: FieldBuf<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(buf, back);
    }
}
