//! Fork-join execution of partitions.
//!
//! With the `parallel` feature each partition becomes a rayon task and the call
//! returns once all of them have joined. Without it, partitions run in order on
//! the calling thread.

use crate::partition::Partition;

/// A raw pointer wrapper that is `Send` + `Sync`.
///
/// # Safety
/// The caller must guarantee that the pointed-to data outlives every parallel
/// region that uses it and that concurrent tasks write disjoint elements.
pub(crate) struct SendPtr<T>(pub(crate) *mut T);

impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SendPtr<T> {}

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    pub(crate) fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    pub(crate) fn as_ptr(self) -> *mut T {
        self.0
    }
}

/// Run `f` on every partition.
pub(crate) fn for_each_partition<const N: usize, F>(partitions: &[Partition<N>], f: F)
where
    F: Fn(&Partition<N>) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    if partitions.len() > 1 {
        use rayon::prelude::*;
        partitions.par_iter().for_each(f);
        return;
    }

    partitions.iter().for_each(f);
}

/// Run `f` on every partition and collect the results in partition order.
pub(crate) fn map_partitions<const N: usize, R, F>(partitions: &[Partition<N>], f: F) -> Vec<R>
where
    R: Send,
    F: Fn(&Partition<N>) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    if partitions.len() > 1 {
        use rayon::prelude::*;
        return partitions.par_iter().map(f).collect();
    }

    partitions.iter().map(f).collect()
}
