//! Work partitioning and the parallelism configuration.

use crate::index::{count_iters, increment_col_major, increment_row_major};

/// Default ceiling on partitions per operation.
pub const MAX_PARTITIONS: usize = 8;

/// Default minimum number of iterations each partition must cover.
pub const MIN_ITERS_PER_PARTITION: usize = 2048;

/// Which axis varies fastest when walking a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IterationOrder {
    /// Last axis fastest; partitions split axis 0.
    #[default]
    RowMajor,
    /// First axis fastest; partitions split the last axis.
    ColMajor,
}

/// Explicit parallelism settings passed to every kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Available parallel execution units. `0` disables splitting.
    pub workers: usize,
    pub max_partitions: usize,
    pub min_iters_per_partition: usize,
    pub order: IterationOrder,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        #[cfg(feature = "parallel")]
        let workers = rayon::current_num_threads();
        #[cfg(not(feature = "parallel"))]
        let workers = 1;

        Self {
            workers,
            max_partitions: MAX_PARTITIONS,
            min_iters_per_partition: MIN_ITERS_PER_PARTITION,
            order: IterationOrder::RowMajor,
        }
    }
}

impl ParallelConfig {
    /// A single worker: every operation runs as one partition.
    pub fn sequential() -> Self {
        Self {
            workers: 1,
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_order(mut self, order: IterationOrder) -> Self {
        self.order = order;
        self
    }

    /// Number of partitions for a box of `iters` points.
    ///
    /// Bounded by `max_partitions` and `workers`, and scaled down so each partition
    /// covers about `min_iters_per_partition` points. Never less than 1.
    pub fn partition_count(&self, iters: usize) -> usize {
        let units = self.max_partitions.min(self.workers);
        if units == 0 {
            return 1;
        }
        let min_iters = self.min_iters_per_partition.max(1);
        units.min((iters + min_iters + 1) / min_iters).max(1)
    }

    /// Split `length` into partitions along the slowest axis of `self.order`.
    pub fn partitions<const N: usize>(&self, length: &[usize; N]) -> Vec<Partition<N>> {
        let parts = self.partition_count(count_iters(length));
        match self.order {
            IterationOrder::RowMajor => partition_row_major(length, parts),
            IterationOrder::ColMajor => partition_col_major(length, parts),
        }
    }
}

/// One contiguous sub-box `[start, end)` of an iteration box.
///
/// Only the slowest axis of the partition's order has a non-zero start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition<const N: usize> {
    pub start: [usize; N],
    pub end: [usize; N],
    pub order: IterationOrder,
}

impl<const N: usize> Partition<N> {
    /// The whole box as a single partition.
    pub fn whole(length: &[usize; N], order: IterationOrder) -> Self {
        Self {
            start: [0; N],
            end: *length,
            order,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.iter().zip(self.end.iter()).any(|(s, e)| s >= e)
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.start
            .iter()
            .zip(self.end.iter())
            .map(|(s, e)| e - s)
            .product()
    }

    /// Visit every index of the partition with the odometer of its order.
    #[inline]
    pub fn for_each<F: FnMut(&[usize; N])>(&self, mut f: F) {
        if self.is_empty() {
            return;
        }
        let mut index = self.start;
        match self.order {
            IterationOrder::RowMajor => loop {
                f(&index);
                if !increment_row_major(&mut index, &self.end) {
                    break;
                }
            },
            IterationOrder::ColMajor => loop {
                f(&index);
                if !increment_col_major(&mut index, &self.end) {
                    break;
                }
            },
        }
    }

    pub fn iter(&self) -> PartitionIter<N> {
        PartitionIter {
            next: if self.is_empty() {
                None
            } else {
                Some(self.start)
            },
            end: self.end,
            order: self.order,
        }
    }
}

/// Iterator over the indices of a [`Partition`].
#[derive(Debug, Clone)]
pub struct PartitionIter<const N: usize> {
    next: Option<[usize; N]>,
    end: [usize; N],
    order: IterationOrder,
}

impl<const N: usize> Iterator for PartitionIter<N> {
    type Item = [usize; N];

    fn next(&mut self) -> Option<[usize; N]> {
        let current = self.next?;
        let mut index = current;
        let more = match self.order {
            IterationOrder::RowMajor => increment_row_major(&mut index, &self.end),
            IterationOrder::ColMajor => increment_col_major(&mut index, &self.end),
        };
        self.next = more.then_some(index);
        Some(current)
    }
}

/// Break `[0, length)` into `parts` contiguous ranges; the last absorbs the remainder.
fn partition_base(length: usize, parts: usize) -> Vec<(usize, usize)> {
    if length == 0 {
        return Vec::new();
    }
    let parts = parts.clamp(1, length);
    let size = length / parts;
    let mut ranges: Vec<(usize, usize)> = (0..parts).map(|i| (i * size, (i + 1) * size)).collect();
    if let Some(last) = ranges.last_mut() {
        last.1 = length;
    }
    ranges
}

/// Partition `length` on axis 0, for row-major walks.
pub fn partition_row_major<const N: usize>(length: &[usize; N], parts: usize) -> Vec<Partition<N>> {
    split_axis(length, parts, 0, IterationOrder::RowMajor)
}

/// Partition `length` on axis `N - 1`, for column-major walks.
pub fn partition_col_major<const N: usize>(length: &[usize; N], parts: usize) -> Vec<Partition<N>> {
    split_axis(length, parts, N.saturating_sub(1), IterationOrder::ColMajor)
}

fn split_axis<const N: usize>(
    length: &[usize; N],
    parts: usize,
    axis: usize,
    order: IterationOrder,
) -> Vec<Partition<N>> {
    if N == 0 || length.iter().any(|&l| l == 0) {
        return Vec::new();
    }
    partition_base(length[axis], parts)
        .into_iter()
        .map(|(s, e)| {
            let mut start = [0; N];
            let mut end = *length;
            start[axis] = s;
            end[axis] = e;
            Partition { start, end, order }
        })
        .collect()
}
