/// Contiguous slice of the global 1-based file index space owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerAssignment {
    /// 1-based worker number, in submission order.
    pub worker_id: usize,
    /// First global index (1-based) handled by this worker.
    pub start_index: u64,
    /// Number of files assigned.
    pub count: u64,
}

impl WorkerAssignment {
    /// Global indices covered by this assignment.
    pub fn indices(&self) -> std::ops::Range<u64> {
        self.start_index..self.start_index + self.count
    }
}

/// Split `total` items over `workers` buckets.
///
/// Buckets differ by at most one; the `total % workers` larger buckets come
/// first. `workers` of zero is treated as one.
pub fn distribute(total: u64, workers: usize) -> Vec<u64> {
    let workers = workers.max(1);
    let base = total / workers as u64;
    let remainder = total % workers as u64;
    (0..workers as u64)
        .map(|worker| if worker < remainder { base + 1 } else { base })
        .collect()
}

/// Assign each bucket a contiguous index range so the ranges tile `1..=total`.
///
/// Every bucket gets an assignment, including empty ones, so worker ids stay
/// aligned with the distribution.
pub fn assign_ranges(distribution: &[u64]) -> Vec<WorkerAssignment> {
    let mut next_index = 1_u64;
    distribution
        .iter()
        .enumerate()
        .map(|(position, count)| {
            let assignment = WorkerAssignment {
                worker_id: position + 1,
                start_index: next_index,
                count: *count,
            };
            next_index += count;
            assignment
        })
        .collect()
}
