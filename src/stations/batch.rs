/// Decides how many waiting clients form the next batch.  Implementations
/// return `None` to keep waiting; the Process station discards any size
/// outside its configured bounds.
pub trait BatchPolicy {
    fn batch_size(&self, waiting: usize, minimum: u32, maximum: u32) -> Option<usize>;
}

/// Starts a batch as soon as the minimum is reached, taking as many clients
/// as the maximum allows.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyBatchPolicy;

impl BatchPolicy for GreedyBatchPolicy {
    fn batch_size(&self, waiting: usize, minimum: u32, maximum: u32) -> Option<usize> {
        if waiting >= minimum as usize {
            Some(waiting.min(maximum as usize))
        } else {
            None
        }
    }
}

/// Always waits for a full batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullBatchPolicy;

impl BatchPolicy for FullBatchPolicy {
    fn batch_size(&self, waiting: usize, _minimum: u32, maximum: u32) -> Option<usize> {
        if waiting >= maximum as usize {
            Some(maximum as usize)
        } else {
            None
        }
    }
}
