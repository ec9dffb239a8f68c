use std::future::Future;

use futures::stream::{self, StreamExt};

/// Runs `op` over every item with at most `limit` calls in flight and returns
/// the results in input order.
///
/// Each result lands in the slot of the item that produced it, so completion
/// order never leaks into the output. Returns only after every call settles.
pub async fn fan_out<T, R, F, Fut>(items: Vec<T>, limit: Option<usize>, op: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let total = items.len();
    let concurrency = limit.unwrap_or(total).max(1);
    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();

    let mut settled = stream::iter(items.into_iter().enumerate().map(|(index, item)| {
        let fut = op(item);
        async move { (index, fut.await) }
    }))
    .buffer_unordered(concurrency);

    while let Some((index, result)) = settled.next().await {
        slots[index] = Some(result);
    }

    slots.into_iter().flatten().collect()
}
