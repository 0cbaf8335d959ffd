//! Concurrent fan-out and keyed join

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use futures::future::join_all;

/// Run one future per item concurrently; results keep input order
pub async fn fan_out<I, F, Fut>(items: I, f: F) -> Vec<Fut::Output>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future,
{
    join_all(items.into_iter().map(f)).await
}

/// Pair every left row with its match in `right`, or `R::default()` when absent
pub fn left_join<L, R, K, F>(left: Vec<L>, key: F, right: &HashMap<K, R>) -> Vec<(L, R)>
where
    K: Eq + Hash,
    R: Clone + Default,
    F: Fn(&L) -> K,
{
    left.into_iter()
        .map(|row| {
            let matched = right.get(&key(&row)).cloned().unwrap_or_default();
            (row, matched)
        })
        .collect()
}
