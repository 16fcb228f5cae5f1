use std::cmp::Ordering;
use std::collections::VecDeque;

use anyhow::{Result, bail};
use rayon::prelude::*;

use super::cancel::{CancelToken, Cancelled};
use crate::config::SortSettings;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_SORT_STATS;

/// Sort a large array without one monolithic comparison sort.
///
/// Below `settings.direct_sort_threshold` items the data is sorted in one stable
/// pass. Above it the data is split into `settings.chunk_size` chunks, each chunk
/// is sorted on its own (optionally on the rayon pool), and the sorted chunks are
/// k-way merged by scanning every chunk head for the minimum. Ties go to the
/// earliest chunk, which keeps the whole sort stable.
///
/// `progress` receives values in `[0, 1]`: the chunk phase covers the first half
/// and the merge the second.
pub fn sort_large<T, F>(
    data: Vec<T>,
    compare: F,
    settings: &SortSettings,
    cancel: &CancelToken,
    progress: &mut dyn FnMut(f64),
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    let total = data.len();
    if total < settings.direct_sort_threshold {
        let mut sorted = data;
        sorted.sort_by(&compare);
        return Ok(sorted);
    }
    if settings.chunk_size == 0 {
        bail!("sort chunk size must be >= 1");
    }

    let mut items = data.into_iter();
    let mut chunks: Vec<Vec<T>> = Vec::with_capacity(total.div_ceil(settings.chunk_size));
    loop {
        let chunk: Vec<T> = items.by_ref().take(settings.chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }
    let n_chunks = chunks.len();

    if settings.parallel_chunks {
        chunks.par_iter_mut().try_for_each(|chunk| {
            cancel.check()?;
            chunk.sort_by(&compare);
            Ok::<(), Cancelled>(())
        })?;
        progress(0.5);
    } else {
        for (i, chunk) in chunks.iter_mut().enumerate() {
            cancel.check()?;
            chunk.sort_by(&compare);
            progress(0.5 * (i + 1) as f64 / n_chunks as f64);
        }
    }

    #[cfg(debug_assertions)]
    if PRINT_SORT_STATS {
        log::info!(
            "sort_large: {} items in {} chunks of {} (parallel: {})",
            total,
            n_chunks,
            settings.chunk_size,
            settings.parallel_chunks
        );
    }

    let merged = k_way_merge(chunks, total, &compare, settings, cancel, progress)?;
    progress(1.0);
    Ok(merged)
}

fn k_way_merge<T, F>(
    chunks: Vec<Vec<T>>,
    total: usize,
    compare: &F,
    settings: &SortSettings,
    cancel: &CancelToken,
    progress: &mut dyn FnMut(f64),
) -> Result<Vec<T>>
where
    F: Fn(&T, &T) -> Ordering,
{
    let check_every = settings.merge_check_every.max(1);
    let mut heads: Vec<VecDeque<T>> = chunks.into_iter().map(VecDeque::from).collect();
    let mut merged = Vec::with_capacity(total);

    while merged.len() < total {
        if merged.len() % check_every == 0 && !merged.is_empty() {
            cancel.check()?;
            progress(0.5 + 0.5 * merged.len() as f64 / total as f64);
        }

        let mut best: Option<usize> = None;
        for (c, chunk) in heads.iter().enumerate() {
            let Some(candidate) = chunk.front() else {
                continue;
            };
            let replace = match best.and_then(|b| heads[b].front()) {
                None => true,
                // Strictly less: equal keys stay with the earlier chunk
                Some(current) => compare(candidate, current) == Ordering::Less,
            };
            if replace {
                best = Some(c);
            }
        }

        let Some(item) = best.and_then(|b| heads[b].pop_front()) else {
            break;
        };
        merged.push(item);
    }

    Ok(merged)
}
