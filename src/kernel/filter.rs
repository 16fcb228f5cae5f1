use anyhow::Result;

use super::cancel::CancelToken;

/// Keep the items for which `predicate(item, index)` holds, in their original
/// order. The token is polled every `check_every` items.
pub fn filter_items<T, P>(
    data: &[T],
    mut predicate: P,
    cancel: &CancelToken,
    check_every: usize,
) -> Result<Vec<T>>
where
    T: Clone,
    P: FnMut(&T, usize) -> bool,
{
    let check_every = check_every.max(1);
    let mut kept = Vec::new();
    for (index, item) in data.iter().enumerate() {
        if index % check_every == 0 {
            cancel.check()?;
        }
        if predicate(item, index) {
            kept.push(item.clone());
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Cancelled;

    #[test]
    fn keeps_matching_items_in_order() {
        let data: Vec<i32> = (0..20).collect();
        let kept = filter_items(&data, |x, _| x % 3 == 0, &CancelToken::new(), 4).unwrap();
        assert_eq!(kept, vec![0, 3, 6, 9, 12, 15, 18]);
    }

    #[test]
    fn predicate_sees_the_index() {
        let data = vec!["a", "b", "a", "c"];
        let kept =
            filter_items(&data, |s, i| *s == "a" && i > 0, &CancelToken::new(), 1).unwrap();
        assert_eq!(kept, vec!["a"]);
    }

    #[test]
    fn tripped_token_stops_the_scan() {
        let token = CancelToken::new();
        token.cancel();
        let err = filter_items(&[1, 2, 3], |_, _| true, &token, 1).unwrap_err();
        assert!(err.is::<Cancelled>());
    }
}
