//! Ordered candidate fallback shared by the health probe and the messaging relay.
//!
//! Candidates are tried strictly one after another; there is no parallel race.

use std::future::Future;

/// Outcome of trying one candidate.
#[derive(Debug)]
pub enum Step<T, E> {
    /// Stop here with a usable value.
    Accept(T),
    /// This candidate did not qualify; try the next one.
    Advance(E),
    /// Stop immediately without trying the remaining candidates.
    Abort(E),
}

/// The candidate that produced a usable value.
#[derive(Debug)]
pub struct Accepted<'a, C, T> {
    pub index: usize,
    pub candidate: &'a C,
    pub value: T,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FallbackError<E> {
    Aborted(E),
    /// Every candidate advanced. `last` is the final candidate's reason.
    Exhausted { last: Option<E> },
}

pub async fn try_in_order<'a, C, T, E, F, Fut>(
    candidates: &'a [C],
    mut attempt: F,
) -> Result<Accepted<'a, C, T>, FallbackError<E>>
where
    F: FnMut(&'a C) -> Fut,
    Fut: Future<Output = Step<T, E>>,
{
    let mut last = None;

    for (index, candidate) in candidates.iter().enumerate() {
        match attempt(candidate).await {
            Step::Accept(value) => {
                return Ok(Accepted {
                    index,
                    candidate,
                    value,
                })
            }
            Step::Advance(reason) => last = Some(reason),
            Step::Abort(reason) => return Err(FallbackError::Aborted(reason)),
        }
    }

    Err(FallbackError::Exhausted { last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[tokio::test]
    async fn test_accepts_first_qualifying_candidate() {
        let tried = RefCell::new(Vec::new());
        let result = try_in_order(&["a", "b", "c"], |c| {
            tried.borrow_mut().push(*c);
            let step = if *c == "b" {
                Step::Accept(c.len())
            } else {
                Step::Advance("skip")
            };
            async move { step }
        })
        .await
        .unwrap();

        assert_eq!(result.index, 1);
        assert_eq!(*result.candidate, "b");
        assert_eq!(*tried.borrow(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_abort_stops_without_trying_rest() {
        let tried = RefCell::new(Vec::new());
        let result: Result<Accepted<'_, &str, ()>, _> = try_in_order(&["a", "b"], |c| {
            tried.borrow_mut().push(*c);
            async { Step::Abort("refused") }
        })
        .await;

        assert_eq!(result.unwrap_err(), FallbackError::Aborted("refused"));
        assert_eq!(*tried.borrow(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_exhausted_reports_last_reason() {
        let result: Result<Accepted<'_, u8, ()>, _> =
            try_in_order(&[1u8, 2, 3], |c| async move { Step::Advance(*c) }).await;
        assert_eq!(result.unwrap_err(), FallbackError::Exhausted { last: Some(3) });
    }

    #[tokio::test]
    async fn test_empty_candidates_exhaust_immediately() {
        let result: Result<Accepted<'_, u8, ()>, FallbackError<()>> =
            try_in_order(&[], |_| async { Step::Accept(()) }).await;
        assert_eq!(result.unwrap_err(), FallbackError::Exhausted { last: None });
    }
}
