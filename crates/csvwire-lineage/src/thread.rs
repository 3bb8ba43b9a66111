//! Per-thread default lineage record.

use std::cell::RefCell;

use crate::lineage::MessageLineage;

thread_local! {
    static THREAD_LINEAGE: RefCell<MessageLineage> = RefCell::new(auto_capturing());
}

fn auto_capturing() -> MessageLineage {
    let mut lineage = MessageLineage::new();
    lineage.set_auto_capture(true);
    lineage
}

/// Run `f` against this thread's default record, created on first use with
/// auto-capture enabled.
///
/// # Panics
///
/// Panics if called again from inside `f`.
pub fn with_thread_lineage<R>(f: impl FnOnce(&mut MessageLineage) -> R) -> R {
    THREAD_LINEAGE.with(|cell| f(&mut cell.borrow_mut()))
}

/// Replace this thread's default record, returning the previous one.
pub fn set_thread_lineage(lineage: MessageLineage) -> MessageLineage {
    THREAD_LINEAGE.with(|cell| cell.replace(lineage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lazily_created_with_auto_capture() {
        std::thread::spawn(|| {
            with_thread_lineage(|lineage| {
                assert!(lineage.auto_capture());
                assert_eq!(lineage.sources(), 0);
            });
        })
        .join()
        .unwrap();
    }

    #[test]
    fn swap_returns_previous() {
        std::thread::spawn(|| {
            with_thread_lineage(|lineage| lineage.add_source(1, 1).unwrap());

            let previous = set_thread_lineage(MessageLineage::new());
            assert_eq!(previous.source_ids(), [1]);
            assert!(with_thread_lineage(|lineage| !lineage.auto_capture()));
        })
        .join()
        .unwrap();
    }

    #[test]
    fn threads_do_not_share() {
        with_thread_lineage(|lineage| {
            lineage.reset();
            lineage.add_source(7, 7).unwrap();
        });
        let other = std::thread::spawn(|| with_thread_lineage(|lineage| lineage.sources()))
            .join()
            .unwrap();
        assert_eq!(other, 0);
        assert_eq!(with_thread_lineage(|lineage| lineage.sources()), 1);
    }
}
