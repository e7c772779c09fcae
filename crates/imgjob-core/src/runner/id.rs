use std::sync::atomic::{AtomicU64, Ordering};

/// Per-process sequence for run identifiers.
static RUN_SEQ: AtomicU64 = AtomicU64::new(1);

/// Identifier tying together the log lines of one run.
///
/// Format: `{runner}-{job}-{seq:x}`.
pub fn make_run_id(runner: &str, job: &str) -> String {
    let seq = RUN_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{runner}-{job}-{seq:x}")
}

#[cfg(test)]
mod tests {
    use super::make_run_id;

    #[test]
    fn ids_are_prefixed_and_unique() {
        let a = make_run_id("local", "build_image");
        let b = make_run_id("local", "build_image");
        assert!(a.starts_with("local-build_image-"));
        assert_ne!(a, b);
    }
}
