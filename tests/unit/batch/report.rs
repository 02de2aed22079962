use super::*;

#[test]
fn report_counts_and_merges() {
    let mut a = BatchReport::default();
    a.record_success("chair");
    a.record_skip("blank.png");
    assert!(a.is_success());

    let mut b = BatchReport::default();
    b.record_failure("table", "render error: out of memory");
    a.merge(b);

    assert_eq!(a.total(), 3);
    assert!(!a.is_success());
    assert_eq!(a.failed[0].item, "table");
}

#[test]
fn display_lists_failures() {
    let mut r = BatchReport::default();
    r.record_success("a");
    r.record_failure("b", "boom");
    assert_eq!(
        r.to_string(),
        "1 succeeded, 0 skipped, 1 failed\n  b: boom"
    );
}
