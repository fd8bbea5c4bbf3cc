//! Large inputs built from one repeated unit must convert in roughly linear
//! time. Each of these shapes used to rescan the rest of the text once per
//! unit.

use solmark::{ConvertOptions, Dialect, Markdown};
use std::time::{Duration, Instant};

const LIMIT: Duration = Duration::from_secs(10);

fn assert_converts_quickly(unit: &str, times: usize) {
    let text = unit.repeat(times);
    for dialect in [Dialect::Markdown, Dialect::Extra] {
        let engine = Markdown::new(ConvertOptions::dialect(dialect)).unwrap();
        let start = Instant::now();
        let html = engine.convert(&text).unwrap();
        let elapsed = start.elapsed();
        assert!(!html.is_empty());
        assert!(
            elapsed < LIMIT,
            "{:?} x {} took {:?} in {:?}",
            unit,
            times,
            elapsed,
            dialect
        );
    }
}

#[test]
fn unmatched_emphasis_openers() {
    assert_converts_quickly("*a ", 100_000);
    assert_converts_quickly("**a ", 100_000);
    assert_converts_quickly("_a ", 100_000);
}

#[test]
fn unbalanced_brackets_and_parens() {
    assert_converts_quickly("[", 100_000);
    assert_converts_quickly("[a](", 50_000);
    assert_converts_quickly("![a][", 50_000);
}

#[test]
fn many_links_in_one_paragraph() {
    assert_converts_quickly("[a *b*](/x) ", 20_000);
}

#[test]
fn backtick_runs() {
    assert_converts_quickly("`` a ` b ", 50_000);
}

#[test]
fn unclosed_tags_comments_and_entities() {
    assert_converts_quickly("<!--", 100_000);
    assert_converts_quickly("<a '", 100_000);
    assert_converts_quickly("&", 100_000);
}

#[test]
fn unclosed_fences() {
    assert_converts_quickly("```js\nx\n", 20_000);
}
