use once_cell::sync::Lazy;
use proptest::prelude::*;
use solmark::{ConvertOptions, Dialect, Markdown};

static ENGINES: Lazy<Vec<Markdown>> = Lazy::new(|| {
    [Dialect::Markdown, Dialect::Extra, Dialect::Apidoc]
        .into_iter()
        .map(|dialect| {
            let options = ConvertOptions {
                max_nesting_depth: 256,
                ..ConvertOptions::dialect(dialect)
            };
            Markdown::new(options).expect("valid options")
        })
        .collect()
});

proptest! {
    #[test]
    fn plain_text_round_trips(text in "[a-zA-Z0-9][a-zA-Z0-9 ,;]{0,60}") {
        let html = ENGINES[0].convert(&text).unwrap();
        prop_assert_eq!(html, format!("<p>{}</p>\n", text.trim_end()));
    }

    #[test]
    fn markup_soup_never_errors(text in "[-*_`#>\\[\\]()!<>&|:~=+. \n\t0-9a-zA-Z\\\\\"']{0,120}") {
        for engine in ENGINES.iter() {
            prop_assert!(engine.convert(&text).is_ok());
        }
    }

    #[test]
    fn arbitrary_unicode_never_errors(text in "\\PC{0,80}") {
        for engine in ENGINES.iter() {
            prop_assert!(engine.convert(&text).is_ok());
        }
    }

    #[test]
    fn output_never_leaks_placeholders(text in "[-*_`\\[\\]()a-z \n]{0,80}") {
        let html = ENGINES[1].convert(&text).unwrap();
        prop_assert!(!html.contains('\x02'));
        prop_assert!(!html.contains('\x03'));
    }
}
