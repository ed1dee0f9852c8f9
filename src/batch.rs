//! Diffing many document pairs at once.
//!
//! Each pair is independent, so with the `parallel` feature the pairs are
//! spread over rayon's thread pool. A single diff stays sequential.

use crate::error::DiffResult;
use crate::options::HtmlDiffOptions;
use crate::HtmlDiff;

/// Diff every `(old, new)` pair with the same options.
///
/// Options are validated once; results keep the order of `pairs`.
pub fn diff_batch<'a>(
    pairs: &[(&'a str, &'a str)],
    options: &HtmlDiffOptions,
) -> DiffResult<Vec<HtmlDiff<'a>>> {
    options.validate()?;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        Ok(pairs
            .par_iter()
            .map(|&(old, new)| HtmlDiff::build(old, new, options.clone()))
            .collect())
    }

    #[cfg(not(feature = "parallel"))]
    {
        Ok(pairs
            .iter()
            .map(|&(old, new)| HtmlDiff::build(old, new, options.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiffError;

    #[test]
    fn test_batch_keeps_order() {
        let pairs = [
            ("<p>a</p>", "<p>a</p>"),
            ("<p>hello</p>", "<p>hello world</p>"),
            ("", "x"),
        ];
        let diffs = diff_batch(&pairs, &HtmlDiffOptions::default()).unwrap();
        assert_eq!(diffs.len(), 3);
        assert!(diffs[0].is_identical());
        assert_eq!(
            diffs[1].unified_content(),
            "<p>hello<span class=\"html-diff-create-text-wrapper\"> world</span></p>"
        );
        assert_eq!(
            diffs[2].unified_content(),
            "<span class=\"html-diff-create-text-wrapper\">x</span>"
        );
    }

    #[test]
    fn test_batch_matches_single() {
        let pairs = [("<div>hello</div>", "<div>world</div>")];
        let options = HtmlDiffOptions::new().min_matched_size(3);
        let diffs = diff_batch(&pairs, &options).unwrap();
        let single = HtmlDiff::with_options(pairs[0].0, pairs[0].1, options).unwrap();
        assert_eq!(diffs[0].unified_content(), single.unified_content());
        assert_eq!(diffs[0].side_by_side_contents(), single.side_by_side_contents());
    }

    #[test]
    fn test_batch_rejects_invalid_options() {
        let options = HtmlDiffOptions::new().min_matched_size(0);
        let err = diff_batch(&[("a", "b")], &options).unwrap_err();
        assert_eq!(err, DiffError::InvalidMinMatchedSize { value: 0 });
    }

    #[test]
    fn test_empty_batch() {
        assert!(diff_batch(&[], &HtmlDiffOptions::default()).unwrap().is_empty());
    }
}
