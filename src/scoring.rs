//! Text normalization and accuracy scoring
//!
//! Accuracy is the Ratcliff/Obershelp similarity of the normalized ground
//! truth and the normalized OCR output, as a percentage with two decimals.
//! The matcher behaves like `difflib.SequenceMatcher` without a junk
//! predicate, including the automatic "popular element" heuristic for
//! sequences of 200 or more characters, so scores are comparable with
//! published results computed that way.

use std::collections::HashMap;

/// Second sequences at least this long drop popular elements from the index
const AUTOJUNK_MIN_LEN: usize = 200;

/// Canonical form used for comparison: trimmed, lowercased, single spaces.
/// Punctuation is kept.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accuracy of `predicted` against `ground_truth` in `[0, 100]`, rounded to
/// two decimals. Two empty strings score 100.
pub fn accuracy(ground_truth: &str, predicted: &str) -> f64 {
    let ratio = similarity_ratio(&normalize(ground_truth), &normalize(predicted));
    // Exact binary ties round away from zero here; Python's round() goes to
    // even. Ratios of small integer counts almost never land on one.
    (ratio * 100.0 * 100.0).round() / 100.0
}

/// `2 * M / T` where `M` is the number of characters in the matching blocks
/// and `T` the total number of characters in both strings.
///
/// Not symmetric in general: the popular-element index is built from `b`
/// and ties between equally long matches resolve towards the start of `a`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matches = SequenceMatcher::new(&a, &b).matching_characters();
    2.0 * matches as f64 / total as f64
}

/// A contiguous run `a[i..i + size] == b[j..j + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    i: usize,
    j: usize,
    size: usize,
}

struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character of `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Total size of all matching blocks
    fn matching_characters(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            total += block.size;
            if alo < block.i && blo < block.j {
                queue.push((alo, block.i, blo, block.j));
            }
            if block.i + block.size < ahi && block.j + block.size < bhi {
                queue.push((block.i + block.size, ahi, block.j + block.size, bhi));
            }
        }

        total
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`, earliest in
    /// `a` (then in `b`) on ties.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut best = Block {
            i: alo,
            j: blo,
            size: 0,
        };

        // j2len[j] = length of the longest match ending with a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best.size {
                        best = Block {
                            i: i + 1 - k,
                            j: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next;
        }

        // Popular characters are missing from the index; grow the block over
        // them on both sides.
        while best.i > alo && best.j > blo && self.a[best.i - 1] == self.b[best.j - 1] {
            best.i -= 1;
            best.j -= 1;
            best.size += 1;
        }
        while best.i + best.size < ahi
            && best.j + best.size < bhi
            && self.a[best.i + best.size] == self.b[best.j + best.size]
        {
            best.size += 1;
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_lowercases_and_collapses() {
        assert_eq!(normalize("  Hello \t  WORLD\n\nagain  "), "hello world again");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in [
            "",
            "  The Quick\tBrown  fox ",
            "빠른  갈색\n여우가",
            "Con CÁO nâu\u{00a0}nhanh",
            "a.b , c",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {:?}", s);
        }
    }

    #[test]
    fn test_normalize_keeps_punctuation() {
        assert_eq!(normalize("Dog."), "dog.");
    }

    #[test]
    fn test_identical_text_scores_100() {
        for s in [
            "The quick brown fox jumps over the lazy dog.",
            "빠른 갈색 여우가 게으른 개를 뛰어넘습니다.",
            "Con cáo nâu nhanh nhẹn nhảy qua con chó lười biếng.",
        ] {
            assert_eq!(accuracy(s, s), 100.0);
        }
    }

    #[test]
    fn test_case_and_whitespace_differences_are_ignored() {
        assert_eq!(accuracy("The  Quick\nBrown", "  the quick brown "), 100.0);
    }

    #[test]
    fn test_exact_tie_rounds_away_from_zero() {
        // One matching character out of 64: ratio * 100 is exactly 3.125
        let ground_truth = format!("x{}", "a".repeat(31));
        let predicted = format!("x{}", "b".repeat(31));
        assert_eq!(accuracy(&ground_truth, &predicted), 3.13);
    }

    #[test]
    fn test_empty_strings_score_100() {
        assert_eq!(accuracy("", ""), 100.0);
        assert_eq!(accuracy("   ", "\n"), 100.0);
    }

    #[test]
    fn test_one_side_empty_scores_zero() {
        assert_eq!(accuracy("abc", ""), 0.0);
        assert_eq!(accuracy("", "abc"), 0.0);
    }

    #[test]
    fn test_missing_trailing_period() {
        // 43 matching characters out of 44 + 43
        assert_eq!(
            accuracy(
                "The quick brown fox jumps over the lazy dog.",
                "the quick brown fox jumps over the lazy dog"
            ),
            98.85
        );
    }

    #[test]
    fn test_ratio_is_not_always_symmetric() {
        assert_eq!(accuracy("tide", "diet"), 25.0);
        assert_eq!(accuracy("diet", "tide"), 50.0);
    }

    #[test]
    fn test_symmetric_for_prefix_match() {
        let gt = "The quick brown fox jumps over the lazy dog.";
        let pred = "The quick brown fox";
        assert_eq!(accuracy(gt, pred), accuracy(pred, gt));
    }

    #[test]
    fn test_korean_single_syllable_error() {
        assert_eq!(
            accuracy(
                "빠른 갈색 여우가 게으른 개를 뛰어넘습니다.",
                "빠른 갈색 여우가 게으론 개를 뛰어넘습니다"
            ),
            93.62
        );
    }

    #[test]
    fn test_vietnamese_without_diacritics() {
        assert_eq!(
            accuracy(
                "Con cáo nâu nhanh nhẹn nhảy qua con chó lười biếng.",
                "Con cao nau nhanh nhen nhay qua con cho luoi bieng."
            ),
            84.31
        );
    }

    #[test]
    fn test_popular_characters_are_dropped_for_long_sequences() {
        let a = "the quick brown fox ".repeat(12);
        let b = "the quick brown cat ".repeat(12);
        assert_eq!(accuracy(&a, &b), 6.69);
    }

    #[test]
    fn test_score_stays_in_range() {
        let pairs = [("abc", "xyz"), ("a", "aaaa"), ("hello", "olleh")];
        for (gt, pred) in pairs {
            let score = accuracy(gt, pred);
            assert!((0.0..=100.0).contains(&score), "{} vs {}: {}", gt, pred, score);
        }
        assert_eq!(accuracy("abc", "xyz"), 0.0);
    }
}
