//! String similarity scoring on a 0-100 scale
//!
//! All ratios are built on the indel (insert/delete only) similarity
//! `100 * 2 * LCS / (|a| + |b|)`, computed over characters. The combined
//! [`weighted_ratio`] blends plain, partial and token-based ratios depending
//! on how different the two lengths are.

use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;

/// Normalize a string for scoring
///
/// Lower-cases, replaces every non-alphanumeric character with a space and
/// trims the ends.
pub fn default_process(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    mapped.trim().to_string()
}

/// Length of the longest common subsequence
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// Plain indel similarity
pub fn ratio(a: &str, b: &str) -> f64 {
    indel_ratio(&chars(a), &chars(b))
}

/// Best ratio of the shorter string against any same-length window of the
/// longer one, including windows clipped at either end
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (chars(a), chars(b));
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let m = short.len() as isize;
    let n = long.len() as isize;
    let mut best = 0.0f64;
    for start in (1 - m)..n {
        let lo = start.max(0) as usize;
        let hi = (start + m).min(n) as usize;
        let score = indel_ratio(&short, &long[lo..hi]);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

fn sorted_tokens(s: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens
}

/// Ratio after sorting the whitespace separated tokens of both strings
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a).join(" "), &sorted_tokens(b).join(" "))
}

/// Ratio over the shared and differing token sets
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_joined = chars(&diff_ab.join(" "));
    let diff_ba_joined = chars(&diff_ba.join(" "));
    let ab_len = diff_ab_joined.len();
    let ba_len = diff_ba_joined.len();
    let sect_len = intersection.join(" ").chars().count();
    let sep = usize::from(sect_len != 0);

    let sect_ab_len = sect_len + sep + ab_len;
    let sect_ba_len = sect_len + sep + ba_len;

    let dist = ab_len + ba_len - 2 * lcs_len(&diff_ab_joined, &diff_ba_joined);
    let total = sect_ab_len + sect_ba_len;
    let mut result = if total == 0 {
        0.0
    } else {
        100.0 - 100.0 * dist as f64 / total as f64
    };

    if sect_len == 0 {
        return result;
    }

    let sect_ab_ratio = 100.0 - 100.0 * (sep + ab_len) as f64 / (sect_len + sect_ab_len) as f64;
    let sect_ba_ratio = 100.0 - 100.0 * (sep + ba_len) as f64 / (sect_len + sect_ba_len) as f64;
    result = result.max(sect_ab_ratio).max(sect_ba_ratio);
    result
}

/// Partial ratio over sorted tokens; any shared token scores 100
pub fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let split_a: Vec<&str> = a.split_whitespace().collect();
    let split_b: Vec<&str> = b.split_whitespace().collect();
    let tokens_a: BTreeSet<&str> = split_a.iter().copied().collect();
    let tokens_b: BTreeSet<&str> = split_b.iter().copied().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }

    let result = partial_ratio(&sorted_tokens(a).join(" "), &sorted_tokens(b).join(" "));
    if split_a.len() == tokens_a.len() && split_b.len() == tokens_b.len() {
        return result;
    }

    // Duplicated tokens: also compare the de-duplicated sets
    let set_a: Vec<&str> = tokens_a.into_iter().collect();
    let set_b: Vec<&str> = tokens_b.into_iter().collect();
    result.max(partial_ratio(&set_a.join(" "), &set_b.join(" ")))
}

/// Weighted combination of the ratios above
///
/// Expects pre-processed input (see [`default_process`]). Empty input scores 0.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let end_ratio = ratio(a, b);

    if len_ratio < 1.5 {
        let token_ratio = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return end_ratio.max(token_ratio * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let end_ratio = end_ratio.max(partial_ratio(a, b) * partial_scale);
    end_ratio.max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale)
}

/// Best scoring choice for `query`
///
/// Both `query` and `choices` must already be processed. Returns the index and
/// score of the first choice reaching the maximal score; scanning stops at a
/// perfect 100. `None` when there are no choices.
pub fn extract_one<'a, I>(query: &str, choices: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, choice) in choices.into_iter().enumerate() {
        let score = weighted_ratio(query, choice);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((index, score));
            if score >= 100.0 {
                break;
            }
        }
    }
    best
}
