use std::collections::BTreeSet;

/// Compute the set of character positions pre-revealed for an answer at a
/// given mastery level. Positions index into the answer's char sequence.
///
/// Banding:
/// - level 0 (new or just reset): first and last; for answers longer than
///   5 chars also positions 1 and 2 plus every third interior position
///   starting at 3 (~30-40% visible)
/// - level 1: first and last; for answers longer than 6 chars one midpoint
/// - level 2+: first only; last as well for answers longer than 4 chars
///
/// Total and deterministic. The mask size never increases with level, and
/// a non-empty answer always keeps at least its first character so a turn
/// is never unsolvable from a blank slate.
pub fn compute_hints(answer: &str, level: u32) -> BTreeSet<usize> {
    let len = answer.chars().count();
    let mut mask = BTreeSet::new();
    if len == 0 {
        return mask;
    }
    let last = len - 1;

    match level {
        0 => {
            mask.insert(0);
            mask.insert(last);
            if len > 5 {
                mask.insert(1);
                mask.insert(2);
                let mut idx = 3;
                while idx < last {
                    mask.insert(idx);
                    idx += 3;
                }
            }
        }
        1 => {
            mask.insert(0);
            mask.insert(last);
            if len > 6 {
                mask.insert(len / 2);
            }
        }
        _ => {
            mask.insert(0);
            if len > 4 {
                mask.insert(last);
            }
        }
    }

    mask
}

/// Render the answer with unrevealed positions blanked out, e.g.
/// "c _ a _" for "chat" with mask {0, 2}.
pub fn masked_chars(answer: &str, mask: &BTreeSet<usize>) -> Vec<Option<char>> {
    answer
        .chars()
        .enumerate()
        .map(|(idx, ch)| if mask.contains(&idx) { Some(ch) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level0_short_answer_first_and_last() {
        let mask = compute_hints("chat", 0);
        assert!(mask.contains(&0));
        assert!(mask.contains(&3));
        assert_eq!(mask.len(), 2);
    }

    #[test]
    fn test_level0_long_answer_density() {
        let mask = compute_hints("bibliothèque", 0); // 12 chars
        assert!(mask.contains(&0));
        assert!(mask.contains(&11));
        assert!(mask.contains(&1));
        assert!(mask.contains(&2));
        // Stride-3 interior: 3, 6, 9
        assert!(mask.contains(&3));
        assert!(mask.contains(&6));
        assert!(mask.contains(&9));
    }

    #[test]
    fn test_level1_midpoint_only_when_long() {
        assert_eq!(compute_hints("maison", 1).len(), 2); // 6 chars: no midpoint
        let mask = compute_hints("fenêtre", 1); // 7 chars
        assert_eq!(mask.len(), 3);
        assert!(mask.contains(&3));
    }

    #[test]
    fn test_level2_sparse_floor() {
        assert_eq!(compute_hints("chat", 2), BTreeSet::from([0]));
        assert_eq!(compute_hints("maison", 2), BTreeSet::from([0, 5]));
        // Higher levels stay at the floor
        assert_eq!(compute_hints("maison", 9), BTreeSet::from([0, 5]));
    }

    #[test]
    fn test_level2_subset_of_level0() {
        for answer in ["chat", "a", "maison", "bibliothèque"] {
            let level0 = compute_hints(answer, 0);
            let level2 = compute_hints(answer, 2);
            assert!(level2.is_subset(&level0), "failed for {answer}");
        }
    }

    #[test]
    fn test_monotonic_and_in_bounds() {
        let answers = [
            "", "a", "ab", "oui", "chat", "pomme", "maison", "fenêtre", "montagne",
            "ordinateur", "bibliothèque", "anticonstitutionnellement",
        ];
        for answer in answers {
            let len = answer.chars().count();
            let mut prev_size = usize::MAX;
            for level in 0..6 {
                let mask = compute_hints(answer, level);
                assert!(mask.len() <= prev_size, "size grew at level {level} for {answer:?}");
                assert!(mask.iter().all(|&idx| idx < len), "out of bounds for {answer:?}");
                if len > 0 {
                    assert!(!mask.is_empty(), "empty mask for non-empty {answer:?}");
                }
                prev_size = mask.len();
            }
        }
    }

    #[test]
    fn test_single_char_never_panics() {
        for level in 0..4 {
            assert_eq!(compute_hints("à", level), BTreeSet::from([0]));
        }
        for level in 0..4 {
            assert!(compute_hints("", level).is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(compute_hints("montagne", 1), compute_hints("montagne", 1));
    }

    #[test]
    fn test_masked_chars() {
        let mask = compute_hints("chat", 0);
        let chars = masked_chars("chat", &mask);
        assert_eq!(chars, vec![Some('c'), None, None, Some('t')]);
    }
}
