//! Post-processing of raw edit scripts
//!
//! A minimal edit script is often unreadable: "world" vs "there" shares a
//! single `r`, which splits the change into four fragments. The passes here
//! trade minimality for readability:
//!
//! - [`merge`] coalesces runs, orders deletions before insertions, and moves
//!   text shared by a deletion and insertion into the surrounding equalities.
//! - [`semantic`] dissolves equalities that are no longer than the edits on
//!   both sides of them, then aligns the remaining edits to word and line
//!   boundaries.

use smallvec::SmallVec;

use crate::myers::{common_prefix, common_suffix};
use crate::{Chunk, Operation};

fn push_equal(out: &mut Vec<Chunk>, text: Vec<char>) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some((Operation::Equal, last)) => last.extend(text),
        _ => out.push((Operation::Equal, text)),
    }
}

/// Normalize a script: one deletion then one insertion between equalities,
/// shared affixes factored out, single edits slid over neighbouring
/// equalities where that removes an equality.
pub(crate) fn merge(chunks: &mut Vec<Chunk>) {
    loop {
        let mut out: Vec<Chunk> = Vec::with_capacity(chunks.len());
        let mut deleted: Vec<char> = Vec::new();
        let mut inserted: Vec<char> = Vec::new();

        // Trailing sentinel flushes the last run of edits
        chunks.push((Operation::Equal, Vec::new()));
        for (op, text) in chunks.drain(..) {
            match op {
                Operation::Delete => deleted.extend(text),
                Operation::Insert => inserted.extend(text),
                Operation::Equal => {
                    let mut equal = text;
                    if !deleted.is_empty() && !inserted.is_empty() {
                        let prefix = common_prefix(&deleted, &inserted);
                        if prefix > 0 {
                            push_equal(&mut out, inserted[..prefix].to_vec());
                            deleted.drain(..prefix);
                            inserted.drain(..prefix);
                        }
                        let suffix = common_suffix(&deleted, &inserted);
                        if suffix > 0 {
                            let mut shared = inserted.split_off(inserted.len() - suffix);
                            deleted.truncate(deleted.len() - suffix);
                            shared.extend(equal);
                            equal = shared;
                        }
                    }
                    if !deleted.is_empty() {
                        out.push((Operation::Delete, std::mem::take(&mut deleted)));
                    }
                    if !inserted.is_empty() {
                        out.push((Operation::Insert, std::mem::take(&mut inserted)));
                    }
                    push_equal(&mut out, equal);
                }
            }
        }
        *chunks = out;

        if !slide_single_edits(chunks) {
            break;
        }
    }
}

/// Slide a single edit across a neighbouring equality it fully overlaps:
/// `a<ba>c` becomes `<ab>ac` and `a<bc>b` becomes `ab<cb>`. Returns true if
/// anything moved.
fn slide_single_edits(chunks: &mut Vec<Chunk>) -> bool {
    let mut changed = false;
    let mut i = 1;
    while i + 1 < chunks.len() {
        if chunks[i - 1].0 == Operation::Equal && chunks[i + 1].0 == Operation::Equal {
            let before = chunks[i - 1].1.clone();
            let after = chunks[i + 1].1.clone();
            let edit = chunks[i].1.clone();
            if edit.ends_with(&before) {
                let keep = edit.len() - before.len();
                let mut shifted = before.clone();
                shifted.extend_from_slice(&edit[..keep]);
                let mut next = before;
                next.extend(after);
                chunks[i].1 = shifted;
                chunks[i + 1].1 = next;
                chunks.remove(i - 1);
                changed = true;
            } else if edit.starts_with(&after) {
                let mut shifted = edit[after.len()..].to_vec();
                shifted.extend_from_slice(&after);
                chunks[i - 1].1.extend(after);
                chunks[i].1 = shifted;
                chunks.remove(i + 1);
                changed = true;
            }
        }
        i += 1;
    }
    changed
}

/// Dissolve equalities that are too small to help the reader.
pub(crate) fn semantic(chunks: &mut Vec<Chunk>) {
    let mut changed = false;
    let mut equalities: SmallVec<[usize; 16]> = SmallVec::new();
    let mut last_equality: Option<Vec<char>> = None;
    let (mut inserted_before, mut deleted_before) = (0usize, 0usize);
    let (mut inserted_after, mut deleted_after) = (0usize, 0usize);

    let mut pointer: isize = 0;
    while (pointer as usize) < chunks.len() {
        let at = pointer as usize;
        let (op, len) = (chunks[at].0, chunks[at].1.len());
        if op == Operation::Equal {
            equalities.push(at);
            inserted_before = inserted_after;
            deleted_before = deleted_after;
            inserted_after = 0;
            deleted_after = 0;
            last_equality = Some(chunks[at].1.clone());
        } else {
            if op == Operation::Insert {
                inserted_after += len;
            } else {
                deleted_after += len;
            }
            let dissolve = match (&last_equality, equalities.last()) {
                (Some(text), Some(&position))
                    if text.len() <= inserted_before.max(deleted_before)
                        && text.len() <= inserted_after.max(deleted_after) =>
                {
                    Some(position)
                }
                _ => None,
            };
            if let Some(position) = dissolve {
                let text = last_equality.take().unwrap_or_default();
                // Replace the equality with a deletion and insertion of its text
                chunks.insert(position, (Operation::Delete, text));
                chunks[position + 1].0 = Operation::Insert;
                equalities.pop();
                equalities.pop();
                pointer = equalities.last().map_or(-1, |&p| p as isize);
                inserted_before = 0;
                deleted_before = 0;
                inserted_after = 0;
                deleted_after = 0;
                changed = true;
            }
        }
        pointer += 1;
    }

    if changed {
        merge(chunks);
    }
    align_to_boundaries(chunks);
}

/// Score how natural a split between `left` and `right` is: 6 at the edges,
/// 5 at blank lines, down to 0 inside a word.
fn boundary_score(left: &[char], right: &[char]) -> u8 {
    let (Some(&l), Some(&r)) = (left.last(), right.first()) else {
        return 6;
    };
    let l_non_alnum = !l.is_alphanumeric();
    let r_non_alnum = !r.is_alphanumeric();
    let l_space = l_non_alnum && l.is_whitespace();
    let r_space = r_non_alnum && r.is_whitespace();
    let l_break = l_space && (l == '\n' || l == '\r');
    let r_break = r_space && (r == '\n' || r == '\r');
    let l_blank = l_break && (left.ends_with(&['\n', '\n']) || left.ends_with(&['\n', '\r', '\n']));
    let r_blank = r_break
        && (right.starts_with(&['\n', '\n'])
            || right.starts_with(&['\r', '\n', '\r', '\n'])
            || right.starts_with(&['\n', '\r', '\n'])
            || right.starts_with(&['\r', '\n', '\n']));

    if l_blank || r_blank {
        5
    } else if l_break || r_break {
        4
    } else if l_non_alnum && !l_space && r_space {
        3
    } else if l_space || r_space {
        2
    } else if l_non_alnum || r_non_alnum {
        1
    } else {
        0
    }
}

/// Slide single edits between equalities to the best-scoring boundary,
/// e.g. `The c<at c>ame.` becomes `The <cat >came.`
fn align_to_boundaries(chunks: &mut Vec<Chunk>) {
    let mut removed = false;
    let mut i = 1;
    while i + 1 < chunks.len() {
        if chunks[i - 1].0 == Operation::Equal && chunks[i + 1].0 == Operation::Equal {
            let mut before = chunks[i - 1].1.clone();
            let mut edit = chunks[i].1.clone();
            let mut after = chunks[i + 1].1.clone();

            // Shift the edit as far left as it goes
            let shared = common_suffix(&before, &edit);
            if shared > 0 {
                let moved = edit[edit.len() - shared..].to_vec();
                before.truncate(before.len() - shared);
                edit.truncate(edit.len() - shared);
                let mut shifted = moved.clone();
                shifted.extend(edit);
                edit = shifted;
                let mut next = moved;
                next.extend(after);
                after = next;
            }

            // Then step right one char at a time, keeping the best split
            let mut best = (before.clone(), edit.clone(), after.clone());
            let mut best_score = boundary_score(&before, &edit) + boundary_score(&edit, &after);
            while !edit.is_empty() && !after.is_empty() && edit[0] == after[0] {
                let c = edit.remove(0);
                before.push(c);
                edit.push(after.remove(0));
                let score = boundary_score(&before, &edit) + boundary_score(&edit, &after);
                // Ties go right, so edits end up after the shared text
                if score >= best_score {
                    best_score = score;
                    best = (before.clone(), edit.clone(), after.clone());
                }
            }

            if chunks[i - 1].1 != best.0 {
                let (best_before, best_edit, best_after) = best;
                let mut at = i;
                if best_before.is_empty() {
                    chunks.remove(at - 1);
                    at -= 1;
                    removed = true;
                } else {
                    chunks[at - 1].1 = best_before;
                }
                chunks[at].1 = best_edit;
                if best_after.is_empty() {
                    chunks.remove(at + 1);
                    removed = true;
                } else {
                    chunks[at + 1].1 = best_after;
                }
                i = at;
            }
        }
        i += 1;
    }

    // A vanished equality can leave two runs of the same operation adjacent
    if removed {
        coalesce(chunks);
    }
}

fn coalesce(chunks: &mut Vec<Chunk>) {
    let mut out: Vec<Chunk> = Vec::with_capacity(chunks.len());
    for (op, text) in chunks.drain(..) {
        match out.last_mut() {
            Some((last, run)) if *last == op => run.extend(text),
            _ => out.push((op, text)),
        }
    }
    *chunks = out;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(op: Operation, text: &str) -> Chunk {
        (op, text.chars().collect())
    }

    use Operation::{Delete as D, Equal as E, Insert as I};

    #[test]
    fn test_merge_coalesces_runs() {
        let mut chunks = vec![chunk(E, "a"), chunk(D, "b"), chunk(D, "c"), chunk(E, "d"), chunk(E, "e")];
        merge(&mut chunks);
        assert_eq!(chunks, vec![chunk(E, "a"), chunk(D, "bc"), chunk(E, "de")]);
    }

    #[test]
    fn test_merge_orders_delete_before_insert() {
        let mut chunks = vec![chunk(E, "a"), chunk(I, "x"), chunk(D, "b"), chunk(E, "c")];
        merge(&mut chunks);
        assert_eq!(
            chunks,
            vec![chunk(E, "a"), chunk(D, "b"), chunk(I, "x"), chunk(E, "c")]
        );
    }

    #[test]
    fn test_merge_factors_common_affixes() {
        let mut chunks = vec![chunk(D, "abc"), chunk(I, "abd"), chunk(E, "z")];
        merge(&mut chunks);
        assert_eq!(
            chunks,
            vec![chunk(E, "ab"), chunk(D, "c"), chunk(I, "d"), chunk(E, "z")]
        );

        let mut chunks = vec![chunk(E, "x"), chunk(D, "abc"), chunk(I, "xbc")];
        merge(&mut chunks);
        assert_eq!(
            chunks,
            vec![chunk(E, "x"), chunk(D, "a"), chunk(I, "x"), chunk(E, "bc")]
        );
    }

    #[test]
    fn test_merge_slides_single_edit_left() {
        let mut chunks = vec![chunk(E, "a"), chunk(I, "ba"), chunk(E, "c")];
        merge(&mut chunks);
        assert_eq!(chunks, vec![chunk(I, "ab"), chunk(E, "ac")]);
    }

    #[test]
    fn test_merge_slides_single_edit_right() {
        // Inserting "bc" before "b" reads the same as inserting "cb" after it
        let mut chunks = vec![chunk(E, "a"), chunk(I, "bc"), chunk(E, "b")];
        merge(&mut chunks);
        assert_eq!(chunks, vec![chunk(E, "ab"), chunk(I, "cb")]);
    }

    #[test]
    fn test_semantic_dissolves_small_equality() {
        let mut chunks = vec![chunk(D, "wo"), chunk(I, "the"), chunk(E, "r"), chunk(D, "ld"), chunk(I, "e")];
        semantic(&mut chunks);
        assert_eq!(chunks, vec![chunk(D, "world"), chunk(I, "there")]);
    }

    #[test]
    fn test_semantic_keeps_large_equality() {
        let original = vec![chunk(D, "a"), chunk(E, "shared"), chunk(I, "b")];
        let mut chunks = original.clone();
        semantic(&mut chunks);
        assert_eq!(chunks, original);
    }

    #[test]
    fn test_alignment_prefers_word_boundaries() {
        let mut chunks = vec![chunk(E, "The c"), chunk(I, "at c"), chunk(E, "ame.")];
        align_to_boundaries(&mut chunks);
        assert_eq!(
            chunks,
            vec![chunk(E, "The "), chunk(I, "cat "), chunk(E, "came.")]
        );
    }

    #[test]
    fn test_boundary_scores() {
        let s = |t: &str| t.chars().collect::<Vec<_>>();
        assert_eq!(boundary_score(&s(""), &s("a")), 6);
        assert_eq!(boundary_score(&s("a\n\n"), &s("b")), 5);
        assert_eq!(boundary_score(&s("a\n"), &s("b")), 4);
        assert_eq!(boundary_score(&s("a."), &s(" b")), 3);
        assert_eq!(boundary_score(&s("a "), &s("b")), 2);
        assert_eq!(boundary_score(&s("a-"), &s("b")), 1);
        assert_eq!(boundary_score(&s("ab"), &s("cd")), 0);
    }
}
