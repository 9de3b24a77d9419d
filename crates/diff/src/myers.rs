//! Myers shortest edit script
//!
//! Linear-space variant: each step searches forward and backward at once
//! until the two frontiers meet on a middle snake, then both halves are
//! diffed recursively. Only two frontiers of width O(N+M) are alive at a
//! time. Common prefix and suffix are stripped at every level; failure
//! messages usually differ in a small middle section.
//!
//! Work is bounded by [`MAX_STEPS`] diagonals per script. A pair that runs
//! out of budget is reported as one deletion and one insertion, which is
//! still a valid script.

use crate::{Chunk, Operation};

/// Diagonals visited across one script before the search gives up
pub(crate) const MAX_STEPS: usize = 1 << 22;

/// Length of the common prefix of two sequences
pub(crate) fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Length of the common suffix of two sequences
pub(crate) fn common_suffix(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Edit script turning `a` into `b`, as runs of equal operations.
pub(crate) fn edit_script(a: &[char], b: &[char]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut budget = MAX_STEPS;
    compute(a, b, &mut budget, &mut chunks);
    chunks
}

fn push(out: &mut Vec<Chunk>, op: Operation, text: &[char]) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some((last, run)) if *last == op => run.extend_from_slice(text),
        _ => out.push((op, text.to_vec())),
    }
}

fn compute(a: &[char], b: &[char], budget: &mut usize, out: &mut Vec<Chunk>) {
    let prefix = common_prefix(a, b);
    push(out, Operation::Equal, &a[..prefix]);
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = common_suffix(a, b);
    let a_mid = &a[..a.len() - suffix];
    let b_mid = &b[..b.len() - suffix];

    if a_mid.is_empty() {
        push(out, Operation::Insert, b_mid);
    } else if b_mid.is_empty() {
        push(out, Operation::Delete, a_mid);
    } else {
        match bisect(a_mid, b_mid, budget) {
            Some((x, y)) => {
                compute(&a_mid[..x], &b_mid[..y], budget, out);
                compute(&a_mid[x..], &b_mid[y..], budget, out);
            }
            None => {
                push(out, Operation::Delete, a_mid);
                push(out, Operation::Insert, b_mid);
            }
        }
    }

    push(out, Operation::Equal, &a[a.len() - suffix..]);
}

/// Split point `(x, y)` on the middle snake of two non-empty sequences with
/// no common prefix or suffix. `None` if they share nothing or the budget
/// ran out.
fn bisect(a: &[char], b: &[char], budget: &mut usize) -> Option<(usize, usize)> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max_d = (n + m + 1) / 2;
    let offset = max_d;
    let width = (2 * max_d + 2) as usize;

    // forward[k] = furthest x on diagonal k from the start,
    // reverse[k] = furthest x on diagonal k from the end; -1 if unreached
    let mut forward = vec![-1isize; width];
    let mut reverse = vec![-1isize; width];
    forward[(offset + 1) as usize] = 0;
    reverse[(offset + 1) as usize] = 0;

    let delta = n - m;
    // Odd delta: the frontiers can only meet while extending forward
    let front = delta % 2 != 0;
    let (mut k1_start, mut k1_end, mut k2_start, mut k2_end) = (0isize, 0isize, 0isize, 0isize);

    for d in 0..max_d {
        let mut k1 = -d + k1_start;
        while k1 <= d - k1_end {
            *budget = budget.checked_sub(1)?;
            let i = (offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && forward[i - 1] < forward[i + 1]) {
                forward[i + 1]
            } else {
                forward[i - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            forward[i] = x1;
            if x1 > n {
                k1_end += 2;
            } else if y1 > m {
                k1_start += 2;
            } else if front {
                let j = offset + delta - k1;
                if j >= 0 && (j as usize) < width && reverse[j as usize] != -1 {
                    let x2 = n - reverse[j as usize];
                    if x1 >= x2 {
                        return Some((x1 as usize, y1 as usize));
                    }
                }
            }
            k1 += 2;
        }

        let mut k2 = -d + k2_start;
        while k2 <= d - k2_end {
            *budget = budget.checked_sub(1)?;
            let i = (offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && reverse[i - 1] < reverse[i + 1]) {
                reverse[i + 1]
            } else {
                reverse[i - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n
                && y2 < m
                && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize]
            {
                x2 += 1;
                y2 += 1;
            }
            reverse[i] = x2;
            if x2 > n {
                k2_end += 2;
            } else if y2 > m {
                k2_start += 2;
            } else if !front {
                let j = offset + delta - k2;
                if j >= 0 && (j as usize) < width && forward[j as usize] != -1 {
                    let x1 = forward[j as usize];
                    let y1 = offset + x1 - j;
                    if x1 >= n - x2 {
                        return Some((x1 as usize, y1 as usize));
                    }
                }
            }
            k2 += 2;
        }
    }
    None
}
