//! The analysis result handed to the automation layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::ViewportInfo;
use crate::error::SnapshotError;
use crate::registry::ElementRecord;

/// Capture metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub captured_at: DateTime<Utc>,
    pub element_count: usize,
    pub viewport: ViewportInfo,
}

/// Text snapshot plus the machine-addressable element map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub elements: BTreeMap<String, ElementRecord>,
    /// Line-oriented snapshot, two-space indentation per level.
    pub snapshot: String,
    pub metadata: SnapshotMetadata,
}

impl PageSnapshot {
    /// Snapshot wrapped for inclusion in an agent prompt.
    pub fn formatted(&self) -> String {
        ["- Page Snapshot", "```yaml", self.snapshot.as_str(), "```"].join("\n")
    }

    /// Unified diff against a previous snapshot text, 3 lines of context.
    pub fn diff_against(&self, previous: &str) -> String {
        let old: Vec<&str> = previous.lines().collect();
        let new: Vec<&str> = self.snapshot.lines().collect();
        if old == new {
            return "- Page Snapshot (no structural changes)".to_string();
        }

        let mut out = vec![
            "- Page Snapshot (diff)".to_string(),
            "```diff".to_string(),
            "--- prev".to_string(),
            "+++ curr".to_string(),
        ];
        out.extend(unified_hunks(&old, &new, DIFF_CONTEXT));
        out.push("```".to_string());
        out.join("\n")
    }

    /// Refs mentioned in the text snapshot, in order of appearance.
    pub fn refs_in_text(&self) -> Vec<String> {
        extract_refs(&self.snapshot)
    }

    pub fn element(&self, ref_id: &str) -> Option<&ElementRecord> {
        self.elements.get(ref_id)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Every `[ref=...]` token in a snapshot text. Quoted names and text are
/// skipped, so a literal `[ref=` inside a label is not a ref.
pub fn extract_refs(text: &str) -> Vec<String> {
    const MARKER: &str = "[ref=";
    let mut refs = Vec::new();
    for line in text.lines() {
        let bytes = line.as_bytes();
        let mut quoted = false;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if quoted => {
                    i += 2;
                    continue;
                }
                b'"' => quoted = !quoted,
                b'[' if !quoted && line[i..].starts_with(MARKER) => {
                    let after = &line[i + MARKER.len()..];
                    let Some(end) = after.find(']') else {
                        break;
                    };
                    refs.push(after[..end].to_string());
                    i += MARKER.len() + end;
                }
                _ => {}
            }
            i += 1;
        }
    }
    refs
}

const DIFF_CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Equal,
    Delete,
    Insert,
}

/// Shortest edit script turning `old` into `new`, one entry per line.
///
/// Common prefix and suffix are matched directly; the middle runs Myers'
/// greedy algorithm, so memory scales with edit distance times length, not
/// with the product of both lengths.
fn edit_script<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<(Edit, &'a str)> {
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut script: Vec<(Edit, &str)> = old[..prefix].iter().map(|l| (Edit::Equal, *l)).collect();
    script.extend(myers(old_mid, new_mid));
    script.extend(old[old.len() - suffix..].iter().map(|l| (Edit::Equal, *l)));
    script
}

fn myers<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<(Edit, &'a str)> {
    let (n, m) = (a.len() as isize, b.len() as isize);
    if n == 0 || m == 0 {
        let mut script: Vec<(Edit, &str)> = a.iter().map(|l| (Edit::Delete, *l)).collect();
        script.extend(b.iter().map(|l| (Edit::Insert, *l)));
        return script;
    }

    let max = n + m;
    let offset = max;
    let at = |k: isize| (k + offset) as usize;
    let mut v = vec![0isize; 2 * max as usize + 2];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'search: for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            // Prefer extending a deletion so removals print before insertions.
            let mut x = if k == -d || (k != d && v[at(k - 1)] < v[at(k + 1)]) {
                v[at(k + 1)]
            } else {
                v[at(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[at(k)] = x;
            if x >= n && y >= m {
                break 'search;
            }
            k += 2;
        }
    }

    let mut script = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if k == -d || (k != d && v[at(k - 1)] < v[at(k + 1)]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[at(prev_k)];
        let prev_y = prev_x - prev_k;
        while x > prev_x && y > prev_y {
            script.push((Edit::Equal, a[(x - 1) as usize]));
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                script.push((Edit::Insert, b[(y - 1) as usize]));
            } else {
                script.push((Edit::Delete, a[(x - 1) as usize]));
            }
        }
        x = prev_x;
        y = prev_y;
    }
    script.reverse();
    script
}

/// `@@ -a,b +c,d @@` hunks with `context` unchanged lines around each change.
/// Changes separated by at most `2 * context` unchanged lines share a hunk.
fn unified_hunks(old: &[&str], new: &[&str], context: usize) -> Vec<String> {
    let script = edit_script(old, new);

    // Line positions in old/new before each script entry.
    let mut positions = Vec::with_capacity(script.len() + 1);
    let (mut o, mut n) = (0usize, 0usize);
    for (edit, _) in &script {
        positions.push((o, n));
        match edit {
            Edit::Equal => {
                o += 1;
                n += 1;
            }
            Edit::Delete => o += 1,
            Edit::Insert => n += 1,
        }
    }
    positions.push((o, n));

    let changes: Vec<usize> = script
        .iter()
        .enumerate()
        .filter(|(_, (edit, _))| *edit != Edit::Equal)
        .map(|(i, _)| i)
        .collect();

    let mut groups: Vec<(usize, usize)> = Vec::new();
    for &i in &changes {
        match groups.last_mut() {
            Some((_, last)) if i - *last <= 2 * context + 1 => *last = i,
            _ => groups.push((i, i)),
        }
    }

    let mut out = Vec::new();
    for (first, last) in groups {
        let start = first.saturating_sub(context);
        let end = (last + context + 1).min(script.len());
        let (old_start, new_start) = positions[start];
        let (old_end, new_end) = positions[end];
        out.push(format!(
            "@@ -{} +{} @@",
            hunk_range(old_start, old_end - old_start),
            hunk_range(new_start, new_end - new_start)
        ));
        for (edit, line) in &script[start..end] {
            let sign = match edit {
                Edit::Equal => ' ',
                Edit::Delete => '-',
                Edit::Insert => '+',
            };
            out.push(format!("{}{}", sign, line));
        }
    }
    out
}

/// 1-based `start,len` as unified diff prints it; a single line omits the length.
fn hunk_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
