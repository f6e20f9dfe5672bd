use super::resolve_conflicts::ConflictEntry;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Orders entries by barycenter. Entries without one keep their original index `i` and are
/// slotted back in at that position. Ties go to the lower index, or to the higher one when
/// `bias_right` is set.
pub fn sort(entries: Vec<ConflictEntry>, bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<ConflictEntry>, Vec<ConflictEntry>) =
        entries.into_iter().partition(|e| e.barycenter.is_some());

    // Popped from the back, smallest index first.
    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| {
        let (ab, bb) = (a.barycenter.unwrap_or(0.0), b.barycenter.unwrap_or(0.0));
        match ab.partial_cmp(&bb) {
            Some(Ordering::Less) => Ordering::Less,
            Some(Ordering::Greater) => Ordering::Greater,
            _ if bias_right => b.i.cmp(&a.i),
            _ => a.i.cmp(&b.i),
        }
    });

    let mut vs: Vec<String> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut vs_index = consume_unsortable(&mut vs, &mut unsortable, 0);

    for entry in sortable {
        vs_index += entry.vs.len();
        vs.extend(entry.vs);
        let w = entry.weight.unwrap_or(0.0);
        sum += entry.barycenter.unwrap_or(0.0) * w;
        weight += w;
        vs_index = consume_unsortable(&mut vs, &mut unsortable, vs_index);
    }
    // Whatever is left had an index past the end.
    for entry in unsortable.into_iter().rev() {
        vs.extend(entry.vs);
    }

    if weight > 0.0 {
        SortResult {
            vs,
            barycenter: Some(sum / weight),
            weight: Some(weight),
        }
    } else {
        SortResult {
            vs,
            barycenter: None,
            weight: None,
        }
    }
}

fn consume_unsortable(
    vs: &mut Vec<String>,
    unsortable: &mut Vec<ConflictEntry>,
    mut index: usize,
) -> usize {
    while unsortable.last().is_some_and(|last| last.i <= index) {
        if let Some(last) = unsortable.pop() {
            vs.extend(last.vs);
            index += 1;
        }
    }
    index
}
