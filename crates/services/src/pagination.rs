// Path: crates/services/src/pagination.rs
//! Offset pagination over prefix scans and in-memory lists.

use pulsar_api::state::StateAccess;
use pulsar_types::app::{Page, PageRequest, PageResponse};
use pulsar_types::error::StateError;

/// Pages through every entry under `prefix` in key order. `decode` receives
/// the key with the prefix stripped, and the raw value.
pub(crate) fn paginate_prefix<T, F>(
    state: &dyn StateAccess,
    prefix: &[u8],
    page: &PageRequest,
    mut decode: F,
) -> Result<Page<T>, StateError>
where
    F: FnMut(&[u8], &[u8]) -> Result<T, StateError>,
{
    let limit = page.effective_limit();
    let mut items = Vec::new();
    let mut seen = 0u64;
    let mut has_more = false;

    for entry in state.prefix_scan(prefix)? {
        let (key, value) = entry?;
        let position = seen;
        seen += 1;
        if position < page.offset {
            continue;
        }
        if (items.len() as u64) < limit {
            let suffix = key.get(prefix.len()..).unwrap_or_default();
            items.push(decode(suffix, &value)?);
            continue;
        }
        has_more = true;
        if !page.count_total {
            break;
        }
    }

    Ok(Page {
        pagination: PageResponse {
            next_offset: has_more.then(|| page.offset + items.len() as u64),
            total: page.count_total.then_some(seen),
        },
        items,
    })
}

/// Pages through an already materialized list.
pub(crate) fn paginate_slice<T: Clone>(all: &[T], page: &PageRequest) -> Page<T> {
    let total = all.len() as u64;
    let start = page.offset.min(total);
    let end = start.saturating_add(page.effective_limit()).min(total);
    let items = all
        .get(start as usize..end as usize)
        .map(<[T]>::to_vec)
        .unwrap_or_default();
    Page {
        pagination: PageResponse {
            next_offset: (end < total).then_some(end),
            total: page.count_total.then_some(total),
        },
        items,
    }
}
