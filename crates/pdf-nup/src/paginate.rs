//! Grouping of source items into output sheets

use crate::types::ItemsPerSheet;

/// Split items into consecutive groups, one per output sheet.
///
/// Every group holds `items_per_sheet` items except possibly the last.
/// Input order is preserved and zero items give zero groups.
pub fn paginate<T>(items: &[T], items_per_sheet: ItemsPerSheet) -> Vec<&[T]> {
    items.chunks(items_per_sheet.get()).collect()
}

/// Number of sheets needed for `item_count` items.
pub fn sheet_count(item_count: usize, items_per_sheet: ItemsPerSheet) -> usize {
    item_count.div_ceil(items_per_sheet.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_sizes_and_order() {
        for len in 0..45usize {
            let items: Vec<usize> = (0..len).collect();
            for k in 1..=20u32 {
                let ips = ItemsPerSheet::new(k).unwrap();
                let groups = paginate(&items, ips);

                assert_eq!(groups.len(), len.div_ceil(k as usize));
                assert_eq!(groups.len(), sheet_count(len, ips));

                if let Some((last, full)) = groups.split_last() {
                    assert!(full.iter().all(|g| g.len() == k as usize));
                    assert!(!last.is_empty() && last.len() <= k as usize);
                }

                let flattened: Vec<usize> = groups.concat();
                assert_eq!(flattened, items);
            }
        }
    }

    #[test]
    fn test_five_items_two_per_sheet() {
        let items = ["a", "b", "c", "d", "e"];
        let groups = paginate(&items, ItemsPerSheet::new(2).unwrap());
        assert_eq!(groups, vec![&["a", "b"][..], &["c", "d"][..], &["e"][..]]);
    }

    #[test]
    fn test_no_items_no_groups() {
        let items: [u8; 0] = [];
        assert!(paginate(&items, ItemsPerSheet::default()).is_empty());
    }
}
