#![no_std]

//! Helpers for array-style HID reports, where every pressed usage occupies one slot and a zero
//! (default) value marks a free slot.

/// Places `usage` into the first free slot.
///
/// Returns `true` if the usage is present in the slots after the call (either it was already
/// pressed, or a free slot was found). Returns `false` if every slot is taken.
pub fn insert_slot<T: Copy + Default + PartialEq>(slots: &mut [T], usage: T) -> bool {
    if usage == T::default() {
        return false;
    }

    for slot in slots.iter_mut() {
        if *slot == usage {
            return true;
        }

        if *slot == T::default() {
            *slot = usage;
            return true;
        }
    }

    false
}

/// Clears every slot holding `usage`, then compacts the remaining slots.
///
/// Returns `true` if at least one slot was cleared.
pub fn remove_slot<T: Copy + Default + PartialEq>(slots: &mut [T], usage: T) -> bool {
    let mut found = false;

    // Check all positions in case the usage is present more than once (which it shouldn't be)
    for slot in slots.iter_mut() {
        if *slot == usage {
            *slot = T::default();
            found = true;
        }
    }

    if found {
        sort_slots(slots);
    }

    found
}

// Rearranges the slots so that the free (= default) slots are at the
// end of the list - some hosts stop reading usages at the first
// occurence of a free slot.
//
// So (0x00)(0x01)(0x00)(0x03)(0x02)(0x00) becomes
//    (0x02)(0x01)(0x03)(0x00)(0x00)(0x00)
//
// Does not care about the order of non-free slots.
pub fn sort_slots<T: Copy + Default + PartialEq>(slots: &mut [T]) {
    if slots.is_empty() {
        return;
    }

    let free = T::default();
    let mut front_idx = 0;
    let mut back_idx = slots.len() - 1;

    while front_idx < back_idx {
        if slots[front_idx] == free {
            // Search for a non-free slot, starting at the back of the list.
            while slots[back_idx] == free && back_idx > front_idx {
                back_idx -= 1;
            }

            slots.swap(front_idx, back_idx);
        }
        front_idx += 1;
    }
}

/// Returns `true` if the usage is present in any slot.
pub fn contains_slot<T: Copy + Default + PartialEq>(slots: &[T], usage: T) -> bool {
    usage != T::default() && slots.iter().any(|&slot| slot == usage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_slots() {
        let mut unsorted = [0x00u8, 0x01, 0x00, 0x03, 0x02, 0x00];
        let expected = [0x02, 0x01, 0x03, 0x00, 0x00, 0x00];

        sort_slots(&mut unsorted);

        assert_eq!(unsorted, expected);

        let mut unsorted = [0x01u8, 0x00, 0x00, 0x03, 0x00, 0x02];
        let expected = [0x01, 0x02, 0x03, 0x00, 0x00, 0x00];

        sort_slots(&mut unsorted);

        assert_eq!(unsorted, expected);

        let mut unsorted = [0x00u8, 0x00, 0x00, 0x03, 0x01, 0x02];
        let expected = [0x02, 0x01, 0x03, 0x00, 0x00, 0x00];

        sort_slots(&mut unsorted);

        assert_eq!(unsorted, expected);

        let mut empty: [u16; 0] = [];
        sort_slots(&mut empty);
    }

    #[test]
    fn test_insert_slot() {
        let mut slots = [0u16; 4];

        assert!(insert_slot(&mut slots, 0x00e9));
        assert!(insert_slot(&mut slots, 0x00ea));
        // already present, no duplicate
        assert!(insert_slot(&mut slots, 0x00e9));
        assert_eq!(slots, [0x00e9, 0x00ea, 0, 0]);

        assert!(insert_slot(&mut slots, 0x00cd));
        assert!(insert_slot(&mut slots, 0x0223));
        assert!(!insert_slot(&mut slots, 0x0224));
        assert!(!insert_slot(&mut slots, 0));
    }

    #[test]
    fn test_remove_slot() {
        let mut slots = [0x04u8, 0x05, 0x06, 0, 0, 0];

        assert!(remove_slot(&mut slots, 0x04));
        assert_eq!(slots, [0x06, 0x05, 0, 0, 0, 0]);
        assert!(!remove_slot(&mut slots, 0x04));
        assert!(contains_slot(&slots, 0x05));
        assert!(!contains_slot(&slots, 0x00));
    }
}
