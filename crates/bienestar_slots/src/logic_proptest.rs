#[cfg(test)]
mod tests {
    use crate::logic::{aggregate_slots, filter_available, generate_slots, OccupiedSlot};
    use crate::time::TimeOfDay;
    use bienestar_common::WorkingWindow;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    // Helper function to build a window from minute offsets
    fn window(id: usize, start: u32, end: u32) -> WorkingWindow {
        let start = TimeOfDay::from_minutes(start).unwrap();
        let end = TimeOfDay::from_minutes(end).unwrap();
        WorkingWindow::new(
            format!("w{}", id),
            "S1",
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            start.to_string(),
            end.to_string(),
        )
    }

    proptest! {
        // Exact multiples of the increment yield exactly k slots ending one increment early
        #[test]
        fn test_slot_count_for_exact_multiples(
            start in 0u32..1200,
            increment in prop::sample::select(vec![5u32, 10, 15, 20, 30, 45, 60, 90]),
            k in 0u32..12,
        ) {
            let end = start + k * increment;
            prop_assume!(end <= 1440);
            let slots = generate_slots(
                TimeOfDay::from_minutes(start).unwrap(),
                TimeOfDay::from_minutes(end).unwrap(),
                increment,
            );
            prop_assert_eq!(slots.len() as u32, k);
            if k > 0 {
                prop_assert_eq!(slots[slots.len() - 1].minutes(), end - increment);
            }
        }

        // Every slot is aligned to the start and strictly inside the window
        #[test]
        fn test_slots_aligned_and_inside_window(
            start in 0u32..1440,
            len in 0u32..600,
            increment in 1u32..180,
        ) {
            let end = (start + len).min(1440);
            let slots = generate_slots(
                TimeOfDay::from_minutes(start).unwrap(),
                TimeOfDay::from_minutes(end).unwrap(),
                increment,
            );
            for slot in &slots {
                prop_assert!(slot.minutes() >= start);
                prop_assert!(slot.minutes() < end);
                prop_assert_eq!((slot.minutes() - start) % increment, 0);
            }
            prop_assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
        }

        // Aggregation is sorted, duplicate free and a superset of each window's slots
        #[test]
        fn test_aggregate_sorted_unique_union(
            bounds in prop::collection::vec((0u32..1380, 1u32..240), 0..6),
            increment in prop::sample::select(vec![15u32, 30, 60]),
        ) {
            let windows: Vec<WorkingWindow> = bounds
                .iter()
                .enumerate()
                .map(|(i, (start, len))| window(i, *start, (*start + *len).min(1440)))
                .collect();
            let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
            let slots = aggregate_slots(&windows, "S1", date, increment);

            prop_assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
            for (start, len) in &bounds {
                let end = (*start + *len).min(1440);
                for slot in generate_slots(
                    TimeOfDay::from_minutes(*start).unwrap(),
                    TimeOfDay::from_minutes(end).unwrap(),
                    increment,
                ) {
                    prop_assert!(slots.contains(&slot));
                }
            }
        }

        // Filtering keeps order and never returns a slot held by a non-excluded booking
        #[test]
        fn test_filter_is_ordered_subset(
            candidate_minutes in prop::collection::btree_set(0u32..1440, 0..30),
            booked_minutes in prop::collection::vec(0u32..1440, 0..10),
            exclude_first in any::<bool>(),
        ) {
            let candidates: Vec<TimeOfDay> = candidate_minutes
                .iter()
                .map(|m| TimeOfDay::from_minutes(*m).unwrap())
                .collect();
            let occupied: Vec<OccupiedSlot> = booked_minutes
                .iter()
                .enumerate()
                .map(|(i, m)| OccupiedSlot {
                    appointment_id: format!("apt{}", i),
                    time: TimeOfDay::from_minutes(*m).unwrap(),
                })
                .collect();
            let exclude = if exclude_first { Some("apt0") } else { None };

            let free = filter_available(&candidates, &occupied, exclude);

            prop_assert!(free.windows(2).all(|pair| pair[0] < pair[1]));
            for slot in &free {
                prop_assert!(candidates.contains(slot));
                prop_assert!(!occupied
                    .iter()
                    .any(|o| o.time == *slot && Some(o.appointment_id.as_str()) != exclude));
            }
            // Anything free without an exclusion stays free with one
            let strict = filter_available(&candidates, &occupied, None);
            for slot in &strict {
                prop_assert!(free.contains(slot));
            }
        }
    }
}
