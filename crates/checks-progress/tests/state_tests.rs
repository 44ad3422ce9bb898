use checks_progress::{ModePreference, ProgressState, Transition};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Next,
    Prev,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Next), Just(Op::Prev)]
}

fn arb_preference() -> impl Strategy<Value = ModePreference> {
    prop_oneof![
        Just(ModePreference::Inherit),
        Just(ModePreference::ForceStepByStep),
        Just(ModePreference::ForceFullList),
    ]
}

#[test]
fn test_walk_to_the_end_and_back() {
    let mut state = ProgressState::new();
    for expected in 1..=3 {
        assert_eq!(state.next_step(3).target(), Some(expected));
    }
    assert_eq!(state.next_step(3), Transition::AtBound);

    for expected in (0..3).rev() {
        assert_eq!(state.prev_step().target(), Some(expected));
    }
    assert_eq!(state.prev_step(), Transition::AtBound);
}

#[test]
fn test_pages_are_independent_of_steps() {
    let mut state = ProgressState::new();
    let _ = state.next_page(4);
    assert_eq!(state.page_index(), 1);
    assert_eq!(state.step_index(), 0);
}

proptest! {
    #[test]
    fn prop_step_index_stays_in_bounds(
        max_index in 0usize..20,
        ops in prop::collection::vec(arb_op(), 0..100),
    ) {
        let mut state = ProgressState::new();
        for op in ops {
            let before = state.step_index();
            let transition = match op {
                Op::Next => state.next_step(max_index),
                Op::Prev => state.prev_step(),
            };
            prop_assert!(state.step_index() <= max_index);
            if !transition.changed() {
                prop_assert_eq!(state.step_index(), before);
            }
        }
    }

    #[test]
    fn prop_prev_at_zero_is_noop(count in 1usize..10) {
        let mut state = ProgressState::new();
        for _ in 0..count {
            prop_assert_eq!(state.prev_step(), Transition::AtBound);
            prop_assert_eq!(state.step_index(), 0);
        }
    }

    #[test]
    fn prop_reset_clears_progress_and_keeps_preferences(
        steps in 0usize..10,
        pages in 0usize..10,
        checked in prop::collection::btree_set(0usize..50, 0..10),
        preference in arb_preference(),
        voice in any::<bool>(),
    ) {
        let mut state = ProgressState::new();
        for _ in 0..steps {
            let _ = state.next_step(20);
        }
        for _ in 0..pages {
            let _ = state.next_page(20);
        }
        state.set_checked(checked);
        state.set_mode_preference(preference);
        state.set_voice_control(voice);

        state.reset();

        prop_assert_eq!(state.step_index(), 0);
        prop_assert_eq!(state.page_index(), 0);
        prop_assert!(state.checked().is_empty());
        prop_assert_eq!(state.mode_preference(), preference);
        prop_assert_eq!(state.voice_control(), voice);
    }

    #[test]
    fn prop_shrinking_bound_clamps(start in 0usize..30, max_page in 0usize..30) {
        let mut state = ProgressState::new();
        let _ = state.set_page(start, 30);
        let _ = state.clamp_page(max_page);
        prop_assert!(state.page_index() <= max_page);
        prop_assert_eq!(state.page_index(), start.min(max_page));
    }
}
