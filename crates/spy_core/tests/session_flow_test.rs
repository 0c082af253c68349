//! End-to-end tests for the session state machine.

use chrono::{Duration, TimeZone, Utc};
use spy_core::{
    Dealer, Event, HISTORY_CAP, ScriptedEntropy, SessionState, SpyError, Verdict, View, WordBank,
    decode, encode,
};

fn dealer(spy_index: usize) -> Dealer<ScriptedEntropy> {
    Dealer::new(WordBank::default(), ScriptedEntropy::new(vec![spy_index]))
}

fn step(state: &SessionState, event: Event, dealer: &mut Dealer<ScriptedEntropy>) -> SessionState {
    state
        .apply(event.clone(), dealer)
        .unwrap_or_else(|e| panic!("{} rejected in {}: {}", event.name(), state.view(), e))
}

/// Drives a fresh session up to the results screen with the given spy.
fn to_results(names: &str, spy_index: usize) -> (SessionState, Dealer<ScriptedEntropy>) {
    let mut dealer = dealer(spy_index);
    let mut state = SessionState::new();
    for event in [
        Event::SubmitRoster { names: names.to_string() },
        Event::ConfirmRoster,
        Event::SelectWord { word: "Faro".to_string() },
    ] {
        state = step(&state, event, &mut dealer);
    }
    while *state.view() == View::Reveal {
        state = step(&state, Event::RevealNext, &mut dealer);
    }
    state = step(&state, Event::EndRound, &mut dealer);
    (state, dealer)
}

fn scores(state: &SessionState) -> Vec<f64> {
    state.players().iter().map(|p| *p.score()).collect()
}

#[test]
fn test_roster_with_duplicates_reaches_preview() {
    let mut dealer = dealer(0);
    let state = step(
        &SessionState::new(),
        Event::SubmitRoster { names: "Ana, Ana, Ana".to_string() },
        &mut dealer,
    );
    let names: Vec<&str> = state.players().iter().map(|p| p.name().as_str()).collect();
    assert_eq!(names, vec!["Ana", "Ana (2)", "Ana (3)"]);
    assert_eq!(*state.view(), View::PlayerPreview);
}

#[test]
fn test_reveal_lands_in_progress_after_last_ack() {
    let mut dealer = dealer(0);
    let mut state = SessionState::new();
    for event in [
        Event::SubmitRoster { names: "a, b, c, d, e".to_string() },
        Event::ConfirmRoster,
        Event::SelectWord { word: String::new() },
    ] {
        state = step(&state, event, &mut dealer);
    }

    for i in 0..5 {
        state = step(&state, Event::Reveal, &mut dealer);
        assert_eq!(*state.view(), View::Reveal);
        state = step(&state, Event::Acknowledge, &mut dealer);
        let round = state.current_round().as_ref().unwrap();
        assert_eq!(*round.reveal_index(), i + 1);
        if i < 4 {
            assert_eq!(*state.view(), View::Reveal);
        }
    }
    assert_eq!(*state.view(), View::InProgress);
}

#[test]
fn test_scoring_spy_found_without_guess() {
    let (state, mut dealer) = to_results("a, b, c, d", 2);
    let spy = *state.players()[2].id();
    let state = step(
        &state,
        Event::SettleRound { verdict: Some(Verdict::Accused(spy)), spy_guessed: false },
        &mut dealer,
    );
    assert_eq!(scores(&state), vec![0.5, 0.5, 0.0, 0.5]);
    assert_eq!(*state.view(), View::Leaderboard);
    assert!(state.current_round().is_none());
}

#[test]
fn test_scoring_nobody_accused_spy_guessed() {
    let (state, mut dealer) = to_results("a, b, c, d", 0);
    let state = step(
        &state,
        Event::SettleRound { verdict: Some(Verdict::Nobody), spy_guessed: true },
        &mut dealer,
    );
    assert_eq!(scores(&state), vec![4.0, 0.0, 0.0, 0.0]);
    let entry = state.history().latest().unwrap();
    assert_eq!(entry.spy_name(), "a");
    assert_eq!(*entry.accused_name(), None);
}

#[test]
fn test_scoring_spy_found_and_guessed() {
    let (state, mut dealer) = to_results("a, b, c, d", 3);
    let spy = *state.players()[3].id();
    let state = step(
        &state,
        Event::SettleRound { verdict: Some(Verdict::Accused(spy)), spy_guessed: true },
        &mut dealer,
    );
    assert_eq!(scores(&state), vec![0.5, 0.5, 0.5, 4.0]);
}

#[test]
fn test_missing_verdict_leaves_state() {
    let (state, mut dealer) = to_results("a, b, c", 0);
    let result = state.apply(Event::SettleRound { verdict: None, spy_guessed: true }, &mut dealer);
    assert_eq!(result, Err(SpyError::MissingVerdict));
    assert_eq!(*state.view(), View::Results);
}

#[test]
fn test_history_keeps_latest_fifty() {
    let (mut state, mut dealer) = to_results("a, b, c", 1);
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 20, 0, 0).unwrap();

    for round in 0..55 {
        if round > 0 {
            state = step(&state, Event::NewRound, &mut dealer);
            state = step(&state, Event::SelectWord { word: format!("w{}", round) }, &mut dealer);
            while *state.view() == View::Reveal {
                state = step(&state, Event::RevealNext, &mut dealer);
            }
            state = step(&state, Event::EndRound, &mut dealer);
        }
        state = state
            .apply_at(
                Event::SettleRound { verdict: Some(Verdict::Nobody), spy_guessed: false },
                &mut dealer,
                start + Duration::minutes(round),
            )
            .unwrap();
    }

    let history = state.history().entries();
    assert_eq!(history.len(), HISTORY_CAP);
    assert_eq!(history[0].word(), "w54");
    assert_eq!(history[HISTORY_CAP - 1].word(), "w5");
    assert!(history.windows(2).all(|w| w[0].timestamp() > w[1].timestamp()));
}

#[test]
fn test_new_round_keeps_scores() {
    let (state, mut dealer) = to_results("a, b, c", 0);
    let state = step(
        &state,
        Event::SettleRound { verdict: Some(Verdict::Nobody), spy_guessed: true },
        &mut dealer,
    );
    let next = step(&state, Event::NewRound, &mut dealer);
    assert_eq!(*next.view(), View::WordSelect);
    assert_eq!(next.players(), state.players());
    assert_eq!(next.history(), state.history());
}

#[test]
fn test_edit_with_reset_zeroes_scores_and_history() {
    let (state, mut dealer) = to_results("a, b, c", 0);
    let state = step(
        &state,
        Event::SettleRound { verdict: Some(Verdict::Nobody), spy_guessed: true },
        &mut dealer,
    );

    let reset = step(&state, Event::EditWithResetChoice { reset: true }, &mut dealer);
    assert_eq!(*reset.view(), View::Setup);
    assert_eq!(scores(&reset), vec![0.0, 0.0, 0.0]);
    assert!(reset.history().is_empty());
    assert_eq!(reset.roster_input(), "a, b, c");

    let kept = step(&state, Event::EditWithResetChoice { reset: false }, &mut dealer);
    assert_eq!(*kept.view(), View::Setup);
    assert_eq!(kept.players(), state.players());
    assert_eq!(kept.history().len(), 1);
}

#[test]
fn test_full_reset_from_any_view() {
    let (state, mut dealer) = to_results("a, b, c", 0);
    let once = step(&state, Event::FullReset, &mut dealer);
    let twice = step(&once, Event::FullReset, &mut dealer);
    assert_eq!(once, SessionState::default());
    assert_eq!(twice, once);
}

#[test]
fn test_every_reachable_state_round_trips() {
    let mut dealer = dealer(1);
    let mut state = SessionState::new();
    let mut seen = vec![state.clone()];

    let mut script = vec![
        Event::SubmitRoster { names: "a, b, c".to_string() },
        Event::EditRoster,
        Event::SubmitRoster { names: "a, b, c".to_string() },
        Event::ConfirmRoster,
        Event::SelectWord { word: String::new() },
    ];
    script.extend(std::iter::repeat_n(Event::RevealNext, 6));
    script.push(Event::EndRound);

    for event in script {
        state = step(&state, event, &mut dealer);
        seen.push(state.clone());
    }
    let spy = *state.current_round().as_ref().unwrap().spy_id();
    state = step(
        &state,
        Event::SettleRound { verdict: Some(Verdict::Accused(spy)), spy_guessed: true },
        &mut dealer,
    );
    seen.push(state);

    for state in seen {
        let restored = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(restored, state, "round trip failed in {}", state.view());
    }
}

#[test]
fn test_events_in_wrong_view_do_not_change_state() {
    let (state, mut dealer) = to_results("a, b, c", 0);
    for event in [
        Event::ConfirmRoster,
        Event::RevealNext,
        Event::NewRound,
        Event::SelectWord { word: "Faro".to_string() },
    ] {
        assert!(matches!(
            state.apply(event, &mut dealer),
            Err(SpyError::WrongView { view: View::Results, .. })
        ));
    }
}
