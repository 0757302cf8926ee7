use biztrail_game::{
    DefaultSeed, EffectVector, EventCatalog, EventDefinition, EventOption, Metric, Mood,
    QuizDeck, QuizSession, ResultSummary, SessionError, SessionPhase, SimulationEngine,
    SimulationSession, SimulationState, StaticCatalog, TerminalReason, advisories, apply,
    profit_trend,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn engine() -> SimulationEngine<StaticCatalog, DefaultSeed> {
    SimulationEngine::new(StaticCatalog, DefaultSeed)
}

fn in_percent_range(state: &SimulationState) -> bool {
    [
        state.customer_satisfaction,
        state.product_quality,
        state.marketing_efficiency,
        state.market_share,
        state.competitor_pressure,
    ]
    .iter()
    .all(|value| (0.0..=100.0).contains(value))
}

#[test]
fn random_playthroughs_hold_invariants() {
    for seed in 0..20_u64 {
        let mut session = engine().create_session(seed).unwrap();
        let mut picker = ChaCha20Rng::seed_from_u64(seed ^ 0x5EED);
        let mut previous_event: Option<String> = None;

        for turn in 1..=120_usize {
            if session.phase() == SessionPhase::Ended {
                break;
            }
            let event = session.current_event().unwrap().clone();
            assert_ne!(previous_event.as_deref(), Some(event.id.as_str()));
            let month_before = session.state().month;
            let expected = apply(session.state(), &event.options[0].effect);

            let choice = picker.gen_range(0..event.options.len());
            let outcome = session.choose(choice).unwrap();

            assert_eq!(outcome.month, month_before);
            assert_eq!(session.state().month, month_before + 1);
            assert_eq!(session.history().len(), turn);
            assert!(in_percent_range(session.state()));
            if choice == 0 {
                assert_eq!(*session.state(), expected);
            }
            let ended = session.state().is_terminal();
            assert_eq!(outcome.ended(), ended);
            previous_event = Some(event.id);
        }

        if let Some(summary) = ResultSummary::from_session(&session) {
            assert_eq!(summary.decisions, session.history().len());
            assert_eq!(summary.mood, Mood::Dead);
        }
    }
}

#[test]
fn reckless_spending_runs_out_of_cash() {
    let spend = EventOption::new(
        "Expand everywhere",
        EffectVector::new()
            .with(Metric::Cash, -300_000.0)
            .with(Metric::Expenses, 20.0),
    );
    let save = EventOption::new("Sit tight", EffectVector::new());
    let events = ["offices", "ads"]
        .into_iter()
        .map(|id| EventDefinition {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            options: vec![spend.clone(), save.clone()],
        })
        .collect();
    let catalog = EventCatalog::new(events).unwrap();

    let mut session = SimulationSession::new(catalog, 77);
    session.start(SimulationState::default());
    let mut turns = 0;
    while session.phase() == SessionPhase::Active {
        session.choose(0).unwrap();
        turns += 1;
        assert!(turns < 10, "session should end quickly");
    }

    assert_eq!(session.terminal_reason(), Some(TerminalReason::CashDepleted));
    assert!(matches!(
        session.choose(0),
        Err(SessionError::InvalidState { .. })
    ));
    let summary = ResultSummary::from_session(&session).unwrap();
    assert_eq!(summary.headline, "Your company ran out of cash!");
    assert!(summary.final_cash <= 0.0);

    engine().restart_session(&mut session).unwrap();
    assert_eq!(session.phase(), SessionPhase::Active);
    assert_eq!(session.state().month, 1);
    assert!(session.history().is_empty());
}

#[test]
fn trend_follows_history() {
    let mut session = engine().create_session(3).unwrap();
    assert!((profit_trend(session.seed_state(), session.history()) - 10.0).abs() < 1e-9);

    session.choose(1).unwrap();
    let seed_profit = session.seed_state().profit();
    let now_profit = session.state().profit();
    let expected = (now_profit - seed_profit) / seed_profit.abs() * 100.0;
    let trend = profit_trend(session.seed_state(), session.history());
    assert!((trend - expected).abs() < 1e-9);
    assert!(advisories(session.state()).is_empty());
}

#[test]
fn small_customer_base_churns_out() {
    let events = ["standup", "retro"]
        .into_iter()
        .map(|id| EventDefinition {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            options: vec![
                EventOption::new("Carry on", EffectVector::new()),
                EventOption::new("Also carry on", EffectVector::new()),
            ],
        })
        .collect();
    let catalog = EventCatalog::new(events).unwrap();

    let mut session = SimulationSession::new(catalog, 12);
    session.start(SimulationState {
        customers: 20,
        ..SimulationState::default()
    });
    while session.is_active() {
        session.choose(0).unwrap();
        assert!(session.history().len() < 400, "customers never churned out");
    }

    assert_eq!(session.terminal_reason(), Some(TerminalReason::CustomersLost));
    let summary = ResultSummary::from_session(&session).unwrap();
    assert_eq!(summary.final_customers, 0);
    assert_eq!(
        summary.headline,
        "Your customer base has completely churned!"
    );
}

#[test]
fn quiz_round_scores_recommended_answers() {
    let mut quiz = QuizSession::new(QuizDeck::load_standard().unwrap(), 2024);
    let mut expected = 0;
    let mut turn = 0;
    while let Some(question) = quiz.current() {
        // Alternate between the recommended option and a wrong one.
        let pick = if turn % 2 == 0 {
            expected += 10;
            question.correct
        } else {
            (question.correct + 1) % question.event.options.len()
        };
        quiz.answer(pick).unwrap();
        turn += 1;
    }
    assert_eq!(turn, 10);
    assert_eq!(quiz.final_score(), Some(expected));
    assert_eq!(quiz.final_score(), Some(50));
}
