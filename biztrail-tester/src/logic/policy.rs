use std::fmt;

use biztrail_game::numbers::i64_to_f64;
use biztrail_game::{EffectVector, EventDefinition, SimulationState, apply};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub option_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(option_index: usize, rationale: Option<String>) -> Self {
        Self {
            option_index,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select an option for the scenario on screen.
    fn pick_option(&mut self, state: &SimulationState, event: &EventDefinition) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameplayStrategy {
    Conservative,
    Aggressive,
    Balanced,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [
        Self::Conservative,
        Self::Aggressive,
        Self::Balanced,
        Self::Random,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Conservative => "Conservative",
            GameplayStrategy::Aggressive => "Aggressive",
            GameplayStrategy::Balanced => "Balanced",
            GameplayStrategy::Random => "Random",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            GameplayStrategy::Conservative => "protect cash and avoid negative swings",
            GameplayStrategy::Aggressive => "chase revenue, customers and share",
            GameplayStrategy::Balanced => "growth minus risk",
            GameplayStrategy::Random => "uniform pick from a seeded stream",
        }
    }

    /// Parse a CLI token, case-insensitively.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label().eq_ignore_ascii_case(token.trim()))
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::Conservative => Box::new(ConservativePolicy),
            GameplayStrategy::Aggressive => Box::new(AggressivePolicy),
            GameplayStrategy::Balanced => Box::new(BalancedPolicy),
            GameplayStrategy::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct ConservativePolicy;
struct AggressivePolicy;
struct BalancedPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for ConservativePolicy {
    fn name(&self) -> &'static str {
        "Conservative"
    }

    fn pick_option(&mut self, state: &SimulationState, event: &EventDefinition) -> PolicyDecision {
        let (idx, risk) = best_by(state, event, |projection| -projection.risk());
        PolicyDecision::new(idx, Some(format!("risk {:.1}", -risk)))
    }
}

impl PlayerPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "Aggressive"
    }

    fn pick_option(&mut self, state: &SimulationState, event: &EventDefinition) -> PolicyDecision {
        let (idx, reward) = best_by(state, event, Projection::reward);
        PolicyDecision::new(idx, Some(format!("reward {reward:.1}")))
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn pick_option(&mut self, state: &SimulationState, event: &EventDefinition) -> PolicyDecision {
        let (idx, score) = best_by(state, event, |projection| {
            projection.reward() - projection.risk()
        });
        PolicyDecision::new(idx, Some(format!("score {score:.1}")))
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_option(&mut self, _state: &SimulationState, event: &EventDefinition) -> PolicyDecision {
        if event.options.is_empty() {
            return PolicyDecision::new(0, Some("no options".to_string()));
        }
        let idx = self.rng.gen_range(0..event.options.len());
        PolicyDecision::new(idx, None)
    }
}

/// Change an option causes relative to doing nothing this month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Projection {
    cash: f64,
    revenue_pct: f64,
    customers_pct: f64,
    churn: f64,
    satisfaction: f64,
    quality: f64,
    market_share: f64,
}

impl Projection {
    fn of(state: &SimulationState, effect: &EffectVector) -> Self {
        let baseline = apply(state, &EffectVector::new());
        let next = apply(state, effect);
        Self {
            cash: next.cash - baseline.cash,
            revenue_pct: percent_change(baseline.revenue, next.revenue),
            customers_pct: percent_change(customers(&baseline), customers(&next)),
            churn: next.churn_rate - baseline.churn_rate,
            satisfaction: next.customer_satisfaction - baseline.customer_satisfaction,
            quality: next.product_quality - baseline.product_quality,
            market_share: next.market_share - baseline.market_share,
        }
    }

    fn risk(&self) -> f64 {
        (-self.cash).max(0.0) / 10_000.0
            + (-self.revenue_pct).max(0.0)
            + (-self.customers_pct).max(0.0)
            + self.churn.max(0.0) * 10.0
            + (-self.satisfaction).max(0.0)
            + (-self.quality).max(0.0)
            + (-self.market_share).max(0.0)
    }

    fn reward(&self) -> f64 {
        self.revenue_pct.max(0.0)
            + self.customers_pct.max(0.0)
            + self.market_share.max(0.0) * 2.0
            + (self.satisfaction.max(0.0) + self.quality.max(0.0)) * 0.5
            + (-self.churn).max(0.0) * 5.0
    }
}

fn customers(state: &SimulationState) -> f64 {
    i64_to_f64(state.customers)
}

fn percent_change(before: f64, after: f64) -> f64 {
    if before.abs() < f64::EPSILON {
        0.0
    } else {
        (after - before) / before.abs() * 100.0
    }
}

/// Highest-scoring option index and its score; ties keep the earliest.
fn best_by<F>(state: &SimulationState, event: &EventDefinition, score: F) -> (usize, f64)
where
    F: Fn(&Projection) -> f64,
{
    event
        .options
        .iter()
        .enumerate()
        .map(|(idx, option)| (idx, score(&Projection::of(state, &option.effect))))
        .fold(None, |best: Option<(usize, f64)>, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        })
        .unwrap_or((0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use biztrail_game::{EventCatalog, EventOption, Metric};

    fn dilemma() -> EventDefinition {
        EventDefinition {
            id: "dilemma".to_string(),
            title: "Dilemma".to_string(),
            description: String::new(),
            options: vec![
                EventOption::new(
                    "Big bet",
                    EffectVector::new()
                        .with(Metric::Cash, -200_000.0)
                        .with(Metric::Revenue, 40.0)
                        .with(Metric::MarketShare, 10.0),
                ),
                EventOption::new("Do nothing", EffectVector::new()),
                EventOption::new(
                    "Cut corners",
                    EffectVector::new()
                        .with(Metric::Expenses, -10.0)
                        .with(Metric::ProductQuality, -20.0),
                ),
            ],
        }
    }

    #[test]
    fn conservative_avoids_outlays() {
        let mut policy = GameplayStrategy::Conservative.create_policy(1);
        let decision = policy.pick_option(&SimulationState::default(), &dilemma());
        assert_eq!(decision.option_index, 1);
    }

    #[test]
    fn aggressive_takes_the_big_bet() {
        let mut policy = GameplayStrategy::Aggressive.create_policy(1);
        let decision = policy.pick_option(&SimulationState::default(), &dilemma());
        assert_eq!(decision.option_index, 0);
        assert!(decision.rationale.unwrap().starts_with("reward"));
    }

    #[test]
    fn policies_return_in_range_indices() {
        let catalog = EventCatalog::load_standard().unwrap();
        let state = SimulationState::default();
        for strategy in GameplayStrategy::ALL {
            let mut policy = strategy.create_policy(42);
            assert_eq!(policy.name(), strategy.label());
            for event in catalog.events() {
                for _ in 0..5 {
                    let decision = policy.pick_option(&state, event);
                    assert!(decision.option_index < event.options.len());
                }
            }
        }
    }

    #[test]
    fn random_policy_is_seeded() {
        let catalog = EventCatalog::load_standard().unwrap();
        let state = SimulationState::default();
        let mut left = GameplayStrategy::Random.create_policy(9);
        let mut right = GameplayStrategy::Random.create_policy(9);
        for event in catalog.events() {
            assert_eq!(
                left.pick_option(&state, event).option_index,
                right.pick_option(&state, event).option_index
            );
        }
    }

    #[test]
    fn strategy_tokens_parse_case_insensitively() {
        assert_eq!(
            GameplayStrategy::from_token(" balanced"),
            Some(GameplayStrategy::Balanced)
        );
        assert_eq!(
            GameplayStrategy::from_token("RANDOM"),
            Some(GameplayStrategy::Random)
        );
        assert_eq!(GameplayStrategy::from_token("yolo"), None);
    }
}
