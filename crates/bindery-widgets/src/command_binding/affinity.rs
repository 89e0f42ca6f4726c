//! Strategy selection by affinity score.
//!
//! Each [`BindingStrategy`] scores a target type on its own; the
//! [`StrategySet`] picks the highest score, breaking ties in favor of the
//! strategy registered first. A best score of zero means no strategy can
//! bind the type.
//!
//! | Strategy | Exact toolkit kind | Control | Other with events | No events |
//! |----------|--------------------|---------|-------------------|-----------|
//! | `Toolkit` | 10 | 8 | 6 | 0 |
//! | `Event` | 5 explicit / 3 implicit | same | same | 0 |
//!
//! An exact toolkit kind declares both a default trigger and an enabled
//! property. Implicit (default-event) scores other than the exact-kind score
//! additionally require that some default event can be resolved.

use super::config::BinderConfig;
use super::target::{ElementClass, TargetDescriptor};

/// Non-negative specificity of a strategy for a target type.
pub type AffinityScore = u32;

/// Score for a type that declares a default trigger and an enabled property.
pub const EXACT_AFFINITY: AffinityScore = 10;
/// Score for any [`Control`](crate::controls::Control).
pub const CONTROL_AFFINITY: AffinityScore = 8;
/// Toolkit score for a non-control type that still has usable events.
pub const EVENT_SOURCE_AFFINITY: AffinityScore = 6;
/// Generic event strategy, explicit event name.
pub const GENERIC_EXPLICIT_AFFINITY: AffinityScore = 5;
/// Generic event strategy, implicit default event.
pub const GENERIC_DEFAULT_AFFINITY: AffinityScore = 3;

/// The ways a command can be wired to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingStrategy {
    /// Knows the toolkit hierarchy: honors declared default triggers and
    /// prefers controls.
    Toolkit,
    /// Works with any type that has events; defaults come only from
    /// [`BinderConfig::fallback_events`].
    Event,
}

impl BindingStrategy {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Toolkit => "toolkit",
            Self::Event => "event",
        }
    }

    /// How well this strategy can bind `target`.
    ///
    /// `explicit_event` is true when the caller names the trigger event and
    /// false when the default trigger should be used.
    #[must_use]
    pub fn affinity(
        self,
        target: Option<&TargetDescriptor>,
        explicit_event: bool,
        config: &BinderConfig,
    ) -> AffinityScore {
        let Some(target) = target else {
            return 0;
        };
        if !target.has_events() {
            return 0;
        }
        let has_default = || self.default_event(target, config).is_some();
        match self {
            Self::Toolkit => {
                if target.declared_default().is_some() && target.is_enabled_capable() {
                    EXACT_AFFINITY
                } else if target.class() == ElementClass::Control
                    && (explicit_event || has_default())
                {
                    CONTROL_AFFINITY
                } else if explicit_event || has_default() {
                    EVENT_SOURCE_AFFINITY
                } else {
                    0
                }
            }
            Self::Event => {
                if explicit_event {
                    GENERIC_EXPLICIT_AFFINITY
                } else if has_default() {
                    GENERIC_DEFAULT_AFFINITY
                } else {
                    0
                }
            }
        }
    }

    /// The trigger an implicit binding uses on `target`.
    #[must_use]
    pub fn default_event(
        self,
        target: &TargetDescriptor,
        config: &BinderConfig,
    ) -> Option<&'static str> {
        match self {
            Self::Toolkit => target
                .declared_default()
                .or_else(|| target.first_event_of(&config.fallback_events)),
            Self::Event => target.first_event_of(&config.fallback_events),
        }
    }
}

/// Ordered collection of strategies consulted for every bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySet {
    strategies: Vec<BindingStrategy>,
}

impl Default for StrategySet {
    fn default() -> Self {
        Self::standard()
    }
}

impl StrategySet {
    /// No strategies; every type scores zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// `Toolkit`, then `Event`.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            strategies: vec![BindingStrategy::Toolkit, BindingStrategy::Event],
        }
    }

    /// Append `strategy` (lowest tie-break priority).
    #[must_use]
    pub fn with(mut self, strategy: BindingStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = BindingStrategy> + '_ {
        self.strategies.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Highest score any strategy gives `target`.
    #[must_use]
    pub fn affinity(
        &self,
        target: Option<&TargetDescriptor>,
        explicit_event: bool,
        config: &BinderConfig,
    ) -> AffinityScore {
        self.resolve(target, explicit_event, config)
            .map_or(0, |(_, score)| score)
    }

    /// The winning strategy and its score, or `None` if every score is zero.
    #[must_use]
    pub fn resolve(
        &self,
        target: Option<&TargetDescriptor>,
        explicit_event: bool,
        config: &BinderConfig,
    ) -> Option<(BindingStrategy, AffinityScore)> {
        pick_best(
            self.iter()
                .map(|strategy| (strategy, strategy.affinity(target, explicit_event, config))),
        )
    }
}

/// Max by score; the earliest entry wins ties; zero scores never win.
fn pick_best(
    scored: impl Iterator<Item = (BindingStrategy, AffinityScore)>,
) -> Option<(BindingStrategy, AffinityScore)> {
    let mut best: Option<(BindingStrategy, AffinityScore)> = None;
    for (strategy, score) in scored {
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((strategy, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_binding::target::TargetRegistry;
    use crate::controls::{
        Button, ClickableComponent, CustomControl, TextBlock, Toggle, ToolButton,
    };
    use std::any::TypeId;

    fn score_of<T: 'static>(explicit: bool) -> AffinityScore {
        let registry = TargetRegistry::with_toolkit();
        StrategySet::standard().affinity(
            registry.descriptor_for(TypeId::of::<T>()),
            explicit,
            &BinderConfig::default(),
        )
    }

    #[test]
    fn toolkit_kinds_score_in_both_modes() {
        for explicit in [true, false] {
            assert_eq!(score_of::<Button>(explicit), EXACT_AFFINITY);
            assert_eq!(score_of::<Toggle>(explicit), EXACT_AFFINITY);
            assert_eq!(score_of::<ToolButton>(explicit), EXACT_AFFINITY);
            assert_eq!(score_of::<CustomControl>(explicit), CONTROL_AFFINITY);
            assert_eq!(score_of::<ClickableComponent>(explicit), EVENT_SOURCE_AFFINITY);
        }
    }

    #[test]
    fn incompatible_kinds_score_zero() {
        for explicit in [true, false] {
            assert_eq!(score_of::<TextBlock>(explicit), 0);
            assert_eq!(score_of::<String>(explicit), 0);
        }
    }

    #[test]
    fn specialized_strategy_outscores_generic() {
        let registry = TargetRegistry::with_toolkit();
        let config = BinderConfig::default();
        let component = registry.descriptor_for(TypeId::of::<ClickableComponent>());
        let toolkit = BindingStrategy::Toolkit.affinity(component, true, &config);
        let generic = BindingStrategy::Event.affinity(component, true, &config);
        assert!(toolkit > generic && generic > 0);
        assert_eq!(
            StrategySet::standard().resolve(component, true, &config),
            Some((BindingStrategy::Toolkit, EVENT_SOURCE_AFFINITY))
        );
    }

    #[test]
    fn generic_strategy_alone_still_binds() {
        let registry = TargetRegistry::with_toolkit();
        let config = BinderConfig::default();
        let set = StrategySet::empty().with(BindingStrategy::Event);
        let control = registry.descriptor_for(TypeId::of::<CustomControl>());
        assert_eq!(set.affinity(control, true, &config), GENERIC_EXPLICIT_AFFINITY);
        assert_eq!(set.affinity(control, false, &config), GENERIC_DEFAULT_AFFINITY);
    }

    #[test]
    fn implicit_mode_needs_a_resolvable_default() {
        let registry = TargetRegistry::with_toolkit();
        let config = BinderConfig::default().with_fallback_events(["hover"]);
        let component = registry.descriptor_for(TypeId::of::<ClickableComponent>());
        assert_eq!(StrategySet::standard().affinity(component, false, &config), 0);
        assert_eq!(
            StrategySet::standard().affinity(component, true, &config),
            EVENT_SOURCE_AFFINITY
        );
    }

    #[test]
    fn toolkit_default_prefers_declared_event() {
        let registry = TargetRegistry::with_toolkit();
        let config = BinderConfig::default().with_fallback_events(["mouse_up"]);
        let button = registry.descriptor_for(TypeId::of::<Button>()).unwrap();
        assert_eq!(
            BindingStrategy::Toolkit.default_event(button, &config),
            Some("click")
        );
        assert_eq!(
            BindingStrategy::Event.default_event(button, &config),
            Some("mouse_up")
        );
    }

    #[test]
    fn ties_go_to_first_registered() {
        let scored = [
            (BindingStrategy::Event, 4),
            (BindingStrategy::Toolkit, 4),
        ];
        assert_eq!(
            pick_best(scored.into_iter()),
            Some((BindingStrategy::Event, 4))
        );
    }

    #[test]
    fn all_zero_resolves_to_none() {
        let scored = [(BindingStrategy::Toolkit, 0), (BindingStrategy::Event, 0)];
        assert_eq!(pick_best(scored.into_iter()), None);
        assert_eq!(pick_best(std::iter::empty()), None);
    }
}
