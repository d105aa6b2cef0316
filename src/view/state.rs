//! Lifecycle of one visualization, kept as a pure transition function so
//! the control flow is testable without any rendering engine attached.

/// Where a view currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    Idle,
    /// Raw data (or submitted text) is being fetched/parsed.
    Loading,
    /// Derived model is computed and waiting to be drawn.
    Ready,
    /// The adapter has drawn the current model.
    Rendered,
    /// The load failed; terminal for this data source until a new load.
    Error(String),
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A load of raw input began (initial fetch or new text submitted).
    LoadStarted,
    /// The raw input arrived and parsed.
    LoadSucceeded,
    /// The raw input could not be fetched or parsed.
    LoadFailed(String),
    /// A filter or parameter changed; the raw data is still good.
    ParamsChanged,
    /// The adapter finished drawing.
    RenderCompleted,
    /// A lazy enrichment batch resolved. `changed` is false when nothing
    /// new applies to the current node set; such batches merge into the
    /// cache silently and must not trigger another pass.
    EnrichmentResolved { changed: bool },
    /// Escape was pressed.
    DismissOverlays,
}

/// Instructions for the shell around the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Re-derive the model from the already-loaded raw data, reading the
    /// parameter values current at that moment.
    Recompute,
    /// Hand the model to the rendering adapter.
    Render,
    /// Remove any drawn output so no stale partial render stays visible.
    ClearView,
    /// Surface a blocking, user-visible error message.
    ShowError(String),
    /// Hide tooltip and pinned detail panel.
    ClearOverlays,
}

/// Apply one event. Events that make no sense in the current phase leave
/// the state untouched and produce no effects.
pub fn transition(phase: &Phase, event: Event) -> (Phase, Vec<SideEffect>) {
    use SideEffect::*;

    match (phase, event) {
        (_, Event::LoadStarted) => (Phase::Loading, vec![ClearOverlays]),
        (_, Event::DismissOverlays) => (phase.clone(), vec![ClearOverlays]),

        (Phase::Loading, Event::LoadSucceeded) => (Phase::Ready, vec![Recompute, Render]),
        (Phase::Loading, Event::LoadFailed(msg)) => {
            (Phase::Error(msg.clone()), vec![ClearView, ShowError(msg)])
        }

        (Phase::Ready, Event::RenderCompleted) => (Phase::Rendered, vec![]),

        (Phase::Ready | Phase::Rendered, Event::ParamsChanged) => {
            (Phase::Ready, vec![ClearOverlays, Recompute, Render])
        }

        (Phase::Ready | Phase::Rendered, Event::EnrichmentResolved { changed: true }) => {
            (Phase::Ready, vec![Recompute, Render])
        }
        (_, Event::EnrichmentResolved { .. }) => (phase.clone(), vec![]),

        (phase, _) => (phase.clone(), vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(phase: Phase, events: &[Event]) -> Phase {
        events.iter().fold(phase, |p, e| transition(&p, e.clone()).0)
    }

    #[test]
    fn test_happy_path() {
        let phase = run(
            Phase::Idle,
            &[
                Event::LoadStarted,
                Event::LoadSucceeded,
                Event::RenderCompleted,
            ],
        );
        assert_eq!(phase, Phase::Rendered);
    }

    #[test]
    fn test_params_change_rederives_without_reload() {
        let (phase, effects) = transition(&Phase::Rendered, Event::ParamsChanged);
        assert_eq!(phase, Phase::Ready);
        assert!(effects.contains(&SideEffect::Recompute));
        assert!(effects.contains(&SideEffect::Render));
    }

    #[test]
    fn test_load_failure_is_terminal_until_new_load() {
        let (phase, effects) =
            transition(&Phase::Loading, Event::LoadFailed("boom".to_string()));
        assert_eq!(phase, Phase::Error("boom".to_string()));
        assert!(effects.contains(&SideEffect::ClearView));
        assert!(effects
            .iter()
            .any(|e| matches!(e, SideEffect::ShowError(m) if m == "boom")));

        // Stuck in Error on anything but a new load.
        let (still, _) = transition(&phase, Event::ParamsChanged);
        assert_eq!(still, phase);
        let (reload, _) = transition(&phase, Event::LoadStarted);
        assert_eq!(reload, Phase::Loading);
    }

    #[test]
    fn test_failure_only_reachable_from_loading() {
        let (phase, effects) =
            transition(&Phase::Rendered, Event::LoadFailed("late".to_string()));
        assert_eq!(phase, Phase::Rendered);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_enrichment_batch_triggers_one_recompute() {
        let (phase, effects) = transition(
            &Phase::Rendered,
            Event::EnrichmentResolved { changed: true },
        );
        assert_eq!(phase, Phase::Ready);
        assert_eq!(effects, vec![SideEffect::Recompute, SideEffect::Render]);

        // A batch that changed nothing in view is merged silently.
        let (phase, effects) = transition(
            &Phase::Rendered,
            Event::EnrichmentResolved { changed: false },
        );
        assert_eq!(phase, Phase::Rendered);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_escape_clears_overlays_everywhere() {
        for phase in [Phase::Idle, Phase::Ready, Phase::Rendered] {
            let (next, effects) = transition(&phase, Event::DismissOverlays);
            assert_eq!(next, phase);
            assert_eq!(effects, vec![SideEffect::ClearOverlays]);
        }
    }

    #[test]
    fn test_new_input_returns_to_loading() {
        let phase = run(
            Phase::Rendered,
            &[Event::LoadStarted],
        );
        assert_eq!(phase, Phase::Loading);
    }
}
