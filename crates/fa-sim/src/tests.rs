//! Unit tests for fa-sim.

use std::sync::{Arc, Mutex};

use fa_core::{BehaviorId, RunConfig, Step, StimulusRng, TransitionId};
use fa_model::{
    BehaviorDescription, Diagnostic, Event, Inbox, NetworkDescription, TransitionDescription,
};

use crate::{
    DriverBuilder, EventBus, Network, NetworkObserver, NoopObserver, SimError, StepTrace,
    Stimulus, StimulusSchedule, Termination, run,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Mangiare: Pancia_vuota → Cerca_cibo → Mangia (emits cibo on L1).
/// Dormire: Sveglio → Addormentato on soddisfazione(L2).
fn garden() -> NetworkDescription {
    NetworkDescription::new("garden")
        .behavior(
            BehaviorDescription::new("Mangiare", "Pancia_vuota")
                .state("Cerca_cibo")
                .state("Mangia")
                .transition(TransitionDescription::new("cerca", "Pancia_vuota", "Cerca_cibo"))
                .transition(
                    TransitionDescription::new("mangia", "Cerca_cibo", "Mangia")
                        .emits("cibo", "L1"),
                ),
        )
        .behavior(
            BehaviorDescription::new("Dormire", "Sveglio")
                .state("Addormentato")
                .transition(
                    TransitionDescription::new("dormi", "Sveglio", "Addormentato")
                        .requires("soddisfazione", "L2"),
                ),
        )
        .link("L1", "Mangiare", "Dormire")
        .link("L2", "Mangiare", "Dormire")
}

/// A pinger/ponger pair: Ping emits `ping` on P every step from `idle`,
/// Pong flips between `a` and `b` whenever it receives `ping`.
fn ping_pong() -> NetworkDescription {
    NetworkDescription::new("ping-pong")
        .behavior(
            BehaviorDescription::new("Ping", "idle")
                .transition(TransitionDescription::new("send", "idle", "idle").emits("ping", "P")),
        )
        .behavior(
            BehaviorDescription::new("Pong", "a")
                .state("b")
                .transition(TransitionDescription::new("ab", "a", "b").requires("ping", "P"))
                .transition(TransitionDescription::new("ba", "b", "a").requires("ping", "P")),
        )
        .link("P", "Ping", "Pong")
}

/// Guard reacts to `intruder` on `X`, then calms down by itself.
fn guard() -> NetworkDescription {
    NetworkDescription::new("guard")
        .behavior(
            BehaviorDescription::new("Guard", "calm")
                .state("alert")
                .transition(
                    TransitionDescription::new("alarm", "calm", "alert")
                        .requires("intruder", "X")
                        .emits("bark", "Y"),
                )
                .transition(TransitionDescription::new("relax", "alert", "calm")),
        )
        .behavior(
            BehaviorDescription::new("Owner", "asleep")
                .state("awake")
                .transition(TransitionDescription::new("wake", "asleep", "awake").requires("bark", "Y"))
                .transition(TransitionDescription::new("doze", "awake", "asleep")),
        )
        .link("X", "Guard", "Guard")
        .link("Y", "Guard", "Owner")
}

fn network(desc: &NetworkDescription) -> Network {
    Network::from_description(desc).unwrap()
}

fn states(n: &Network) -> Vec<(String, String)> {
    n.snapshot()
        .into_iter()
        .map(|(b, s)| (b.to_owned(), s.to_owned()))
        .collect()
}

// ── Event bus ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bus_tests {
    use super::*;

    #[test]
    fn posted_events_visible_only_after_swap() {
        let mut bus = EventBus::new(2);
        let e = Event::new("x", fa_core::LinkId(1));
        bus.post(e.clone());
        assert!(!bus.contains(&e));
        assert_eq!(bus.queued(), vec![e.clone()]);

        bus.swap();
        assert!(bus.contains(&e));
        assert!(bus.queued().is_empty());

        bus.swap();
        assert!(Inbox::is_empty(&bus));
    }

    #[test]
    fn inject_goes_straight_to_inbox() {
        let mut bus = EventBus::new(1);
        bus.inject(Event::new("x", fa_core::LinkId(0)));
        bus.inject(Event::new("x", fa_core::LinkId(0)));
        assert_eq!(bus.pending_len(), 2);
        assert_eq!(bus.pending_on(fa_core::LinkId(0)), ["x", "x"]);
    }

    #[test]
    fn contains_matches_name_and_link() {
        let mut bus = EventBus::new(2);
        bus.inject(Event::new("x", fa_core::LinkId(0)));
        assert!(!bus.contains(&Event::new("x", fa_core::LinkId(1))));
        assert!(!bus.contains(&Event::new("y", fa_core::LinkId(0))));
        assert!(!bus.contains(&Event::new("x", fa_core::LinkId::INVALID)));
    }

    #[test]
    fn clear_empties_both_buffers() {
        let mut bus = EventBus::new(1);
        bus.inject(Event::new("x", fa_core::LinkId(0)));
        bus.post(Event::new("y", fa_core::LinkId(0)));
        bus.clear();
        assert!(bus.pending().is_empty());
        assert!(bus.queued().is_empty());
    }
}

// ── Network step ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn garden_scenario() {
        let mut n = network(&garden());

        let s0 = n.step();
        assert_eq!(n.current_state("Mangiare").unwrap(), "Cerca_cibo");
        assert_eq!(n.current_state("Dormire").unwrap(), "Sveglio");
        assert!(s0.emitted.is_empty());

        let s1 = n.step();
        assert_eq!(n.current_state("Mangiare").unwrap(), "Mangia");
        let l1 = n.model().links.resolve("L1").unwrap();
        assert_eq!(s1.emitted, vec![Event::new("cibo", l1)]);
        assert_eq!(n.pending(), vec![Event::new("cibo", l1)]);

        for _ in 0..5 {
            let s = n.step();
            assert!(s.firing_of(BehaviorId(1)).is_none());
        }
        assert_eq!(n.current_state("Dormire").unwrap(), "Sveglio");
    }

    #[test]
    fn emitted_event_first_seen_next_step() {
        let mut n = network(&ping_pong());
        let p = n.model().links.resolve("P").unwrap();

        // Step 0: Ping emits, Pong sees nothing yet.
        let s0 = n.step();
        assert!(s0.inbox.is_empty());
        assert!(s0.firing_of(BehaviorId(1)).is_none());
        assert_eq!(s0.emitted, vec![Event::new("ping", p)]);

        // Step 1: Pong reacts to step 0's ping.
        let s1 = n.step();
        assert_eq!(s1.inbox, vec![Event::new("ping", p)]);
        assert_eq!(s1.firing_of(BehaviorId(1)).map(|f| f.transition), Some(TransitionId(0)));
        assert_eq!(n.current_state("Pong").unwrap(), "b");
    }

    #[test]
    fn unread_events_are_discarded_after_one_step() {
        let mut n = network(&garden());
        n.step();
        n.step();
        assert_eq!(n.pending().len(), 1);
        let s2 = n.step();
        assert_eq!(s2.inbox.len(), 1);
        assert!(n.pending().is_empty());
    }

    #[test]
    fn behavior_without_outgoing_never_moves() {
        let desc = NetworkDescription::new("n")
            .behavior(BehaviorDescription::new("Stone", "still").state("rolling"))
            .behavior(
                BehaviorDescription::new("Wind", "calm")
                    .transition(TransitionDescription::new("gust", "calm", "calm").emits("push", "W")),
            )
            .link("W", "Wind", "Stone");
        let mut n = network(&desc);
        for _ in 0..4 {
            let s = n.step();
            assert!(s.firing_of(BehaviorId(0)).is_none());
        }
        assert_eq!(n.current_state("Stone").unwrap(), "still");
    }

    #[test]
    fn explicit_self_loop_appears_in_trace() {
        let mut n = network(&ping_pong());
        let s = n.step();
        let f = s.firing_of(BehaviorId(0)).unwrap();
        assert_eq!(f.source, f.destination);
        assert_eq!(s.fired_count(), 1);
    }

    #[test]
    fn nondeterminism_is_reported_not_fatal() {
        let desc = NetworkDescription::new("n").behavior(
            BehaviorDescription::new("Coin", "up")
                .state("heads")
                .state("tails")
                .transition(TransitionDescription::new("h", "up", "heads"))
                .transition(TransitionDescription::new("t", "up", "tails")),
        );
        let mut n = network(&desc);
        let s = n.step();
        assert_eq!(n.current_state("Coin").unwrap(), "heads");
        assert_eq!(
            s.diagnostics,
            vec![Diagnostic::Nondeterminism {
                behavior: "Coin".into(),
                state:    "up".into(),
                fired:    "h".into(),
                shadowed: vec!["t".into()],
            }]
        );
    }

    #[test]
    fn quiescence_is_a_fixed_point() {
        let mut n = network(&garden());
        let mut last = n.step();
        while !last.is_quiescent() {
            last = n.step();
        }
        let before = states(&n);
        let again = n.step();
        assert!(again.is_quiescent());
        assert!(again.same_activity(&last));
        assert_eq!(states(&n), before);
    }
}

// ── Injection and reset ───────────────────────────────────────────────────────

#[cfg(test)]
mod inject_tests {
    use super::*;

    #[test]
    fn injected_event_is_seen_by_the_next_step() {
        let mut n = network(&garden());
        n.inject("soddisfazione", "L2").unwrap();
        n.step();
        assert_eq!(n.current_state("Dormire").unwrap(), "Addormentato");
    }

    #[test]
    fn inject_unknown_link_errors() {
        let mut n = network(&garden());
        assert!(matches!(n.inject("x", "L9"), Err(SimError::Model(_))));
        assert!(n.inject_event(Event::new("x", fa_core::LinkId(7))).is_err());
    }

    #[test]
    fn current_state_unknown_behavior_errors() {
        let n = network(&garden());
        assert!(matches!(n.current_state("Volare"), Err(SimError::Core(_))));
    }

    #[test]
    fn reset_restores_initial_configuration() {
        let mut n = network(&garden());
        n.step();
        n.step();
        n.reset();
        assert_eq!(n.current_step(), Step::ZERO);
        assert!(n.pending().is_empty());
        assert_eq!(
            states(&n),
            vec![
                ("Mangiare".to_owned(), "Pancia_vuota".to_owned()),
                ("Dormire".to_owned(), "Sveglio".to_owned()),
            ]
        );
    }

    #[test]
    fn invalid_description_does_not_build() {
        let desc = garden().behavior(
            BehaviorDescription::new("Bad", "s")
                .transition(TransitionDescription::new("t", "s", "s").emits("e", "nowhere")),
        );
        assert!(matches!(Network::from_description(&desc), Err(SimError::Model(_))));
    }
}

// ── Schedule ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule_tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut s = StimulusSchedule::new()
            .at(Step(3), "a", "L")
            .at(Step(1), "b", "L")
            .at(Step(3), "c", "L");
        assert_eq!(s.len(), 3);
        assert_eq!(s.step_count(), 2);
        assert_eq!(s.next_step(), Some(Step(1)));
        assert!(s.has_after(Step(1)));
        assert!(!s.has_after(Step(3)));

        let drained = s.drain_step(Step(3)).unwrap();
        assert_eq!(drained, vec![Stimulus::new("a", "L"), Stimulus::new("c", "L")]);
        assert_eq!(s.len(), 1);
        assert!(s.drain_step(Step(2)).is_none());
    }

    #[test]
    fn random_schedule_is_seeded() {
        let candidates = [Stimulus::new("intruder", "X")];
        let a = StimulusSchedule::random(&mut StimulusRng::new(7), &candidates, 50, 0.3);
        let b = StimulusSchedule::random(&mut StimulusRng::new(7), &candidates, 50, 0.3);
        assert_eq!(a, b);
        assert!(a.iter().all(|(step, _)| step < Step(50)));
    }

    #[test]
    fn random_schedule_extremes() {
        let candidates = [Stimulus::new("e", "L"), Stimulus::new("f", "L")];
        let none = StimulusSchedule::random(&mut StimulusRng::new(1), &candidates, 10, 0.0);
        let all = StimulusSchedule::random(&mut StimulusRng::new(1), &candidates, 10, 1.0);
        assert!(none.is_empty());
        assert_eq!(all.len(), 20);
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod driver_tests {
    use super::*;

    #[test]
    fn garden_run_settles() {
        let mut n = network(&garden());
        let trace = run(&mut n, 100, &StimulusSchedule::new()).unwrap();
        // S0 cerca, S1 mangia, S2 cibo pending but unread, S3 quiet.
        assert_eq!(trace.termination, Termination::Quiescent { at: Step(3) });
        assert_eq!(trace.len(), 4);
        let dormire = n.model().behavior_id("Dormire").unwrap();
        assert!(trace.steps.iter().all(|s| s.firing_of(dormire).is_none()));
    }

    #[test]
    fn budget_exhaustion_is_distinct() {
        let mut n = network(&ping_pong());
        let trace = run(&mut n, 10, &StimulusSchedule::new()).unwrap();
        assert_eq!(trace.termination, Termination::BudgetExhausted { steps: 10 });
        assert_eq!(trace.len(), 10);
    }

    #[test]
    fn quiescence_waits_for_scheduled_stimuli() {
        let mut n = network(&guard());
        let schedule = StimulusSchedule::new().at(Step(5), "intruder", "X");
        let trace = run(&mut n, 100, &schedule).unwrap();

        // S0..S4 quiet, S5 alarm, S6 relax + wake, S7 doze, S8 quiet.
        assert_eq!(trace.termination, Termination::Quiescent { at: Step(8) });
        let guard = n.model().behavior_id("Guard").unwrap();
        assert!(trace.has_fired(guard, TransitionId(0)));
        assert_eq!(n.current_state("Owner").unwrap(), "asleep");
    }

    #[test]
    fn identical_runs_give_identical_traces() {
        let candidates = [Stimulus::new("intruder", "X")];
        let schedule = StimulusSchedule::random(&mut StimulusRng::new(42), &candidates, 40, 0.2);

        let mut a = network(&guard());
        let mut b = network(&guard());
        let ta = run(&mut a, 60, &schedule).unwrap();
        let tb = run(&mut b, 60, &schedule).unwrap();
        assert_eq!(ta, tb);

        a.reset();
        let tc = run(&mut a, 60, &schedule).unwrap();
        assert_eq!(ta, tc);
    }

    #[test]
    fn unknown_stimulus_link_rejected_up_front() {
        let n = network(&garden());
        let result = DriverBuilder::new(n)
            .schedule(StimulusSchedule::new().at(Step(2), "x", "nope"))
            .build();
        assert!(matches!(result, Err(SimError::UnknownStimulusLink { .. })));
    }

    #[test]
    fn zero_threads_rejected() {
        let mut config = RunConfig::new(10);
        config.num_threads = Some(0);
        let result = DriverBuilder::new(network(&garden())).config(config).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn observer_hooks_called() {
        #[derive(Default)]
        struct Log {
            starts:      usize,
            ends:        usize,
            snapshots:   Vec<Step>,
            diagnostics: usize,
            finished:    Option<(Step, Termination)>,
        }
        struct Recorder(Arc<Mutex<Log>>);
        impl NetworkObserver for Recorder {
            fn on_step_start(&mut self, _s: Step) { self.0.lock().unwrap().starts += 1; }
            fn on_step_end(&mut self, _m: &fa_model::NetworkModel, _t: &StepTrace) {
                self.0.lock().unwrap().ends += 1;
            }
            fn on_snapshot(&mut self, s: Step, states: &[(&str, &str)]) {
                assert_eq!(states.len(), 1);
                self.0.lock().unwrap().snapshots.push(s);
            }
            fn on_diagnostic(&mut self, _s: Step, _d: &Diagnostic) {
                self.0.lock().unwrap().diagnostics += 1;
            }
            fn on_run_end(&mut self, next: Step, t: Termination) {
                self.0.lock().unwrap().finished = Some((next, t));
            }
        }

        let desc = NetworkDescription::new("n").behavior(
            BehaviorDescription::new("Coin", "up")
                .transition(TransitionDescription::new("h", "up", "up"))
                .transition(TransitionDescription::new("t", "up", "up")),
        );
        let mut config = RunConfig::new(6);
        config.output_interval_steps = 2;
        let mut driver = DriverBuilder::new(network(&desc)).config(config).build().unwrap();

        let log = Arc::new(Mutex::new(Log::default()));
        driver.run(&mut Recorder(Arc::clone(&log))).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.starts, 6);
        assert_eq!(log.ends, 6);
        assert_eq!(log.snapshots, vec![Step(0), Step(2), Step(4)]);
        assert_eq!(log.diagnostics, 6);
        assert_eq!(log.finished, Some((Step(6), Termination::BudgetExhausted { steps: 6 })));
    }

    #[test]
    fn random_stimuli_follow_config_seed() {
        let candidates = [Stimulus::new("intruder", "X")];
        let driver = |seed| {
            let mut config = RunConfig::new(40);
            config.seed = seed;
            DriverBuilder::new(network(&guard()))
                .config(config)
                .random_stimuli(candidates.clone(), 0.2)
                .build()
                .unwrap()
        };

        let expected = StimulusSchedule::random(&mut StimulusRng::new(7), &candidates, 40, 0.2);
        assert_eq!(driver(7).schedule, expected);
        assert_ne!(driver(1).schedule, driver(0xDEAD_BEEF).schedule);

        let ta = driver(7).run(&mut NoopObserver).unwrap();
        let tb = driver(7).run(&mut NoopObserver).unwrap();
        assert_eq!(ta, tb);
    }

    #[test]
    fn random_stimuli_merge_with_explicit_schedule() {
        let driver = DriverBuilder::new(network(&guard()))
            .max_steps(10)
            .schedule(StimulusSchedule::new().at(Step(3), "intruder", "X"))
            .random_stimuli([Stimulus::new("intruder", "X")], 1.0)
            .build()
            .unwrap();
        assert_eq!(driver.schedule.len(), 11);
        assert_eq!(driver.schedule.get(Step(3)).len(), 2);
        assert!(!driver.schedule.has_after(Step(9)));
    }

    #[test]
    fn driver_resumes_from_current_step() {
        let mut driver = DriverBuilder::new(network(&ping_pong())).max_steps(3).build().unwrap();
        driver.run(&mut NoopObserver).unwrap();
        let trace = driver.run(&mut NoopObserver).unwrap();
        assert_eq!(trace.steps[0].step, Step(3));
        assert_eq!(driver.current_step(), Step(6));
    }
}
