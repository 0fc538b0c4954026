mod common;

mod tests {
    use core::cell::Cell;

    use embassy_time::Duration;
    use myrtio_lighthouse::scheduler::{DEFAULT_CARRIER_HZ, DEFAULT_TIDAL_CYCLE};
    use myrtio_lighthouse::{
        Clock, FleetConfig, FleetScheduler, GeneratorState, ManualClock, NoGate, presets,
    };

    use super::common::{MAX, RecordingSink, ms, run_until};

    fn config() -> FleetConfig {
        FleetConfig::default().with_tidal_cycle(Duration::from_secs(30))
    }

    #[test]
    fn test_default_config() {
        let config = FleetConfig::default();
        assert_eq!(config.tidal_cycle, DEFAULT_TIDAL_CYCLE);
        assert_eq!(config.tidal_cycle, Duration::from_secs(480));
        assert_eq!(config.carrier_hz, DEFAULT_CARRIER_HZ);
        assert_eq!(config.with_carrier_hz(500).carrier_hz, 500);
    }

    #[test]
    fn test_sinks_are_configured() {
        let clock = ManualClock::new();
        let scheduler = FleetScheduler::new(
            FleetConfig::DEFAULT,
            [presets::texel(), presets::vlieland()],
            [RecordingSink::new(&clock), RecordingSink::new(&clock)],
            NoGate,
        );

        assert_eq!(scheduler.sinks()[0].configured, Some((0, 1000)));
        assert_eq!(scheduler.sinks()[1].configured, Some((1, 1000)));
        assert!(scheduler.sinks().iter().all(|sink| sink.writes.is_empty()));
    }

    #[test]
    fn test_night_then_day() {
        let clock = ManualClock::new();
        let mut scheduler = FleetScheduler::new(
            config(),
            [presets::texel(), presets::vlieland()],
            [RecordingSink::new(&clock), RecordingSink::new(&clock)],
            NoGate,
        );

        assert!(run_until(&clock, scheduler.run_cycle(&clock), ms(120_000)).is_some());

        // Day starts once Vlieland has faded out from full brightness
        assert_eq!(clock.now(), ms(60_600));
        let [texel, vlieland] = scheduler.sinks();
        assert_eq!(texel.value_at(600), Some(MAX));
        assert_eq!(texel.last(), Some((30_000, 0)));
        assert_eq!(vlieland.value_at(29_999), Some(MAX));
        assert_eq!(vlieland.last(), Some((30_600, 0)));
        assert!(
            scheduler
                .handles()
                .iter()
                .all(|handle| handle.state() == GeneratorState::Stopped)
        );
    }

    #[test]
    fn test_closed_gate_skips_day() {
        let clock = ManualClock::new();
        let reads = Cell::new(0);
        let gate = || {
            reads.set(reads.get() + 1);
            reads.get() == 1
        };
        let mut scheduler = FleetScheduler::new(
            config(),
            [presets::texel(), presets::vlieland()],
            [RecordingSink::new(&clock), RecordingSink::new(&clock)],
            gate,
        );

        assert!(run_until(&clock, scheduler.run_cycle(&clock), ms(120_000)).is_some());

        // Night ran through the first boundary and ended at the second
        assert_eq!(reads.get(), 2);
        assert_eq!(clock.now(), ms(90_000));
        let [texel, vlieland] = scheduler.sinks();
        assert_eq!(texel.value_at(30_600), Some(MAX));
        assert_eq!(texel.last(), Some((60_000, 0)));
        assert_eq!(vlieland.last(), Some((60_000, 0)));
    }

    #[test]
    fn test_lights_return_next_night() {
        let clock = ManualClock::new();
        let mut scheduler = FleetScheduler::new(
            config(),
            [presets::texel()],
            [RecordingSink::new(&clock)],
            NoGate,
        );

        assert!(run_until(&clock, scheduler.run(&clock), ms(65_000)).is_none());

        let texel = &scheduler.sinks()[0];
        assert_eq!(texel.writes_between(30_000, 60_000), vec![]);
        assert_eq!(texel.value_at(60_600), Some(MAX));
        assert_eq!(scheduler.handles()[0].state(), GeneratorState::Running);
    }
}
