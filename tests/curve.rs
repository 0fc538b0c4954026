mod tests {
    use embassy_time::Duration;
    use myrtio_lighthouse::curve::{
        FADE_OUT_STEP_PERCENT, FLASH_DURATION, FLASH_STEPS, ISOPHASE_RAMP, ISOPHASE_RAMP_STEPS,
        duty_from_fraction, duty_from_percent, duty_to_percent, fade_out_curve, flash_curve,
        isophase_curve,
    };

    const MAX: u16 = u16::MAX;

    #[test]
    fn test_motion_timings() {
        assert_eq!(FLASH_DURATION, Duration::from_millis(2800));
        assert_eq!(ISOPHASE_RAMP, Duration::from_millis(200));
        assert_eq!(ISOPHASE_RAMP_STEPS, 20);
    }

    #[test]
    fn test_flash_curve_ends_and_peak() {
        assert_eq!(flash_curve(0, FLASH_STEPS, MAX), 0);
        assert_eq!(flash_curve(FLASH_STEPS, FLASH_STEPS, MAX), 0);
        assert_eq!(flash_curve(FLASH_STEPS / 2, FLASH_STEPS, MAX), MAX);
    }

    #[test]
    fn test_flash_curve_symmetric() {
        for step in 0..=FLASH_STEPS {
            let rising = flash_curve(step, FLASH_STEPS, MAX);
            let falling = flash_curve(FLASH_STEPS - step, FLASH_STEPS, MAX);
            assert!(rising.abs_diff(falling) <= 1, "step {step}: {rising} vs {falling}");
        }
    }

    #[test]
    fn test_flash_curve_rises_then_falls() {
        let values: Vec<u16> = (0..=FLASH_STEPS)
            .map(|step| flash_curve(step, FLASH_STEPS, MAX))
            .collect();
        let peak = (FLASH_STEPS / 2) as usize;
        assert!(values[..=peak].windows(2).all(|w| w[0] <= w[1]));
        assert!(values[peak..].windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_flash_curve_respects_duty_max() {
        let max = 65025;
        for step in 0..=FLASH_STEPS {
            assert!(flash_curve(step, FLASH_STEPS, max) <= max);
        }
        assert_eq!(flash_curve(50, FLASH_STEPS, max), max);
        assert_eq!(flash_curve(3, 0, max), 0);
    }

    #[test]
    fn test_duty_from_fraction_clamps() {
        assert_eq!(duty_from_fraction(-0.5, MAX), 0);
        assert_eq!(duty_from_fraction(f32::NAN, MAX), 0);
        assert_eq!(duty_from_fraction(1.5, MAX), MAX);
        assert_eq!(duty_from_fraction(0.5, 1000), 500);
    }

    #[test]
    fn test_percent_conversions() {
        assert_eq!(duty_from_percent(50, MAX), 32768);
        assert_eq!(duty_from_percent(150, MAX), MAX);
        assert_eq!(duty_to_percent(MAX, MAX), 100);
        assert_eq!(duty_to_percent(32768, MAX), 50);
        assert_eq!(duty_to_percent(100, 0), 0);
    }

    #[test]
    fn test_isophase_curve() {
        assert_eq!(isophase_curve(0, MAX), 0);
        assert_eq!(isophase_curve(1, MAX), duty_from_percent(5, MAX));
        assert_eq!(isophase_curve(10, MAX), 32768);
        assert_eq!(isophase_curve(ISOPHASE_RAMP_STEPS, MAX), MAX);
        assert_eq!(isophase_curve(ISOPHASE_RAMP_STEPS + 5, MAX), MAX);
    }

    #[test]
    fn test_fade_out_from_dark_is_empty() {
        let mut ramp = fade_out_curve(0, MAX);
        assert_eq!(ramp.len(), 0);
        assert_eq!(ramp.next(), None);
    }

    #[test]
    fn test_fade_out_from_full() {
        let ramp = fade_out_curve(MAX, MAX);
        assert_eq!(ramp.percent(), 100);
        let values: Vec<u16> = ramp.collect();

        assert_eq!(values.len(), usize::from(100 / FADE_OUT_STEP_PERCENT));
        assert_eq!(values[0], MAX);
        assert_eq!(*values.last().unwrap(), duty_from_percent(2, MAX));
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_fade_out_never_brightens() {
        for start in [1, 655, 656, 20_000, 32_768, 65_000] {
            let first = fade_out_curve(start, MAX).next().unwrap_or(0);
            assert!(first <= start, "start {start}, first {first}");
        }
    }

    #[test]
    fn test_fade_out_odd_percent() {
        let values: Vec<u16> = fade_out_curve(70, 1000).collect();
        assert_eq!(values, vec![70, 50, 30, 10]);
    }
}
