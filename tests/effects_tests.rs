// Host-side tests for effect timers and request signals.

use orb_core::{CurveKind, Effect, OrbError, TimerBank, TriggerSignals};

#[test]
fn retrigger_without_time_passing_keeps_start() {
    let mut single = TimerBank::new();
    single.trigger(Effect::Anger, 100.0);

    let mut double = TimerBank::new();
    assert!(double.trigger(Effect::Anger, 100.0));
    assert!(!double.trigger(Effect::Anger, 100.0));

    for now in [100.0, 700.0, 2500.0] {
        assert_eq!(
            single.intensity(Effect::Anger, now),
            double.intensity(Effect::Anger, now)
        );
    }
    assert_eq!(double.record(Effect::Anger).map(|r| r.start_ms), Some(100.0));
}

#[test]
fn retrigger_while_active_does_not_extend() {
    let mut bank = TimerBank::new();
    bank.trigger(Effect::Wave, 0.0);
    assert!(!bank.trigger(Effect::Wave, 800.0));
    assert_eq!(bank.record(Effect::Wave).map(|r| r.start_ms), Some(0.0));
    assert!(bank.expire(1600.0).contains(&Effect::Wave));
    assert!(!bank.is_active(Effect::Wave));
}

#[test]
fn linear_decay_hits_endpoints_and_never_rises() {
    for effect in Effect::ALL {
        if effect.curve() != CurveKind::LinearDecay {
            continue;
        }
        let mut bank = TimerBank::new();
        bank.trigger(effect, 1000.0);
        let d = effect.duration_ms();
        assert_eq!(bank.intensity(effect, 1000.0), 1.0, "{effect}");
        assert_eq!(bank.intensity(effect, 1000.0 + d), 0.0, "{effect}");
        let mut prev = f32::INFINITY;
        for step in 0..=100 {
            let now = 1000.0 + d * step as f64 / 100.0;
            let v = bank.intensity(effect, now);
            assert!((0.0..=1.0).contains(&v));
            assert!(v <= prev, "{effect} rose at {now}");
            prev = v;
        }
    }
}

#[test]
fn embarrassment_eases_in() {
    let mut bank = TimerBank::new();
    bank.trigger(Effect::Embarrassment, 0.0);
    assert_eq!(bank.intensity(Effect::Embarrassment, 0.0), 0.0);
    let half = bank.intensity(Effect::Embarrassment, 1000.0);
    assert!((half - std::f32::consts::FRAC_PI_4.sin()).abs() < 1e-5);
    assert!((bank.intensity(Effect::Embarrassment, 2000.0) - 1.0).abs() < 1e-6);
    // Capped once the duration has passed
    assert!((bank.intensity(Effect::Embarrassment, 5000.0) - 1.0).abs() < 1e-6);
}

#[test]
fn inactive_effects_report_zero() {
    let bank = TimerBank::new();
    for effect in Effect::ALL {
        assert_eq!(bank.intensity(effect, 123.0), 0.0);
    }
    let levels = bank.levels(123.0);
    assert!(Effect::ALL.iter().all(|e| !levels.is_active(*e)));
}

#[test]
fn expire_deactivates_exactly_at_deadline() {
    let mut bank = TimerBank::new();
    bank.trigger(Effect::Nod, 0.0);
    bank.trigger(Effect::Sadness, 0.0);
    assert!(bank.expire(1399.0).is_empty());
    let expired = bank.expire(1400.0);
    assert_eq!(expired.as_slice(), &[Effect::Nod]);
    assert!(bank.is_active(Effect::Sadness));
    assert_eq!(bank.active_count(), 1);
    assert_eq!(bank.expire(4000.0).as_slice(), &[Effect::Sadness]);
    // Can start again after expiry
    assert!(bank.trigger(Effect::Nod, 4000.0));
}

#[test]
fn effects_are_independent() {
    let mut bank = TimerBank::new();
    bank.trigger(Effect::Anger, 0.0);
    bank.trigger(Effect::Confusion, 500.0);
    bank.trigger(Effect::Excitement, 1000.0);
    let levels = bank.levels(1000.0);
    assert!((levels.get(Effect::Anger) - (1.0 - 1000.0 / 3000.0)).abs() < 1e-6);
    assert!((levels.get(Effect::Confusion) - (1.0 - 500.0 / 2500.0)).abs() < 1e-6);
    assert_eq!(levels.get(Effect::Excitement), 1.0);
    assert!(!levels.is_active(Effect::Joy));
    assert!(bank.deactivate(Effect::Confusion));
    assert!(!bank.deactivate(Effect::Confusion));
    assert!(bank.is_active(Effect::Anger));
}

#[test]
fn names_and_durations() {
    assert_eq!(Effect::from_name("ANGER"), Some(Effect::Anger));
    assert_eq!(Effect::from_name(" frown "), Some(Effect::Frown));
    assert_eq!(Effect::from_name("sms"), None);
    assert_eq!("Wave".parse::<Effect>().ok(), Some(Effect::Wave));
    assert!(matches!("sms".parse::<Effect>(), Err(OrbError::UnknownEffect(name)) if name == "sms"));
    for effect in Effect::ALL {
        assert_eq!(Effect::from_name(effect.name()), Some(effect));
        let d = effect.duration_ms();
        assert!((1200.0..=4000.0).contains(&d), "{effect}: {d}");
    }
    assert_eq!(Effect::Excitement.duration_ms(), 1500.0);
    assert_eq!(Effect::Sadness.duration_ms(), 4000.0);
}

#[test]
fn signals_report_rising_edges_only() {
    let mut s = TriggerSignals::new();
    assert!(s.set(Effect::Joy, true));
    assert!(!s.set(Effect::Joy, true));
    assert!(!s.set(Effect::Joy, false));
    assert!(s.set(Effect::Joy, true));
}

#[test]
fn pulse_holds_then_releases_without_extension() {
    let mut s = TriggerSignals::new();
    assert!(s.pulse(Effect::Shake, 0.0, 1400.0));
    assert!(!s.pulse(Effect::Shake, 1000.0, 1400.0));
    assert_eq!(s.release_time(Effect::Shake), Some(1400.0));
    assert!(s.release_due(1399.0).is_empty());
    assert_eq!(s.release_due(1400.0).as_slice(), &[Effect::Shake]);
    assert!(!s.is_requested(Effect::Shake));
    assert!(s.pulse(Effect::Shake, 1500.0, 1400.0));
}
