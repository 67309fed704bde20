// Host-side tests for the control queue between JS calls and the frame loop.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod controls {
    include!("../src/controls.rs");
}

use controls::*;
use orb_core::{Effect, FieldConfig, Rgb, Simulation, SimulationConfig};

fn small_sim() -> Simulation {
    let config = SimulationConfig {
        field: FieldConfig {
            count: 64,
            ..FieldConfig::default()
        },
        ..SimulationConfig::default()
    };
    Simulation::new(&config, 21)
}

#[test]
fn colored_effect_queues_palette_before_pulse() {
    let mut queue = ControlQueue::new();
    let reply = queue.handle_tool_call("anger", "{}");
    assert!(reply.success);
    assert_eq!(queue.len(), 2);

    let mut sim = small_sim();
    assert_eq!(queue.apply(&mut sim, 0.0), 2);
    assert!(queue.is_empty());
    assert!(sim.timers().is_active(Effect::Anger));
    assert_eq!(sim.signals().release_time(Effect::Anger), Some(3000.0));
    assert_eq!(sim.palette().target(), &[Rgb::new(1.0, 0.0, 0.0)]);
}

#[test]
fn failed_calls_queue_nothing() {
    let mut queue = ControlQueue::new();
    let reply = queue.handle_tool_call("teleport", "{}");
    assert!(!reply.success);
    assert_eq!(reply.message.as_deref(), Some("Unknown tool"));
    let reply = queue.handle_tool_call("change_orb_color", "{}");
    assert_eq!(reply.message.as_deref(), Some("Missing color"));
    assert!(queue.is_empty());
}

#[test]
fn repeated_calls_do_not_extend_a_held_effect() {
    let mut queue = ControlQueue::new();
    let mut sim = small_sim();
    queue.handle_tool_call("nod", "");
    queue.apply(&mut sim, 0.0);
    queue.handle_tool_call("nod", "");
    queue.apply(&mut sim, 500.0);
    assert_eq!(
        sim.timers().record(Effect::Nod).map(|r| r.start_ms),
        Some(0.0)
    );
    assert_eq!(sim.signals().release_time(Effect::Nod), Some(1400.0));
}

#[test]
fn excitement_holds_for_one_second() {
    let mut queue = ControlQueue::new();
    let mut sim = small_sim();
    queue.handle_tool_call("excitement", "{}");
    assert_eq!(queue.len(), 1);
    queue.apply(&mut sim, 250.0);
    assert_eq!(sim.signals().release_time(Effect::Excitement), Some(1250.0));
}

#[test]
fn audio_level_is_clamped() {
    let mut queue = ControlQueue::new();
    queue.set_audio_level(0.4);
    assert_eq!(queue.audio_level(), 0.4);
    queue.set_audio_level(3.0);
    assert_eq!(queue.audio_level(), 1.0);
    queue.set_audio_level(-1.0);
    assert_eq!(queue.audio_level(), 0.0);
    queue.set_audio_level(f32::NAN);
    assert_eq!(queue.audio_level(), 0.0);
}

#[test]
fn apply_on_empty_queue_is_a_no_op() {
    let mut queue = ControlQueue::new();
    let mut sim = small_sim();
    assert_eq!(queue.apply(&mut sim, 0.0), 0);
    assert_eq!(sim.timers().active_count(), 0);
}

#[test]
fn closed_queue_rejects_calls_and_audio() {
    let mut queue = ControlQueue::new();
    queue.set_audio_level(0.6);
    queue.handle_tool_call("wave", "{}");
    queue.close();
    assert!(queue.is_closed());
    assert!(queue.is_empty());
    assert_eq!(queue.audio_level(), 0.0);

    let reply = queue.handle_tool_call("change_orb_color", r#"{"color":"red"}"#);
    assert_eq!(reply.to_json(), r#"{"success":false,"message":"orb is stopped"}"#);
    queue.set_audio_level(0.9);
    assert_eq!(queue.audio_level(), 0.0);
    assert!(queue.is_empty());
}
