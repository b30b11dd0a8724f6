//! Integration Tests for the Director
//!
//! These tests drive whole scripts through `Director::update` and check
//! scheduling, value propagation, graph edits and persistence together.

use std::sync::{Arc, Mutex};

use director_core::graph::{InputRef, OutputRef};
use director_core::kind::{NodeBehavior, NodeBuilder, NodeKind, NodeRegistry};
use director_core::{
    Director, DirectorConfig, DirectorError, NodeContext, NodeId, Result, Value,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

type Calls = Arc<Mutex<Vec<(Option<usize>, bool)>>>;

/// Records every update and stays active for `stay_for` updates.
struct Recorder {
    calls: Calls,
    stay_for: usize,
    updates: usize,
}

impl NodeBehavior for Recorder {
    fn build(&self, node: &mut NodeBuilder) {
        node.input("A").input("B").output("Out");
        node.latent();
    }

    fn update(
        &mut self,
        _ctx: &mut NodeContext<'_>,
        input: Option<usize>,
        first_update: bool,
    ) -> Result<bool> {
        self.calls.lock().unwrap().push((input, first_update));
        if first_update {
            self.updates = 0;
        }
        self.updates += 1;
        Ok(self.updates <= self.stay_for)
    }
}

/// Asks to stay active without being latent.
struct Stubborn;

impl NodeBehavior for Stubborn {
    fn build(&self, node: &mut NodeBuilder) {
        node.input("In").output("Out");
    }

    fn update(&mut self, _: &mut NodeContext<'_>, _: Option<usize>, _: bool) -> Result<bool> {
        Ok(true)
    }
}

fn director_with(calls: &Calls, stay_for: usize, config: DirectorConfig) -> Director {
    let mut registry = NodeRegistry::with_builtins();
    let calls = calls.clone();
    registry.register(NodeKind::new("Recorder", "Test", move || {
        Box::new(Recorder {
            calls: calls.clone(),
            stay_for,
            updates: 0,
        })
    }));
    registry.register(NodeKind::new("Stubborn", "Test", || Box::new(Stubborn)));
    Director::new(Arc::new(registry), config)
}

fn director() -> Director {
    init_tracing();
    director_with(&Calls::default(), 0, DirectorConfig::default())
}

/// Event -> Increment -> Log Message, with the increment bound to `Counter`.
fn counter_script(director: &mut Director) -> (NodeId, NodeId, NodeId, NodeId) {
    let root = director.root();
    let event = director.add_node(root, "Remote Event").unwrap();
    let action = director.add_node(root, "Increment").unwrap();
    let sink = director.add_node(root, "Log Message").unwrap();
    let counter = director.add_node(root, "Int").unwrap();

    director.set_property(event, "EventName", "bump").unwrap();
    director.set_node_name(counter, "Counter").unwrap();
    director.connect(event, "Out", action, "In").unwrap();
    director.connect(action, "Out", sink, "In").unwrap();
    director.connect_value(action, "Value", counter).unwrap();
    (event, action, sink, counter)
}

/// Three triggers in one tick are all delivered through the queue.
#[test]
fn three_triggers_in_one_tick() {
    let mut director = director();
    let (event, _action, sink, counter) = counter_script(&mut director);
    director.start();

    for _ in 0..3 {
        director.trigger(event).unwrap();
    }
    let report = director.update(0.1, 0.1);

    assert_eq!(director.value(counter).unwrap(), Value::Int(3));
    assert_eq!(director.input_activation_count(sink, "In").unwrap(), 3);
    assert_eq!(report.activations, 9);
    assert_eq!(report.active, 0);
    assert!(!report.overrun);
}

/// Triggers queued before the first update survive the implicit start.
#[test]
fn implicit_start_keeps_pending_triggers() {
    let mut director = director();
    let (event, ..) = counter_script(&mut director);
    let counter = director.find_value_node("Counter").unwrap();

    director.trigger(event).unwrap();
    assert!(!director.is_started());
    director.update(0.1, 0.1);

    assert!(director.is_started());
    assert_eq!(director.value(counter).unwrap(), Value::Int(1));
}

/// Start restores initial values.
#[test]
fn start_resets_values() {
    let mut director = director();
    let (event, _, _, counter) = counter_script(&mut director);
    director.set_initial_value(counter, 10).unwrap();
    director.start();

    director.trigger(event).unwrap();
    director.update(0.1, 0.1);
    assert_eq!(director.value(counter).unwrap(), Value::Int(11));

    director.start();
    assert_eq!(director.value(counter).unwrap(), Value::Int(10));
}

/// A 2 second delay at 0.5 second ticks fires on the fifth tick.
#[test]
fn delay_fires_after_its_time() {
    let mut director = director();
    let root = director.root();
    let event = director.add_node(root, "Remote Event").unwrap();
    let delay = director.add_node(root, "Delay").unwrap();
    let sink = director.add_node(root, "Log Message").unwrap();
    director.set_property(event, "EventName", "go").unwrap();
    director.set_property(delay, "Time", 2.0f32).unwrap();
    director.connect(event, "Out", delay, "Start").unwrap();
    director.connect(delay, "Out", sink, "In").unwrap();
    director.start();

    assert_eq!(director.fire_remote_event("go"), 1);
    director.update(0.5, 0.5);
    assert!(director.is_active(delay));

    for tick in 2..=4 {
        director.update(0.5, 0.5);
        assert!(director.is_active(delay), "inactive on tick {tick}");
        assert_eq!(director.output_test(delay, "Out").unwrap(), 0);
    }

    director.update(0.5, 0.5);
    assert!(!director.is_active(delay));
    assert_eq!(director.output_test(delay, "Out").unwrap(), 1);
    assert_eq!(director.input_activation_count(sink, "In").unwrap(), 1);
}

/// Stopping a delay fires `Stopped` and never `Out`.
#[test]
fn delay_can_be_stopped() {
    let mut director = director();
    let root = director.root();
    let start = director.add_node(root, "Remote Event").unwrap();
    let stop = director.add_node(root, "Remote Event").unwrap();
    let delay = director.add_node(root, "Delay").unwrap();
    director.set_property(start, "EventName", "start").unwrap();
    director.set_property(stop, "EventName", "stop").unwrap();
    director.connect(start, "Out", delay, "Start").unwrap();
    director.connect(stop, "Out", delay, "Stop").unwrap();

    director.fire_remote_event("start");
    director.update(0.5, 0.5);
    director.fire_remote_event("stop");
    director.update(0.5, 0.5);

    assert!(!director.is_active(delay));
    assert_eq!(director.output_test(delay, "Stopped").unwrap(), 1);
    assert_eq!(director.output_test(delay, "Out").unwrap(), 0);
}

/// A latent node sees `first_update` once, then continuing updates with no
/// input.
#[test]
fn latent_node_sees_first_update_once() {
    init_tracing();
    let calls = Calls::default();
    let mut director = director_with(&calls, 3, DirectorConfig::default());
    let root = director.root();
    let recorder = director.add_node(root, "Recorder").unwrap();
    let sink = director.add_node(root, "Log Message").unwrap();
    director.connect(recorder, "Out", sink, "In").unwrap();

    director.trigger(recorder).unwrap();
    for _ in 0..5 {
        director.update(0.1, 0.1);
    }

    let calls = calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![(None, true), (None, false), (None, false), (None, false)]
    );
    assert_eq!(director.input_activation_count(sink, "In").unwrap(), 1);
}

/// A retrigger while active is delivered with `first_update == false`.
#[test]
fn retrigger_while_active_is_not_first() {
    init_tracing();
    let calls = Calls::default();
    let mut director = director_with(&calls, 10, DirectorConfig::default());
    let root = director.root();
    let recorder = director.add_node(root, "Recorder").unwrap();

    director.trigger(recorder).unwrap();
    director.update(0.1, 0.1);
    director.trigger(recorder).unwrap();
    director.update(0.1, 0.1);

    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(None, true), (None, false), (None, false)]);
}

/// An activation whose input link disappeared arrives as spontaneous.
#[test]
fn out_of_range_input_is_spontaneous() {
    init_tracing();
    let calls = Calls::default();
    let mut director = director_with(&calls, 0, DirectorConfig::default());
    let root = director.root();
    let start = director.add_node(root, "Start Event").unwrap();
    let recorder = director.add_node(root, "Recorder").unwrap();
    director.connect(start, "Out", recorder, "B").unwrap();

    director.start();
    assert_eq!(director.pending_activations(), 1);
    director.remove_input_link(recorder, "A").unwrap();
    director.update(0.1, 0.1);

    assert_eq!(calls.lock().unwrap().clone(), vec![(None, true)]);
}

/// Input indices passed to `update` always name a connected link.
#[test]
fn disconnected_link_is_not_delivered() {
    init_tracing();
    let calls = Calls::default();
    let mut director = director_with(&calls, 0, DirectorConfig::default());
    let root = director.root();
    let start = director.add_node(root, "Start Event").unwrap();
    let recorder = director.add_node(root, "Recorder").unwrap();
    director.connect(start, "Out", recorder, "A").unwrap();

    director.start();
    director.disconnect(start, "Out", recorder, "A").unwrap();
    director.update(0.1, 0.1);

    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(director.input_activation_count(recorder, "A").unwrap(), 0);
}

/// A cycle of activation links is cut at the ceiling.
#[test]
fn activation_cycle_hits_the_ceiling() {
    init_tracing();
    let config = DirectorConfig {
        max_activations_per_tick: 50,
        ..DirectorConfig::default()
    };
    let mut director = director_with(&Calls::default(), 0, config);
    let root = director.root();
    let a = director.add_node(root, "Log Message").unwrap();
    let b = director.add_node(root, "Log Message").unwrap();
    director.connect(a, "Out", b, "In").unwrap();
    director.connect(b, "Out", a, "In").unwrap();

    director.trigger(a).unwrap();
    let report = director.update(0.1, 0.1);
    assert_eq!(report.activations, 50);
    assert_eq!(report.dropped, 1);
    assert!(report.overrun);

    let next = director.update(0.1, 0.1);
    assert_eq!(next.activations, 0);
    assert!(!next.overrun);
}

/// Completing nodes fire `Out` unless they fired something else.
#[test]
fn default_out_follows_the_chosen_branch() {
    let mut director = director();
    let root = director.root();
    let compare = director.add_node(root, "Compare Bool").unwrap();
    let flag = director.add_node(root, "Boolean").unwrap();
    director.connect_value(compare, "A", flag).unwrap();

    let event = director.add_node(root, "Remote Event").unwrap();
    director.set_property(event, "EventName", "cmp").unwrap();
    director.connect(event, "Out", compare, "In").unwrap();

    director.fire_remote_event("cmp");
    director.update(0.1, 0.1);
    assert_eq!(director.output_test(compare, "A == B").unwrap(), 1);

    director.set_value(flag, true).unwrap();
    director.fire_remote_event("cmp");
    director.update(0.1, 0.1);
    assert_eq!(director.output_test(compare, "A != B").unwrap(), 1);
    assert_eq!(director.output_test(event, "Out").unwrap(), 2);
}

/// Nodes with no input links cannot be triggered.
#[test]
fn value_nodes_are_not_triggerable() {
    let mut director = director();
    let root = director.root();
    let value = director.add_node(root, "Int").unwrap();
    assert_eq!(
        director.trigger(value),
        Err(DirectorError::NotTriggerable(value))
    );
}

/// A non-latent node cannot stay active.
#[test]
fn non_latent_node_is_deactivated() {
    let mut director = director();
    let root = director.root();
    let node = director.add_node(root, "Stubborn").unwrap();

    director.trigger(node).unwrap();
    let report = director.update(0.1, 0.1);
    assert_eq!(report.active, 0);
    assert_eq!(director.output_test(node, "Out").unwrap(), 1);
}

/// An unbound required link deactivates the node without firing.
#[test]
fn unbound_required_value_fails_soft() {
    let mut director = director();
    let root = director.root();
    let event = director.add_node(root, "Remote Event").unwrap();
    let action = director.add_node(root, "Increment").unwrap();
    let sibling = director.add_node(root, "Log Message").unwrap();
    director.set_property(event, "EventName", "go").unwrap();
    director.connect(event, "Out", action, "In").unwrap();
    director.connect(event, "Out", sibling, "In").unwrap();

    director.fire_remote_event("go");
    let report = director.update(0.1, 0.1);

    assert_eq!(director.output_test(action, "Out").unwrap(), 0);
    assert_eq!(director.output_test(sibling, "Out").unwrap(), 1);
    assert_eq!(report.active, 0);
}

/// A bool bound to `Enabled` switches a node off.
#[test]
fn enabled_link_gates_activations() {
    let mut director = director();
    let (event, action, _, counter) = counter_script(&mut director);
    let enabled = director.add_node(director.root(), "Boolean").unwrap();
    director.connect_value(action, "Enabled", enabled).unwrap();

    director.trigger(event).unwrap();
    director.update(0.1, 0.1);
    assert_eq!(director.value(counter).unwrap(), Value::Int(0));

    director.set_value(enabled, true).unwrap();
    director.trigger(event).unwrap();
    director.update(0.1, 0.1);
    assert_eq!(director.value(counter).unwrap(), Value::Int(1));

    director.set_node_enabled(event, false).unwrap();
    director.trigger(event).unwrap();
    director.update(0.1, 0.1);
    assert_eq!(director.value(counter).unwrap(), Value::Int(1));
}

/// A disabled director does nothing.
#[test]
fn disabled_director_is_inert() {
    let mut director = director();
    let (event, _, _, counter) = counter_script(&mut director);
    director.set_enabled(false);
    director.trigger(event).unwrap();

    let report = director.update(0.1, 0.1);
    assert_eq!(report.updated, 0);
    assert_eq!(director.pending_activations(), 1);
    assert_eq!(director.value(counter).unwrap(), Value::Int(0));
}

/// And over nothing is true, Or over nothing is false.
#[test]
fn empty_reductions_are_identities() {
    let mut director = director();
    let root = director.root();
    let and = director.add_node(root, "And").unwrap();
    let or = director.add_node(root, "Or").unwrap();
    director.start();

    assert_eq!(director.value(and).unwrap(), Value::Bool(true));
    assert_eq!(director.value(or).unwrap(), Value::Bool(false));
}

/// Reductions follow their inputs synchronously.
#[test]
fn reductions_recompute_on_every_write() {
    let mut director = director();
    let root = director.root();
    let and = director.add_node(root, "And").unwrap();
    let or = director.add_node(root, "Or").unwrap();
    let inputs: Vec<NodeId> = (0..3)
        .map(|_| director.add_node(root, "Boolean").unwrap())
        .collect();
    for input in &inputs {
        director.connect_value(and, "Values", *input).unwrap();
        director.connect_value(or, "Values", *input).unwrap();
    }
    director.start();

    let stored = |d: &Director, id: NodeId| d.node(id).unwrap().slot().unwrap().value().clone();
    assert_eq!(stored(&director, and), Value::Bool(false));
    assert_eq!(stored(&director, or), Value::Bool(false));

    director.set_value(inputs[1], true).unwrap();
    assert_eq!(stored(&director, and), Value::Bool(false));
    assert_eq!(stored(&director, or), Value::Bool(true));

    for input in &inputs {
        director.set_value(*input, true).unwrap();
    }
    assert_eq!(stored(&director, and), Value::Bool(true));

    director.set_value(inputs[0], false).unwrap();
    assert_eq!(stored(&director, and), Value::Bool(false));
    assert_eq!(stored(&director, or), Value::Bool(true));
}

/// A value change reaches every reader before `update` returns.
#[test]
fn change_is_pushed_to_every_dependent() {
    let mut director = director();
    let root = director.root();
    let source = director.add_node(root, "Boolean").unwrap();
    let readers: Vec<NodeId> = (0..5)
        .map(|_| {
            let reader = director.add_node(root, "Is Not").unwrap();
            director.connect_value(reader, "Value", source).unwrap();
            reader
        })
        .collect();

    let event = director.add_node(root, "Remote Event").unwrap();
    let toggle = director.add_node(root, "Toggle").unwrap();
    director.set_property(event, "EventName", "flip").unwrap();
    director.connect(event, "Out", toggle, "Set").unwrap();
    director.connect_value(toggle, "Value", source).unwrap();
    director.start();

    director.fire_remote_event("flip");
    director.update(0.1, 0.1);

    for reader in readers {
        let slot = director.node(reader).unwrap().slot().unwrap().clone();
        assert_eq!(slot.value(), &Value::Bool(false));
    }
}

/// Pull-based mutators compute when read.
#[test]
fn add_computes_on_read() {
    let mut director = director();
    let root = director.root();
    let add = director.add_node(root, "Add").unwrap();
    let a = director.add_node(root, "Int").unwrap();
    let b = director.add_node(root, "Float").unwrap();
    director.connect_value(add, "A", a).unwrap();
    director.connect_value(add, "B", b).unwrap();
    director.start();

    director.set_value(a, 2).unwrap();
    director.set_value(b, 0.5f32).unwrap();
    assert_eq!(director.value(add).unwrap(), Value::Double(2.5));
}

/// A value cycle that never settles terminates and is reported.
#[test]
fn value_cycle_is_truncated() {
    let mut director = director();
    let root = director.root();
    let ring: Vec<NodeId> = (0..3)
        .map(|_| director.add_node(root, "Is Not").unwrap())
        .collect();
    for (i, reader) in ring.iter().enumerate() {
        director
            .connect_value(*reader, "Value", ring[(i + 2) % 3])
            .unwrap();
    }
    director.start();

    director.set_value(ring[0], true).unwrap();
    let report = director.update(0.1, 0.1);
    assert!(report.overrun);
}

/// Global value nodes with the same name share writes.
#[test]
fn global_values_share_writes() {
    let mut director = director();
    let root = director.root();
    let nested = director.add_graph(root, "nested").unwrap();
    let first = director.add_node(root, "Int").unwrap();
    let second = director.add_node(nested, "Int").unwrap();
    let local = director.add_node(nested, "Int").unwrap();
    for id in [first, second, local] {
        director.set_node_name(id, "Score").unwrap();
    }
    director.set_global(first, true).unwrap();
    director.set_global(second, true).unwrap();

    director.set_value(first, 7).unwrap();
    assert_eq!(director.value(second).unwrap(), Value::Int(7));
    assert_eq!(director.value(local).unwrap(), Value::Int(0));

    director.set_initial_value(second, 3).unwrap();
    assert_eq!(director.initial_value(first).unwrap(), Value::Int(3));
}

/// Value links reject incompatible value nodes at edit time.
#[test]
fn incompatible_value_is_rejected() {
    let mut director = director();
    let root = director.root();
    let and = director.add_node(root, "And").unwrap();
    let text = director.add_node(root, "String").unwrap();

    assert!(matches!(
        director.connect_value(and, "Values", text),
        Err(DirectorError::IncompatibleTypes { .. })
    ));
    assert!(!director.node(and).unwrap().values()[1].is_linked());
}

/// Connect then disconnect restores both peer sets.
#[test]
fn connect_disconnect_restores_peers() {
    let mut director = director();
    let root = director.root();
    let a = director.add_node(root, "Log Message").unwrap();
    let b = director.add_node(root, "Log Message").unwrap();
    let c = director.add_node(root, "Log Message").unwrap();
    director.connect(a, "Out", c, "In").unwrap();

    let before_a = director.node(a).unwrap().outputs()[0].peers().to_vec();
    let before_b = director.node(b).unwrap().inputs()[0].peers().to_vec();

    assert!(director.connect(a, "Out", b, "In").unwrap());
    assert!(director.disconnect(a, "Out", b, "In").unwrap());
    assert!(!director.disconnect(a, "Out", b, "In").unwrap());

    assert_eq!(director.node(a).unwrap().outputs()[0].peers(), before_a.as_slice());
    assert_eq!(director.node(b).unwrap().inputs()[0].peers(), before_b.as_slice());
}

/// Removing a node leaves no peer pointing at it.
#[test]
fn removed_node_leaves_no_references() {
    let mut director = director();
    let (event, action, sink, counter) = counter_script(&mut director);
    director.trigger(event).unwrap();
    director.remove_node(action).unwrap();

    for id in director.script().node_ids() {
        let node = director.node(id).unwrap();
        assert!(node
            .outputs()
            .iter()
            .flat_map(|l| l.peers())
            .all(|p: &InputRef| p.node != action));
        assert!(node
            .inputs()
            .iter()
            .flat_map(|l| l.peers())
            .all(|p: &OutputRef| p.node != action));
    }
    assert!(director
        .node(counter)
        .unwrap()
        .slot()
        .unwrap()
        .dependents()
        .is_empty());

    let report = director.update(0.1, 0.1);
    assert_eq!(report.updated, 1);
    assert_eq!(director.input_activation_count(sink, "In").unwrap(), 0);
}

/// Cloning copies properties and values, not connections.
#[test]
fn clone_copies_settings() {
    let mut director = director();
    let (event, action, _, counter) = counter_script(&mut director);
    director.set_property(action, "Amount", 5).unwrap();
    let copy = director.clone_node(action, director.root()).unwrap();

    let node = director.node(copy).unwrap();
    assert_eq!(node.property("Amount"), Some(&Value::Int(5)));
    assert!(node.inputs()[0].peers().is_empty());
    assert!(!node.values().iter().any(|l| l.is_linked()));

    director.connect(event, "Out", copy, "In").unwrap();
    director.connect_value(copy, "Value", counter).unwrap();
    director.trigger(event).unwrap();
    director.update(0.1, 0.1);
    assert_eq!(director.value(counter).unwrap(), Value::Int(6));
}

/// Output counters are read-and-reset.
#[test]
fn output_test_reads_then_resets() {
    let mut director = director();
    let (event, ..) = counter_script(&mut director);
    director.trigger(event).unwrap();
    director.trigger(event).unwrap();
    director.update(0.1, 0.1);

    assert_eq!(director.output_test(event, "Out").unwrap(), 2);
    assert_eq!(director.output_test(event, "Out").unwrap(), 0);
}

/// A saved script reloads with the same behaviour.
#[test]
fn saved_script_runs_after_reload() {
    let mut original = director();
    let (_, _, _, counter) = counter_script(&mut original);
    original.set_initial_value(counter, 4).unwrap();
    let json = original.to_json().unwrap();
    let bytes = original.to_bytes().unwrap();

    let check = |load: &dyn Fn(&mut Director) -> Result<()>| {
        let mut reloaded = director();
        load(&mut reloaded).unwrap();
        assert_eq!(reloaded.script().node_count(), 4);

        reloaded.fire_remote_event("bump");
        reloaded.update(0.1, 0.1);
        let counter = reloaded.find_value_node("Counter").unwrap();
        assert_eq!(reloaded.value(counter).unwrap(), Value::Int(5));
    };
    check(&|d: &mut Director| d.load_json(&json));
    check(&|d: &mut Director| d.load_bytes(&bytes));
}

/// Links added by editing are saved and still carry activations after a
/// reload.
#[test]
fn added_links_survive_reload() {
    let mut original = director();
    let root = original.root();
    let a = original.add_node(root, "Log Message").unwrap();
    let b = original.add_node(root, "Log Message").unwrap();
    original.set_node_name(a, "A").unwrap();
    original.set_node_name(b, "B").unwrap();
    original.add_input_link(b, "Extra").unwrap();
    original.add_output_link(a, "Side").unwrap();
    original.connect(a, "Out", b, "Extra").unwrap();
    original.connect(a, "Side", b, "In").unwrap();
    let json = original.to_json().unwrap();
    let bytes = original.to_bytes().unwrap();

    let check = |load: &dyn Fn(&mut Director) -> Result<()>| {
        let mut reloaded = director();
        load(&mut reloaded).unwrap();
        let a = reloaded.find_nodes("A")[0];
        let b = reloaded.find_nodes("B")[0];
        assert!(reloaded.node(b).unwrap().input_index("Extra").is_ok());
        assert!(reloaded.node(a).unwrap().output_index("Side").is_ok());

        reloaded.trigger(a).unwrap();
        reloaded.update(0.1, 0.1);
        assert_eq!(reloaded.input_activation_count(b, "Extra").unwrap(), 1);
        assert_eq!(reloaded.input_activation_count(b, "In").unwrap(), 0);
    };
    check(&|d: &mut Director| d.load_json(&json));
    check(&|d: &mut Director| d.load_bytes(&bytes));
}

/// Input links added to an event-less node make it triggerable.
#[test]
fn added_input_makes_node_triggerable() {
    let mut director = director();
    let value = director.add_node(director.root(), "Int").unwrap();
    assert!(director.trigger(value).is_err());

    director.add_input_link(value, "Poke").unwrap();
    director.trigger(value).unwrap();
}

/// A script naming an unknown kind leaves the director empty.
#[test]
fn structural_error_leaves_director_empty() {
    let mut source = director();
    counter_script(&mut source);
    let json = source.to_json().unwrap().replace("Increment", "Teleport");

    let mut target = director();
    counter_script(&mut target);
    let err = target.load_json(&json).unwrap_err();

    assert!(matches!(err, DirectorError::Structural(_)));
    assert_eq!(target.script().node_count(), 0);
}

/// Stopping drops active nodes and pending work.
#[test]
fn stop_clears_active_nodes() {
    let mut director = director();
    let root = director.root();
    let looping = director.add_node(root, "Loop").unwrap();
    director.set_property(looping, "Time", 0.25f32).unwrap();
    director.trigger(looping).unwrap();

    director.update(0.5, 0.5);
    director.update(0.5, 0.5);
    assert!(director.is_active(looping));
    assert_eq!(director.output_test(looping, "Cycle").unwrap(), 2);

    director.stop();
    assert!(!director.is_started());
    assert_eq!(director.active_count(), 0);
}

/// Nested graphs can be disabled and removed.
#[test]
fn nested_graph_lifecycle() {
    let mut director = director();
    let root = director.root();
    let nested = director.add_graph(root, "nested").unwrap();
    let event = director.add_node(nested, "Remote Event").unwrap();
    director.set_property(event, "EventName", "go").unwrap();

    director.set_graph_enabled(nested, false).unwrap();
    director.fire_remote_event("go");
    director.update(0.1, 0.1);
    assert_eq!(director.output_test(event, "Out").unwrap(), 0);

    director.remove_graph(nested).unwrap();
    assert_eq!(director.node(event).unwrap_err(), DirectorError::UnknownNode(event));
    assert!(director.remove_graph(root).is_err());
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Node logging reports executions of nodes that opted in.
#[test]
fn node_logging_reports_opted_in_nodes() {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let config = DirectorConfig {
            node_logging: true,
            ..DirectorConfig::default()
        };
        let mut director = director_with(&Calls::default(), 0, config);
        let (event, action, _, _) = counter_script(&mut director);
        director.set_node_name(event, "Bumper").unwrap();
        director.set_node_name(action, "Adder").unwrap();
        director.set_property(action, "LogNode", true).unwrap();

        director.trigger(event).unwrap();
        director.update(0.1, 0.1);
    });

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    let executed: Vec<&str> = output.lines().filter(|l| l.contains("Executed")).collect();
    assert_eq!(executed.len(), 1, "{output}");
    assert!(executed[0].contains("Adder"));
    assert!(executed[0].contains("General::Increment"));
}
