//! Runtime nodes: one live ornament per displayed message.
//!
//! # Responsibility
//! - Create ornaments idempotently and play their birth animation.
//! - Drive idle sway/spin, highlight pulses and the hover reveal debounce
//!   from a single `update(dt)` per frame.
//! - Dispatch pointer picks to registered hover/click callbacks.
//!
//! # Invariants
//! - At most one node per message id.
//! - Every render handle is released on `remove`, `dispose` or drop.
//! - Per-frame work is linear in live nodes plus live pulses.

use crate::model::message::{Message, MessageId};
use crate::model::vec3::Vec3;
use crate::scene::animation::{
    birth_scale, pulse_frame, sway_offset, BIRTH_DURATION, BIRTH_START_SCALE, PULSE_DURATION,
    SPIN_SPEED,
};
use crate::scene::backend::{RenderHandle, SceneBackend, Transform};
use crate::scene::camera::{Camera, PointerPosition};
use log::{debug, info};
use rand::Rng;
use std::collections::HashMap;
use std::f64::consts::TAU;

/// Pointer must rest on the same node this long before its label shows.
pub const HOVER_REVEAL_DELAY: f64 = 0.25;
/// Pick sphere radius at rest scale.
pub const PICK_RADIUS: f64 = 0.18;

/// Label reveal/hide notification for the hover-label collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverEvent {
    /// `None` hides the label.
    pub message: Option<Message>,
    pub screen: PointerPosition,
}

type ClickCallback = Box<dyn FnMut(&Message)>;
type HoverCallback = Box<dyn FnMut(&HoverEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnimationKind {
    Birth,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    kind: AnimationKind,
    started_at: f64,
    duration: f64,
}

struct Node {
    message: Message,
    handle: RenderHandle,
    origin: Vec3,
    phase: f64,
    position: Vec3,
    scale: f64,
    rotation_y: f64,
    animation: Option<Animation>,
}

impl Node {
    fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            scale: self.scale,
            rotation_y: self.rotation_y,
        }
    }
}

struct Pulse {
    handle: RenderHandle,
    started_at: f64,
}

struct PendingReveal {
    id: MessageId,
    due_at: f64,
    screen: PointerPosition,
}

#[derive(Default)]
struct HoverState {
    target: Option<MessageId>,
    pending: Option<PendingReveal>,
    revealed: Option<MessageId>,
}

/// Owns every live node and its render resources.
pub struct NodeManager<B: SceneBackend> {
    backend: B,
    nodes: HashMap<MessageId, Node>,
    pulses: Vec<Pulse>,
    clock: f64,
    hover: HoverState,
    on_click: Option<ClickCallback>,
    on_hover: Option<HoverCallback>,
}

impl<B: SceneBackend> NodeManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            nodes: HashMap::new(),
            pulses: Vec::new(),
            clock: 0.0,
            hover: HoverState::default(),
            on_click: None,
            on_hover: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Seconds advanced through `update` so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn on_click(&mut self, callback: impl FnMut(&Message) + 'static) {
        self.on_click = Some(Box::new(callback));
    }

    pub fn on_hover(&mut self, callback: impl FnMut(&HoverEvent) + 'static) {
        self.on_hover = Some(Box::new(callback));
    }

    /// Creates the node for `message`. Returns `false` if one already exists.
    pub fn create(&mut self, message: &Message) -> bool {
        if self.nodes.contains_key(message.id()) {
            return false;
        }

        let handle = self.backend.spawn_node(message);
        let origin = message.placement().position;
        let node = Node {
            message: message.clone(),
            handle,
            origin,
            phase: rand::thread_rng().gen_range(0.0..TAU),
            position: origin,
            scale: BIRTH_START_SCALE,
            rotation_y: 0.0,
            animation: Some(Animation {
                kind: AnimationKind::Birth,
                started_at: self.clock,
                duration: BIRTH_DURATION,
            }),
        };
        self.backend.set_transform(handle, &node.transform());
        self.nodes.insert(message.id().to_string(), node);

        debug!(
            "event=node_create module=scene status=ok handle={} live_nodes={}",
            handle.0,
            self.nodes.len()
        );
        true
    }

    /// Releases the node for `id`. Returns `false` when no such node exists.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(node) = self.nodes.remove(id) else {
            return false;
        };
        self.backend.release(node.handle);

        if self.hover.target.as_deref() == Some(id) {
            self.hover.target = None;
            self.hover.pending = None;
        }
        if self.hover.revealed.as_deref() == Some(id) {
            self.hover.revealed = None;
            self.emit_hover(HoverEvent {
                message: None,
                screen: PointerPosition::default(),
            });
        }
        true
    }

    /// Releases every node and pulse.
    pub fn dispose(&mut self) {
        if self.nodes.is_empty() && self.pulses.is_empty() {
            return;
        }

        let released = self.nodes.len() + self.pulses.len();
        for (_, node) in self.nodes.drain() {
            self.backend.release(node.handle);
        }
        for pulse in self.pulses.drain(..) {
            self.backend.release(pulse.handle);
        }
        self.hover = HoverState::default();
        info!("event=node_dispose module=scene status=ok released={released}");
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn live_pulses(&self) -> usize {
        self.pulses.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Current animated position.
    pub fn position_of(&self, id: &str) -> Option<Vec3> {
        self.nodes.get(id).map(|node| node.position)
    }

    /// Position the node was created at; sway is measured from here.
    pub fn original_position_of(&self, id: &str) -> Option<Vec3> {
        self.nodes.get(id).map(|node| node.origin)
    }

    pub fn scale_of(&self, id: &str) -> Option<f64> {
        self.nodes.get(id).map(|node| node.scale)
    }

    pub fn is_animating(&self, id: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| node.animation.is_some())
    }

    /// Advances every clock-driven effect by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        self.clock += dt;
        let now = self.clock;

        for node in self.nodes.values_mut() {
            let animation = node.animation;
            node.scale = match animation {
                Some(animation) => {
                    let t = (now - animation.started_at) / animation.duration;
                    match animation.kind {
                        AnimationKind::Birth => {
                            if t >= 1.0 {
                                node.animation = None;
                            }
                            birth_scale(t)
                        }
                    }
                }
                None => 1.0,
            };
            node.position = node.origin + sway_offset(now, node.phase);
            node.rotation_y = (node.rotation_y + dt * SPIN_SPEED) % TAU;
            self.backend.set_transform(node.handle, &node.transform());
        }

        let backend = &mut self.backend;
        self.pulses.retain(|pulse| {
            let t = (now - pulse.started_at) / PULSE_DURATION;
            if t >= 1.0 {
                backend.release(pulse.handle);
                return false;
            }
            let (radius, opacity) = pulse_frame(t);
            backend.set_pulse(pulse.handle, radius, opacity);
            true
        });

        self.fire_due_reveal();
    }

    /// Updates hover state for a pointer move and returns the node under it.
    ///
    /// A label reveal is scheduled `HOVER_REVEAL_DELAY` after the target
    /// changes; leaving the target first cancels it.
    pub fn hover(&mut self, pointer: PointerPosition, camera: &Camera) -> Option<&Message> {
        let hit = self.pick(pointer, camera);

        if hit != self.hover.target {
            self.hover.pending = None;
            if self.hover.revealed.take().is_some() {
                self.emit_hover(HoverEvent {
                    message: None,
                    screen: pointer,
                });
            }
            self.hover.pending = hit.clone().map(|id| PendingReveal {
                id,
                due_at: self.clock + HOVER_REVEAL_DELAY,
                screen: pointer,
            });
            self.hover.target = hit;
        } else if let Some(pending) = self.hover.pending.as_mut() {
            pending.screen = pointer;
        }

        let target = self.hover.target.as_deref()?;
        self.nodes.get(target).map(|node| &node.message)
    }

    /// Picks the node under `pointer` and hands its message to the click callback.
    pub fn click(&mut self, pointer: PointerPosition, camera: &Camera) -> Option<Message> {
        let id = self.pick(pointer, camera)?;
        let message = self.nodes.get(&id)?.message.clone();
        if let Some(callback) = self.on_click.as_mut() {
            callback(&message);
        }
        Some(message)
    }

    /// Starts a highlight pulse on the node for `id` and returns its position.
    pub fn highlight(&mut self, id: &str) -> Option<Vec3> {
        let position = self.nodes.get(id)?.position;
        let handle = self.backend.spawn_pulse(position);
        let (radius, opacity) = pulse_frame(0.0);
        self.backend.set_pulse(handle, radius, opacity);
        self.pulses.push(Pulse {
            handle,
            started_at: self.clock,
        });
        Some(position)
    }

    fn pick(&self, pointer: PointerPosition, camera: &Camera) -> Option<MessageId> {
        let ray = camera.ray_through(pointer);
        self.nodes
            .iter()
            .filter_map(|(id, node)| {
                ray.intersect_sphere(node.position, PICK_RADIUS * node.scale)
                    .map(|distance| (distance, id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)))
            .map(|(_, id)| id.clone())
    }

    fn fire_due_reveal(&mut self) {
        let due = self
            .hover
            .pending
            .as_ref()
            .is_some_and(|pending| self.clock + 1e-9 >= pending.due_at);
        if !due {
            return;
        }

        let Some(pending) = self.hover.pending.take() else {
            return;
        };
        let Some(message) = self.nodes.get(&pending.id).map(|node| node.message.clone()) else {
            return;
        };
        self.hover.revealed = Some(pending.id);
        self.emit_hover(HoverEvent {
            message: Some(message),
            screen: pending.screen,
        });
    }

    fn emit_hover(&mut self, event: HoverEvent) {
        if let Some(callback) = self.on_hover.as_mut() {
            callback(&event);
        }
    }
}

impl<B: SceneBackend> Drop for NodeManager<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
