//! Rendering seam between the node manager and a scene graph.
//!
//! # Responsibility
//! - Define the handle-based contract a renderer implements.
//! - Provide `HeadlessScene`, a renderer that only tracks live objects.
//!
//! # Invariants
//! - Every handle returned by `spawn_*` is released exactly once.

use crate::model::message::{Message, TreePart};
use crate::model::vec3::Vec3;
use log::warn;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Opaque id of a renderer-owned object (geometry + material).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u64);

/// Placement of an ornament for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: f64,
    pub rotation_y: f64,
}

/// Scene graph operations used by the node manager.
pub trait SceneBackend {
    /// Creates the ornament for `message` at its placement.
    fn spawn_node(&mut self, message: &Message) -> RenderHandle;
    /// Creates a highlight ring centred on `center`.
    fn spawn_pulse(&mut self, center: Vec3) -> RenderHandle;
    fn set_transform(&mut self, handle: RenderHandle, transform: &Transform);
    fn set_pulse(&mut self, handle: RenderHandle, radius: f64, opacity: f64);
    /// Frees geometry and material behind `handle`.
    fn release(&mut self, handle: RenderHandle);
}

/// Object tracked by `HeadlessScene`.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessObject {
    Node {
        message_id: String,
        category: TreePart,
        intensity: f64,
        transform: Transform,
    },
    Pulse {
        center: Vec3,
        radius: f64,
        opacity: f64,
    },
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_handle: u64,
    live: HashMap<RenderHandle, HeadlessObject>,
    spawned_total: u64,
    released_total: u64,
}

/// Renderer that draws nothing and records every live object.
///
/// Clones share state, so a caller can keep a clone to inspect the scene
/// after handing the original to a `NodeManager`.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live nodes plus live pulses.
    pub fn live_resources(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn live_nodes(&self) -> usize {
        self.count(|object| matches!(object, HeadlessObject::Node { .. }))
    }

    pub fn live_pulses(&self) -> usize {
        self.count(|object| matches!(object, HeadlessObject::Pulse { .. }))
    }

    pub fn spawned_total(&self) -> u64 {
        self.state.borrow().spawned_total
    }

    pub fn released_total(&self) -> u64 {
        self.state.borrow().released_total
    }

    pub fn object(&self, handle: RenderHandle) -> Option<HeadlessObject> {
        self.state.borrow().live.get(&handle).cloned()
    }

    fn count(&self, predicate: impl Fn(&HeadlessObject) -> bool) -> usize {
        self.state
            .borrow()
            .live
            .values()
            .filter(|object| predicate(object))
            .count()
    }

    fn insert(&mut self, object: HeadlessObject) -> RenderHandle {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        state.spawned_total += 1;
        let handle = RenderHandle(state.next_handle);
        state.live.insert(handle, object);
        handle
    }
}

impl SceneBackend for HeadlessScene {
    fn spawn_node(&mut self, message: &Message) -> RenderHandle {
        let placement = message.placement();
        self.insert(HeadlessObject::Node {
            message_id: message.id().to_string(),
            category: placement.category,
            intensity: placement.intensity,
            transform: Transform {
                position: placement.position,
                scale: 1.0,
                rotation_y: 0.0,
            },
        })
    }

    fn spawn_pulse(&mut self, center: Vec3) -> RenderHandle {
        self.insert(HeadlessObject::Pulse {
            center,
            radius: 0.0,
            opacity: 1.0,
        })
    }

    fn set_transform(&mut self, handle: RenderHandle, next: &Transform) {
        if let Some(HeadlessObject::Node { transform, .. }) =
            self.state.borrow_mut().live.get_mut(&handle)
        {
            *transform = *next;
        }
    }

    fn set_pulse(&mut self, handle: RenderHandle, next_radius: f64, next_opacity: f64) {
        if let Some(HeadlessObject::Pulse {
            radius, opacity, ..
        }) = self.state.borrow_mut().live.get_mut(&handle)
        {
            *radius = next_radius;
            *opacity = next_opacity;
        }
    }

    fn release(&mut self, handle: RenderHandle) {
        let mut state = self.state.borrow_mut();
        if state.live.remove(&handle).is_some() {
            state.released_total += 1;
        } else {
            warn!(
                "event=render_release module=scene status=error error_code=unknown_handle handle={}",
                handle.0
            );
        }
    }
}
