//! Activation Links
//!
//! Input and output links are the named control-flow ports of a node. An
//! output keeps the ordered list of inputs it feeds and each input keeps
//! the outputs feeding it. The two lists are only ever changed together by
//! [`Script::connect`](super::Script::connect) and friends, so peer sets
//! stay symmetric.
//!
//! Activating an output does not call anything: the director enqueues one
//! activation per connected input and drains the queue breadth-first. See
//! [`ActivationQueue`](super::ActivationQueue).

use smallvec::SmallVec;

use super::id::{InputRef, OutputRef};

/// A named activation entry point of a node.
#[derive(Debug, Clone)]
pub struct InputLink {
    name: String,
    comment: String,
    visible: bool,
    /// Number of activations delivered through this link.
    activations: u32,
    /// Outputs connected to this input, in connection order.
    peers: SmallVec<[OutputRef; 2]>,
}

impl InputLink {
    /// Create an unconnected input.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            visible: true,
            activations: 0,
            peers: SmallVec::new(),
        }
    }

    /// The link name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Editor comment.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Set the editor comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Whether editors should draw this link.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the link in editors.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Number of activations delivered through this link since the script
    /// started.
    pub fn activation_count(&self) -> u32 {
        self.activations
    }

    /// Outputs connected to this input.
    pub fn peers(&self) -> &[OutputRef] {
        &self.peers
    }

    /// Check if `output` feeds this input.
    pub fn is_connected_to(&self, output: OutputRef) -> bool {
        self.peers.contains(&output)
    }

    pub(crate) fn record_activation(&mut self) {
        self.activations = self.activations.saturating_add(1);
    }

    pub(crate) fn reset_activations(&mut self) {
        self.activations = 0;
    }

    pub(crate) fn add_peer(&mut self, output: OutputRef) -> bool {
        if self.peers.contains(&output) {
            return false;
        }
        self.peers.push(output);
        true
    }

    pub(crate) fn remove_peer(&mut self, output: OutputRef) -> bool {
        let before = self.peers.len();
        self.peers.retain(|p| *p != output);
        self.peers.len() != before
    }

    pub(crate) fn take_peers(&mut self) -> SmallVec<[OutputRef; 2]> {
        std::mem::take(&mut self.peers)
    }

    pub(crate) fn replace_peer(&mut self, from: OutputRef, to: OutputRef) {
        for peer in self.peers.iter_mut() {
            if *peer == from {
                *peer = to;
            }
        }
    }
}

/// A named activation exit point of a node.
#[derive(Debug, Clone)]
pub struct OutputLink {
    name: String,
    comment: String,
    visible: bool,
    /// Activations since the last [`test`](Self::test).
    activations: u32,
    /// Inputs fed by this output, in connection order.
    peers: SmallVec<[InputRef; 4]>,
}

impl OutputLink {
    /// Create an unconnected output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            visible: true,
            activations: 0,
            peers: SmallVec::new(),
        }
    }

    /// The link name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Editor comment.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Set the editor comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Whether editors should draw this link.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the link in editors.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Inputs fed by this output.
    pub fn peers(&self) -> &[InputRef] {
        &self.peers
    }

    /// Check if this output feeds `input`.
    pub fn is_connected_to(&self, input: InputRef) -> bool {
        self.peers.contains(&input)
    }

    /// Activations accumulated since the last call, without resetting.
    pub fn pending(&self) -> u32 {
        self.activations
    }

    /// Read and clear the activation count.
    pub fn test(&mut self) -> u32 {
        std::mem::take(&mut self.activations)
    }

    pub(crate) fn pulse(&mut self) {
        self.activations = self.activations.saturating_add(1);
    }

    pub(crate) fn add_peer(&mut self, input: InputRef) -> bool {
        if self.peers.contains(&input) {
            return false;
        }
        self.peers.push(input);
        true
    }

    pub(crate) fn remove_peer(&mut self, input: InputRef) -> bool {
        let before = self.peers.len();
        self.peers.retain(|p| *p != input);
        self.peers.len() != before
    }

    pub(crate) fn take_peers(&mut self) -> SmallVec<[InputRef; 4]> {
        std::mem::take(&mut self.peers)
    }

    pub(crate) fn replace_peer(&mut self, from: InputRef, to: InputRef) {
        for peer in self.peers.iter_mut() {
            if *peer == from {
                *peer = to;
            }
        }
    }
}
