//! Left-child / right-sibling scene graph
//!
//! Nodes live in an arena and link to their first child and next sibling by
//! [`NodeId`]. There are no parent links: the parent's world transform is
//! passed down the traversal instead. Topology is fixed once built; only the
//! per-frame local/world matrices change.

use std::fmt;

use cgmath::{Matrix4, SquareMatrix};

pub type NodeId = usize;

/// Maps the frame state to a node's local transform
pub type TransformFn<S> = Box<dyn Fn(&S) -> Matrix4<f32>>;

/// Receives the node's world transform and emits into the frame output
pub type RenderFn<S, O> = Box<dyn Fn(&Matrix4<f32>, &S, &mut O)>;

/// Where a node is within the current frame's traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStage {
    Uncomputed,
    LocalComputed,
    WorldComputed,
    Rendered,
}

pub struct SceneNode<S, O> {
    pub name: String,
    transform_fn: TransformFn<S>,
    render_fn: Option<RenderFn<S, O>>,
    left_child: Option<NodeId>,
    right_sibling: Option<NodeId>,
    local: Matrix4<f32>,
    world: Matrix4<f32>,
    stage: NodeStage,
}

impl<S, O> SceneNode<S, O> {
    pub fn left_child(&self) -> Option<NodeId> {
        self.left_child
    }

    pub fn right_sibling(&self) -> Option<NodeId> {
        self.right_sibling
    }

    pub fn local(&self) -> Matrix4<f32> {
        self.local
    }

    pub fn world(&self) -> Matrix4<f32> {
        self.world
    }

    pub fn stage(&self) -> NodeStage {
        self.stage
    }

    /// Pure grouping nodes have no render function
    pub fn is_group(&self) -> bool {
        self.render_fn.is_none()
    }
}

impl<S, O> fmt::Debug for SceneNode<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("left_child", &self.left_child)
            .field("right_sibling", &self.right_sibling)
            .field("stage", &self.stage)
            .finish()
    }
}

pub struct SceneGraph<S, O> {
    nodes: Vec<SceneNode<S, O>>,
    root: Option<NodeId>,
}

impl<S, O> Default for SceneGraph<S, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, O> SceneGraph<S, O> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Adds a node without a render function. With `parent == None` the node
    /// becomes a top-level node (the root, or a sibling of it).
    pub fn add_group(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        transform: impl Fn(&S) -> Matrix4<f32> + 'static,
    ) -> NodeId {
        self.insert(parent, name.into(), Box::new(transform), None)
    }

    pub fn add_drawable(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        transform: impl Fn(&S) -> Matrix4<f32> + 'static,
        render: impl Fn(&Matrix4<f32>, &S, &mut O) + 'static,
    ) -> NodeId {
        self.insert(parent, name.into(), Box::new(transform), Some(Box::new(render)))
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        transform_fn: TransformFn<S>,
        render_fn: Option<RenderFn<S, O>>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SceneNode {
            name,
            transform_fn,
            render_fn,
            left_child: None,
            right_sibling: None,
            local: Matrix4::identity(),
            world: Matrix4::identity(),
            stage: NodeStage::Uncomputed,
        });

        // New nodes go to the end of the sibling chain so traversal follows
        // insertion order.
        let head = match parent {
            Some(p) => self.nodes[p].left_child,
            None => self.root,
        };
        match head {
            None => match parent {
                Some(p) => self.nodes[p].left_child = Some(id),
                None => self.root = Some(id),
            },
            Some(first) => {
                let last = self.last_sibling(first);
                self.nodes[last].right_sibling = Some(id);
            }
        }
        id
    }

    fn last_sibling(&self, mut id: NodeId) -> NodeId {
        while let Some(next) = self.nodes[id].right_sibling {
            id = next;
        }
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode<S, O>> {
        self.nodes.get(id)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Direct children in sibling order
    pub fn children(&self, id: NodeId) -> Children<'_, S, O> {
        Children {
            graph: self,
            next: self.nodes.get(id).and_then(|n| n.left_child),
        }
    }

    /// Recomputes every transform from `state` and renders depth-first.
    ///
    /// The root's parent transform is identity; a view matrix belongs in the
    /// root node's own transform function.
    pub fn traverse(&mut self, state: &S, out: &mut O) {
        for node in &mut self.nodes {
            node.stage = NodeStage::Uncomputed;
        }
        if let Some(root) = self.root {
            self.visit(root, Matrix4::identity(), state, out);
        }
    }

    /// local = f(state); world = parent · local; render; then the child
    /// inherits `world` while the sibling gets the same `parent` this node
    /// got.
    fn visit(&mut self, id: NodeId, parent: Matrix4<f32>, state: &S, out: &mut O) {
        let local = (self.nodes[id].transform_fn)(state);
        let node = &mut self.nodes[id];
        node.local = local;
        node.stage = NodeStage::LocalComputed;

        let world = parent * local;
        node.world = world;
        node.stage = NodeStage::WorldComputed;

        if let Some(render) = &self.nodes[id].render_fn {
            render(&world, state, out);
        }
        self.nodes[id].stage = NodeStage::Rendered;

        if let Some(child) = self.nodes[id].left_child {
            self.visit(child, world, state, out);
        }
        if let Some(sibling) = self.nodes[id].right_sibling {
            self.visit(sibling, parent, state, out);
        }
    }
}

pub struct Children<'a, S, O> {
    graph: &'a SceneGraph<S, O>,
    next: Option<NodeId>,
}

impl<S, O> Iterator for Children<'_, S, O> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.nodes[current].right_sibling;
        Some(current)
    }
}
