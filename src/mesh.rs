//! The mesh data model: vertices, edges, triangles and corners.
//!
//! A [`Mesh`] owns two arenas — one of vertices, one of triangles — and all
//! navigation is done through small `Copy` handles (`VertexId`, `TriangleId`,
//! and the `Corner`/`Edge`/`Triangle` views below) rather than through shared
//! pointers. The graph is built once by the [`crate::builder`] and never torn
//! down piecewise, so an arena with intra-arena indices is the natural fit
//! (see design notes on cyclic ownership).

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::geom::{Line, Vec2};

/// Opaque handle to a vertex within a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(pub(crate) usize);

/// Opaque handle to a triangle within a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleId(pub(crate) usize);

/// A reference to one of a triangle's three corners: `slot` is in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CornerRef {
    pub triangle: TriangleId,
    pub slot: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SwingLink {
    pub target: Option<CornerRef>,
    pub sup: bool,
}

pub(crate) struct VertexData {
    pub loc: Vec2,
    pub corner: Option<CornerRef>,
}

pub(crate) struct TriangleData {
    pub vertices: [VertexId; 3],
    pub swing_next: [SwingLink; 3],
    pub swing_prev: [SwingLink; 3],
}

impl TriangleData {
    pub(crate) fn new(vertices: [VertexId; 3]) -> Self {
        TriangleData {
            vertices,
            swing_next: [SwingLink::default(); 3],
            swing_prev: [SwingLink::default(); 3],
        }
    }
}

/// Owns the vertices and triangles produced by the advancing-front builder
/// and exposes read-only navigation over them.
pub struct Mesh {
    pub(crate) vertices: Vec<VertexData>,
    pub(crate) triangles: Vec<TriangleData>,
}

impl Mesh {
    pub(crate) fn from_parts(vertices: Vec<VertexData>, triangles: Vec<TriangleData>) -> Self {
        Mesh { vertices, triangles }
    }

    /// Input points as mesh vertices, in the order they were supplied.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex<'_>> {
        (0..self.vertices.len()).map(move |i| Vertex {
            mesh: self,
            id: VertexId(i),
        })
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle<'_>> {
        (0..self.triangles.len()).map(move |i| Triangle {
            mesh: self,
            id: TriangleId(i),
        })
    }

    /// The deduplicated set of edges appearing in at least one triangle.
    pub fn edges(&self) -> HashSet<Edge<'_>> {
        let mut out = HashSet::new();
        for t in self.triangles() {
            for e in t.edges() {
                out.insert(e);
            }
        }
        out
    }

    pub(crate) fn vertex_loc(&self, id: VertexId) -> Vec2 {
        self.vertices[id.0].loc
    }

    fn vertex_at(&self, c: CornerRef) -> VertexId {
        self.triangles[c.triangle.0].vertices[c.slot as usize]
    }
}

/// One of the input points, as it appears in the mesh.
#[derive(Clone, Copy)]
pub struct Vertex<'m> {
    mesh: &'m Mesh,
    id: VertexId,
}

impl<'m> Vertex<'m> {
    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn loc(&self) -> Vec2 {
        self.mesh.vertex_loc(self.id)
    }

    /// One arbitrary corner incident to this vertex.
    ///
    /// Always present: every vertex in a [`Mesh`] belongs to at least one
    /// triangle.
    pub fn corner(&self) -> Corner<'m> {
        let c = self.mesh.vertices[self.id.0]
            .corner
            .expect("every mesh vertex has a representative corner");
        Corner {
            mesh: self.mesh,
            triangle: c.triangle,
            slot: c.slot,
        }
    }
}

impl PartialEq for Vertex<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Vertex<'_> {}

/// An unordered pair of distinct vertices. `Edge(a, b) == Edge(b, a)`.
#[derive(Clone, Copy)]
pub struct Edge<'m> {
    mesh: &'m Mesh,
    a: VertexId,
    b: VertexId,
}

impl<'m> Edge<'m> {
    pub(crate) fn new(mesh: &'m Mesh, a: VertexId, b: VertexId) -> Self {
        debug_assert_ne!(a, b, "a mesh Edge cannot join a vertex with itself");
        Edge { mesh, a, b }
    }

    pub fn vertices(&self) -> (Vertex<'m>, Vertex<'m>) {
        (
            Vertex { mesh: self.mesh, id: self.a },
            Vertex { mesh: self.mesh, id: self.b },
        )
    }

    /// The geometric line through this edge's two vertex locations.
    pub fn line(&self) -> Line {
        Line::new(self.mesh.vertex_loc(self.a), self.mesh.vertex_loc(self.b))
            .expect("mesh Edge endpoints are distinct, so a Line always exists")
    }

    fn key(&self) -> (usize, usize) {
        let (x, y) = (self.a.0, self.b.0);
        if x < y {
            (x, y)
        } else {
            (y, x)
        }
    }
}

impl PartialEq for Edge<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for Edge<'_> {}

impl Hash for Edge<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// A triangle, stored as three [`Corner`]s in clockwise order around its
/// circumcenter.
#[derive(Clone, Copy)]
pub struct Triangle<'m> {
    mesh: &'m Mesh,
    id: TriangleId,
}

impl<'m> Triangle<'m> {
    pub fn id(&self) -> TriangleId {
        self.id
    }

    pub fn corner(&self, slot: u8) -> Corner<'m> {
        debug_assert!(slot < 3);
        Corner {
            mesh: self.mesh,
            triangle: self.id,
            slot,
        }
    }

    pub fn corners(&self) -> [Corner<'m>; 3] {
        [self.corner(0), self.corner(1), self.corner(2)]
    }

    pub fn vertices(&self) -> [Vertex<'m>; 3] {
        self.mesh.triangles[self.id.0]
            .vertices
            .map(|id| Vertex { mesh: self.mesh, id })
    }

    /// The triangle's three directed edges: corner `i` to corner `i+1 mod 3`.
    pub fn edges(&self) -> [Edge<'m>; 3] {
        let vs = self.mesh.triangles[self.id.0].vertices;
        [
            Edge::new(self.mesh, vs[0], vs[1]),
            Edge::new(self.mesh, vs[1], vs[2]),
            Edge::new(self.mesh, vs[2], vs[0]),
        ]
    }
}

impl PartialEq for Triangle<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mine: HashSet<VertexId> = self.mesh.triangles[self.id.0].vertices.into_iter().collect();
        let theirs: HashSet<VertexId> = other.mesh.triangles[other.id.0].vertices.into_iter().collect();
        mine == theirs
    }
}
impl Eq for Triangle<'_> {}

/// A (triangle, vertex) incidence: the fundamental navigation unit.
#[derive(Clone, Copy)]
pub struct Corner<'m> {
    mesh: &'m Mesh,
    triangle: TriangleId,
    slot: u8,
}

impl<'m> Corner<'m> {
    fn this_ref(&self) -> CornerRef {
        CornerRef {
            triangle: self.triangle,
            slot: self.slot,
        }
    }

    fn from_ref(mesh: &'m Mesh, c: CornerRef) -> Self {
        Corner {
            mesh,
            triangle: c.triangle,
            slot: c.slot,
        }
    }

    pub fn vertex(&self) -> Vertex<'m> {
        Vertex {
            mesh: self.mesh,
            id: self.mesh.vertex_at(self.this_ref()),
        }
    }

    pub fn triangle(&self) -> Triangle<'m> {
        Triangle {
            mesh: self.mesh,
            id: self.triangle,
        }
    }

    pub fn loc(&self) -> Vec2 {
        self.vertex().loc()
    }

    fn step(&self, delta: i32) -> Corner<'m> {
        let next_slot = ((self.slot as i32 + delta).rem_euclid(3)) as u8;
        Corner {
            mesh: self.mesh,
            triangle: self.triangle,
            slot: next_slot,
        }
    }

    /// Clockwise next corner within the same triangle.
    pub fn next(&self) -> Corner<'m> {
        self.step(1)
    }

    /// Counter-clockwise previous corner within the same triangle.
    pub fn prev(&self) -> Corner<'m> {
        self.step(-1)
    }

    fn swing_link(&self, rev: bool) -> SwingLink {
        let t = &self.mesh.triangles[self.triangle.0];
        if rev {
            t.swing_prev[self.slot as usize]
        } else {
            t.swing_next[self.slot as usize]
        }
    }

    /// Next corner around the shared vertex, across the shared edge of the
    /// adjacent triangle.
    ///
    /// When `sup` is `false` (the default navigation mode) and the next hop
    /// is a super-swing (boundary wraparound), returns `self` — signalling
    /// that the fan has hit the boundary. When `sup` is `true`, super-swing
    /// links are always followed.
    pub fn swing(&self, sup: bool) -> Corner<'m> {
        let link = self.swing_link(false);
        if link.sup && !sup {
            return *self;
        }
        let target = link
            .target
            .expect("swing links are fully stitched by the post-pass");
        Corner::from_ref(self.mesh, target)
    }

    pub fn unswing(&self, sup: bool) -> Corner<'m> {
        let link = self.swing_link(true);
        if link.sup && !sup {
            return *self;
        }
        let target = link
            .target
            .expect("swing links are fully stitched by the post-pass");
        Corner::from_ref(self.mesh, target)
    }
}

impl PartialEq for Corner<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.triangle == other.triangle && self.slot == other.slot
    }
}
impl Eq for Corner<'_> {}
