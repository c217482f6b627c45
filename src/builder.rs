//! The advancing-front Delaunay builder and the swing-link post-pass.
//!
//! This is the core algorithm: pick a seed edge on the convex hull, walk an
//! open-edge queue, and for each open edge attach the triangle whose apex
//! minimizes the [`Line::bulge`] comparator on the unresolved side. Once
//! every triangle is built, a second pass stitches the corner-table's
//! swing/unswing links, including the "super-swing" wraparound at boundary
//! vertices.

use std::collections::{HashMap, VecDeque};

use crate::geom::{Line, Vec2};
use crate::mesh::{CornerRef, Mesh, SwingLink, TriangleData, TriangleId, VertexData, VertexId};
use crate::MeshError;

/// Build the `Mesh` for a validated, non-degenerate point set.
///
/// Callers (see [`crate::Mesh::new`]) are responsible for the input checks
/// (at least 3 points, no exact duplicates, not all collinear) before
/// calling this; it assumes those hold.
pub(crate) fn build(locs: Vec<Vec2>) -> Result<Mesh, MeshError> {
    let n = locs.len();

    let (a0, b0) = seed_edge(&locs);

    let mut open = OpenEdges::new();
    open.insert(EdgeKey::new(a0, b0), None);

    let mut triangles: Vec<TriangleData> = Vec::new();
    // Representative corner recorded the first time each vertex appears.
    let mut representative: Vec<Option<CornerRef>> = vec![None; n];

    while let Some((edge, prev)) = open.pop() {
        let line = edge_line(&locs, edge)?;

        let candidates: Vec<VertexId> = match prev {
            None => (0..n)
                .map(VertexId)
                .filter(|&v| v != edge.a && v != edge.b)
                .collect(),
            Some(prev_v) => {
                if is_boundary_edge(&locs, edge, n) {
                    continue;
                }
                let opposite_side = -line.side(locs[prev_v.0]);
                (0..n)
                    .map(VertexId)
                    .filter(|&v| v != edge.a && v != edge.b && line.side(locs[v.0]) == opposite_side)
                    .collect()
            }
        };

        let v = pick_candidate(&locs, &line, &candidates)
            .expect("a non-boundary open edge always has a Delaunay candidate on its open side");

        let tri_id = TriangleId(triangles.len());
        let tri = new_triangle(&locs, [edge.a, edge.b, v]);
        for (slot, &vid) in tri.vertices.iter().enumerate() {
            if representative[vid.0].is_none() {
                representative[vid.0] = Some(CornerRef {
                    triangle: tri_id,
                    slot: slot as u8,
                });
            }
        }
        triangles.push(tri);

        for (u, w) in [(edge.a, edge.b), (edge.b, edge.a)] {
            let key = EdgeKey::new(u, v);
            if !open.remove(&key) {
                open.insert(key, Some(w));
            }
        }
    }

    stitch_swings(&mut triangles);

    let vertices = locs
        .into_iter()
        .zip(representative)
        .map(|(loc, corner)| VertexData { loc, corner })
        .collect();

    Ok(Mesh::from_parts(vertices, triangles))
}

/// Pick `a` = lowest-y vertex (x as tie-break), `b` = the vertex minimizing
/// the polar angle of `(b - a)`. Since `a` is y-extreme, every other vertex
/// lies in the upper half-plane relative to it, so this edge lies on the
/// convex hull.
fn seed_edge(locs: &[Vec2]) -> (VertexId, VertexId) {
    let a = (0..locs.len())
        .min_by(|&i, &j| {
            let li = locs[i];
            let lj = locs[j];
            li.y.partial_cmp(&lj.y)
                .unwrap()
                .then(li.x.partial_cmp(&lj.x).unwrap())
        })
        .expect("at least 3 points");

    let b = (0..locs.len())
        .filter(|&i| i != a)
        .min_by(|&i, &j| {
            let ai = (locs[i] - locs[a]).ang();
            let aj = (locs[j] - locs[a]).ang();
            ai.partial_cmp(&aj).unwrap()
        })
        .expect("at least 2 other points");

    (VertexId(a), VertexId(b))
}

fn edge_line(locs: &[Vec2], edge: EdgeKey) -> Result<Line, MeshError> {
    Line::new(locs[edge.a.0], locs[edge.b.0])
}

fn is_boundary_edge(locs: &[Vec2], edge: EdgeKey, n: usize) -> bool {
    let others: Vec<Vec2> = (0..n)
        .filter(|&i| i != edge.a.0 && i != edge.b.0)
        .map(|i| locs[i])
        .collect();
    edge_line(locs, edge).unwrap().same_side(&others)
}

/// `argmin` of `line.bulge(v)` over `candidates`, breaking exact ties by
/// lowest vertex index for reproducibility.
fn pick_candidate(locs: &[Vec2], line: &Line, candidates: &[VertexId]) -> Option<VertexId> {
    candidates.iter().copied().fold(None, |best, v| {
        let bulge = line.bulge(locs[v.0]);
        match best {
            None => Some((v, bulge)),
            Some((bv, bb)) => {
                if bulge < bb || (bulge == bb && v.0 < bv.0) {
                    Some((v, bulge))
                } else {
                    Some((bv, bb))
                }
            }
        }
    }).map(|(v, _)| v)
}

/// Build a mesh-level triangle from three vertex ids, sorting the corners
/// into clockwise order around the circumcenter. Falls back to sorting
/// around the centroid if the three points are (numerically) collinear —
/// this should not arise for a genuine Delaunay apex, but keeps triangle
/// construction total rather than partial.
fn new_triangle(locs: &[Vec2], vs: [VertexId; 3]) -> TriangleData {
    let pts = vs.map(|v| locs[v.0]);
    let center = crate::geom::Triangle::new(pts[0], pts[1], pts[2])
        .circumcenter()
        .unwrap_or_else(|| (pts[0] + pts[1] + pts[2]) / 3.0);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| {
        let ai = (pts[i] - center).ang();
        let aj = (pts[j] - center).ang();
        ai.partial_cmp(&aj).unwrap()
    });

    TriangleData::new([vs[order[0]], vs[order[1]], vs[order[2]]])
}

fn corner_next_vertex(triangles: &[TriangleData], c: CornerRef) -> VertexId {
    let t = &triangles[c.triangle.0];
    t.vertices[(c.slot as usize + 1) % 3]
}

fn corner_prev_vertex(triangles: &[TriangleData], c: CornerRef) -> VertexId {
    let t = &triangles[c.triangle.0];
    t.vertices[(c.slot as usize + 2) % 3]
}

/// Group corners by vertex, link each corner to its neighbor across the
/// shared edge, then close the one remaining gap per hull vertex with a
/// super-swing.
fn stitch_swings(triangles: &mut [TriangleData]) {
    let mut v2c: HashMap<VertexId, Vec<CornerRef>> = HashMap::new();
    for (ti, t) in triangles.iter().enumerate() {
        for slot in 0..3u8 {
            v2c.entry(t.vertices[slot as usize]).or_default().push(CornerRef {
                triangle: TriangleId(ti),
                slot,
            });
        }
    }

    for cs in v2c.values() {
        for &i in cs {
            for &j in cs {
                if i == j {
                    continue;
                }
                if corner_next_vertex(triangles, i) == corner_prev_vertex(triangles, j) {
                    set_swing(triangles, j, false, i, false);
                    set_swing(triangles, i, true, j, false);
                }
            }
        }

        let mut sup_next = None;
        let mut sup_prev = None;
        for &c in cs {
            if get_swing(triangles, c, false).target.is_none() {
                debug_assert!(sup_next.is_none(), "more than one open swing.next on this vertex's fan");
                sup_next = Some(c);
            }
            if get_swing(triangles, c, true).target.is_none() {
                debug_assert!(sup_prev.is_none(), "more than one open swing.prev on this vertex's fan");
                sup_prev = Some(c);
            }
        }

        if let (Some(sn), Some(sp)) = (sup_next, sup_prev) {
            set_swing(triangles, sn, false, sp, true);
            set_swing(triangles, sp, true, sn, true);
        }
    }
}

fn get_swing(triangles: &[TriangleData], c: CornerRef, rev: bool) -> SwingLink {
    let t = &triangles[c.triangle.0];
    if rev {
        t.swing_prev[c.slot as usize]
    } else {
        t.swing_next[c.slot as usize]
    }
}

fn set_swing(triangles: &mut [TriangleData], c: CornerRef, rev: bool, target: CornerRef, sup: bool) {
    let t = &mut triangles[c.triangle.0];
    let link = SwingLink {
        target: Some(target),
        sup,
    };
    if rev {
        t.swing_prev[c.slot as usize] = link;
    } else {
        t.swing_next[c.slot as usize] = link;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey {
    a: VertexId,
    b: VertexId,
}

impl EdgeKey {
    fn new(a: VertexId, b: VertexId) -> Self {
        if a.0 <= b.0 {
            EdgeKey { a, b }
        } else {
            EdgeKey { a: b, b: a }
        }
    }
}

/// Insertion-ordered `Edge -> previous vertex` map with O(1) amortized pop,
/// insert and remove. A `VecDeque` FIFO of keys paired with a membership map
/// gives predictable pop order without needing an external ordered-map
/// crate: stale queue entries (already removed from the map) are skipped
/// lazily on pop, which is correct because the algorithm never reopens a
/// closed edge.
struct OpenEdges {
    queue: VecDeque<EdgeKey>,
    map: HashMap<EdgeKey, Option<VertexId>>,
}

impl OpenEdges {
    fn new() -> Self {
        OpenEdges {
            queue: VecDeque::new(),
            map: HashMap::new(),
        }
    }

    fn insert(&mut self, key: EdgeKey, prev: Option<VertexId>) {
        self.queue.push_back(key);
        self.map.insert(key, prev);
    }

    /// Remove `key` if present. Returns whether it was present.
    fn remove(&mut self, key: &EdgeKey) -> bool {
        self.map.remove(key).is_some()
    }

    fn pop(&mut self) -> Option<(EdgeKey, Option<VertexId>)> {
        while let Some(key) = self.queue.pop_front() {
            if let Some(prev) = self.map.remove(&key) {
                return Some((key, prev));
            }
        }
        None
    }
}
