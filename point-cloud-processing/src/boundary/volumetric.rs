/// Volumetric boundary: corner vertices of the 3D convex hull
use super::{BoundarySet, group_positions, monotone_chain};
use crate::bounds::PointCloudBounds;
use crate::point::Point;
use constants::boundary::{
    CORNER_NORMAL_TOLERANCE, HULL_RELATIVE_TOLERANCE, MIN_VOLUMETRIC_HULL_POINTS,
};
use std::collections::HashSet;
use tracing::debug;

type Vec3 = [f64; 3];

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector, or zero for a degenerate input
fn normalize(a: Vec3) -> Vec3 {
    let len = norm(a);
    if len > 0.0 && len.is_finite() {
        [a[0] / len, a[1] / len, a[2] / len]
    } else {
        [0.0; 3]
    }
}

/// Starting configuration found from the extreme points
enum Seed {
    Collinear(usize, usize),
    Coplanar(usize, usize, usize),
    Solid([usize; 4]),
}

fn find_seed(points: &[Vec3], tolerance: f64) -> Seed {
    // Axis extremes always lie on the hull.
    let mut extremes = Vec::with_capacity(6);
    for axis in 0..3 {
        let by_axis = |i: &usize, j: &usize| points[*i][axis].total_cmp(&points[*j][axis]);
        if let Some(i) = (0..points.len()).min_by(by_axis) {
            extremes.push(i);
        }
        if let Some(i) = (0..points.len()).max_by(by_axis) {
            extremes.push(i);
        }
    }

    let (mut a, mut b, mut widest) = (0, 0, -1.0);
    for (n, &i) in extremes.iter().enumerate() {
        for &j in &extremes[n + 1..] {
            let distance = norm(sub(points[i], points[j]));
            if distance > widest {
                (a, b, widest) = (i, j, distance);
            }
        }
    }

    let axis = sub(points[b], points[a]);
    let axis_len = norm(axis);
    let farthest = |score: &dyn Fn(Vec3) -> f64| {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, score(*p)))
            .max_by(|x, y| x.1.total_cmp(&y.1))
            .unwrap_or((a, 0.0))
    };

    let (c, line_distance) = farthest(&|p| norm(cross(axis, sub(p, points[a]))) / axis_len);
    if axis_len <= tolerance || line_distance <= tolerance {
        return Seed::Collinear(a, b);
    }

    let plane_normal = normalize(cross(axis, sub(points[c], points[a])));
    let (d, plane_distance) = farthest(&|p| dot(plane_normal, sub(p, points[a])).abs());
    if plane_distance <= tolerance {
        return Seed::Coplanar(a, b, c);
    }

    Seed::Solid([a, b, c, d])
}

/// Monotone chain inside the plane through a, b and c
fn planar_hull(points: &[Vec3], a: usize, b: usize, c: usize) -> Vec<usize> {
    let origin = points[a];
    let u = normalize(sub(points[b], origin));
    let normal = normalize(cross(u, sub(points[c], origin)));
    let v = cross(normal, u);

    let coords: Vec<[f64; 2]> = points
        .iter()
        .map(|p| {
            let offset = sub(*p, origin);
            [dot(offset, u), dot(offset, v)]
        })
        .collect();

    monotone_chain(&coords)
}

#[derive(Debug, Clone)]
struct Face {
    vertices: [usize; 3],
    normal: Vec3,
    offset: f64,
    alive: bool,
}

/// Incremental hull over distinct positions.
/// Faces are wound so their normals point outward.
struct IncrementalHull<'a> {
    points: &'a [Vec3],
    faces: Vec<Face>,
    tolerance: f64,
}

impl<'a> IncrementalHull<'a> {
    fn new(points: &'a [Vec3], seed: [usize; 4], tolerance: f64) -> Self {
        let mut hull = Self {
            points,
            faces: Vec::new(),
            tolerance,
        };

        let centre = seed.iter().fold([0.0; 3], |acc, &i| {
            let p = points[i];
            [acc[0] + p[0] / 4.0, acc[1] + p[1] / 4.0, acc[2] + p[2] / 4.0]
        });

        let [a, b, c, d] = seed;
        for [i, j, k] in [[a, b, c], [a, b, d], [a, c, d], [b, c, d]] {
            let face = hull.make_face(i, j, k);
            if hull.signed_distance(&face, centre) > 0.0 {
                let flipped = hull.make_face(i, k, j);
                hull.faces.push(flipped);
            } else {
                hull.faces.push(face);
            }
        }

        hull
    }

    fn make_face(&self, i: usize, j: usize, k: usize) -> Face {
        let origin = self.points[i];
        let normal = normalize(cross(
            sub(self.points[j], origin),
            sub(self.points[k], origin),
        ));
        Face {
            vertices: [i, j, k],
            normal,
            offset: dot(normal, origin),
            alive: true,
        }
    }

    fn signed_distance(&self, face: &Face, p: Vec3) -> f64 {
        dot(face.normal, p) - face.offset
    }

    /// Grow the hull to contain point `index`
    fn add_point(&mut self, index: usize) {
        let p = self.points[index];
        let visible: Vec<usize> = self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.alive && self.signed_distance(face, p) > self.tolerance)
            .map(|(i, _)| i)
            .collect();

        if visible.is_empty() {
            return;
        }

        let edges_of = |face: &Face| {
            let [v0, v1, v2] = face.vertices;
            [(v0, v1), (v1, v2), (v2, v0)]
        };

        let visible_edges: HashSet<(usize, usize)> = visible
            .iter()
            .flat_map(|&f| edges_of(&self.faces[f]))
            .collect();

        // An edge is on the horizon when its twin belongs to a hidden face.
        let horizon: Vec<(usize, usize)> = visible
            .iter()
            .flat_map(|&f| edges_of(&self.faces[f]))
            .filter(|&(u, v)| !visible_edges.contains(&(v, u)))
            .collect();

        for &f in &visible {
            self.faces[f].alive = false;
        }
        for (u, v) in horizon {
            let face = self.make_face(u, v, index);
            self.faces.push(face);
        }
    }

    /// Vertices whose incident face normals span all three dimensions.
    /// Points lying inside a flat facet or along an edge are excluded.
    fn corner_vertices(&self) -> Vec<usize> {
        let mut incident: Vec<Vec<Vec3>> = vec![Vec::new(); self.points.len()];
        for face in self.faces.iter().filter(|f| f.alive && norm(f.normal) > 0.0) {
            for &v in &face.vertices {
                incident[v].push(face.normal);
            }
        }

        incident
            .iter()
            .enumerate()
            .filter(|(_, normals)| spans_volume(normals))
            .map(|(v, _)| v)
            .collect()
    }
}

fn spans_volume(normals: &[Vec3]) -> bool {
    for (i, &n1) in normals.iter().enumerate() {
        for (j, &n2) in normals.iter().enumerate().skip(i + 1) {
            let plane = cross(n1, n2);
            if norm(plane) <= CORNER_NORMAL_TOLERANCE {
                continue;
            }
            if normals[j + 1..]
                .iter()
                .any(|&n3| dot(plane, n3).abs() > CORNER_NORMAL_TOLERANCE)
            {
                return true;
            }
        }
    }
    false
}

/// Boundary indices of the 3D hull's corner vertices.
/// Coincident points are reported together. Degenerate clouds fall back to
/// the line endpoints or the planar hull.
pub fn volumetric_boundary(points: &[Point]) -> BoundarySet {
    let (unique, members) = group_positions(points.iter().map(Point::position));

    if unique.len() < MIN_VOLUMETRIC_HULL_POINTS {
        return (0..points.len()).collect();
    }

    let tolerance = PointCloudBounds::from_points(points).diagonal() * HULL_RELATIVE_TOLERANCE;

    let hull_positions = match find_seed(&unique, tolerance) {
        Seed::Collinear(a, b) => {
            debug!("Volumetric hull input is collinear, keeping endpoints");
            vec![a, b]
        }
        Seed::Coplanar(a, b, c) => {
            debug!("Volumetric hull input is coplanar, using planar hull");
            planar_hull(&unique, a, b, c)
        }
        Seed::Solid(seed) => {
            let mut hull = IncrementalHull::new(&unique, seed, tolerance);

            // Far points first so fewer interior points are ever inserted.
            let centre = seed.iter().fold([0.0; 3], |acc, &i| {
                let p = unique[i];
                [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]
            });
            let centre = [centre[0] / 4.0, centre[1] / 4.0, centre[2] / 4.0];
            let mut order: Vec<usize> = (0..unique.len()).filter(|i| !seed.contains(i)).collect();
            order.sort_by(|&i, &j| {
                norm(sub(unique[j], centre)).total_cmp(&norm(sub(unique[i], centre)))
            });

            for index in order {
                hull.add_point(index);
            }

            let corners = hull.corner_vertices();
            debug!(
                faces = hull.faces.iter().filter(|f| f.alive).count(),
                corners = corners.len(),
                "Volumetric hull built"
            );
            corners
        }
    };

    hull_positions
        .into_iter()
        .flat_map(|position| members[position].iter().copied())
        .collect()
}
