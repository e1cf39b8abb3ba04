/// Panel shapes and the triangle meshes renderers draw for them
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Segments used to approximate round edges.
pub const ROUND_SEGMENTS: usize = 32;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Triangle whose vertex normals all equal its geometric normal.
    pub fn flat(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        let normal = (p1 - p0)
            .cross(&(p2 - p0))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);
        Self::new(
            Vertex::new(p0, normal),
            Vertex::new(p1, normal),
            Vertex::new(p2, normal),
        )
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z)
    }

    pub fn area(&self) -> f32 {
        let [a, b, c] = self.vertices.map(|v| v.position);
        (b - a).cross(&(c - a)).norm() / 2.0
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Adds the quad `a b c d` (counter-clockwise) as two triangles.
    pub fn add_quad(&mut self, a: Vertex, b: Vertex, c: Vertex, d: Vertex) {
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    pub fn surface_area(&self) -> f32 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Square of side `edge` in the local xy-plane, facing +z.
    pub fn square(edge: f32) -> Self {
        Self::rectangle(edge, edge)
    }

    /// Rectangle centred on the origin in the local xy-plane, facing +z.
    pub fn rectangle(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let n = Vector3::z();
        let mut mesh = Self::with_capacity(2);
        mesh.add_quad(
            Vertex::new(Point3::new(-hw, -hh, 0.0), n),
            Vertex::new(Point3::new(hw, -hh, 0.0), n),
            Vertex::new(Point3::new(hw, hh, 0.0), n),
            Vertex::new(Point3::new(-hw, hh, 0.0), n),
        );
        mesh
    }

    /// Disc in the local xy-plane, facing +z.
    pub fn disc(radius: f32) -> Self {
        let mut mesh = Self::with_capacity(ROUND_SEGMENTS);
        let centre = Point3::origin();
        for i in 0..ROUND_SEGMENTS {
            let a0 = TAU * i as f32 / ROUND_SEGMENTS as f32;
            let a1 = TAU * (i + 1) as f32 / ROUND_SEGMENTS as f32;
            mesh.add_triangle(Triangle::flat(
                centre,
                Point3::new(radius * a0.cos(), radius * a0.sin(), 0.0),
                Point3::new(radius * a1.cos(), radius * a1.sin(), 0.0),
            ));
        }
        mesh
    }

    /// Lateral sheet of a cylinder, `unroll` of the way from tube (0) to flat
    /// rectangle (1).
    ///
    /// The sheet keeps its width `2πr` while it bends around its vertical centre
    /// line, which stays at the local origin; the folded tube's axis lies at
    /// `z = −r`.
    pub fn cylinder_side(radius: f32, height: f32, unroll: f32) -> Self {
        let width = TAU * radius;
        let curvature = (1.0 - unroll.clamp(0.0, 1.0)) / radius;
        let hh = height / 2.0;

        let column = |i: usize| {
            let u = -width / 2.0 + width * i as f32 / ROUND_SEGMENTS as f32;
            if curvature < 1e-4 {
                (u, 0.0, Vector3::z())
            } else {
                let angle = u * curvature;
                (
                    angle.sin() / curvature,
                    (angle.cos() - 1.0) / curvature,
                    Vector3::new(angle.sin(), 0.0, angle.cos()),
                )
            }
        };

        let mut mesh = Self::with_capacity(ROUND_SEGMENTS * 2);
        for i in 0..ROUND_SEGMENTS {
            let (x0, z0, n0) = column(i);
            let (x1, z1, n1) = column(i + 1);
            mesh.add_quad(
                Vertex::new(Point3::new(x0, -hh, z0), n0),
                Vertex::new(Point3::new(x1, -hh, z1), n1),
                Vertex::new(Point3::new(x1, hh, z1), n1),
                Vertex::new(Point3::new(x0, hh, z0), n0),
            );
        }
        mesh
    }

    /// Lateral sheet of a cone with the apex at the local origin, `unroll` of
    /// the way from the closed cone (0, axis along −y) to the flat sector (1,
    /// lying in the xz-plane and opening towards +z).
    ///
    /// The sector (radius = slant height `l`, angle `2πr/l`) always wraps an
    /// intermediate cone of the same slant whose full development angle grows
    /// from the sector angle to `2π`, so the sheet never stretches.
    pub fn cone_side(radius: f32, height: f32, unroll: f32) -> Self {
        let unroll = unroll.clamp(0.0, 1.0);
        let slant = radius.hypot(height);
        let sector = TAU * radius / slant;
        let development = sector + (TAU - sector) * unroll;
        let rho = slant * development / TAU;
        let drop = if unroll >= 1.0 {
            0.0
        } else {
            (slant * slant - rho * rho).max(0.0).sqrt()
        };

        let rim = |i: usize| {
            let alpha = -sector / 2.0 + sector * i as f32 / ROUND_SEGMENTS as f32;
            let theta = alpha * TAU / development;
            Point3::new(rho * theta.sin(), -drop, rho * theta.cos())
        };

        let apex = Point3::origin();
        let mut mesh = Self::with_capacity(ROUND_SEGMENTS);
        for i in 0..ROUND_SEGMENTS {
            mesh.add_triangle(Triangle::flat(apex, rim(i), rim(i + 1)));
        }
        mesh
    }
}

/// The flat shape of a face, as cut from paper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Panel {
    Square { edge: f32 },
    Disc { radius: f32 },
    /// Rectangle `2πr × h` rolled into the side of a cylinder.
    CylinderSide { radius: f32, height: f32 },
    /// Sector of radius `√(r² + h²)` rolled into the side of a cone.
    ConeSide { radius: f32, height: f32 },
}

impl Panel {
    /// Area of the flat panel.
    pub fn area(&self) -> f32 {
        match *self {
            Panel::Square { edge } => edge * edge,
            Panel::Disc { radius } => PI * radius * radius,
            Panel::CylinderSide { radius, height } => TAU * radius * height,
            Panel::ConeSide { radius, height } => PI * radius * radius.hypot(height),
        }
    }

    /// Whether the panel bends while the net unfolds.
    pub fn is_curved(&self) -> bool {
        matches!(self, Panel::CylinderSide { .. } | Panel::ConeSide { .. })
    }

    /// Local mesh of the panel at the given unfold progress.
    pub fn mesh(&self, unroll: f32) -> Mesh {
        match *self {
            Panel::Square { edge } => Mesh::square(edge),
            Panel::Disc { radius } => Mesh::disc(radius),
            Panel::CylinderSide { radius, height } => Mesh::cylinder_side(radius, height, unroll),
            Panel::ConeSide { radius, height } => Mesh::cone_side(radius, height, unroll),
        }
    }

    /// Radius of a sphere around the local origin that contains the panel.
    pub fn extent(&self) -> f32 {
        match *self {
            Panel::Square { edge } => edge * std::f32::consts::FRAC_1_SQRT_2,
            Panel::Disc { radius } => radius,
            Panel::CylinderSide { radius, height } => (PI * radius).hypot(height / 2.0),
            Panel::ConeSide { radius, height } => radius.hypot(height),
        }
    }
}
