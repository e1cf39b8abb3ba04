//! The built-in layout catalog.
//!
//! Cube nets are stored as one row each of a compact table; their folded poses
//! are derived by rolling a cube across the net, so a table row can only
//! describe a net that really closes into a cube.

use std::collections::{HashMap, HashSet, VecDeque};
use std::f32::consts::FRAC_PI_2;
use tracing::{debug, info, instrument};

use crate::config::{CROSS_EDGE, CUBE_NET_EDGE};
use crate::error::{LayoutError, NetfoldError, Result};
use crate::geometry::Panel;
use crate::grid::NetGrid;
use crate::layout::{side_color, ControlMode, Face, Layout, NetFamily, SolidKind, AMBER, BLUE, GREEN, VIOLET};
use crate::progress::Progress;
use crate::side::{CubeSide, Direction};
use crate::transform::Pose;

/// One cube net: grid rows top to bottom, and the face that folds to the front.
#[derive(Debug, Clone, Copy)]
pub struct NetRow {
    pub id: &'static str,
    pub family: NetFamily,
    pub front: char,
    pub grid: &'static str,
}

/// The eleven nets of a cube.
pub const CUBE_NETS: [NetRow; 11] = [
    NetRow { id: "cube/141-1", family: NetFamily::OneFourOne, front: '3', grid: "1.../2345/6..." },
    NetRow { id: "cube/141-2", family: NetFamily::OneFourOne, front: '3', grid: "1.../2345/.6.." },
    NetRow { id: "cube/141-3", family: NetFamily::OneFourOne, front: '3', grid: "1.../2345/..6." },
    NetRow { id: "cube/141-4", family: NetFamily::OneFourOne, front: '3', grid: "1.../2345/...6" },
    NetRow { id: "cube/141-5", family: NetFamily::OneFourOne, front: '3', grid: ".1../2345/.6.." },
    NetRow { id: "cube/141-6", family: NetFamily::OneFourOne, front: '3', grid: ".1../2345/..6." },
    NetRow { id: "cube/231-1", family: NetFamily::TwoThreeOne, front: '4', grid: "12../.345/.6.." },
    NetRow { id: "cube/231-2", family: NetFamily::TwoThreeOne, front: '4', grid: "12../.345/..6." },
    NetRow { id: "cube/231-3", family: NetFamily::TwoThreeOne, front: '4', grid: "12../.345/...6" },
    NetRow { id: "cube/222", family: NetFamily::TwoTwoTwo, front: '4', grid: "12../.34./..56" },
    NetRow { id: "cube/33", family: NetFamily::ThreeThree, front: '5', grid: "123../..456" },
];

pub const CYLINDER_RADIUS: f32 = 1.2;
pub const CYLINDER_HEIGHT: f32 = 2.5;
pub const CONE_RADIUS: f32 = 1.2;
pub const CONE_HEIGHT: f32 = 3.0;

/// Orientation of the rolling cube while it rests on one net cell: the side
/// touching the cell, and the cube directions lying along net +x and net up.
#[derive(Debug, Clone, Copy)]
struct Frame {
    normal: Direction,
    right: Direction,
    up: Direction,
}

impl Frame {
    const FRONT: Frame = Frame {
        normal: [0, 0, 1],
        right: [1, 0, 0],
        up: [0, 1, 0],
    };

    /// Rolls onto the neighbouring cell `(dcol, drow)`; rows grow downwards.
    fn roll(self, dcol: i32, drow: i32) -> Frame {
        match (dcol, drow) {
            (1, 0) => Frame {
                normal: self.right,
                right: negate(self.normal),
                up: self.up,
            },
            (-1, 0) => Frame {
                normal: negate(self.right),
                right: self.normal,
                up: self.up,
            },
            (0, -1) => Frame {
                normal: self.up,
                right: self.right,
                up: negate(self.normal),
            },
            _ => Frame {
                normal: negate(self.up),
                right: self.right,
                up: self.normal,
            },
        }
    }
}

const NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

fn negate([x, y, z]: Direction) -> Direction {
    [-x, -y, -z]
}

/// Folds a six-cell grid into a cube, returning the side each cell lands on
/// in the grid's cell order.
pub fn fold_net(id: &str, grid: &NetGrid, front: char) -> std::result::Result<Vec<CubeSide>, LayoutError> {
    let cells = grid.cells();
    if cells.len() != 6 {
        return Err(LayoutError::WrongFaceCount {
            id: id.to_string(),
            count: cells.len(),
        });
    }

    let mut labels = HashSet::new();
    for cell in cells {
        if !labels.insert(cell.label) {
            return Err(LayoutError::DuplicateLabel {
                id: id.to_string(),
                label: cell.label.to_string(),
            });
        }
    }

    let start = grid.cell(front).ok_or_else(|| LayoutError::MissingFront {
        id: id.to_string(),
        label: front,
    })?;

    let mut frames: HashMap<(i32, i32), Frame> = HashMap::new();
    let mut queue = VecDeque::new();
    frames.insert((start.col, start.row), Frame::FRONT);
    queue.push_back((start.col, start.row));

    while let Some((col, row)) = queue.pop_front() {
        let frame = frames[&(col, row)];
        for (dcol, drow) in NEIGHBOURS {
            let next = (col + dcol, row + drow);
            if frames.contains_key(&next) || grid.cell_at(next.0, next.1).is_none() {
                continue;
            }
            frames.insert(next, frame.roll(dcol, drow));
            queue.push_back(next);
        }
    }

    let mut taken: HashMap<CubeSide, char> = HashMap::new();
    let mut sides = Vec::with_capacity(cells.len());
    for cell in cells {
        let frame = frames
            .get(&(cell.col, cell.row))
            .ok_or_else(|| LayoutError::Disconnected {
                id: id.to_string(),
                label: cell.label.to_string(),
            })?;
        let side = CubeSide::from_direction(frame.normal).ok_or_else(|| LayoutError::MalformedGrid {
            grid: grid.to_string(),
            reason: format!("cell `{}` rolled onto no cube side", cell.label),
        })?;
        if let Some(first) = taken.insert(side, cell.label) {
            return Err(LayoutError::OverlappingFaces {
                id: id.to_string(),
                first: first.to_string(),
                second: cell.label.to_string(),
            });
        }
        sides.push(side);
    }
    Ok(sides)
}

/// Builds the drag layout for one row of the cube-net table.
pub fn cube_net_layout(row: &NetRow, edge: f32) -> std::result::Result<Layout, LayoutError> {
    let grid = NetGrid::parse(row.grid)?;
    let faces = square_faces(row.id, &grid, row.front, edge, |cell, _| cell.to_string())?;
    let index = CUBE_NETS.iter().position(|r| r.id == row.id).map_or(0, |i| i + 1);

    Ok(Layout::new(
        row.id,
        format!("Net {index} ({})", row.family),
        SolidKind::Cube,
        ControlMode::Drag,
        faces,
    )
    .starting_at(Progress::UNFOLDED)
    .with_family(row.family)
    .with_grid(grid)
    .with_note(row.family.mnemonic()))
}

/// The two-state cross demo: faces named after their sides.
pub fn cross_layout() -> std::result::Result<Layout, LayoutError> {
    let id = "cube/cross";
    let grid = NetGrid::parse(".1../2345/.6..")?;
    let faces = square_faces(id, &grid, '3', CROSS_EDGE, |_, side| side.name().to_string())?;

    Ok(Layout::new(id, "Cross net", SolidKind::Cube, ControlMode::Toggle, faces)
        .starting_at(Progress::UNFOLDED)
        .with_family(NetFamily::OneFourOne)
        .with_grid(grid)
        .with_note("press fold / unfold to watch the cross close into a cube"))
}

fn square_faces(
    id: &str,
    grid: &NetGrid,
    front: char,
    edge: f32,
    label: impl Fn(char, CubeSide) -> String,
) -> std::result::Result<Vec<Face>, LayoutError> {
    let sides = fold_net(id, grid, front)?;
    Ok(grid
        .cells()
        .iter()
        .zip(sides)
        .map(|(cell, side)| {
            let (x, y) = grid.centre(cell);
            let folded = Pose::new(side.normal() * (edge / 2.0), side.rotation());
            let unfolded = Pose::from_arrays([x * edge, y * edge, 0.0], [0.0; 3]);
            Face::new(label(cell.label, side), side_color(side), Panel::Square { edge }, folded, unfolded)
                .on_side(side)
        })
        .collect())
}

/// Cylinder: the side unrolls into a rectangle, the bases swing out tangent
/// to its top and bottom edges.
pub fn cylinder_layout(radius: f32, height: f32) -> Layout {
    let hh = height / 2.0;
    let faces = vec![
        Face::new(
            "Side",
            BLUE,
            Panel::CylinderSide { radius, height },
            Pose::from_arrays([0.0, 0.0, radius], [0.0; 3]),
            Pose::identity(),
        ),
        Face::new(
            "Top",
            GREEN,
            Panel::Disc { radius },
            Pose::from_arrays([0.0, hh, 0.0], [-FRAC_PI_2, 0.0, 0.0]),
            Pose::from_arrays([0.0, hh + radius, 0.0], [0.0; 3]),
        ),
        Face::new(
            "Bottom",
            AMBER,
            Panel::Disc { radius },
            Pose::from_arrays([0.0, -hh, 0.0], [FRAC_PI_2, 0.0, 0.0]),
            Pose::from_arrays([0.0, -hh - radius, 0.0], [0.0; 3]),
        ),
    ];

    let width = std::f32::consts::TAU * radius;
    Layout::new("cylinder/net", "Cylinder net", SolidKind::Cylinder, ControlMode::Drag, faces)
        .with_note(format!("the side unrolls into a {width:.2} × {height} rectangle (2πr × h)"))
        .with_note("the two bases are equal circles")
}

/// Cone: the side flattens into a sector hanging from the apex, the base
/// drops tangent to the sector's arc.
pub fn cone_layout(radius: f32, height: f32) -> Layout {
    let hh = height / 2.0;
    let slant = radius.hypot(height);
    let faces = vec![
        Face::new(
            "Side",
            VIOLET,
            Panel::ConeSide { radius, height },
            Pose::from_arrays([0.0, hh, 0.0], [0.0; 3]),
            Pose::from_arrays([0.0, hh, 0.0], [FRAC_PI_2, 0.0, 0.0]),
        ),
        Face::new(
            "Base",
            AMBER,
            Panel::Disc { radius },
            Pose::from_arrays([0.0, -hh, 0.0], [FRAC_PI_2, 0.0, 0.0]),
            Pose::from_arrays([0.0, hh - slant - radius, 0.0], [0.0; 3]),
        ),
    ];

    let degrees = 360.0 * radius / slant;
    Layout::new("cone/net", "Cone net", SolidKind::Cone, ControlMode::Drag, faces)
        .with_note(format!(
            "the side unrolls into a sector of radius l = {slant:.2} and angle {degrees:.1}° (360° × r / l)"
        ))
        .with_note("the base is a circle touching the sector's arc")
}

/// Read-only catalog of layouts, in registration order.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: Vec<Layout>,
}

impl LayoutRegistry {
    /// Validates and registers `layouts`.
    #[instrument(skip_all, fields(count = layouts.len()))]
    pub fn new(layouts: Vec<Layout>) -> std::result::Result<Self, LayoutError> {
        let mut ids = HashSet::new();
        for layout in &layouts {
            layout.validate()?;
            if !ids.insert(layout.id()) {
                return Err(LayoutError::DuplicateLayoutId(layout.id().to_string()));
            }
            debug!(id = layout.id(), faces = layout.faces().len(), "layout registered");
        }
        info!(count = layouts.len(), "layout registry ready");
        Ok(Self { layouts })
    }

    /// The built-in catalog: eleven cube nets, the cross demo, the cylinder
    /// and the cone.
    pub fn try_builtin() -> std::result::Result<Self, LayoutError> {
        let mut layouts = Vec::with_capacity(CUBE_NETS.len() + 3);
        for row in &CUBE_NETS {
            layouts.push(cube_net_layout(row, CUBE_NET_EDGE)?);
        }
        layouts.push(cross_layout()?);
        layouts.push(cylinder_layout(CYLINDER_RADIUS, CYLINDER_HEIGHT));
        layouts.push(cone_layout(CONE_RADIUS, CONE_HEIGHT));
        Self::new(layouts)
    }

    /// Like [`try_builtin`](Self::try_builtin), for callers that treat a broken
    /// built-in table as the programming error it is.
    ///
    /// # Panics
    /// Panics if the built-in table fails validation.
    pub fn builtin() -> Self {
        match Self::try_builtin() {
            Ok(registry) => registry,
            Err(err) => panic!("built-in layout table is invalid: {err}"),
        }
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn list_layouts(&self, solid: SolidKind) -> Vec<&Layout> {
        self.layouts.iter().filter(|l| l.solid() == solid).collect()
    }

    pub fn get_layout(&self, id: &str) -> Result<&Layout> {
        self.layouts
            .iter()
            .find(|l| l.id() == id)
            .ok_or_else(|| NetfoldError::InvalidLayoutId(id.to_string()))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.layouts.iter().position(|l| l.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index)
    }
}
