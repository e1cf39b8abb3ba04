//! Surface area of a cube with a small cube cut out of it.
//!
//! Cutting a sub-cube of side `a` out of a cube removes the sub-cube's faces
//! that lay on the outer surface and exposes the rest as walls of the hole, so
//! the area changes by `(added − removed) × a²`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::HollowError;
use crate::side::CubeSide;
use crate::transform::{Pose, Transform};
use crate::tween::PoseTween;

pub const DEFAULT_CUBE_SIDE: f32 = 3.0;
pub const DEFAULT_SUB_SIDE: f32 = 1.0;

/// Largest accepted `side / sub_side`.
pub const MAX_SIDE_RATIO: f32 = 1000.0;

/// Sides spanning more sub-cubes than this are drawn as one whole tile.
pub const MAX_TILES_PER_EDGE: usize = 15;

/// How far the removed sub-cube travels when pulled out of its hole.
pub const EXTRACT_OFFSET: [f32; 3] = [2.5, 1.5, 2.0];

/// Where the sub-cube is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HollowCase {
    #[default]
    None,
    Corner,
    Edge,
    Face,
}

impl HollowCase {
    pub const ALL: [HollowCase; 4] = [HollowCase::None, HollowCase::Corner, HollowCase::Edge, HollowCase::Face];

    pub fn name(self) -> &'static str {
        match self {
            HollowCase::None => "none",
            HollowCase::Corner => "corner",
            HollowCase::Edge => "edge",
            HollowCase::Face => "face",
        }
    }

    pub fn from_name(name: &str) -> Option<HollowCase> {
        HollowCase::ALL.into_iter().find(|case| case.name() == name)
    }

    /// The next case, wrapping around.
    pub fn next(self) -> HollowCase {
        match self {
            HollowCase::None => HollowCase::Corner,
            HollowCase::Corner => HollowCase::Edge,
            HollowCase::Edge => HollowCase::Face,
            HollowCase::Face => HollowCase::None,
        }
    }

    /// Sub-cube sides that lay on the outer surface and are cut away with it.
    pub fn original_sides(self) -> &'static [CubeSide] {
        match self {
            HollowCase::None => &[],
            HollowCase::Corner => &[CubeSide::Front, CubeSide::Right, CubeSide::Top],
            HollowCase::Edge => &[CubeSide::Front, CubeSide::Top],
            HollowCase::Face => &[CubeSide::Front],
        }
    }

    /// Sub-cube sides that become walls of the hole.
    pub fn exposed_sides(self) -> Vec<CubeSide> {
        if self == HollowCase::None {
            return Vec::new();
        }
        CubeSide::ALL
            .into_iter()
            .filter(|side| !self.original_sides().contains(side))
            .collect()
    }

    pub fn removed_faces(self) -> u32 {
        self.original_sides().len() as u32
    }

    pub fn added_faces(self) -> u32 {
        self.exposed_sides().len() as u32
    }

    /// `added − removed`.
    pub fn net_faces(self) -> i32 {
        self.added_faces() as i32 - self.removed_faces() as i32
    }

    pub fn description(self) -> &'static str {
        match self {
            HollowCase::None => "the original cube",
            HollowCase::Corner => "corner removed: surface area unchanged",
            HollowCase::Edge => "edge removed: surface area grows",
            HollowCase::Face => "face centre removed: surface area grows the most",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            HollowCase::None => "6 faces, each of them a square",
            HollowCase::Corner => "3 outer faces removed, 3 inner faces exposed, exactly cancelling out",
            HollowCase::Edge => "2 outer faces removed, 4 inner faces exposed, a net gain of 2 faces",
            HollowCase::Face => "1 outer face removed, 5 inner faces exposed, a net gain of 4 faces",
        }
    }
}

impl fmt::Display for HollowCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HollowCase {
    type Err = HollowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HollowCase::from_name(s).ok_or_else(|| HollowError::UnknownCase(s.to_string()))
    }
}

/// Record shown in the information panel for one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HollowReport {
    pub case: HollowCase,
    pub description: String,
    pub detail: String,
    pub formula: String,
    pub removed: u32,
    pub added: u32,
    pub delta: f32,
    pub original_area: f32,
    pub total_area: f32,
}

/// Dimensions of the outer cube and of the sub-cube cut from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HollowCube {
    side: f32,
    sub_side: f32,
}

impl Default for HollowCube {
    fn default() -> Self {
        Self {
            side: DEFAULT_CUBE_SIDE,
            sub_side: DEFAULT_SUB_SIDE,
        }
    }
}

impl HollowCube {
    pub fn new(side: f32, sub_side: f32) -> Result<Self, HollowError> {
        if !side.is_finite() || side <= 0.0 {
            return Err(HollowError::InvalidSide { side });
        }
        if !sub_side.is_finite() || sub_side <= 0.0 || sub_side >= side {
            return Err(HollowError::InvalidSubSide { side, sub_side });
        }
        if side / sub_side > MAX_SIDE_RATIO {
            return Err(HollowError::RatioTooLarge {
                side,
                sub_side,
                max: MAX_SIDE_RATIO,
            });
        }
        Ok(Self { side, sub_side })
    }

    pub fn side(&self) -> f32 {
        self.side
    }

    pub fn sub_side(&self) -> f32 {
        self.sub_side
    }

    pub fn original_area(&self) -> f32 {
        6.0 * self.side * self.side
    }

    pub fn unit_face_area(&self) -> f32 {
        self.sub_side * self.sub_side
    }

    pub fn area_delta(&self, case: HollowCase) -> f32 {
        case.net_faces() as f32 * self.unit_face_area()
    }

    pub fn total_area(&self, case: HollowCase) -> f32 {
        self.original_area() + self.area_delta(case)
    }

    /// Worked formula, e.g. `6 × 3² + 2 × 1² = 56`.
    pub fn formula(&self, case: HollowCase) -> String {
        let total = self.total_area(case);
        match case.net_faces() {
            0 => format!("6 × {}² = {total}", self.side),
            n => format!("6 × {}² + {n} × {}² = {total}", self.side, self.sub_side),
        }
    }

    pub fn report(&self, case: HollowCase) -> HollowReport {
        HollowReport {
            case,
            description: case.description().to_string(),
            detail: case.detail().to_string(),
            formula: self.formula(case),
            removed: case.removed_faces(),
            added: case.added_faces(),
            delta: self.area_delta(case),
            original_area: self.original_area(),
            total_area: self.total_area(case),
        }
    }

    /// Centre of the sub-cube inside the outer cube, `None` for the intact cube.
    pub fn sub_cube_centre(&self, case: HollowCase) -> Option<Vector3<f32>> {
        let inset = self.side / 2.0 - self.sub_side / 2.0;
        match case {
            HollowCase::None => None,
            HollowCase::Corner => Some(Vector3::new(inset, inset, inset)),
            HollowCase::Edge => Some(Vector3::new(0.0, inset, inset)),
            HollowCase::Face => Some(Vector3::new(0.0, 0.0, inset)),
        }
    }

    /// The outer surface cut into sub-cube sized tiles, minus the tiles taken
    /// away with the sub-cube.
    ///
    /// Unless an odd number of sub-cubes, at most [`MAX_TILES_PER_EDGE`], spans
    /// the cube exactly, every side is one whole tile and nothing is cut away.
    pub fn surface_tiles(&self, case: HollowCase) -> Vec<SurfaceTile> {
        let ratio = self.side / self.sub_side;
        let spans = ratio.round() as usize;
        let exact = (ratio - ratio.round()).abs() < 1e-4 && spans % 2 == 1 && spans <= MAX_TILES_PER_EDGE;
        let (count, edge) = if exact {
            (spans, self.sub_side)
        } else {
            (1, self.side)
        };

        let cut: Vec<Vector3<f32>> = match self.sub_cube_centre(case) {
            Some(centre) if exact => case
                .original_sides()
                .iter()
                .map(|side| centre + side.normal() * (self.sub_side / 2.0))
                .collect(),
            _ => Vec::new(),
        };

        let mut tiles = Vec::with_capacity(6 * count * count);
        for side in CubeSide::ALL {
            let rotation = Transform::rotation_matrix(&side.rotation());
            let face_centre = side.normal() * (self.side / 2.0);
            for i in 0..count {
                for j in 0..count {
                    let u = -self.side / 2.0 + edge * (i as f32 + 0.5);
                    let v = -self.side / 2.0 + edge * (j as f32 + 0.5);
                    let position = face_centre + rotation.transform_vector(&Vector3::new(u, v, 0.0));
                    if cut.iter().any(|c| (c - position).norm() < edge / 4.0) {
                        continue;
                    }
                    tiles.push(SurfaceTile {
                        side,
                        edge,
                        pose: Pose::new(position, side.rotation()),
                    });
                }
            }
        }
        tiles
    }
}

/// A square patch of the outer cube's surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceTile {
    pub side: CubeSide,
    pub edge: f32,
    pub pose: Pose,
}

/// One face of the sub-cube, or one wall of the hole it leaves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubCubeFace {
    pub side: CubeSide,
    /// Whether the face lay on the outer cube's surface.
    pub original: bool,
    pub pose: Pose,
}

fn sub_face(centre: Vector3<f32>, half: f32, side: CubeSide, original: bool) -> SubCubeFace {
    SubCubeFace {
        side,
        original,
        pose: Pose::new(centre + side.normal() * half, side.rotation()),
    }
}

/// The hollow-cube demo: a case selection plus the animated extraction of the
/// removed sub-cube.
#[derive(Debug, Clone)]
pub struct HollowScene {
    cube: HollowCube,
    case: HollowCase,
    extracted: bool,
    offset: PoseTween,
    duration: Duration,
}

impl HollowScene {
    pub fn new(cube: HollowCube, duration: Duration) -> Self {
        Self {
            cube,
            case: HollowCase::None,
            extracted: false,
            offset: PoseTween::new(Pose::identity()),
            duration,
        }
    }

    pub fn cube(&self) -> &HollowCube {
        &self.cube
    }

    pub fn case(&self) -> HollowCase {
        self.case
    }

    pub fn report(&self) -> HollowReport {
        self.cube.report(self.case)
    }

    /// Changes the case; the sub-cube jumps to its new place, keeping its
    /// extraction state.
    pub fn set_case(&mut self, case: HollowCase) {
        if case == self.case {
            return;
        }
        debug!(%case, "hollow case selected");
        self.case = case;
        self.offset.snap(*self.offset.target());
    }

    pub fn is_extracted(&self) -> bool {
        self.extracted
    }

    pub fn is_animating(&self) -> bool {
        !self.offset.is_settled()
    }

    /// Pulls the sub-cube out of (or pushes it back into) its hole.
    pub fn set_extracted(&mut self, extracted: bool) {
        if extracted == self.extracted {
            return;
        }
        debug!(extracted, "sub-cube extraction");
        self.extracted = extracted;
        let target = if extracted {
            Pose::from_arrays(EXTRACT_OFFSET, [0.0; 3])
        } else {
            Pose::identity()
        };
        self.offset.retarget(target, self.duration);
    }

    pub fn toggle_extracted(&mut self) {
        self.set_extracted(!self.extracted);
    }

    pub fn tick(&mut self, dt: Duration) -> bool {
        self.offset.advance(dt)
    }

    /// Displayed centre of the sub-cube.
    pub fn sub_cube_position(&self) -> Option<Vector3<f32>> {
        self.cube
            .sub_cube_centre(self.case)
            .map(|centre| centre + self.offset.current().position)
    }

    /// The six faces of the displayed sub-cube.
    pub fn sub_cube_faces(&self) -> Vec<SubCubeFace> {
        let Some(centre) = self.sub_cube_position() else {
            return Vec::new();
        };
        let half = self.cube.sub_side() / 2.0;
        let original = self.case.original_sides();
        CubeSide::ALL
            .into_iter()
            .map(|side| sub_face(centre, half, side, original.contains(&side)))
            .collect()
    }

    pub fn surface_tiles(&self) -> Vec<SurfaceTile> {
        self.cube.surface_tiles(self.case)
    }

    /// Walls of the hole left in the outer cube.
    pub fn hole_walls(&self) -> Vec<SubCubeFace> {
        let Some(centre) = self.cube.sub_cube_centre(self.case) else {
            return Vec::new();
        };
        let half = self.cube.sub_side() / 2.0;
        self.case
            .exposed_sides()
            .into_iter()
            .map(|side| sub_face(centre, half, side, false))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_face_counts() {
        let counts: Vec<_> = HollowCase::ALL
            .iter()
            .map(|c| (c.removed_faces(), c.added_faces()))
            .collect();
        assert_eq!(counts, [(0, 0), (3, 3), (2, 4), (1, 5)]);
    }

    #[test]
    fn test_default_totals() {
        let cube = HollowCube::default();
        let totals: Vec<_> = HollowCase::ALL.iter().map(|&c| cube.total_area(c)).collect();
        assert_eq!(totals, [54.0, 54.0, 56.0, 58.0]);
    }

    #[test]
    fn test_delta_scales_with_sub_cube() {
        let cube = HollowCube::new(4.0, 2.0).unwrap();
        assert_eq!(cube.area_delta(HollowCase::Corner), 0.0);
        assert_eq!(cube.area_delta(HollowCase::Edge), 8.0);
        assert_eq!(cube.area_delta(HollowCase::Face), 16.0);
    }

    #[test]
    fn test_formulas() {
        let cube = HollowCube::default();
        assert_eq!(cube.formula(HollowCase::None), "6 × 3² = 54");
        assert_eq!(cube.formula(HollowCase::Corner), "6 × 3² = 54");
        assert_eq!(cube.formula(HollowCase::Edge), "6 × 3² + 2 × 1² = 56");
        assert_eq!(cube.formula(HollowCase::Face), "6 × 3² + 4 × 1² = 58");
    }

    #[test]
    fn test_sides_partition_the_sub_cube() {
        for case in [HollowCase::Corner, HollowCase::Edge, HollowCase::Face] {
            let mut all: Vec<_> = case.original_sides().to_vec();
            all.extend(case.exposed_sides());
            all.sort();
            assert_eq!(all, CubeSide::ALL.to_vec(), "{case}");
        }
        assert!(HollowCase::None.exposed_sides().is_empty());
    }

    #[test]
    fn test_original_sides_touch_the_surface() {
        let cube = HollowCube::default();
        let half_outer = cube.side() / 2.0;
        for case in [HollowCase::Corner, HollowCase::Edge, HollowCase::Face] {
            let centre = cube.sub_cube_centre(case).unwrap();
            for side in CubeSide::ALL {
                let reach = (centre + side.normal() * cube.sub_side() / 2.0).dot(&side.normal());
                let touches = (reach - half_outer).abs() < 1e-6;
                assert_eq!(touches, case.original_sides().contains(&side), "{case} {side}");
            }
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(HollowCube::new(0.0, 1.0), Err(HollowError::InvalidSide { side: 0.0 }));
        assert!(matches!(HollowCube::new(f32::NAN, 1.0), Err(HollowError::InvalidSide { .. })));
        assert_eq!(
            HollowCube::new(3.0, 3.0),
            Err(HollowError::InvalidSubSide { side: 3.0, sub_side: 3.0 })
        );
        assert!(HollowCube::new(3.0, -1.0).is_err());
    }

    #[test]
    fn test_report() {
        let report = HollowCube::default().report(HollowCase::Edge);
        assert_eq!(report.removed, 2);
        assert_eq!(report.added, 4);
        assert_eq!(report.delta, 2.0);
        assert_eq!(report.total_area, 56.0);
        assert_eq!(HollowCase::from_name("edge"), Some(HollowCase::Edge));
    }

    #[test]
    fn test_tiles_and_walls_add_up_to_total_area() {
        let cube = HollowCube::default();
        let mut scene = HollowScene::new(cube, Duration::ZERO);
        for case in HollowCase::ALL {
            scene.set_case(case);
            let tiles = scene.surface_tiles();
            let walls = scene.hole_walls();
            let area: f32 = tiles.iter().map(|t| t.edge * t.edge).sum::<f32>()
                + walls.len() as f32 * cube.unit_face_area();
            assert_relative_eq!(area, cube.total_area(case), epsilon = 1e-4);
            assert_eq!(tiles.len(), 54 - case.removed_faces() as usize, "{case}");
        }
    }

    #[test]
    fn test_large_ratios() {
        assert_eq!(
            HollowCube::new(16_777_215.0, 1.0),
            Err(HollowError::RatioTooLarge {
                side: 16_777_215.0,
                sub_side: 1.0,
                max: MAX_SIDE_RATIO,
            })
        );

        let fine = HollowCube::new(15.0, 1.0).unwrap();
        assert_eq!(fine.surface_tiles(HollowCase::Face).len(), 6 * 15 * 15 - 1);

        let coarse = HollowCube::new(999.0, 1.0).unwrap();
        let tiles = coarse.surface_tiles(HollowCase::Face);
        assert_eq!(tiles.len(), 6);
        assert!(tiles.iter().all(|t| t.edge == 999.0));
        assert_eq!(coarse.total_area(HollowCase::Face), 6.0 * 999.0 * 999.0 + 4.0);
    }

    #[test]
    fn test_parse_case_names() {
        assert_eq!("corner".parse::<HollowCase>(), Ok(HollowCase::Corner));
        assert_eq!(
            "middle".parse::<HollowCase>(),
            Err(HollowError::UnknownCase("middle".into()))
        );
    }

    #[test]
    fn test_uneven_sub_cube_keeps_whole_sides() {
        let cube = HollowCube::new(3.0, 1.3).unwrap();
        let tiles = cube.surface_tiles(HollowCase::Face);
        assert_eq!(tiles.len(), 6);
        assert!(tiles.iter().all(|t| t.edge == 3.0));
    }

    #[test]
    fn test_extraction_animates_and_lands() {
        let mut scene = HollowScene::new(HollowCube::default(), Duration::from_millis(1000));
        assert!(scene.sub_cube_faces().is_empty());

        scene.set_case(HollowCase::Corner);
        let home = scene.sub_cube_position().unwrap();
        assert_relative_eq!(home, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(scene.hole_walls().len(), 3);

        scene.toggle_extracted();
        assert!(scene.is_animating());
        scene.tick(Duration::from_millis(500));
        let mid = scene.sub_cube_position().unwrap();
        assert!(mid.x > home.x && mid.x < home.x + 2.5);

        scene.tick(Duration::from_millis(500));
        assert_eq!(scene.sub_cube_position(), Some(home + Vector3::from(EXTRACT_OFFSET)));

        let faces = scene.sub_cube_faces();
        assert_eq!(faces.iter().filter(|f| f.original).count(), 3);
    }

    #[test]
    fn test_case_change_keeps_extraction() {
        let mut scene = HollowScene::new(HollowCube::default(), Duration::from_millis(1000));
        scene.set_case(HollowCase::Face);
        scene.set_extracted(true);
        scene.tick(Duration::from_millis(300));
        scene.set_case(HollowCase::Edge);
        assert!(!scene.is_animating());
        let centre = scene.cube().sub_cube_centre(HollowCase::Edge).unwrap();
        assert_eq!(scene.sub_cube_position(), Some(centre + Vector3::from(EXTRACT_OFFSET)));
    }
}
