//! Faces, layouts and their descriptive metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::LayoutError;
use crate::geometry::Panel;
use crate::grid::NetGrid;
use crate::progress::Progress;
use crate::side::CubeSide;
use crate::transform::Pose;

/// Display color of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const BLUE: Rgb = Rgb::hex(0x3B82F6);
pub const GREEN: Rgb = Rgb::hex(0x10B981);
pub const AMBER: Rgb = Rgb::hex(0xF59E0B);
pub const RED: Rgb = Rgb::hex(0xEF4444);
pub const VIOLET: Rgb = Rgb::hex(0x8B5CF6);
pub const PINK: Rgb = Rgb::hex(0xEC4899);

/// Color a cube face gets from the side it folds onto, so the same side has
/// the same color in every net.
pub fn side_color(side: CubeSide) -> Rgb {
    match side {
        CubeSide::Front => BLUE,
        CubeSide::Top => GREEN,
        CubeSide::Bottom => AMBER,
        CubeSide::Left => RED,
        CubeSide::Right => VIOLET,
        CubeSide::Back => PINK,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolidKind {
    Cube,
    Cylinder,
    Cone,
}

impl SolidKind {
    pub const ALL: [SolidKind; 3] = [SolidKind::Cube, SolidKind::Cylinder, SolidKind::Cone];

    pub fn name(self) -> &'static str {
        match self {
            SolidKind::Cube => "Cube",
            SolidKind::Cylinder => "Cylinder",
            SolidKind::Cone => "Cone",
        }
    }

    /// Surface-area formulas shown next to the solid's nets.
    pub fn formulas(self) -> &'static [&'static str] {
        match self {
            SolidKind::Cube => &["S = 6a²"],
            SolidKind::Cylinder => &["lateral = 2πr × h", "S = 2πrh + 2πr²"],
            SolidKind::Cone => &["lateral = πrl, l = √(r² + h²)", "S = πrl + πr²"],
        }
    }
}

/// How user input drives a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Vertical drags map continuously onto progress.
    Drag,
    /// Progress is exactly folded or unfolded; changes play an eased transition.
    Toggle,
}

/// The four shape families of the eleven cube nets, named by how many
/// squares each row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetFamily {
    OneFourOne,
    TwoThreeOne,
    TwoTwoTwo,
    ThreeThree,
}

impl NetFamily {
    pub const ALL: [NetFamily; 4] = [
        NetFamily::OneFourOne,
        NetFamily::TwoThreeOne,
        NetFamily::TwoTwoTwo,
        NetFamily::ThreeThree,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NetFamily::OneFourOne => "1-4-1",
            NetFamily::TwoThreeOne => "2-3-1",
            NetFamily::TwoTwoTwo => "2-2-2",
            NetFamily::ThreeThree => "3-3",
        }
    }

    /// Number of distinct nets in the family.
    pub fn variants(self) -> usize {
        match self {
            NetFamily::OneFourOne => 6,
            NetFamily::TwoThreeOne => 3,
            NetFamily::TwoTwoTwo => 1,
            NetFamily::ThreeThree => 1,
        }
    }

    /// Rule of thumb for recognising the family.
    pub fn mnemonic(self) -> &'static str {
        match self {
            NetFamily::OneFourOne => "four in a row through the middle, one on each side anywhere",
            NetFamily::TwoThreeOne => "two and three joined and offset by one, the last one anywhere under the three",
            NetFamily::TwoTwoTwo => "three pairs joined like stairs, each shifted by one",
            NetFamily::ThreeThree => "two rows of three that overlap by exactly one square",
        }
    }
}

impl fmt::Display for NetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rules for spotting opposite faces in a flat cube net.
pub const OPPOSITE_FACE_RULES: [&str; 4] = [
    "opposite faces are never adjacent: exactly one square lies between them in a line",
    "in 1-4-1 and 2-3-1 nets the single squares can slide along their side",
    "2-2-2 is a staircase, 3-3 is two rows of three",
    "no net has a row of more than four, an L-bend of five, or a 2×2 block",
];

/// One flat rigid panel of a solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    label: String,
    color: Rgb,
    panel: Panel,
    side: Option<CubeSide>,
    folded: Pose,
    unfolded: Pose,
}

impl Face {
    pub fn new(label: impl Into<String>, color: Rgb, panel: Panel, folded: Pose, unfolded: Pose) -> Self {
        Self {
            label: label.into(),
            color,
            panel,
            side: None,
            folded,
            unfolded,
        }
    }

    /// Records the cube side the face folds onto.
    pub fn on_side(mut self, side: CubeSide) -> Self {
        self.side = Some(side);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn side(&self) -> Option<CubeSide> {
        self.side
    }

    pub fn folded(&self) -> &Pose {
        &self.folded
    }

    pub fn unfolded(&self) -> &Pose {
        &self.unfolded
    }

    /// Displayed pose at `progress`.
    pub fn pose_at(&self, progress: Progress) -> Pose {
        self.folded.lerp(&self.unfolded, progress.value())
    }
}

/// A named, ordered, immutable collection of faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    id: String,
    name: String,
    solid: SolidKind,
    mode: ControlMode,
    initial_progress: Progress,
    family: Option<NetFamily>,
    grid: Option<NetGrid>,
    notes: Vec<String>,
    faces: Vec<Face>,
}

impl Layout {
    /// New layout starting folded.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        solid: SolidKind,
        mode: ControlMode,
        faces: Vec<Face>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            solid,
            mode,
            initial_progress: Progress::FOLDED,
            family: None,
            grid: None,
            notes: Vec::new(),
            faces,
        }
    }

    pub fn starting_at(mut self, progress: Progress) -> Self {
        self.initial_progress = match self.mode {
            ControlMode::Drag => progress,
            ControlMode::Toggle if progress.value() < 0.5 => Progress::FOLDED,
            ControlMode::Toggle => Progress::UNFOLDED,
        };
        self
    }

    pub fn with_family(mut self, family: NetFamily) -> Self {
        self.family = Some(family);
        self
    }

    pub fn with_grid(mut self, grid: NetGrid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn solid(&self) -> SolidKind {
        self.solid
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn initial_progress(&self) -> Progress {
        self.initial_progress
    }

    pub fn family(&self) -> Option<NetFamily> {
        self.family
    }

    pub fn grid(&self) -> Option<&NetGrid> {
        self.grid.as_ref()
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, label: &str) -> Option<&Face> {
        self.faces.iter().find(|f| f.label == label)
    }

    /// Total flat area of all panels.
    pub fn surface_area(&self) -> f32 {
        self.faces.iter().map(|f| f.panel.area()).sum()
    }

    /// Pairs of face labels that fold onto opposite cube sides.
    pub fn opposite_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for (i, a) in self.faces.iter().enumerate() {
            for b in &self.faces[i + 1..] {
                if let (Some(sa), Some(sb)) = (a.side, b.side) {
                    if sa.opposite() == sb {
                        pairs.push((a.label(), b.label()));
                    }
                }
            }
        }
        pairs
    }

    /// Checks the invariants every registered layout must hold.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.faces.is_empty() {
            return Err(LayoutError::Empty {
                id: self.id.clone(),
            });
        }

        let mut labels = HashSet::new();
        for face in &self.faces {
            if !labels.insert(face.label.as_str()) {
                return Err(LayoutError::DuplicateLabel {
                    id: self.id.clone(),
                    label: face.label.clone(),
                });
            }
            if !face.folded.is_finite() || !face.unfolded.is_finite() {
                return Err(LayoutError::NonFinitePose {
                    id: self.id.clone(),
                    label: face.label.clone(),
                });
            }
        }
        Ok(())
    }
}
