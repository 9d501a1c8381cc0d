//! The six faces of a voxel cube and their fixed geometry.

use glam::{IVec3, Vec3};

/// Corners of the unit cube centred on the origin.
///
/// Faces index into this table through [`Face::corners`].
pub const UNIT_CUBE: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
];

/// One face of a voxel cube, named from the model's point of view.
///
/// The `repr(u8)` discriminant is the face's index in per-face tables and
/// its bit in [`FaceMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// +Z.
    Front = 0,
    /// −Z.
    Back = 1,
    /// +X.
    Right = 2,
    /// −X.
    Left = 3,
    /// +Y.
    Top = 4,
    /// −Y.
    Bottom = 5,
}

impl Face {
    /// All six faces in table order.
    pub const ALL: [Face; 6] = [
        Self::Front,
        Self::Back,
        Self::Right,
        Self::Left,
        Self::Top,
        Self::Bottom,
    ];

    /// Outward unit normal in model space.
    pub const fn normal(self) -> Vec3 {
        match self {
            Self::Front => Vec3::Z,
            Self::Back => Vec3::NEG_Z,
            Self::Right => Vec3::X,
            Self::Left => Vec3::NEG_X,
            Self::Top => Vec3::Y,
            Self::Bottom => Vec3::NEG_Y,
        }
    }

    /// Lattice offset of the neighbouring cell this face touches.
    pub const fn neighbor_offset(self) -> IVec3 {
        match self {
            Self::Front => IVec3::Z,
            Self::Back => IVec3::NEG_Z,
            Self::Right => IVec3::X,
            Self::Left => IVec3::NEG_X,
            Self::Top => IVec3::Y,
            Self::Bottom => IVec3::NEG_Y,
        }
    }

    /// Indices into [`UNIT_CUBE`] forming the face outline in winding order.
    pub const fn corners(self) -> [usize; 4] {
        match self {
            Self::Front => [4, 5, 6, 7],
            Self::Back => [1, 0, 3, 2],
            Self::Right => [5, 1, 2, 6],
            Self::Left => [0, 4, 7, 3],
            Self::Top => [7, 6, 2, 3],
            Self::Bottom => [0, 1, 5, 4],
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }

    /// Lower-case name, as used in stage parameter keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Right => "right",
            Self::Left => "left",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Returns the face index (0–5).
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Compact set of faces, one bit per [`Face`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b11_1111);

    pub fn insert(&mut self, face: Face) {
        self.0 |= 1 << face.index();
    }

    pub fn remove(&mut self, face: Face) {
        self.0 &= !(1 << face.index());
    }

    pub fn contains(self, face: Face) -> bool {
        self.0 & (1 << face.index()) != 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Faces in the set, in table order.
    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Face> for FaceMask {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        let mut mask = Self::NONE;
        for face in iter {
            mask.insert(face);
        }
        mask
    }
}
