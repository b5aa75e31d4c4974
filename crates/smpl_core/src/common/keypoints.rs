//! Named body landmarks used to set up correspondences with an input scan and
//! to draw the fit. A landmark resolves either to a template vertex or to a
//! skeleton joint.

use super::{
    errors::{Result, SmplError},
    metadata::smpl_metadata,
};
use enum_map::{Enum, EnumMap};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum KeyPoint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftThumb,
    LeftIndex,
    LeftMiddle,
    LeftRing,
    LeftPinky,
    RightThumb,
    RightIndex,
    RightMiddle,
    RightRing,
    RightPinky,
    LeftBigToe,
    LeftSmallToe,
    LeftHeel,
    RightBigToe,
    RightSmallToe,
    RightHeel,
    Pelvis,
    Neck,
    Head,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

/// Where a ``KeyPoint`` lives on the model
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyIndex {
    Vertex(usize),
    Joint(usize),
}

//vertex ids of the surface landmarks on the SMPL template
const SMPL_KEY_VERTICES: [(KeyPoint, usize); 21] = [
    (KeyPoint::Nose, 332),
    (KeyPoint::LeftEye, 2800),
    (KeyPoint::RightEye, 6260),
    (KeyPoint::LeftEar, 583),
    (KeyPoint::RightEar, 4071),
    (KeyPoint::LeftThumb, 2746),
    (KeyPoint::LeftIndex, 2319),
    (KeyPoint::LeftMiddle, 2445),
    (KeyPoint::LeftRing, 2556),
    (KeyPoint::LeftPinky, 2673),
    (KeyPoint::RightThumb, 6191),
    (KeyPoint::RightIndex, 5782),
    (KeyPoint::RightMiddle, 5905),
    (KeyPoint::RightRing, 6016),
    (KeyPoint::RightPinky, 6133),
    (KeyPoint::LeftBigToe, 3216),
    (KeyPoint::LeftSmallToe, 3226),
    (KeyPoint::LeftHeel, 3387),
    (KeyPoint::RightBigToe, 6617),
    (KeyPoint::RightSmallToe, 6624),
    (KeyPoint::RightHeel, 6787),
];

/// Mapping from ``KeyPoint`` to its index on a particular model
#[derive(Clone, Default, Debug)]
pub struct KeyPoints {
    key_to_index: EnumMap<KeyPoint, Option<KeyIndex>>,
}
impl KeyPoints {
    /// No landmarks at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The landmarks of the canonical SMPL template. Skeleton landmarks are
    /// resolved through the SMPL joint names.
    pub fn smpl() -> Self {
        let metadata = smpl_metadata();
        let mut key_points = Self::empty();
        for key in KeyPoint::iter() {
            if let Some(joint) = metadata.joint_index(&key.to_string()) {
                key_points.key_to_index[key] = Some(KeyIndex::Joint(joint));
            }
        }
        for (key, vertex) in SMPL_KEY_VERTICES {
            key_points.key_to_index[key] = Some(KeyIndex::Vertex(vertex));
        }
        key_points
    }

    #[must_use]
    pub fn with(mut self, key: KeyPoint, index: KeyIndex) -> Self {
        self.key_to_index[key] = Some(index);
        self
    }

    pub fn get(&self, key: KeyPoint) -> Option<KeyIndex> {
        self.key_to_index[key]
    }

    /// Lookup by snake case name, e.g. `"left_big_toe"`. Case is ignored.
    pub fn by_name(&self, name: &str) -> Option<KeyIndex> {
        KeyPoint::from_str(name).ok().and_then(|key| self.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyPoint, KeyIndex)> + '_ {
        self.key_to_index.iter().filter_map(|(key, index)| index.map(|index| (key, index)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every landmark points inside a model of the given size
    pub fn validate(&self, num_verts: usize, num_joints: usize) -> Result<()> {
        for (_, index) in self.iter() {
            match index {
                KeyIndex::Vertex(v) if v >= num_verts => {
                    return Err(SmplError::AssetDimensionMismatch {
                        asset: "key point vertex index",
                        expected: num_verts,
                        actual: v,
                    })
                }
                KeyIndex::Joint(j) if j >= num_joints => {
                    return Err(SmplError::AssetDimensionMismatch {
                        asset: "key point joint index",
                        expected: num_joints,
                        actual: j,
                    })
                }
                _ => {}
            }
        }
        Ok(())
    }
}
