use super::{errors::SmplError, metadata::smpl_metadata};
use enum_map::Enum;
use strum_macros::{Display, EnumIter};

/// Gender of the body model. Each gender has its own set of template assets.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Enum, EnumIter, Display)]
pub enum Gender {
    Neutral = 0,
    Male,
    Female,
}
impl Gender {
    /// One-letter code used to name the per-gender asset folders
    pub fn code(self) -> char {
        match self {
            Gender::Neutral => 'n',
            Gender::Male => 'm',
            Gender::Female => 'f',
        }
    }
}
/// Only the gendered models ship with assets, so only `'f'` and `'m'` parse.
impl TryFrom<char> for Gender {
    type Error = SmplError;
    fn try_from(code: char) -> Result<Self, Self::Error> {
        match code {
            'f' => Ok(Gender::Female),
            'm' => Ok(Gender::Male),
            _ => Err(SmplError::GenderMismatch(code.to_string())),
        }
    }
}

/// Which implementation differentiates the axis-angle to rotation map
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, Display)]
pub enum RotationBackend {
    /// Hand derived Rodrigues derivative
    #[default]
    ClosedForm,
    /// Rotation from nalgebra with the compact derivative on top of it
    Nalgebra,
}

/// Sizes every asset of a model has to agree with
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModelDims {
    pub num_verts: usize,
    pub num_joints: usize,
    pub shape_space_dim: usize,
    pub weights_by_vertex: usize,
}
impl ModelDims {
    pub fn new(num_verts: usize, num_joints: usize, shape_space_dim: usize, weights_by_vertex: usize) -> Self {
        Self {
            num_verts,
            num_joints,
            shape_space_dim,
            weights_by_vertex,
        }
    }
    /// Dimensions of the canonical SMPL model
    pub fn smpl() -> Self {
        let metadata = smpl_metadata();
        Self::new(
            metadata.num_verts,
            metadata.num_joints,
            metadata.shape_space_dim,
            metadata.weights_by_vertex,
        )
    }
    pub fn pose_dim(&self) -> usize {
        self.num_joints * crate::smpl::SPACE_DIM
    }
}
