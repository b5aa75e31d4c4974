use super::{
    betas::Betas,
    errors::Result,
    keypoints::KeyPoints,
    outputs::SmplOutput,
    pose::Pose,
    types::{Gender, ModelDims},
};
use enum_map::EnumMap;
use log::info;
use ndarray as nd;
/// Trait for a Smpl based model evaluated on the CPU.
pub trait SmplModel: Send + Sync + 'static {
    fn gender(&self) -> Gender;
    fn dims(&self) -> ModelDims;
    /// Shapes, poses and translates the model in one go
    /// # Errors
    /// When the betas or the pose do not fit the model
    fn forward(&self, betas: &Betas, pose: &Pose) -> Result<SmplOutput>;
    /// # Errors
    /// When the number of betas does not match the shape space
    fn betas2verts(&self, betas: &Betas) -> Result<nd::Array2<f64>>;
    fn verts2joints(&self, verts_t_pose: &nd::Array2<f64>) -> nd::Array2<f64>;
    /// Skins already shaped vertices, ignoring the global translation
    /// # Errors
    /// When the pose does not fit the skeleton
    fn apply_pose(&self, verts_t_pose: &nd::Array2<f64>, pose: &Pose) -> Result<nd::Array2<f64>>;
    fn faces(&self) -> &nd::Array2<u32>;
    fn key_points(&self) -> &KeyPoints;
}

/// A Cache for storing and easy access to ``SmplModels``, one per ``Gender``
#[derive(Default)]
pub struct SmplCache {
    gender_to_model: EnumMap<Gender, Option<Box<dyn SmplModel>>>,
}
impl SmplCache {
    /// Adds a model, replacing any previous model of the same gender
    pub fn add_model<T: SmplModel>(&mut self, model: T) {
        let gender = model.gender();
        if self.has_model(gender) {
            info!("Replacing cached {gender} model");
        }
        self.gender_to_model[gender] = Some(Box::new(model));
    }
    pub fn remove_all_models(&mut self) {
        self.gender_to_model = EnumMap::default();
    }
    #[allow(clippy::redundant_closure_for_method_calls)]
    pub fn get_model_ref(&self, gender: Gender) -> Option<&dyn SmplModel> {
        self.gender_to_model[gender].as_ref().map(|x| x.as_ref())
    }
    pub fn has_model(&self, gender: Gender) -> bool {
        self.gender_to_model[gender].is_some()
    }
}
