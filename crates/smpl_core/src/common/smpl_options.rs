use super::types::RotationBackend;

/// Options for the evaluation of smpl models
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SmplOptions {
    pub rotation_backend: RotationBackend,
}
impl SmplOptions {
    pub fn new(rotation_backend: RotationBackend) -> Self {
        Self { rotation_backend }
    }
    #[must_use]
    pub fn with_rotation_backend(mut self, rotation_backend: RotationBackend) -> Self {
        self.rotation_backend = rotation_backend;
        self
    }
}
