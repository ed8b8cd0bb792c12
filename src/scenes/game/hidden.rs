use std::path::PathBuf;

use crate::{
    data_structures::model::Model3D, pipelines::shader::Shader, render::Render,
};

/// An object the player has to find.
#[derive(Debug)]
pub struct HiddenObject<M = Model3D> {
    pub model: M,
    pub icon: PathBuf,
    found: bool,
}

impl<M> HiddenObject<M> {
    pub fn new(model: M, icon: impl Into<PathBuf>) -> Self {
        Self {
            model,
            icon: icon.into(),
            found: false,
        }
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Returns `true` only for the call that flips the flag.
    pub fn mark_found(&mut self) -> bool {
        !std::mem::replace(&mut self.found, true)
    }
}

impl<M: Render> Render for HiddenObject<M> {
    fn render(&self, shader: &mut Shader, pass: &mut wgpu::RenderPass<'_>) {
        self.model.render(shader, pass);
    }

    fn draws(&self) -> usize {
        self.model.draws()
    }
}
