//! The render capability shared by every drawable asset.
//!
//! Scenes bind a [`Shader`] and set its frame uniforms, then hand the shader to
//! each asset. The asset binds whatever it owns (material, textures, vertex
//! buffers) and issues its draws through the shader.
//!
//! # Implementors
//!
//! - [`Model3D`](crate::data_structures::model::Model3D) and its meshes
//! - [`SkyBox`](crate::data_structures::skybox::SkyBox)
//! - [`Model2D`](crate::data_structures::billboard::Model2D) and
//!   [`TextModel`](crate::data_structures::billboard::TextModel)
//! - [`HiddenObject`](crate::scenes::game::hidden::HiddenObject)

use crate::pipelines::shader::Shader;

pub trait Render {
    /// Draw `self` with the currently bound `shader`.
    fn render(&self, shader: &mut Shader, pass: &mut wgpu::RenderPass<'_>);

    /// Upper bound of draw calls one `render` issues. Used to size the
    /// shader's per-draw uniform storage ahead of the first frame.
    fn draws(&self) -> usize {
        1
    }
}
