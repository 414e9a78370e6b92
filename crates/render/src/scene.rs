use crate::camera::FlyCamera;
use crate::config::SceneConfig;
use crate::draw::{DrawList, ProgramKind, RenderableId};
use crate::uniform::UniformSet;
use glam::{Mat4, Quat, Vec3};

/// Renderable handles a backend issued for the scene's geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneRenderables {
    pub cube: RenderableId,
    pub lamp: RenderableId,
    pub model: Option<RenderableId>,
}

/// Static scene description bound to backend geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub config: SceneConfig,
    pub renderables: SceneRenderables,
}

impl Scene {
    pub fn new(config: SceneConfig, renderables: SceneRenderables) -> Self {
        Self {
            config,
            renderables,
        }
    }

    /// Model matrix of cube `index`: translate, then rotate by `step * index`.
    pub fn cube_matrix(&self, index: usize) -> Mat4 {
        let cubes = &self.config.cubes;
        let angle = (cubes.rotation_step_degrees * index as f32).to_radians();
        let rotation = Quat::from_axis_angle(cubes.rotation_axis.normalize(), angle);
        Mat4::from_translation(cubes.positions[index]) * Mat4::from_quat(rotation)
    }

    pub fn lamp_matrix(&self, position: Vec3) -> Mat4 {
        Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(self.config.lamp_scale))
    }

    /// Build the full submission sequence for one frame.
    ///
    /// Order: lit frame uniforms, cubes, lamp frame uniforms, light markers,
    /// then the loaded model.
    pub fn compose_frame(&self, camera: &FlyCamera, time: f32, aspect: f32) -> DrawList {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix(aspect);
        let lighting = self.config.lighting.uniforms(time, camera);

        let mut list = DrawList::new(self.config.clear_color);

        let mut lit = UniformSet::new()
            .with("view", view)
            .with("projection", projection);
        lit.extend(&lighting);
        list.set_uniforms(ProgramKind::Lit, lit);

        for index in 0..self.config.cubes.positions.len() {
            list.set_uniforms(
                ProgramKind::Lit,
                UniformSet::new().with("model", self.cube_matrix(index)),
            );
            list.draw(ProgramKind::Lit, self.renderables.cube);
        }

        list.set_uniforms(
            ProgramKind::Lamp,
            UniformSet::new()
                .with("view", view)
                .with("projection", projection)
                .with("lightColor", Vec3::ONE),
        );
        for position in self.config.lighting.lamp_positions() {
            list.set_uniforms(
                ProgramKind::Lamp,
                UniformSet::new().with("model", self.lamp_matrix(position)),
            );
            list.draw(ProgramKind::Lamp, self.renderables.lamp);
        }

        if let Some(model) = self.renderables.model {
            list.set_uniforms(
                ProgramKind::Lit,
                UniformSet::new().with("model", self.config.model_transform.matrix()),
            );
            list.draw(ProgramKind::Lit, model);
        }

        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use crate::lighting::{Lighting, PulsingLight};
    use crate::uniform::UniformValue;

    fn renderables(model: Option<RenderableId>) -> SceneRenderables {
        SceneRenderables {
            cube: RenderableId(0),
            lamp: RenderableId(1),
            model,
        }
    }

    fn draws(list: &DrawList) -> Vec<(ProgramKind, RenderableId)> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Draw {
                    program,
                    renderable,
                } => Some((*program, *renderable)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn draws_cubes_then_lamps_then_model() {
        let scene = Scene::new(SceneConfig::default(), renderables(Some(RenderableId(2))));
        let list = scene.compose_frame(&FlyCamera::default(), 0.0, 4.0 / 3.0);
        let draws = draws(&list);
        assert_eq!(draws.len(), 10 + 4 + 1);
        assert!(draws[..10]
            .iter()
            .all(|d| *d == (ProgramKind::Lit, RenderableId(0))));
        assert!(draws[10..14]
            .iter()
            .all(|d| *d == (ProgramKind::Lamp, RenderableId(1))));
        assert_eq!(draws[14], (ProgramKind::Lit, RenderableId(2)));
    }

    #[test]
    fn frame_uniforms_precede_first_draw() {
        let scene = Scene::new(SceneConfig::default(), renderables(None));
        let camera = FlyCamera::default();
        let list = scene.compose_frame(&camera, 0.0, 1.0);
        match &list.commands()[0] {
            DrawCommand::Uniforms {
                program: ProgramKind::Lit,
                uniforms,
            } => {
                assert_eq!(
                    uniforms.get("view"),
                    Some(&UniformValue::Mat4(camera.view_matrix()))
                );
                assert!(uniforms.get("spotLight.cutOff").is_some());
            }
            other => panic!("unexpected first command {other:?}"),
        }
    }

    #[test]
    fn cube_rotation_steps_twenty_degrees() {
        let scene = Scene::new(SceneConfig::default(), renderables(None));
        assert_eq!(scene.cube_matrix(0), Mat4::IDENTITY);

        let axis = Vec3::new(1.0, 0.3, 0.5).normalize();
        let expected = Mat4::from_translation(Vec3::new(-1.5, -2.2, -2.5))
            * Mat4::from_axis_angle(axis, 40.0_f32.to_radians());
        assert!(scene.cube_matrix(2).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn lamp_markers_are_scaled() {
        let scene = Scene::new(SceneConfig::default(), renderables(None));
        let m = scene.lamp_matrix(Vec3::new(1.0, 2.0, 3.0));
        let corner = m.transform_point3(Vec3::splat(0.5));
        assert!(corner.abs_diff_eq(Vec3::new(1.1, 2.1, 3.1), 1e-5));
    }

    #[test]
    fn pulsing_scene_has_one_lamp() {
        let config = SceneConfig {
            lighting: Lighting::Pulsing(PulsingLight::default()),
            ..SceneConfig::default()
        };
        let scene = Scene::new(config, renderables(None));
        let list = scene.compose_frame(&FlyCamera::default(), 1.0, 1.0);
        assert_eq!(list.draw_count(), 11);
    }
}
