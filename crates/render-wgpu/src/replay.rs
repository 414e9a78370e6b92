//! Draw-list replay against per-program uniform blocks.
//!
//! Uniform commands update a program's block in place; every mesh draw then
//! applies the mesh's own overrides and takes a snapshot of the block. The
//! snapshot handle is whatever the target returns, a dynamic offset on the
//! GPU.

use phongview_render::{DrawCommand, DrawList, ProgramKind, RenderableId, UniformBlock, UniformSet};
use std::collections::HashSet;

/// A program's uniform state plus somewhere to keep per-draw snapshots.
pub(crate) trait UniformTarget {
    fn block_mut(&mut self) -> &mut UniformBlock;

    /// Record the block as it is now and return a handle to the copy.
    fn snapshot(&mut self) -> u32;
}

/// Uniform writes a mesh applies right before it is drawn.
pub(crate) trait MeshUniforms {
    fn overrides(&self) -> &UniformSet;
}

/// One mesh draw resolved against a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlannedDraw {
    pub program: ProgramKind,
    pub renderable: usize,
    pub mesh: usize,
    pub snapshot: u32,
}

pub(crate) fn replay<T: UniformTarget, M: MeshUniforms>(
    frame: &DrawList,
    lit: &mut T,
    lamp: &mut T,
    renderables: &[Vec<M>],
    reported_missing: &mut HashSet<RenderableId>,
) -> Vec<PlannedDraw> {
    let mut planned = Vec::with_capacity(frame.draw_count());
    for command in frame.commands() {
        match command {
            DrawCommand::Uniforms { program, uniforms } => {
                let target = match program {
                    ProgramKind::Lit => &mut *lit,
                    ProgramKind::Lamp => &mut *lamp,
                };
                target.block_mut().apply(uniforms);
            }
            DrawCommand::Draw {
                program,
                renderable,
            } => {
                let Some(meshes) = renderables.get(renderable.0 as usize) else {
                    if reported_missing.insert(*renderable) {
                        tracing::warn!(renderable = renderable.0, "draw of unknown renderable skipped");
                    }
                    continue;
                };
                let target = match program {
                    ProgramKind::Lit => &mut *lit,
                    ProgramKind::Lamp => &mut *lamp,
                };
                for (index, mesh) in meshes.iter().enumerate() {
                    let overrides = mesh.overrides();
                    if !overrides.is_empty() {
                        target.block_mut().apply(overrides);
                    }
                    planned.push(PlannedDraw {
                        program: *program,
                        renderable: renderable.0 as usize,
                        mesh: index,
                        snapshot: target.snapshot(),
                    });
                }
            }
        }
    }
    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders;
    use phongview_render::lighting::MultiLight;
    use phongview_render::{
        FlyCamera, Lighting, Scene, SceneConfig, SceneRenderables, UniformLayout, UniformValue,
    };

    /// Keeps snapshots in memory so tests can inspect them.
    struct Recorder {
        block: UniformBlock,
        snapshots: Vec<UniformBlock>,
    }

    impl Recorder {
        fn new(label: &str, layout: UniformLayout) -> Self {
            Self {
                block: UniformBlock::new(label, layout),
                snapshots: Vec::new(),
            }
        }

        fn read(&self, snapshot: u32, name: &str) -> Option<UniformValue> {
            self.snapshots[snapshot as usize].read(name)
        }
    }

    impl UniformTarget for Recorder {
        fn block_mut(&mut self) -> &mut UniformBlock {
            &mut self.block
        }

        fn snapshot(&mut self) -> u32 {
            self.snapshots.push(self.block.clone());
            (self.snapshots.len() - 1) as u32
        }
    }

    impl MeshUniforms for UniformSet {
        fn overrides(&self) -> &UniformSet {
            self
        }
    }

    fn scene(model: Option<RenderableId>) -> Scene {
        Scene::new(
            SceneConfig {
                lighting: Lighting::MultiLight(MultiLight::default()),
                ..SceneConfig::default()
            },
            SceneRenderables {
                cube: RenderableId(0),
                lamp: RenderableId(1),
                model,
            },
        )
    }

    /// Cube, lamp and a two-mesh model; the model's second mesh is textured.
    fn renderables() -> Vec<Vec<UniformSet>> {
        vec![
            vec![UniformSet::new()],
            vec![UniformSet::new()],
            vec![
                UniformSet::new()
                    .with("material.shininess", 8.0_f32)
                    .with("material.useMaps", 0),
                UniformSet::new()
                    .with("material.shininess", 64.0_f32)
                    .with("material.useMaps", 1),
            ],
        ]
    }

    fn programs() -> (Recorder, Recorder) {
        (
            Recorder::new("lit", shaders::lit_layout()),
            Recorder::new("lamp", shaders::lamp_layout()),
        )
    }

    #[test]
    fn each_cube_draw_sees_its_own_model_matrix() {
        let scene = scene(Some(RenderableId(2)));
        let frame = scene.compose_frame(&FlyCamera::default(), 0.5, 4.0 / 3.0);
        let (mut lit, mut lamp) = programs();
        let mut missing = HashSet::new();

        let planned = replay(&frame, &mut lit, &mut lamp, &renderables(), &mut missing);

        let cubes: Vec<_> = planned.iter().filter(|d| d.renderable == 0).collect();
        assert_eq!(cubes.len(), scene.config.cubes.positions.len());
        for (i, draw) in cubes.iter().enumerate() {
            assert_eq!(draw.program, ProgramKind::Lit);
            assert_eq!(
                lit.read(draw.snapshot, "model"),
                Some(UniformValue::Mat4(scene.cube_matrix(i)))
            );
        }
        let lamps = planned.iter().filter(|d| d.program == ProgramKind::Lamp).count();
        assert_eq!(lamps, scene.config.lighting.lamp_positions().len());
    }

    #[test]
    fn model_overrides_apply_per_mesh_and_do_not_leak() {
        let scene = scene(Some(RenderableId(2)));
        let camera = FlyCamera::default();
        let (mut lit, mut lamp) = programs();
        let mut missing = HashSet::new();
        let meshes = renderables();

        let first = scene.compose_frame(&camera, 0.0, 1.0);
        let planned = replay(&first, &mut lit, &mut lamp, &meshes, &mut missing);
        let model: Vec<_> = planned.iter().filter(|d| d.renderable == 2).collect();
        assert_eq!(model.len(), 2);
        assert_eq!(
            lit.read(model[0].snapshot, "material.useMaps"),
            Some(UniformValue::Int(0))
        );
        assert_eq!(
            lit.read(model[1].snapshot, "material.shininess"),
            Some(UniformValue::Float(64.0))
        );

        let second = scene.compose_frame(&camera, 0.016, 1.0);
        let planned = replay(&second, &mut lit, &mut lamp, &meshes, &mut missing);
        let cube = planned
            .iter()
            .find(|d| d.renderable == 0)
            .expect("cube draw");
        assert_eq!(
            lit.read(cube.snapshot, "material.useMaps"),
            Some(UniformValue::Int(1))
        );
        assert_eq!(
            lit.read(cube.snapshot, "material.shininess"),
            Some(UniformValue::Float(MultiLight::default().shininess))
        );
    }

    #[test]
    fn unknown_renderable_produces_no_draw() {
        let scene = scene(Some(RenderableId(9)));
        let frame = scene.compose_frame(&FlyCamera::default(), 0.0, 1.0);
        let (mut lit, mut lamp) = programs();
        let mut missing = HashSet::new();

        let planned = replay(&frame, &mut lit, &mut lamp, &renderables(), &mut missing);
        assert!(planned.iter().all(|d| d.renderable != 9));
        assert_eq!(planned.len(), frame.draw_count() - 1);
        assert!(missing.contains(&RenderableId(9)));

        replay(&frame, &mut lit, &mut lamp, &renderables(), &mut missing);
        assert_eq!(missing.len(), 1);
    }
}
