use crate::uniform::UniformSet;

/// Handle to GPU-resident geometry issued by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableId(pub u32);

/// The shader programs a frame can draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Phong-lit surfaces: cubes and the loaded model.
    Lit,
    /// Unlit light-indicator cubes.
    Lamp,
}

/// One step of a frame's submission sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Write uniforms into a program. Values persist until overwritten.
    Uniforms {
        program: ProgramKind,
        uniforms: UniformSet,
    },
    /// Draw a renderable with the program's current uniform values.
    Draw {
        program: ProgramKind,
        renderable: RenderableId,
    },
}

/// Ordered submission sequence for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub clear_color: [f32; 4],
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            clear_color,
            commands: Vec::new(),
        }
    }

    pub fn set_uniforms(&mut self, program: ProgramKind, uniforms: UniformSet) {
        self.commands.push(DrawCommand::Uniforms { program, uniforms });
    }

    pub fn draw(&mut self, program: ProgramKind, renderable: RenderableId) {
        self.commands.push(DrawCommand::Draw {
            program,
            renderable,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Draw { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_count_ignores_uniform_writes() {
        let mut list = DrawList::new([0.0; 4]);
        list.set_uniforms(ProgramKind::Lit, UniformSet::new().with("model", 1));
        list.draw(ProgramKind::Lit, RenderableId(0));
        list.draw(ProgramKind::Lamp, RenderableId(1));
        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.draw_count(), 2);
    }
}
