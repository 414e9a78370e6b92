use crate::draw::{DrawCommand, DrawList, ProgramKind};
use crate::uniform::UniformValue;
use std::fmt::Write;

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A renderer consumes a finished [`DrawList`]; it never feeds back into the
/// camera or scene state that produced it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Execute one frame's submission sequence.
    fn render(&mut self, frame: &DrawList) -> Self::Output;
}

/// Text renderer: describes a draw list instead of rasterising it.
///
/// Used by the CLI and tests to inspect frames without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Print every uniform write instead of only counting them.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

fn program_name(program: ProgramKind) -> &'static str {
    match program {
        ProgramKind::Lit => "lit",
        ProgramKind::Lamp => "lamp",
    }
}

fn format_value(value: &UniformValue) -> String {
    match value {
        UniformValue::Int(v) => format!("{v}"),
        UniformValue::Float(v) => format!("{v:.4}"),
        UniformValue::Vec3(v) => format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z),
        UniformValue::Mat4(m) => {
            let t = m.w_axis;
            format!("mat4[t=({:.3}, {:.3}, {:.3})]", t.x, t.y, t.z)
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &DrawList) -> String {
        let mut out = String::new();
        let c = frame.clear_color;
        let _ = writeln!(
            out,
            "=== Frame (draws={}, clear=({:.2}, {:.2}, {:.2}, {:.2})) ===",
            frame.draw_count(),
            c[0],
            c[1],
            c[2],
            c[3]
        );
        for command in frame.commands() {
            match command {
                DrawCommand::Uniforms { program, uniforms } => {
                    if self.verbose {
                        for (name, value) in uniforms.iter() {
                            let _ = writeln!(
                                out,
                                "  set [{}] {name} = {}",
                                program_name(*program),
                                format_value(value)
                            );
                        }
                    } else {
                        let _ = writeln!(
                            out,
                            "  set [{}] {} uniforms",
                            program_name(*program),
                            uniforms.len()
                        );
                    }
                }
                DrawCommand::Draw {
                    program,
                    renderable,
                } => {
                    let _ = writeln!(
                        out,
                        "  draw [{}] renderable #{}",
                        program_name(*program),
                        renderable.0
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::RenderableId;
    use crate::uniform::UniformSet;
    use glam::Vec3;

    #[test]
    fn debug_renderer_empty_frame() {
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&DrawList::new([0.1, 0.1, 0.1, 1.0]));
        assert!(output.contains("draws=0"));
        assert!(output.contains("clear=(0.10, 0.10, 0.10, 1.00)"));
    }

    #[test]
    fn debug_renderer_lists_commands_in_order() {
        let mut list = DrawList::new([0.0; 4]);
        list.set_uniforms(
            ProgramKind::Lamp,
            UniformSet::new().with("lightColor", Vec3::ONE),
        );
        list.draw(ProgramKind::Lamp, RenderableId(7));

        let brief = DebugTextRenderer::new().render(&list);
        assert!(brief.contains("set [lamp] 1 uniforms"));
        assert!(brief.find("set [lamp]").unwrap() < brief.find("draw [lamp] renderable #7").unwrap());

        let verbose = DebugTextRenderer::verbose().render(&list);
        assert!(verbose.contains("lightColor = (1.000, 1.000, 1.000)"));
    }
}
