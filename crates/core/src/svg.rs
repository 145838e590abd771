//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write;

use barflow_protocol::{RenderCommand, TextAlign, Theme, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG canvas; `theme` resolves the axis and
/// background tokens. Bars keep their own fill.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, theme: Theme) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:sans-serif">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        theme.resolve(ThemeToken::Background),
    );

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                fill,
                stroke,
                corner_radius,
                key,
            } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    rect.x,
                    rect.y,
                    rect.w.max(0.0),
                    rect.h.max(0.0),
                );
                if *corner_radius > 0.0 {
                    let _ = write!(svg, r#" rx="{corner_radius}""#);
                }
                if let Some(stroke) = stroke {
                    let _ = write!(
                        svg,
                        r#" stroke="{}" stroke-width="{}""#,
                        stroke.color, stroke.width
                    );
                }
                match key {
                    Some(key) => {
                        let key = escape_xml(key);
                        let _ = write!(svg, r#" data-key="{key}"><title>{key}</title></rect>"#);
                    }
                    None => svg.push_str("/>"),
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    theme.resolve(*color),
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Start => "start",
                    TextAlign::Middle => "middle",
                    TextAlign::End => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    theme.resolve(*color),
                    escape_xml(text),
                );
            }
            RenderCommand::PushTransform { translate } => {
                let _ = write!(
                    svg,
                    r#"<g transform="translate({},{})">"#,
                    translate.x, translate.y
                );
            }
            RenderCommand::BeginGroup { id } => {
                let _ = write!(svg, r#"<g class="{}">"#, escape_xml(id));
            }
            RenderCommand::PopTransform | RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
