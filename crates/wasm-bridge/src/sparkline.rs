//! Filled line chart on a 2D canvas, redrawn whole on every push

use clinker_shared::{ClinkerError, ClinkerResult};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const LINE_COLOR: &str = "#4285f4";
const FILL_COLOR: &str = "rgba(66,133,244,0.1)";
const LINE_WIDTH: f64 = 2.0;

/// Vertical range with a little headroom; flat series are centred
fn value_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.1;
    (min - pad, max + pad)
}

/// Canvas coordinates for `values` spread over `width` x `height`
pub fn layout(values: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    if values.is_empty() {
        return Vec::new();
    }
    let (low, high) = value_range(values);
    let step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = if values.len() > 1 { i as f64 * step } else { width / 2.0 };
            let y = height - (v - low) / (high - low) * height;
            (x, y)
        })
        .collect()
}

pub fn draw(canvas: &HtmlCanvasElement, values: &[f64]) -> ClinkerResult<()> {
    let ctx = canvas
        .get_context("2d")?
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or_else(|| ClinkerError::JsInterop {
            message: "2d context unavailable".to_string(),
        })?;

    let width = f64::from(canvas.width());
    let height = f64::from(canvas.height());
    ctx.clear_rect(0.0, 0.0, width, height);

    let points = layout(values, width, height);
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(());
    };

    ctx.begin_path();
    ctx.move_to(first.0, first.1);
    for (x, y) in &points[1..] {
        ctx.line_to(*x, *y);
    }
    ctx.set_stroke_style_str(LINE_COLOR);
    ctx.set_line_width(LINE_WIDTH);
    ctx.stroke();

    ctx.line_to(last.0, height);
    ctx.line_to(first.0, height);
    ctx.close_path();
    ctx.set_fill_style_str(FILL_COLOR);
    ctx.fill();

    Ok(())
}
