use std::io::Write;

use hopper_core::config::Viewport;
use hopper_core::render::Frame;

/// Receives one frame per tick.
pub trait FrameSink {
    fn draw(&mut self, frame: &Frame);
}

/// Logs each frame's rectangle at debug level.
#[derive(Debug, Default)]
pub struct LogSink;

impl FrameSink for LogSink {
    fn draw(&mut self, frame: &Frame) {
        tracing::debug!(
            tick = frame.tick,
            position = %frame.position,
            x = frame.rect.x,
            y = frame.rect.y,
            w = frame.rect.width,
            h = frame.rect.height,
            phase = ?frame.phase,
            jumps_remaining = frame.jumps_remaining,
            "fill_rect"
        );
    }
}

/// Draws the viewport as a character grid, one cell per `viewport / grid` pixels.
pub struct AsciiSink<W: Write> {
    out: W,
    viewport: Viewport,
    cols: u32,
    rows: u32,
}

impl<W: Write> AsciiSink<W> {
    pub fn new(out: W, viewport: Viewport, cols: u32, rows: u32) -> Self {
        Self {
            out,
            viewport,
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render `frame` to a string without writing it.
    pub fn render(&self, frame: &Frame) -> String {
        let rect = frame.rect;
        let cell = |px: i64, extent: u32, cells: u32| -> i64 {
            (px * i64::from(cells) / i64::from(extent.max(1))).clamp(0, i64::from(cells) - 1)
        };
        let x0 = i64::from(rect.x);
        let y0 = i64::from(rect.y);
        let x1 = x0 + i64::from(rect.width.max(1)) - 1;
        let y1 = y0 + i64::from(rect.height.max(1)) - 1;
        let c0 = cell(x0, self.viewport.width, self.cols);
        let c1 = cell(x1, self.viewport.width, self.cols);
        let r0 = cell(y0, self.viewport.height, self.rows);
        let r1 = cell(y1, self.viewport.height, self.rows);

        let border = format!("+{}+\n", "-".repeat(self.cols as usize));
        let mut grid = format!("tick {} {}\n", frame.tick, frame.position);
        grid.push_str(&border);
        for r in 0..i64::from(self.rows) {
            grid.push('|');
            for c in 0..i64::from(self.cols) {
                let filled = (r0..=r1).contains(&r) && (c0..=c1).contains(&c);
                grid.push(if filled { '#' } else { ' ' });
            }
            grid.push_str("|\n");
        }
        grid.push_str(&border);
        grid
    }
}

impl<W: Write> FrameSink for AsciiSink<W> {
    fn draw(&mut self, frame: &Frame) {
        let grid = self.render(frame);
        if let Err(e) = self.out.write_all(grid.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::warn!(tick = frame.tick, error = %e, "Failed to draw frame");
        }
    }
}
