//! Decorative "matrix rain" on the `#matrix-bg` canvas.

use crate::error::{FingerprintError, Result};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

pub const CANVAS_ID: &str = "matrix-bg";
const FONT_SIZE: f64 = 16.0;
const TICK_MS: i32 = 33;
const RESET_THRESHOLD: f64 = 0.975;
const ALPHABET: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン\
                        ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// One glyph to draw this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x: f64,
    pub y: f64,
}

/// Drop positions, one per column, in rows.
#[derive(Debug, Clone)]
pub struct RainState {
    alphabet: Vec<char>,
    drops: Vec<u32>,
    height: f64,
}

impl RainState {
    pub fn new(width: f64, height: f64) -> Self {
        let columns = (width / FONT_SIZE).floor().max(0.0) as usize;
        Self {
            alphabet: ALPHABET.chars().collect(),
            drops: vec![1; columns],
            height,
        }
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    /// Advance every drop by one row and return what to draw.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Vec<Glyph> {
        let mut glyphs = Vec::with_capacity(self.drops.len());
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let ch = self.alphabet[rng.gen_range(0..self.alphabet.len())];
            let y = *drop as f64 * FONT_SIZE;
            glyphs.push(Glyph {
                ch,
                x: i as f64 * FONT_SIZE,
                y,
            });
            if y > self.height && rng.gen::<f64>() > RESET_THRESHOLD {
                *drop = 0;
            }
            *drop += 1;
        }
        glyphs
    }
}

/// The running animation. Its timer and resize closures live for the page.
pub struct MatrixRain {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    state: RefCell<RainState>,
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| FingerprintError::Unsupported("no window".into()))
}

fn viewport(window: &Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

impl MatrixRain {
    /// Size the canvas to the window and start ticking.
    pub fn start(canvas_id: &str) -> Result<Rc<Self>> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| FingerprintError::Unsupported("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| FingerprintError::Dom(format!("#{} not found", canvas_id)))?
            .dyn_into()
            .map_err(|_| FingerprintError::Dom(format!("#{} is not a canvas", canvas_id)))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| FingerprintError::from_js("getContext", e))?
            .ok_or_else(|| FingerprintError::Unsupported("2d canvas".into()))?
            .dyn_into()
            .map_err(|_| FingerprintError::Dom("unexpected 2d context type".into()))?;

        let (width, height) = viewport(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let rain = Rc::new(Self {
            canvas,
            ctx,
            state: RefCell::new(RainState::new(width, height)),
        });

        let tick = {
            let rain = rain.clone();
            Closure::wrap(Box::new(move || rain.draw()) as Box<dyn FnMut()>)
        };
        window
            .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), TICK_MS)
            .map_err(|e| FingerprintError::from_js("setInterval", e))?;
        tick.forget();

        let on_resize = {
            let rain = rain.clone();
            Closure::wrap(Box::new(move || rain.resize()) as Box<dyn FnMut()>)
        };
        window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(|e| FingerprintError::from_js("resize listener", e))?;
        on_resize.forget();

        log::debug!("Matrix background started ({} columns)", rain.state.borrow().columns());
        Ok(rain)
    }

    fn draw(&self) {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.05)");
        self.ctx.fill_rect(0.0, 0.0, width, height);
        self.ctx.set_fill_style_str("#00ff00");
        self.ctx.set_font(&format!("{}px monospace", FONT_SIZE));

        let glyphs = self.state.borrow_mut().step(&mut rand::thread_rng());
        let mut buf = [0u8; 4];
        for glyph in glyphs {
            let _ = self.ctx.fill_text(glyph.ch.encode_utf8(&mut buf), glyph.x, glyph.y);
        }
    }

    fn resize(&self) {
        let Ok(window) = window() else {
            return;
        };
        let (width, height) = viewport(&window);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        *self.state.borrow_mut() = RainState::new(width, height);
    }
}
