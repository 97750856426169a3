use orgflow::slider::Slider;
use orgflow::{generate_samples, Intensity, OrgFlowError, OrgFlowPage, PageConfig, Structure, ViewTab};
use wasm_bindgen::prelude::*;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// The interactive page, driven by canvas pointer events.
///
/// The frontend calls `render()` after any event that returns `true` and
/// copies the RGBA buffer into an `ImageData` of `width() x height()`.
#[wasm_bindgen]
pub struct OrgFlowApp {
    page: OrgFlowPage,
}

#[wasm_bindgen]
impl OrgFlowApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<OrgFlowApp, JsValue> {
        let page = OrgFlowPage::new(PageConfig::default()).map_err(js_error)?;
        Ok(Self { page })
    }

    /// Build from a JSON `PageConfig`; missing fields keep their defaults.
    pub fn with_config(json: &str) -> Result<OrgFlowApp, JsValue> {
        let config = PageConfig::from_json(json).map_err(js_error)?;
        let page = OrgFlowPage::new(config).map_err(js_error)?;
        Ok(Self { page })
    }

    pub fn width(&self) -> u32 {
        self.page.config().width
    }

    pub fn height(&self) -> u32 {
        self.page.config().height
    }

    /// Current slider position, `0..=100`.
    pub fn intensity(&self) -> u32 {
        self.page.intensity().percent()
    }

    pub fn active_view(&self) -> String {
        self.page.active_view().key().to_string()
    }

    /// `input` event of a range control. Returns the applied percent.
    pub fn slider_input(&mut self, value: f64) -> u32 {
        self.page.slider_input(value).percent()
    }

    /// Returns `false` when `name` was already active.
    pub fn select_tab(&mut self, name: &str) -> Result<bool, JsValue> {
        let view: ViewTab = name.parse().map_err(js_error)?;
        self.page.select_tab(view).map_err(js_error)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.page.pointer_down(x, y).needs_redraw()
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.page.pointer_move(x, y).needs_redraw()
    }

    pub fn pointer_up(&mut self) {
        self.page.pointer_up();
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.page.pointer_leave().needs_redraw()
    }

    /// Render the page into an RGBA buffer (`width * height * 4` bytes).
    pub fn render(&self) -> Result<Vec<u8>, JsValue> {
        Ok(self.page.render().map_err(js_error)?.into_data())
    }
}

/// Render one view without keeping any page state.
///
/// `params[0]` is the slider position in `0..=100`, rounded to a whole
/// percent the way `slider_input` rounds it; it defaults to 0.
#[wasm_bindgen]
pub fn render_view(name: &str, width: u32, height: u32, params: &[f64]) -> Result<Vec<u8>, JsValue> {
    let view: ViewTab = name.parse().map_err(js_error)?;
    let percent = params.first().copied().unwrap_or(0.0);
    let intensity = Slider::new(0).input(percent);
    let config = PageConfig {
        width,
        height,
        ..PageConfig::default()
    }
    .validated()
    .map_err(js_error)?;
    tracing::debug!(%view, %intensity, width, height, "render_view");
    let surface = orgflow::render_view(view, intensity, &config).map_err(js_error)?;
    Ok(surface.into_data())
}

/// Samples of a structure as a JSON array of `SamplePoint` objects.
#[wasm_bindgen]
pub fn samples_json(structure: &str, intensity: f64) -> Result<String, JsValue> {
    let structure: Structure = structure.parse().map_err(js_error)?;
    let samples = generate_samples(structure.functions(), Intensity::new(intensity));
    serde_json::to_string(&samples).map_err(|e| js_error(OrgFlowError::Config(e)))
}

/// Get the library version string.
#[wasm_bindgen]
pub fn version() -> String {
    format!("orgflow {}", env!("CARGO_PKG_VERSION"))
}

/// Keys accepted by `select_tab` and `render_view`.
#[wasm_bindgen]
pub fn view_names() -> js_sys::Array {
    ViewTab::ALL.iter().map(|v| JsValue::from_str(v.key())).collect()
}
